//! Connected components and simplex orientations.

use crate::topology::orientation::{BitFlip, propagate_from};
use crate::topology::perm::Perm;
use crate::topology::simplex::Simplex;

/// A connected component of the triangulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub(crate) index: usize,
    pub(crate) simplices: Vec<usize>,
    pub(crate) orientable: bool,
    /// `faces[k]`: indices of the `k`-faces in this component.
    pub(crate) faces: Vec<Vec<usize>>,
    pub(crate) boundary_components: Vec<usize>,
    pub(crate) boundary_facets: usize,
}

impl Component {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of top-dimensional simplices.
    #[inline]
    pub fn size(&self) -> usize {
        self.simplices.len()
    }

    /// Simplices in discovery order.
    #[inline]
    pub fn simplices(&self) -> &[usize] {
        &self.simplices
    }

    #[inline]
    pub fn is_orientable(&self) -> bool {
        self.orientable
    }

    #[inline]
    pub fn faces(&self, k: usize) -> &[usize] {
        &self.faces[k]
    }

    #[inline]
    pub fn count_faces(&self, k: usize) -> usize {
        self.faces[k].len()
    }

    #[inline]
    pub fn boundary_components(&self) -> &[usize] {
        &self.boundary_components
    }

    #[inline]
    pub fn count_boundary_components(&self) -> usize {
        self.boundary_components.len()
    }

    #[inline]
    pub fn count_boundary_facets(&self) -> usize {
        self.boundary_facets
    }

    /// No boundary components, real or ideal.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.boundary_components.is_empty()
    }
}

pub(crate) struct ComponentScan {
    pub components: Vec<Component>,
    pub simplex_component: Vec<usize>,
    pub orientation: Vec<i32>,
}

/// Breadth-first search over facet gluings. A neighbour across an even
/// gluing takes the opposite orientation; any contradiction makes the
/// component non-orientable.
pub(crate) fn discover_components<const N: usize>(
    simplices: &[Simplex<N>],
    face_dims: usize,
) -> ComponentScan {
    let n = simplices.len();
    let mut labels: Vec<Option<BitFlip>> = vec![None; n];
    let mut simplex_component = vec![0usize; n];
    let mut components = Vec::new();
    for seed in 0..n {
        if labels[seed].is_some() {
            continue;
        }
        let (order, orientable) = propagate_from(seed, &mut labels, |u| {
            simplices[u]
                .adj
                .iter()
                .zip(&simplices[u].gluing)
                .filter_map(|(adj, &g): (&Option<usize>, &Perm<N>)| {
                    adj.map(|t| (t, BitFlip::across(g)))
                })
                .collect::<Vec<_>>()
        });
        let index = components.len();
        for &s in &order {
            simplex_component[s] = index;
        }
        let boundary_facets = order.iter().map(|&s| simplices[s].count_boundary_facets()).sum();
        components.push(Component {
            index,
            simplices: order,
            orientable,
            faces: vec![Vec::new(); face_dims],
            boundary_components: Vec::new(),
            boundary_facets,
        });
    }
    let orientation = labels
        .iter()
        .map(|l| l.map_or(1, BitFlip::sign))
        .collect();
    ComponentScan {
        components,
        simplex_component,
        orientation,
    }
}
