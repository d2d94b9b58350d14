//! Boundary components.
//!
//! Real boundary components are maximal unions of unglued facets that meet
//! along ridges. Ideal boundary components each consist of a single vertex
//! whose link is closed but not a sphere.

use crate::topology::face_numbering::FaceNumbering;
use crate::topology::simplex::Simplex;

use super::faces::{Face, Slot};
use super::union_find::ClusterIds;

/// A boundary component, real or ideal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryComponent {
    pub(crate) index: usize,
    pub(crate) component: usize,
    /// `faces[k]` for `k` in `0..D`; `faces[D - 1]` are the boundary facets.
    pub(crate) faces: Vec<Vec<usize>>,
    pub(crate) ideal_vertex: Option<usize>,
    pub(crate) euler_char: i64,
}

impl BoundaryComponent {
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the containing component.
    #[inline]
    pub fn component(&self) -> usize {
        self.component
    }

    /// Boundary facets (face indices of dimension `D - 1`); empty when ideal.
    #[inline]
    pub fn facets(&self) -> &[usize] {
        self.faces.last().map_or(&[], Vec::as_slice)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.facets().len()
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
    pub fn is_ideal(&self) -> bool {
        self.ideal_vertex.is_some()
    }

    #[inline]
    pub fn ideal_vertex(&self) -> Option<usize> {
        self.ideal_vertex
    }

    #[inline]
    pub fn euler_char(&self) -> i64 {
        self.euler_char
    }
}

/// Groups unglued facets into boundary components and tags every face they
/// contain. `faces[k]` / `slots[k]` come from face enumeration.
pub(crate) fn label_real_boundary<const N: usize>(
    simplices: &[Simplex<N>],
    faces: &mut [Vec<Face<N>>],
    slots: &[Vec<Slot<N>>],
    simplex_component: &[usize],
) -> Vec<BoundaryComponent> {
    let dim = N - 1;
    let top = dim - 1;
    let ridge = dim - 2;

    let boundary: Vec<usize> = faces[top]
        .iter()
        .filter(|f| {
            let emb = f.front();
            simplices[emb.simplex].adj[emb.face].is_none()
        })
        .map(|f| f.index)
        .collect();
    if boundary.is_empty() {
        return Vec::new();
    }

    // Merge boundary facets that share a ridge.
    let mut uf = ClusterIds::new(boundary.len());
    let per_ridge = FaceNumbering::<N>::count(ridge);
    let mut first_on_ridge = vec![usize::MAX; faces[ridge].len()];
    for (i, &f) in boundary.iter().enumerate() {
        let emb = *faces[top][f].front();
        for j in inside_facet::<N>(ridge, emb.face) {
            let ridge_face = slots[ridge][emb.simplex * per_ridge + j].face;
            match first_on_ridge[ridge_face] {
                usize::MAX => first_on_ridge[ridge_face] = i,
                other => {
                    uf.union(other, i);
                }
            }
        }
    }

    let mut bc_of_root = vec![usize::MAX; boundary.len()];
    let mut components: Vec<BoundaryComponent> = Vec::new();
    for i in 0..boundary.len() {
        let root = uf.find(i);
        if bc_of_root[root] == usize::MAX {
            let emb = *faces[top][boundary[i]].front();
            bc_of_root[root] = components.len();
            components.push(BoundaryComponent {
                index: components.len(),
                component: simplex_component[emb.simplex],
                faces: vec![Vec::new(); dim],
                ideal_vertex: None,
                euler_char: 0,
            });
        }
    }

    for (i, &f) in boundary.iter().enumerate() {
        let bc = bc_of_root[uf.find(i)];
        let emb = *faces[top][f].front();
        for k in 0..dim {
            let per_simplex = FaceNumbering::<N>::count(k);
            for j in inside_facet::<N>(k, emb.face) {
                let face = slots[k][emb.simplex * per_simplex + j].face;
                match faces[k][face].boundary_component {
                    None => {
                        faces[k][face].boundary_component = Some(bc);
                        components[bc].faces[k].push(face);
                    }
                    Some(existing) => {
                        // two boundary facets meeting along a ridge were merged above
                        debug_assert!(
                            k != ridge || existing == bc,
                            "boundary ridge {face} split between components {existing} and {bc}"
                        );
                    }
                }
            }
        }
    }
    for bc in &mut components {
        for list in &mut bc.faces {
            list.sort_unstable();
        }
        bc.euler_char = bc
            .faces
            .iter()
            .enumerate()
            .map(|(k, list)| if k % 2 == 0 { list.len() as i64 } else { -(list.len() as i64) })
            .sum();
    }
    components
}

/// Local `k`-faces lying inside facet `facet`.
fn inside_facet<const N: usize>(k: usize, facet: usize) -> impl Iterator<Item = usize> {
    (0..FaceNumbering::<N>::count(k)).filter(move |&j| !FaceNumbering::<N>::contains_vertex(k, j, facet))
}

/// One boundary component per ideal vertex, numbered after the real ones.
pub(crate) fn label_ideal_boundary<const N: usize>(
    vertices: &mut [Face<N>],
    simplex_component: &[usize],
    components: &mut Vec<BoundaryComponent>,
) {
    let dim = N - 1;
    for v in vertices.iter_mut().filter(|v| v.ideal) {
        let index = components.len();
        let mut faces = vec![Vec::new(); dim];
        faces[0].push(v.index);
        v.boundary_component = Some(index);
        components.push(BoundaryComponent {
            index,
            component: simplex_component[v.front().simplex],
            faces,
            ideal_vertex: Some(v.index),
            euler_char: v.link.euler_char,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faces_inside_a_tetrahedron_facet() {
        // facet 0 = {1,2,3} holds edges 12, 13, 23
        let edges: Vec<_> = inside_facet::<4>(1, 0).collect();
        assert_eq!(edges, vec![3, 4, 5]);
        let vertices: Vec<_> = inside_facet::<4>(0, 2).collect();
        assert_eq!(vertices, vec![0, 1, 3]);
    }
}
