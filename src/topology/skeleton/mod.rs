//! The skeleton: faces of every dimension below `D`, connected components and
//! boundary components, with validity, orientability and link data.
//!
//! [`Skeleton::build`] runs three passes over the simplices:
//! 1. face enumeration for `k = D-1` down to `0`;
//! 2. component discovery with orientation propagation;
//! 3. boundary labelling, real then ideal.
//!
//! Link summaries and validity flags are filled in between passes 2 and 3, so
//! that ideal vertices are known before the ideal boundary is labelled.
//! Everything is a deterministic function of the gluings.

pub mod boundary;
pub mod component;
pub mod faces;
pub(crate) mod link;
pub(crate) mod union_find;

use crate::topology::face_numbering::FaceNumbering;
use crate::topology::perm::Perm;
use crate::topology::simplex::Simplex;
use crate::topology::triangulation::Triangulation;
use crate::tri_error::TriSieveError;

pub use boundary::BoundaryComponent;
pub use component::Component;
pub use faces::{Face, FaceEmbedding, LinkSummary, LinkType};

use faces::Slot;

/// Derived face structure of a triangulation.
#[derive(Debug, Clone)]
pub struct Skeleton<const N: usize> {
    faces: Vec<Vec<Face<N>>>,
    slots: Vec<Vec<Slot<N>>>,
    components: Vec<Component>,
    simplex_component: Vec<usize>,
    orientation: Vec<i32>,
    boundary_components: Vec<BoundaryComponent>,
    size: usize,
}

impl<const N: usize> Skeleton<N> {
    const DIM: usize = N - 1;

    /// Computes the skeleton of `simplices`. Never fails: malformed
    /// identifications only set validity flags.
    pub fn build(simplices: &[Simplex<N>]) -> Self {
        let dim = Self::DIM;
        let mut faces: Vec<Vec<Face<N>>> = (0..dim).map(|_| Vec::new()).collect();
        let mut slots: Vec<Vec<Slot<N>>> = (0..dim).map(|_| Vec::new()).collect();
        for k in (0..dim).rev() {
            let (f, s) = faces::enumerate_faces(simplices, k);
            faces[k] = f;
            slots[k] = s;
        }

        let scan = component::discover_components(simplices, dim);
        let mut components = scan.components;
        for (k, list) in faces.iter_mut().enumerate() {
            for face in list.iter_mut() {
                face.component = scan.simplex_component[face.front().simplex];
                components[face.component].faces[k].push(face.index);
            }
        }

        for (list, slot_table) in faces.iter_mut().zip(&slots) {
            for face in list.iter_mut() {
                face.link = link::analyse_link(simplices, slot_table, face);
            }
        }
        classify(&mut faces, &slots);

        let mut boundary_components =
            boundary::label_real_boundary(simplices, &mut faces, &slots, &scan.simplex_component);
        boundary::label_ideal_boundary(&mut faces[0], &scan.simplex_component, &mut boundary_components);
        for bc in &boundary_components {
            components[bc.component].boundary_components.push(bc.index);
        }

        let skeleton = Self {
            faces,
            slots,
            components,
            simplex_component: scan.simplex_component,
            orientation: scan.orientation,
            boundary_components,
            size: simplices.len(),
        };
        let invalid: usize = skeleton
            .faces
            .iter()
            .map(|list| list.iter().filter(|f| !f.is_valid()).count())
            .sum();
        if invalid > 0 {
            log::warn!("skeleton has {invalid} invalid faces");
        }
        log::debug!(
            "skeleton built: f-vector {:?}, {} components, {} boundary components",
            skeleton.f_vector(),
            skeleton.components.len(),
            skeleton.boundary_components.len()
        );
        skeleton
    }

    #[inline]
    pub fn count_faces(&self, k: usize) -> usize {
        if k == Self::DIM {
            self.size
        } else {
            self.faces[k].len()
        }
    }

    /// Face counts for `k = 0..=D`; the last entry is the number of simplices.
    pub fn f_vector(&self) -> Vec<usize> {
        (0..=Self::DIM).map(|k| self.count_faces(k)).collect()
    }

    #[inline]
    pub fn faces(&self, k: usize) -> &[Face<N>] {
        &self.faces[k]
    }

    #[inline]
    pub fn face(&self, k: usize, index: usize) -> Option<&Face<N>> {
        self.faces.get(k)?.get(index)
    }

    #[inline]
    pub fn vertices(&self) -> &[Face<N>] {
        &self.faces[0]
    }

    #[inline]
    pub fn edges(&self) -> &[Face<N>] {
        &self.faces[1]
    }

    #[inline]
    fn slot(&self, simplex: usize, k: usize, j: usize) -> Slot<N> {
        self.slots[k][simplex * FaceNumbering::<N>::count(k) + j]
    }

    /// Index of the face at local `k`-face `j` of `simplex`.
    #[inline]
    pub fn simplex_face(&self, simplex: usize, k: usize, j: usize) -> usize {
        self.slot(simplex, k, j).face
    }

    /// Vertex mapping of local `k`-face `j` of `simplex`.
    #[inline]
    pub fn simplex_face_mapping(&self, simplex: usize, k: usize, j: usize) -> Perm<N> {
        self.slot(simplex, k, j).mapping
    }

    #[inline]
    pub fn simplex_component(&self, simplex: usize) -> usize {
        self.simplex_component[simplex]
    }

    /// `+1` or `-1`; consistent across orientable components.
    #[inline]
    pub fn simplex_orientation(&self, simplex: usize) -> i32 {
        self.orientation[simplex]
    }

    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    #[inline]
    pub fn boundary_components(&self) -> &[BoundaryComponent] {
        &self.boundary_components
    }

    pub fn is_valid(&self) -> bool {
        self.faces.iter().flatten().all(Face::is_valid)
    }

    pub fn is_orientable(&self) -> bool {
        self.components.iter().all(Component::is_orientable)
    }

    pub fn is_ideal(&self) -> bool {
        self.faces[0].iter().any(Face::is_ideal)
    }

    pub fn count_boundary_facets(&self) -> usize {
        self.components.iter().map(Component::count_boundary_facets).sum()
    }

    /// `Σ (-1)^k f_k` over `k = 0..=D`.
    pub fn euler_char(&self) -> i64 {
        self.f_vector()
            .iter()
            .enumerate()
            .map(|(k, &c)| if k % 2 == 0 { c as i64 } else { -(c as i64) })
            .sum()
    }

    /// Euler characteristic with every ideal vertex truncated.
    pub fn euler_char_manifold(&self) -> i64 {
        let cusps: i64 = self
            .faces[0]
            .iter()
            .filter(|v| v.ideal)
            .map(|v| v.link.euler_char - 1)
            .sum();
        self.euler_char() + cusps
    }
}

/// Sets validity flags, vertex link types and ideal vertices from the link
/// summaries.
fn classify<const N: usize>(faces: &mut [Vec<Face<N>>], slots: &[Vec<Slot<N>>]) {
    let dim = N - 1;
    match dim {
        2 => {
            for v in faces[0].iter_mut() {
                v.link_type = Some(if v.link.closed { LinkType::Sphere } else { LinkType::Disc });
            }
        }
        3 => {
            for v in faces[0].iter_mut() {
                let LinkSummary { closed, orientable, euler_char } = v.link;
                let link_type = match (closed, euler_char) {
                    (false, 1) => LinkType::Disc,
                    (false, _) => LinkType::NonStandardBoundary,
                    (true, 2) => LinkType::Sphere,
                    (true, 0) if orientable => LinkType::Torus,
                    (true, 0) => LinkType::KleinBottle,
                    (true, _) => LinkType::NonStandardCusp,
                };
                v.bad_link = link_type == LinkType::NonStandardBoundary;
                v.ideal = closed && euler_char != 2;
                v.link_type = Some(link_type);
            }
        }
        _ => {
            for e in faces[1].iter_mut() {
                let LinkSummary { closed, euler_char, .. } = e.link;
                e.bad_link = !matches!((closed, euler_char), (true, 2) | (false, 1));
            }
            // a vertex is invalid as soon as an incident edge or triangle is
            let mut tainted = vec![false; faces[0].len()];
            for k in 1..dim - 1 {
                for face in faces[k].iter().filter(|f| !f.is_valid()) {
                    for emb in &face.embeddings {
                        for &v in FaceNumbering::<N>::vertices(k, emb.face) {
                            let vertex = slots[0][emb.simplex * N + v as usize].face;
                            tainted[vertex] = true;
                        }
                    }
                }
            }
            for (v, bad) in faces[0].iter_mut().zip(tainted) {
                let LinkSummary { closed, orientable, .. } = v.link;
                v.bad_link = bad;
                let link_type = if bad {
                    LinkType::Invalid
                } else if !closed {
                    LinkType::Disc
                } else if orientable {
                    LinkType::Sphere
                } else {
                    LinkType::NonStandardCusp
                };
                v.ideal = link_type == LinkType::NonStandardCusp;
                v.link_type = Some(link_type);
            }
        }
    }
}

impl<const N: usize> Triangulation<N> {
    /// Number of `k`-faces for `k` in `0..=D`.
    pub fn count_faces(&self, k: usize) -> Result<usize, TriSieveError> {
        if k > Self::DIM {
            return Err(TriSieveError::FaceDimensionOutOfRange { subdim: k, dim: Self::DIM });
        }
        Ok(self.skeleton().count_faces(k))
    }

    pub fn f_vector(&self) -> Vec<usize> {
        self.skeleton().f_vector()
    }

    pub fn count_vertices(&self) -> usize {
        self.skeleton().count_faces(0)
    }

    pub fn count_edges(&self) -> usize {
        self.skeleton().count_faces(1)
    }

    pub fn count_triangles(&self) -> usize {
        self.skeleton().count_faces(2)
    }

    /// `k`-face number `index`, for `k < D`.
    pub fn face(&self, k: usize, index: usize) -> Result<&Face<N>, TriSieveError> {
        if k >= Self::DIM {
            return Err(TriSieveError::FaceDimensionOutOfRange { subdim: k, dim: Self::DIM });
        }
        let skeleton = self.skeleton();
        skeleton.face(k, index).ok_or(TriSieveError::SimplexOutOfRange {
            index,
            size: skeleton.count_faces(k),
        })
    }

    /// The face at local `k`-face `j` of `simplex`.
    pub fn simplex_face(&self, simplex: usize, k: usize, j: usize) -> Result<&Face<N>, TriSieveError> {
        self.check_local_face(simplex, k, j)?;
        let skeleton = self.skeleton();
        Ok(&skeleton.faces(k)[skeleton.simplex_face(simplex, k, j)])
    }

    /// How local `k`-face `j` of `simplex` maps onto its face's own vertices.
    pub fn simplex_face_mapping(&self, simplex: usize, k: usize, j: usize) -> Result<Perm<N>, TriSieveError> {
        self.check_local_face(simplex, k, j)?;
        Ok(self.skeleton().simplex_face_mapping(simplex, k, j))
    }

    pub fn simplex_orientation(&self, simplex: usize) -> Result<i32, TriSieveError> {
        self.check_simplex(simplex)?;
        Ok(self.skeleton().simplex_orientation(simplex))
    }

    pub fn simplex_component(&self, simplex: usize) -> Result<&Component, TriSieveError> {
        self.check_simplex(simplex)?;
        let skeleton = self.skeleton();
        Ok(&skeleton.components()[skeleton.simplex_component(simplex)])
    }

    fn check_local_face(&self, simplex: usize, k: usize, j: usize) -> Result<(), TriSieveError> {
        self.check_simplex(simplex)?;
        if k >= Self::DIM {
            return Err(TriSieveError::FaceDimensionOutOfRange { subdim: k, dim: Self::DIM });
        }
        if j >= FaceNumbering::<N>::count(k) {
            return Err(TriSieveError::FacetOutOfRange { facet: j, dim: Self::DIM });
        }
        Ok(())
    }

    pub fn components(&self) -> &[Component] {
        self.skeleton().components()
    }

    pub fn count_components(&self) -> usize {
        self.skeleton().components().len()
    }

    pub fn boundary_components(&self) -> &[BoundaryComponent] {
        self.skeleton().boundary_components()
    }

    pub fn count_boundary_components(&self) -> usize {
        self.skeleton().boundary_components().len()
    }

    pub fn count_boundary_facets(&self) -> usize {
        self.skeleton().count_boundary_facets()
    }

    pub fn has_boundary_facets(&self) -> bool {
        self.count_boundary_facets() > 0
    }

    pub fn is_valid(&self) -> bool {
        self.skeleton().is_valid()
    }

    pub fn is_orientable(&self) -> bool {
        self.skeleton().is_orientable()
    }

    /// At most one component.
    pub fn is_connected(&self) -> bool {
        self.count_components() <= 1
    }

    pub fn is_ideal(&self) -> bool {
        self.skeleton().is_ideal()
    }

    /// No boundary facets and no ideal vertices.
    pub fn is_closed(&self) -> bool {
        self.count_boundary_components() == 0
    }

    pub fn euler_char(&self) -> i64 {
        self.skeleton().euler_char()
    }

    pub fn euler_char_manifold(&self) -> i64 {
        self.skeleton().euler_char_manifold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lone_tetrahedron() {
        let mut tri = Triangulation::<4>::new();
        tri.new_simplex();
        assert_eq!(tri.f_vector(), vec![4, 6, 4, 1]);
        assert_eq!(tri.euler_char(), 1);
        assert!(tri.is_valid());
        assert_eq!(tri.count_boundary_components(), 1);
        assert_eq!(tri.boundary_components()[0].euler_char(), 2);
        assert!(tri.skeleton().vertices().iter().all(|v| v.link_type() == Some(LinkType::Disc)));
    }

    #[test]
    fn empty_triangulation_is_trivially_everything() {
        let tri = Triangulation::<5>::new();
        assert_eq!(tri.f_vector(), vec![0, 0, 0, 0, 0]);
        assert!(tri.is_valid() && tri.is_orientable() && tri.is_connected() && tri.is_closed());
    }

    #[test]
    fn skeleton_is_stable_between_queries() {
        let mut tri = Triangulation::<3>::new();
        tri.new_simplices(2);
        tri.join(0, 0, 1, Perm::identity()).unwrap();
        let first = tri.simplex_face_mapping(1, 1, 0).unwrap();
        let faces: Vec<_> = (0..3).map(|j| tri.skeleton().simplex_face(1, 0, j)).collect();
        assert_eq!(tri.simplex_face_mapping(1, 1, 0).unwrap(), first);
        let again: Vec<_> = (0..3).map(|j| tri.skeleton().simplex_face(1, 0, j)).collect();
        assert_eq!(faces, again);
    }

    #[test]
    fn local_face_bounds_are_checked() {
        let mut tri = Triangulation::<3>::new();
        tri.new_simplex();
        assert!(tri.simplex_face(0, 2, 0).is_err());
        assert!(tri.simplex_face(0, 0, 3).is_err());
        assert!(tri.simplex_face(1, 0, 0).is_err());
        assert!(tri.count_faces(3).is_err());
        assert_eq!(tri.count_faces(2), Ok(1));
    }
}
