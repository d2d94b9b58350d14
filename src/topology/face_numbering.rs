//! Numbering of the lower-dimensional faces inside one top-dimensional simplex.
//!
//! A simplex with `N` vertices has `C(N, k + 1)` faces of dimension `k`.
//! For `2k + 1 <= D` (with `D = N - 1`) they are numbered lexicographically by
//! vertex set. Larger faces are numbered by complement: `k`-face `i` is the
//! complement of `(D - k - 1)`-face `i`. In particular facet `i` is the facet
//! opposite vertex `i`, matching the facet numbering used for gluings.
//!
//! Each face also has a canonical *ordering* permutation sending `0..=k` to
//! its vertices in increasing order and `k+1..N` to the remaining vertices in
//! increasing order.

use itertools::Itertools;
use once_cell::sync::Lazy;

use crate::topology::perm::Perm;
use crate::topology::perm::tables::MAX_N;

pub(crate) struct FaceTable {
    /// `vertices[k][j]`: vertices of `k`-face `j`, ascending.
    vertices: Vec<Vec<Vec<u8>>>,
    /// `masks[k][j]`: bitmask of the same vertex set.
    masks: Vec<Vec<u8>>,
    /// `orderings[k][j]`: signed index of the ordering permutation.
    orderings: Vec<Vec<u8>>,
    /// Face number of each vertex subset, indexed by bitmask.
    by_mask: Vec<u8>,
}

fn mask_of(vertices: &[u8]) -> u8 {
    vertices.iter().fold(0u8, |m, &v| m | (1 << v))
}

impl FaceTable {
    fn build(n: usize) -> Self {
        let dim = n - 1;
        let lex: Vec<Vec<Vec<u8>>> = (0..dim)
            .map(|k| (0..n as u8).combinations(k + 1).collect())
            .collect();
        let full = ((1u16 << n) - 1) as u8;

        let mut vertices = Vec::with_capacity(dim);
        for k in 0..dim {
            if 2 * k < dim {
                vertices.push(lex[k].clone());
            } else {
                let dual = &lex[dim - k - 1];
                let faces = dual
                    .iter()
                    .map(|d| {
                        let keep = full & !mask_of(d);
                        (0..n as u8).filter(|v| keep & (1 << v) != 0).collect()
                    })
                    .collect();
                vertices.push(faces);
            }
        }

        let masks: Vec<Vec<u8>> = vertices
            .iter()
            .map(|faces| faces.iter().map(|f| mask_of(f)).collect())
            .collect();

        let mut by_mask = vec![u8::MAX; 1 << n];
        for faces in &masks {
            for (j, &m) in faces.iter().enumerate() {
                by_mask[m as usize] = j as u8;
            }
        }

        let orderings = vertices
            .iter()
            .zip(&masks)
            .map(|(faces, ms)| {
                faces
                    .iter()
                    .zip(ms)
                    .map(|(f, &m)| {
                        let images: Vec<u8> = f
                            .iter()
                            .copied()
                            .chain((0..n as u8).filter(|v| m & (1 << v) == 0))
                            .collect();
                        crate::topology::perm::tables::table(n).code_of(&images)
                    })
                    .collect()
            })
            .collect();

        Self {
            vertices,
            masks,
            orderings,
            by_mask,
        }
    }
}

static FACES_3: Lazy<FaceTable> = Lazy::new(|| FaceTable::build(3));
static FACES_4: Lazy<FaceTable> = Lazy::new(|| FaceTable::build(4));
static FACES_5: Lazy<FaceTable> = Lazy::new(|| FaceTable::build(5));

fn face_table(n: usize) -> &'static FaceTable {
    match n {
        3 => &FACES_3,
        4 => &FACES_4,
        5 => &FACES_5,
        _ => panic!("no face numbering for {n}-vertex simplices"),
    }
}

/// Face numbering for simplices with `N` vertices.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaceNumbering<const N: usize>;

impl<const N: usize> FaceNumbering<N> {
    /// Dimension of the simplex.
    pub const DIM: usize = N - 1;

    #[inline]
    fn table() -> &'static FaceTable {
        debug_assert!(N <= MAX_N);
        face_table(N)
    }

    /// Number of `k`-faces in one simplex.
    #[inline]
    pub fn count(k: usize) -> usize {
        Self::table().vertices[k].len()
    }

    /// Vertices of `k`-face `j`, ascending.
    #[inline]
    pub fn vertices(k: usize, j: usize) -> &'static [u8] {
        &Self::table().vertices[k][j]
    }

    /// Bitmask of the vertices of `k`-face `j`.
    #[inline]
    pub fn mask(k: usize, j: usize) -> u8 {
        Self::table().masks[k][j]
    }

    #[inline]
    pub fn contains_vertex(k: usize, j: usize, v: usize) -> bool {
        Self::mask(k, j) & (1 << v) != 0
    }

    /// The canonical ordering permutation of `k`-face `j`.
    #[inline]
    pub fn ordering(k: usize, j: usize) -> Perm<N> {
        Perm::from_sn_index(Self::table().orderings[k][j] as usize)
    }

    /// Number of the face spanned by `mask`, or `None` if the mask is empty
    /// or spans the whole simplex.
    #[inline]
    pub fn face_number_of_mask(mask: u8) -> Option<usize> {
        match Self::table().by_mask.get(mask as usize) {
            Some(&j) if j != u8::MAX => Some(j as usize),
            _ => None,
        }
    }

    /// Number of the face whose vertices are `perm[0..=k]`.
    #[inline]
    pub fn face_number(k: usize, perm: Perm<N>) -> usize {
        let mask = (0..=k).fold(0u8, |m, i| m | (1 << perm.image(i)));
        Self::table().by_mask[mask as usize] as usize
    }

    /// Facets (by number) that contain `k`-face `j`.
    pub fn containing_facets(k: usize, j: usize) -> impl Iterator<Item = usize> {
        let mask = Self::mask(k, j);
        (0..N).filter(move |&f| mask & (1 << f) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tetrahedron_edges_are_lexicographic() {
        let edges: Vec<_> = (0..6).map(|j| FaceNumbering::<4>::vertices(1, j).to_vec()).collect();
        assert_eq!(
            edges,
            vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]
        );
    }

    #[test]
    fn facet_i_is_opposite_vertex_i() {
        for j in 0..5 {
            assert_eq!(FaceNumbering::<5>::mask(3, j), 0b11111 & !(1 << j));
            assert_eq!(FaceNumbering::<5>::ordering(3, j).image(4), j);
        }
        for j in 0..3 {
            assert!(!FaceNumbering::<3>::contains_vertex(1, j, j));
        }
    }

    #[test]
    fn pentachoron_triangles_complement_edges() {
        assert_eq!(FaceNumbering::<5>::count(2), 10);
        for j in 0..10 {
            let edge = FaceNumbering::<5>::mask(1, j);
            assert_eq!(FaceNumbering::<5>::mask(2, j), 0b11111 & !edge);
        }
    }

    #[test]
    fn ordering_round_trips_through_face_number() {
        for k in 0..3 {
            for j in 0..FaceNumbering::<4>::count(k) {
                let ord = FaceNumbering::<4>::ordering(k, j);
                assert_eq!(FaceNumbering::<4>::face_number(k, ord), j);
                let head: Vec<u8> = (0..=k).map(|i| ord.image(i) as u8).collect();
                assert_eq!(head, FaceNumbering::<4>::vertices(k, j));
            }
        }
    }

    #[test]
    fn containing_facets_skip_face_vertices() {
        // edge 0 of a tetrahedron is {0, 1}, so it lies in facets 2 and 3
        let facets: Vec<_> = FaceNumbering::<4>::containing_facets(1, 0).collect();
        assert_eq!(facets, vec![2, 3]);
    }
}
