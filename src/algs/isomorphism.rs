//! Combinatorial isomorphisms between triangulations.
//!
//! An [`Isomorphism<N>`] sends simplex `s` to simplex `simp_image(s)` and
//! relabels its vertices by `facet_perm(s)`. A gluing `(a, f) -> (b, g)` of
//! the source becomes
//! `(img[a], perm[a][f]) -> (img[b], perm[b] * g * perm[a]^-1)`.

use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::topology::perm::Perm;
use crate::topology::triangulation::Triangulation;
use crate::tri_error::TriSieveError;

/// A (possibly partial) map between triangulations of the same dimension.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Isomorphism<const N: usize> {
    simp_image: Vec<Option<usize>>,
    facet_perm: Vec<Perm<N>>,
}

impl<const N: usize> Isomorphism<N> {
    /// `size` unassigned images with identity vertex maps.
    pub fn new(size: usize) -> Self {
        Self {
            simp_image: vec![None; size],
            facet_perm: vec![Perm::identity(); size],
        }
    }

    pub fn identity(size: usize) -> Self {
        Self {
            simp_image: (0..size).map(Some).collect(),
            facet_perm: vec![Perm::identity(); size],
        }
    }

    /// A uniformly random complete isomorphism on `size` simplices.
    pub fn random<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Self {
        let mut images: Vec<usize> = (0..size).collect();
        images.shuffle(rng);
        Self {
            simp_image: images.into_iter().map(Some).collect(),
            facet_perm: (0..size)
                .map(|_| Perm::from_sn_index(rng.gen_range(0..Perm::<N>::COUNT)))
                .collect(),
        }
    }

    pub(crate) fn from_parts(simp_image: Vec<Option<usize>>, facet_perm: Vec<Perm<N>>) -> Self {
        debug_assert_eq!(simp_image.len(), facet_perm.len());
        Self {
            simp_image,
            facet_perm,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.simp_image.len()
    }

    #[inline]
    pub fn simp_image(&self, simplex: usize) -> Option<usize> {
        self.simp_image[simplex]
    }

    #[inline]
    pub fn facet_perm(&self, simplex: usize) -> Perm<N> {
        self.facet_perm[simplex]
    }

    #[inline]
    pub fn set_simp_image(&mut self, simplex: usize, image: Option<usize>) {
        self.simp_image[simplex] = image;
    }

    #[inline]
    pub fn set_facet_perm(&mut self, simplex: usize, perm: Perm<N>) {
        self.facet_perm[simplex] = perm;
    }

    /// Image `(simplex, facet)` of facet `facet` of `simplex`.
    #[inline]
    pub fn facet_image(&self, simplex: usize, facet: usize) -> Option<(usize, usize)> {
        self.simp_image[simplex].map(|t| (t, self.facet_perm[simplex].image(facet)))
    }

    /// Every simplex has an image.
    pub fn is_complete(&self) -> bool {
        self.simp_image.iter().all(Option::is_some)
    }

    pub fn is_identity(&self) -> bool {
        self.simp_image
            .iter()
            .enumerate()
            .all(|(s, &img)| img == Some(s))
            && self.facet_perm.iter().all(|p| p.is_identity())
    }

    /// Images as a permutation of `0..size`, or the first offending simplex.
    fn images(&self) -> Result<Vec<usize>, TriSieveError> {
        let n = self.size();
        let mut used = vec![false; n];
        let mut images = Vec::with_capacity(n);
        for (s, img) in self.simp_image.iter().enumerate() {
            let img = img.ok_or(TriSieveError::IncompleteIsomorphism(s))?;
            if img >= n || std::mem::replace(&mut used[img], true) {
                return Err(TriSieveError::NonBijectiveIsomorphism(img));
            }
            images.push(img);
        }
        Ok(images)
    }

    /// The inverse map. The isomorphism must be a complete bijection.
    pub fn inverse(&self) -> Result<Self, TriSieveError> {
        let images = self.images()?;
        let mut inv = Self::new(self.size());
        for (s, &img) in images.iter().enumerate() {
            inv.simp_image[img] = Some(s);
            inv.facet_perm[img] = self.facet_perm[s].inverse();
        }
        Ok(inv)
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Self) -> Result<Self, TriSieveError> {
        let mut out = Self::new(self.size());
        for s in 0..self.size() {
            let Some(mid) = self.simp_image[s] else {
                continue;
            };
            let Some(&target) = next.simp_image.get(mid) else {
                return Err(TriSieveError::IsomorphismSizeMismatch {
                    expected: next.size(),
                    found: mid + 1,
                });
            };
            out.simp_image[s] = target;
            out.facet_perm[s] = next.facet_perm[mid] * self.facet_perm[s];
        }
        Ok(out)
    }

    fn check_applicable(&self, tri: &Triangulation<N>) -> Result<Vec<usize>, TriSieveError> {
        if self.size() != tri.size() {
            return Err(TriSieveError::IsomorphismSizeMismatch {
                expected: self.size(),
                found: tri.size(),
            });
        }
        self.images()
    }

    /// The image of `tri`. Descriptions travel with their simplices.
    pub fn apply(&self, tri: &Triangulation<N>) -> Result<Triangulation<N>, TriSieveError> {
        let images = self.check_applicable(tri)?;
        Ok(Triangulation::from_simplices(
            tri.relabelled_simplices(&images, &self.facet_perm),
        ))
    }

    /// Replaces `tri` by its image as one change.
    pub fn apply_in_place(&self, tri: &mut Triangulation<N>) -> Result<(), TriSieveError> {
        let images = self.check_applicable(tri)?;
        tri.relabel(&images, &self.facet_perm);
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for Isomorphism<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries: Vec<String> = self
            .simp_image
            .iter()
            .zip(&self.facet_perm)
            .enumerate()
            .map(|(s, (img, p))| match img {
                Some(t) => format!("{s} -> {t} ({p})"),
                None => format!("{s} -> ?"),
            })
            .collect();
        f.debug_tuple("Isomorphism").field(&entries).finish()
    }
}

impl<const N: usize> Triangulation<N> {
    /// Applies a random complete isomorphism in place and returns it.
    pub fn randomise_labelling<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Isomorphism<N> {
        let iso = Isomorphism::random(self.size(), rng);
        let images: Vec<usize> = iso.simp_image.iter().flatten().copied().collect();
        self.relabel(&images, &iso.facet_perm);
        iso
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn chain() -> Triangulation<4> {
        let mut tri = Triangulation::new();
        tri.new_simplices(3);
        tri.join(0, 0, 1, Perm::from_images([1, 0, 3, 2]).unwrap()).unwrap();
        tri.join(1, 3, 2, Perm::from_images([2, 3, 1, 0]).unwrap()).unwrap();
        tri.join(2, 2, 2, Perm::transposition(0, 1)).unwrap();
        tri
    }

    #[test]
    fn identity_apply_is_identical() {
        let tri = chain();
        let image = Isomorphism::identity(3).apply(&tri).unwrap();
        assert!(image.is_identical_to(&tri));
    }

    #[test]
    fn apply_then_inverse_restores() {
        let mut rng = SmallRng::seed_from_u64(7);
        let tri = chain();
        let iso = Isomorphism::<4>::random(3, &mut rng);
        let image = iso.apply(&tri).unwrap();
        let back = iso.inverse().unwrap().apply(&image).unwrap();
        assert!(back.is_identical_to(&tri));
        assert!(iso.then(&iso.inverse().unwrap()).unwrap().is_identity());
    }

    #[test]
    fn apply_moves_gluings() {
        let mut tri = Triangulation::<3>::new();
        tri.new_simplices(2);
        tri.join(0, 2, 1, Perm::identity()).unwrap();
        let mut iso = Isomorphism::<3>::new(2);
        iso.set_simp_image(0, Some(1));
        iso.set_simp_image(1, Some(0));
        iso.set_facet_perm(0, Perm::from_images([2, 0, 1]).unwrap());
        let image = iso.apply(&tri).unwrap();
        // facet 2 of old simplex 0 is facet 1 of new simplex 1
        assert_eq!(iso.facet_image(0, 2), Some((1, 1)));
        assert_eq!(image[1].adjacent_simplex(1), Some(0));
        assert_eq!(image[0].adjacent_facet(2), Some(1));
    }

    #[test]
    fn apply_rejects_bad_isomorphisms() {
        let tri = chain();
        assert_eq!(
            Isomorphism::identity(2).apply(&tri).unwrap_err(),
            TriSieveError::IsomorphismSizeMismatch { expected: 2, found: 3 }
        );
        let mut partial = Isomorphism::identity(3);
        partial.set_simp_image(1, None);
        assert_eq!(
            partial.apply(&tri).unwrap_err(),
            TriSieveError::IncompleteIsomorphism(1)
        );
        let mut twice = Isomorphism::identity(3);
        twice.set_simp_image(2, Some(0));
        assert_eq!(
            twice.apply(&tri).unwrap_err(),
            TriSieveError::NonBijectiveIsomorphism(0)
        );
    }

    #[test]
    fn randomise_preserves_topology() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut tri = chain();
        let before = (tri.f_vector(), tri.is_orientable(), tri.count_boundary_components());
        let iso = tri.randomise_labelling(&mut rng);
        assert!(iso.is_complete());
        assert_eq!(
            (tri.f_vector(), tri.is_orientable(), tri.count_boundary_components()),
            before
        );
    }
}
