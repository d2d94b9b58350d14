//! Canonical relabelling.
//!
//! The canonical form is the labelling read off the smallest signature
//! encoding: simplices take images in the order that encoding reaches them,
//! with the vertex relabelling it chose for each. Decoding the signature of a
//! canonical triangulation therefore rebuilds it gluing for gluing.

use crate::algs::iso_sig::signature;
use crate::topology::perm::Perm;
use crate::topology::triangulation::Triangulation;

impl<const N: usize> Triangulation<N> {
    /// Relabels into the canonical representative of the isomorphism class.
    /// Returns `false`, leaving the triangulation untouched, if it is already
    /// canonical.
    pub fn make_canonical(&mut self) -> bool {
        let (_, iso) = signature(self);
        let images: Vec<usize> = (0..self.size())
            .map(|s| iso.simp_image(s).unwrap_or(s))
            .collect();
        let perms: Vec<Perm<N>> = (0..self.size()).map(|s| iso.facet_perm(s)).collect();
        let relabelled = self.relabelled_simplices(&images, &perms);
        let unchanged = relabelled
            .iter()
            .zip(self.simplices())
            .all(|(a, b)| (0..N).all(|f| a.glued(f) == b.glued(f)));
        if unchanged {
            log::debug!("make_canonical: {} simplices already canonical", self.size());
            return false;
        }
        self.relabel(&images, &perms);
        log::debug!("make_canonical: relabelled {} simplices", self.size());
        true
    }
}
