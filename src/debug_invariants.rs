//! Structural invariant checks.
//!
//! `validate_invariants` always runs its checks and reports the first
//! violation; `debug_assert_invariants` panics on one, but only in debug
//! builds or with the `strict-invariants` feature.

use crate::topology::simplex::Simplex;
use crate::tri_error::TriSieveError;

pub trait DebugInvariants {
    /// Panics on the first violation when invariant checking is enabled.
    fn debug_assert_invariants(&self);
    /// The first violation found, if any.
    fn validate_invariants(&self) -> Result<(), TriSieveError>;
}

/// Runs a `Result`-returning check and panics with `ctx` on `Err` when
/// invariant checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}

/// Every gluing `(s, f) -> (t, g)` points at an existing simplex whose facet
/// `g(f)` is glued back to `s` by `g⁻¹`. For a facet glued to itself this
/// forces `g` to be an involution.
pub(crate) fn check_reciprocity<const N: usize>(
    simplices: &[Simplex<N>],
) -> Result<(), TriSieveError> {
    for (s, simplex) in simplices.iter().enumerate() {
        for f in 0..N {
            let Some((t, g)) = simplex.glued(f) else {
                continue;
            };
            let reciprocated = simplices
                .get(t)
                .is_some_and(|back| back.glued(g.image(f)) == Some((s, g.inverse())));
            if !reciprocated {
                return Err(TriSieveError::BrokenReciprocity { simplex: s, facet: f });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::perm::Perm;

    #[test]
    fn one_sided_gluing_is_reported() {
        let mut simplices = vec![Simplex::<3>::default(), Simplex::default()];
        simplices[0].adj[2] = Some(1);
        assert_eq!(
            check_reciprocity(&simplices),
            Err(TriSieveError::BrokenReciprocity { simplex: 0, facet: 2 })
        );
        simplices[1].adj[2] = Some(0);
        assert_eq!(check_reciprocity(&simplices), Ok(()));
    }

    #[test]
    fn self_gluing_must_be_an_involution() {
        let mut simplices = vec![Simplex::<4>::default()];
        simplices[0].adj[3] = Some(0);
        simplices[0].gluing[3] = Perm::from_images([1, 2, 0, 3]).unwrap();
        assert!(check_reciprocity(&simplices).is_err());
        simplices[0].gluing[3] = Perm::transposition(0, 1);
        assert!(check_reciprocity(&simplices).is_ok());
    }

    #[test]
    fn dangling_neighbour_is_reported() {
        let mut simplices = vec![Simplex::<3>::default()];
        simplices[0].adj[0] = Some(4);
        assert!(check_reciprocity(&simplices).is_err());
    }
}
