//! Lazily built skeleton storage.
//!
//! A [`SkeletonCache`] is filled by the first skeleton query after a change
//! and emptied by every change span.

use once_cell::sync::OnceCell;

use crate::topology::simplex::Simplex;
use crate::topology::skeleton::Skeleton;

/// Holders of derived topology that must be recomputed after a mutation.
pub trait InvalidateCache {
    /// Drops everything derived from the gluings.
    fn invalidate_cache(&mut self);
}

#[derive(Debug)]
pub(crate) struct SkeletonCache<const N: usize> {
    cell: OnceCell<Skeleton<N>>,
}

impl<const N: usize> SkeletonCache<N> {
    pub fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The skeleton of `simplices`, built if nothing is cached.
    #[inline]
    pub fn get_or_build(&self, simplices: &[Simplex<N>]) -> &Skeleton<N> {
        self.cell.get_or_init(|| Skeleton::build(simplices))
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<const N: usize> InvalidateCache for SkeletonCache<N> {
    #[inline]
    fn invalidate_cache(&mut self) {
        if self.cell.take().is_some() {
            log::trace!("skeleton cache dropped");
        }
    }
}
