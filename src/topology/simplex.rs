//! Top-dimensional simplices and their facet gluings.
//!
//! A [`Simplex<N>`] has `N` vertices and `N` facets; facet `f` is the facet
//! opposite vertex `f`. Gluings are stored by simplex index into the owning
//! [`Triangulation`](crate::topology::triangulation::Triangulation), which is
//! the only place they can be changed.

use std::fmt;

use crate::topology::perm::Perm;

/// One top-dimensional simplex.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Simplex<const N: usize> {
    pub(crate) description: String,
    pub(crate) adj: [Option<usize>; N],
    /// Only meaningful where `adj` is `Some`.
    pub(crate) gluing: [Perm<N>; N],
}

impl<const N: usize> Default for Simplex<N> {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl<const N: usize> Simplex<N> {
    /// A simplex with every facet on the boundary.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            adj: [None; N],
            gluing: [Perm::identity(); N],
        }
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Index of the simplex glued to `facet`, if any.
    #[inline]
    pub fn adjacent_simplex(&self, facet: usize) -> Option<usize> {
        self.adj[facet]
    }

    /// Gluing permutation across `facet`, if glued.
    #[inline]
    pub fn adjacent_gluing(&self, facet: usize) -> Option<Perm<N>> {
        self.adj[facet].map(|_| self.gluing[facet])
    }

    /// Facet of the neighbour that `facet` is glued to.
    #[inline]
    pub fn adjacent_facet(&self, facet: usize) -> Option<usize> {
        self.adj[facet].map(|_| self.gluing[facet].image(facet))
    }

    /// `(neighbour, gluing)` across `facet`, if glued.
    #[inline]
    pub fn glued(&self, facet: usize) -> Option<(usize, Perm<N>)> {
        self.adj[facet].map(|t| (t, self.gluing[facet]))
    }

    /// True if some facet is unglued.
    #[inline]
    pub fn has_boundary(&self) -> bool {
        self.adj.iter().any(Option::is_none)
    }

    /// Number of unglued facets.
    #[inline]
    pub fn count_boundary_facets(&self) -> usize {
        self.adj.iter().filter(|a| a.is_none()).count()
    }

    /// True if no facet is glued.
    #[inline]
    pub fn is_isolated(&self) -> bool {
        self.adj.iter().all(Option::is_none)
    }
}

impl<const N: usize> fmt::Debug for Simplex<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glued: Vec<_> = (0..N)
            .map(|facet| self.glued(facet).map(|(t, g)| format!("{t}:{g}")))
            .collect();
        f.debug_struct("Simplex")
            .field("description", &self.description)
            .field("glued", &glued)
            .finish()
    }
}
