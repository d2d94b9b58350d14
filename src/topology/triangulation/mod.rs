//! The triangulation container.
//!
//! [`Triangulation<N>`] owns an arena of [`Simplex<N>`] values addressed by
//! index; gluings refer to neighbours by index. Every mutator validates its
//! arguments first, then opens a [`ChangeSpan`] so that the cached skeleton
//! is dropped and listeners are notified once.
//!
//! Skeleton queries (faces, components, boundary components, validity,
//! orientability, Euler characteristics) live in
//! [`skeleton`](crate::topology::skeleton) and compute the skeleton lazily.

pub mod change;
pub mod construction;

use std::fmt;
use std::ops::{Index, Range};
use std::sync::Arc;

use crate::debug_invariants::{DebugInvariants, check_reciprocity};
use crate::topology::cache::{InvalidateCache, SkeletonCache};
use crate::topology::perm::Perm;
use crate::topology::simplex::Simplex;
use crate::topology::skeleton::Skeleton;
use crate::tri_error::TriSieveError;

pub use change::{ChangeEvent, ChangeListener, ChangeSpan};

/// A simplicial pseudo-triangulation built from `N`-vertex simplices.
pub struct Triangulation<const N: usize> {
    pub(crate) simplices: Vec<Simplex<N>>,
    skeleton: SkeletonCache<N>,
    listeners: Vec<Arc<dyn ChangeListener>>,
    revision: u64,
    span_depth: usize,
}

/// Triangulated surfaces.
pub type Triangulation2 = Triangulation<3>;
/// Triangulated 3-manifolds.
pub type Triangulation3 = Triangulation<4>;
/// Triangulated 4-manifolds.
pub type Triangulation4 = Triangulation<5>;

impl<const N: usize> Default for Triangulation<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Clone for Triangulation<N> {
    fn clone(&self) -> Self {
        Self::from_simplices(self.simplices.clone())
    }
}

impl<const N: usize> fmt::Debug for Triangulation<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Triangulation")
            .field("dimension", &Self::DIM)
            .field("simplices", &self.simplices)
            .field("revision", &self.revision)
            .finish()
    }
}

impl<const N: usize> Index<usize> for Triangulation<N> {
    type Output = Simplex<N>;
    fn index(&self, index: usize) -> &Simplex<N> {
        &self.simplices[index]
    }
}

impl<const N: usize> InvalidateCache for Triangulation<N> {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.skeleton.invalidate_cache();
    }
}

impl<const N: usize> Triangulation<N> {
    /// Dimension of the top-dimensional simplices.
    pub const DIM: usize = N - 1;

    /// An empty triangulation.
    pub fn new() -> Self {
        Self::from_simplices(Vec::new())
    }

    pub(crate) fn from_simplices(simplices: Vec<Simplex<N>>) -> Self {
        let () = Perm::<N>::SUPPORTED;
        Self {
            simplices,
            skeleton: SkeletonCache::new(),
            listeners: Vec::new(),
            revision: 0,
            span_depth: 0,
        }
    }

    // ----- read-only access -----

    /// Number of top-dimensional simplices.
    #[inline]
    pub fn size(&self) -> usize {
        self.simplices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.simplices.is_empty()
    }

    #[inline]
    pub fn simplex(&self, index: usize) -> Option<&Simplex<N>> {
        self.simplices.get(index)
    }

    /// Like [`simplex`](Self::simplex), reporting the range on failure.
    pub fn get_simplex(&self, index: usize) -> Result<&Simplex<N>, TriSieveError> {
        self.simplices.get(index).ok_or(TriSieveError::SimplexOutOfRange {
            index,
            size: self.simplices.len(),
        })
    }

    #[inline]
    pub fn simplices(&self) -> &[Simplex<N>] {
        &self.simplices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Simplex<N>> {
        self.simplices.iter()
    }

    /// The skeleton, computed on first use after each change.
    pub fn skeleton(&self) -> &Skeleton<N> {
        self.skeleton.get_or_build(&self.simplices)
    }

    /// Whether the skeleton is currently cached.
    #[inline]
    pub fn has_skeleton(&self) -> bool {
        self.skeleton.is_built()
    }

    /// True if both triangulations have the same gluings under the identity
    /// labelling. Descriptions are ignored.
    pub fn is_identical_to(&self, other: &Self) -> bool {
        self.size() == other.size()
            && self
                .simplices
                .iter()
                .zip(&other.simplices)
                .all(|(a, b)| (0..N).all(|f| a.glued(f) == b.glued(f)))
    }

    pub(crate) fn check_simplex(&self, index: usize) -> Result<(), TriSieveError> {
        self.get_simplex(index).map(|_| ())
    }

    pub(crate) fn check_facet(&self, simplex: usize, facet: usize) -> Result<(), TriSieveError> {
        self.check_simplex(simplex)?;
        if facet >= N {
            return Err(TriSieveError::FacetOutOfRange {
                facet,
                dim: Self::DIM,
            });
        }
        Ok(())
    }

    // ----- mutation -----

    /// Appends an unglued simplex; returns its index.
    pub fn new_simplex(&mut self) -> usize {
        self.new_simplex_with("")
    }

    /// Appends an unglued simplex with the given description.
    pub fn new_simplex_with(&mut self, description: impl Into<String>) -> usize {
        let mut span = self.change_span();
        span.simplices.push(Simplex::new(description));
        span.simplices.len() - 1
    }

    /// Appends `count` unglued simplices; returns their index range.
    pub fn new_simplices(&mut self, count: usize) -> Range<usize> {
        let mut span = self.change_span();
        let start = span.simplices.len();
        span.simplices
            .extend(std::iter::repeat_with(Simplex::default).take(count));
        start..start + count
    }

    pub fn set_description(
        &mut self,
        simplex: usize,
        description: impl Into<String>,
    ) -> Result<(), TriSieveError> {
        self.check_simplex(simplex)?;
        let mut span = self.change_span();
        span.simplices[simplex].description = description.into();
        Ok(())
    }

    /// Glues `facet` of `simplex` to facet `gluing[facet]` of `other`.
    ///
    /// Both facets must be unglued. A facet may be glued to itself only by
    /// an involution.
    pub fn join(
        &mut self,
        simplex: usize,
        facet: usize,
        other: usize,
        gluing: Perm<N>,
    ) -> Result<(), TriSieveError> {
        self.check_facet(simplex, facet)?;
        self.check_simplex(other)?;
        let other_facet = gluing.image(facet);
        if self.simplices[simplex].adj[facet].is_some() {
            return Err(TriSieveError::FacetAlreadyGlued { simplex, facet });
        }
        if simplex == other && other_facet == facet {
            if gluing.compose(gluing) != Perm::identity() {
                return Err(TriSieveError::IllegalSelfGluing { simplex, facet });
            }
        } else if self.simplices[other].adj[other_facet].is_some() {
            return Err(TriSieveError::FacetAlreadyGlued {
                simplex: other,
                facet: other_facet,
            });
        }
        let mut span = self.change_span();
        let s = &mut span.simplices[simplex];
        s.adj[facet] = Some(other);
        s.gluing[facet] = gluing;
        let t = &mut span.simplices[other];
        t.adj[other_facet] = Some(simplex);
        t.gluing[other_facet] = gluing.inverse();
        Ok(())
    }

    /// Removes the gluing across `facet` on both sides; returns the former
    /// neighbour.
    pub fn unjoin(&mut self, simplex: usize, facet: usize) -> Result<usize, TriSieveError> {
        self.check_facet(simplex, facet)?;
        let Some((other, gluing)) = self.simplices[simplex].glued(facet) else {
            return Err(TriSieveError::FacetNotGlued { simplex, facet });
        };
        let mut span = self.change_span();
        span.simplices[other].adj[gluing.image(facet)] = None;
        span.simplices[simplex].adj[facet] = None;
        Ok(other)
    }

    /// Unglues every facet of `simplex`.
    pub fn isolate(&mut self, simplex: usize) -> Result<(), TriSieveError> {
        self.check_simplex(simplex)?;
        let mut span = self.change_span();
        for facet in 0..N {
            if span.simplices[simplex].adj[facet].is_some() {
                span.unjoin(simplex, facet)?;
            }
        }
        Ok(())
    }

    /// Isolates and removes the simplex at `index`. Later simplices move down
    /// by one.
    pub fn remove_simplex_at(&mut self, index: usize) -> Result<Simplex<N>, TriSieveError> {
        self.check_simplex(index)?;
        let mut span = self.change_span();
        span.isolate(index)?;
        let removed = span.simplices.remove(index);
        for s in span.simplices.iter_mut() {
            for adj in s.adj.iter_mut().flatten() {
                if *adj > index {
                    *adj -= 1;
                }
            }
        }
        Ok(removed)
    }

    pub fn remove_all_simplices(&mut self) {
        let mut span = self.change_span();
        span.simplices.clear();
    }

    /// Exchanges the simplices of `self` and `other`. Listeners stay put.
    pub fn swap_contents(&mut self, other: &mut Self) {
        let mut mine = self.change_span();
        let mut theirs = other.change_span();
        std::mem::swap(&mut mine.simplices, &mut theirs.simplices);
    }

    /// Appends all simplices of `self` to `dest`, leaving `self` empty.
    pub fn move_contents_to(&mut self, dest: &mut Self) {
        let mut src = self.change_span();
        let moved = std::mem::take(&mut src.simplices);
        dest.append_simplices(moved);
    }

    /// Appends a copy of `other`; returns the index range of the copies.
    pub fn insert_triangulation(&mut self, other: &Self) -> Range<usize> {
        self.append_simplices(other.simplices.clone())
    }

    fn append_simplices(&mut self, mut simplices: Vec<Simplex<N>>) -> Range<usize> {
        let mut span = self.change_span();
        let offset = span.simplices.len();
        for s in &mut simplices {
            for adj in s.adj.iter_mut().flatten() {
                *adj += offset;
            }
        }
        span.simplices.append(&mut simplices);
        offset..span.simplices.len()
    }

    /// Relabels simplex `a` as `images[a]` with vertex map `perms[a]`.
    ///
    /// The caller guarantees that `images` is a permutation of `0..size`.
    pub(crate) fn relabelled_simplices(
        &self,
        images: &[usize],
        perms: &[Perm<N>],
    ) -> Vec<Simplex<N>> {
        let mut out = vec![Simplex::default(); self.size()];
        for (a, s) in self.simplices.iter().enumerate() {
            let target = &mut out[images[a]];
            target.description = s.description.clone();
            let pa = perms[a];
            for f in 0..N {
                if let Some((b, g)) = s.glued(f) {
                    let facet = pa.image(f);
                    target.adj[facet] = Some(images[b]);
                    target.gluing[facet] = perms[b] * g * pa.inverse();
                }
            }
        }
        out
    }

    /// In-place version of [`relabelled_simplices`](Self::relabelled_simplices).
    pub(crate) fn relabel(&mut self, images: &[usize], perms: &[Perm<N>]) {
        let relabelled = self.relabelled_simplices(images, perms);
        let mut span = self.change_span();
        span.simplices = relabelled;
    }

    /// Relabels every simplex so that all gluings reverse orientation.
    /// Non-orientable components are left alone. Returns whether anything
    /// changed.
    pub fn orient(&mut self) -> bool {
        let skeleton = self.skeleton();
        let flip = Perm::transposition(N - 2, N - 1);
        let perms: Vec<Perm<N>> = (0..self.size())
            .map(|s| {
                let component = &skeleton.components()[skeleton.simplex_component(s)];
                if component.is_orientable() && skeleton.simplex_orientation(s) < 0 {
                    flip
                } else {
                    Perm::identity()
                }
            })
            .collect();
        if perms.iter().all(|p| p.is_identity()) {
            return false;
        }
        let images: Vec<usize> = (0..self.size()).collect();
        self.relabel(&images, &perms);
        true
    }

    /// Swaps the last two vertices of every simplex.
    pub fn reflect(&mut self) {
        let flip = Perm::transposition(N - 2, N - 1);
        let images: Vec<usize> = (0..self.size()).collect();
        let perms = vec![flip; self.size()];
        self.relabel(&images, &perms);
    }

    /// Human-readable size summary and gluing table.
    pub fn detail(&self) -> String {
        let name = simplex_name(N);
        let skeleton = self.skeleton();
        let mut out = String::from("Size of the skeleton:\n");
        out.push_str(&format!("  {}: {}\n", plural(name), self.size()));
        for k in (0..Self::DIM).rev() {
            out.push_str(&format!(
                "  {}: {}\n",
                plural(face_name(k)),
                skeleton.count_faces(k)
            ));
        }
        out.push_str(&format!("\n{name} gluing:\n"));

        let facets: Vec<String> = (0..N)
            .map(|f| (0..N).filter(|&v| v != f).map(|v| v.to_string()).collect())
            .collect();
        let cell = N + 6;
        out.push_str(&format!("  {:>9}  |  glued to:", name));
        for label in &facets {
            out.push_str(&format!("{:>cell$}", format!("({label})")));
        }
        out.push('\n');
        out.push_str(&format!("  ----------+--{}\n", "-".repeat(10 + cell * N)));
        for (i, s) in self.simplices.iter().enumerate() {
            out.push_str(&format!("  {i:>9}  |           "));
            for f in 0..N {
                let entry = match s.glued(f) {
                    None => "boundary".to_string(),
                    Some((t, g)) => {
                        let images: String = (0..N)
                            .filter(|&v| v != f)
                            .map(|v| g.image(v).to_string())
                            .collect();
                        format!("{t} ({images})")
                    }
                };
                out.push_str(&format!("{entry:>cell$}"));
            }
            out.push('\n');
        }
        out
    }
}

pub(crate) fn simplex_name(n: usize) -> &'static str {
    match n {
        3 => "Triangle",
        4 => "Tetrahedron",
        _ => "Pentachoron",
    }
}

fn face_name(k: usize) -> &'static str {
    match k {
        0 => "Vertex",
        1 => "Edge",
        2 => "Triangle",
        _ => "Tetrahedron",
    }
}

fn plural(name: &str) -> String {
    match name {
        "Vertex" => "Vertices".to_string(),
        "Pentachoron" => "Pentachora".to_string(),
        "Tetrahedron" => "Tetrahedra".to_string(),
        other => format!("{other}s"),
    }
}

impl<const N: usize> DebugInvariants for Triangulation<N> {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Triangulation");
    }

    fn validate_invariants(&self) -> Result<(), TriSieveError> {
        check_reciprocity(&self.simplices)
    }
}
