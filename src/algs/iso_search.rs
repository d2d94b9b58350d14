//! Isomorphism and subcomplex search.
//!
//! Components of the source are matched one at a time. The first simplex of
//! a component is tried against every unused target simplex under every
//! vertex permutation; the rest of the component is then forced by its
//! gluings. A complete search additionally requires boundary facets to land
//! on boundary facets, which makes each matched component a whole target
//! component.

use hashbrown::HashMap;

use crate::algs::isomorphism::Isomorphism;
use crate::topology::perm::Perm;
use crate::topology::triangulation::Triangulation;

/// Limits for isomorphism enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IsoSearchOptions {
    /// Stop after this many witnesses; `None` enumerates all of them.
    pub max_results: Option<usize>,
}

impl IsoSearchOptions {
    /// Stop at the first witness.
    pub fn first() -> Self {
        Self {
            max_results: Some(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Complete,
    Subcomplex,
}

struct Search<'a, const N: usize> {
    source: &'a Triangulation<N>,
    target: &'a Triangulation<N>,
    mode: SearchMode,
    limit: usize,
    image: Vec<Option<usize>>,
    perm: Vec<Perm<N>>,
    used: Vec<bool>,
    found: Vec<Isomorphism<N>>,
}

impl<'a, const N: usize> Search<'a, N> {
    fn new(
        source: &'a Triangulation<N>,
        target: &'a Triangulation<N>,
        mode: SearchMode,
        limit: usize,
    ) -> Self {
        Self {
            source,
            target,
            mode,
            limit,
            image: vec![None; source.size()],
            perm: vec![Perm::identity(); source.size()],
            used: vec![false; target.size()],
            found: Vec::new(),
        }
    }

    fn done(&self) -> bool {
        self.found.len() >= self.limit
    }

    /// Matches source components `component..` in turn.
    fn run(&mut self, component: usize) {
        let source = self.source;
        let Some(c) = source.components().get(component) else {
            self.found
                .push(Isomorphism::from_parts(self.image.clone(), self.perm.clone()));
            return;
        };
        let start = c.simplices()[0];
        for t in 0..self.target.size() {
            if self.used[t] {
                continue;
            }
            for p in Perm::<N>::all() {
                if let Some(assigned) = self.extend(start, t, p) {
                    self.run(component + 1);
                    self.rollback(&assigned);
                    if self.done() {
                        return;
                    }
                }
            }
        }
    }

    fn assign(&mut self, s: usize, t: usize, p: Perm<N>) {
        self.image[s] = Some(t);
        self.perm[s] = p;
        self.used[t] = true;
    }

    fn rollback(&mut self, assigned: &[usize]) {
        for &s in assigned {
            if let Some(t) = self.image[s].take() {
                self.used[t] = false;
            }
            self.perm[s] = Perm::identity();
        }
    }

    /// Sends `start` to `(t, p)` and follows gluings through the whole
    /// component. Returns the simplices assigned, or `None` (with everything
    /// undone) when some gluing cannot be matched.
    fn extend(&mut self, start: usize, t: usize, p: Perm<N>) -> Option<Vec<usize>> {
        self.assign(start, t, p);
        let mut assigned = vec![start];
        let mut pos = 0;
        while pos < assigned.len() {
            let a = assigned[pos];
            pos += 1;
            if !self.match_facets(a, &mut assigned) {
                self.rollback(&assigned);
                return None;
            }
        }
        Some(assigned)
    }

    fn match_facets(&mut self, a: usize, assigned: &mut Vec<usize>) -> bool {
        let (Some(ta), pa) = (self.image[a], self.perm[a]) else {
            return false;
        };
        for f in 0..N {
            let target_glued = self.target[ta].glued(pa.image(f));
            match (self.source[a].glued(f), target_glued) {
                (None, None) => {}
                (None, Some(_)) => {
                    if self.mode == SearchMode::Complete {
                        return false;
                    }
                }
                (Some(_), None) => return false,
                (Some((b, g)), Some((tb, tg))) => {
                    let expected = tg * pa * g.inverse();
                    match self.image[b] {
                        Some(img) => {
                            if img != tb || self.perm[b] != expected {
                                return false;
                            }
                        }
                        None => {
                            if self.used[tb] {
                                return false;
                            }
                            self.assign(b, tb, expected);
                            assigned.push(b);
                        }
                    }
                }
            }
        }
        true
    }
}

/// Invariants that any isomorphism preserves, compared before searching.
fn same_invariants<const N: usize>(a: &Triangulation<N>, b: &Triangulation<N>) -> bool {
    if a.size() != b.size() {
        return false;
    }
    if a.is_empty() {
        return true;
    }
    if a.f_vector() != b.f_vector()
        || a.count_components() != b.count_components()
        || a.count_boundary_facets() != b.count_boundary_facets()
        || a.is_orientable() != b.is_orientable()
    {
        return false;
    }
    if histogram(a.components().iter().map(|c| c.size()))
        != histogram(b.components().iter().map(|c| c.size()))
    {
        return false;
    }
    (0..N - 1).all(|k| {
        histogram(a.skeleton().faces(k).iter().map(|f| f.degree()))
            == histogram(b.skeleton().faces(k).iter().map(|f| f.degree()))
    })
}

fn histogram(values: impl Iterator<Item = usize>) -> HashMap<usize, usize> {
    let mut counts = HashMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

impl<const N: usize> Triangulation<N> {
    /// A combinatorial isomorphism onto `other`, if one exists.
    pub fn is_isomorphic_to(&self, other: &Self) -> Option<Isomorphism<N>> {
        self.find_all_isomorphisms(other, &IsoSearchOptions::first())
            .into_iter()
            .next()
    }

    /// Every combinatorial isomorphism onto `other`, up to the configured limit.
    pub fn find_all_isomorphisms(
        &self,
        other: &Self,
        opts: &IsoSearchOptions,
    ) -> Vec<Isomorphism<N>> {
        let limit = opts.max_results.unwrap_or(usize::MAX);
        if limit == 0 || !same_invariants(self, other) {
            return Vec::new();
        }
        let mut search = Search::new(self, other, SearchMode::Complete, limit);
        search.run(0);
        log::debug!(
            "find_all_isomorphisms: {} witnesses between {} simplices",
            search.found.len(),
            self.size()
        );
        search.found
    }

    /// An embedding of `self` into `other` preserving every gluing of
    /// `self`. `other` may have extra simplices and extra gluings. The result
    /// is partial with respect to `other` and is not meant to be applied.
    pub fn is_contained_in(&self, other: &Self) -> Option<Isomorphism<N>> {
        self.find_all_subcomplexes_in(other, &IsoSearchOptions::first())
            .into_iter()
            .next()
    }

    /// Every embedding of `self` into `other`, up to the configured limit.
    pub fn find_all_subcomplexes_in(
        &self,
        other: &Self,
        opts: &IsoSearchOptions,
    ) -> Vec<Isomorphism<N>> {
        let limit = opts.max_results.unwrap_or(usize::MAX);
        if limit == 0 || self.size() > other.size() {
            return Vec::new();
        }
        let mut search = Search::new(self, other, SearchMode::Subcomplex, limit);
        search.run(0);
        log::debug!(
            "find_all_subcomplexes_in: {} embeddings of {} simplices into {}",
            search.found.len(),
            self.size(),
            other.size()
        );
        search.found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere() -> Triangulation<3> {
        let mut tri = Triangulation::new();
        tri.new_simplices(2);
        for f in 0..3 {
            tri.join(0, f, 1, Perm::identity()).unwrap();
        }
        tri
    }

    fn disc() -> Triangulation<3> {
        let mut tri = Triangulation::new();
        tri.new_simplices(2);
        tri.join(0, 2, 1, Perm::identity()).unwrap();
        tri
    }

    #[test]
    fn sphere_has_all_symmetries() {
        let tri = sphere();
        // two choices of image for simplex 0, six vertex maps each
        let all = tri.find_all_isomorphisms(&tri, &IsoSearchOptions::default());
        assert_eq!(all.len(), 12);
        assert!(all.iter().all(|iso| iso.apply(&tri).unwrap().is_identical_to(&tri)));
    }

    #[test]
    fn max_results_bounds_enumeration() {
        let tri = sphere();
        let opts = IsoSearchOptions {
            max_results: Some(3),
        };
        assert_eq!(tri.find_all_isomorphisms(&tri, &opts).len(), 3);
    }

    #[test]
    fn disc_is_not_a_sphere() {
        assert!(disc().is_isomorphic_to(&sphere()).is_none());
    }

    #[test]
    fn disc_is_contained_in_sphere() {
        let iso = disc().is_contained_in(&sphere()).unwrap();
        assert!(iso.is_complete());
        assert_ne!(iso.simp_image(0), iso.simp_image(1));
        assert!(sphere().is_contained_in(&disc()).is_none());
    }

    #[test]
    fn relabelled_copy_is_isomorphic() {
        let tri = disc();
        let mut iso = Isomorphism::<3>::new(2);
        iso.set_simp_image(0, Some(1));
        iso.set_simp_image(1, Some(0));
        iso.set_facet_perm(1, Perm::from_images([1, 2, 0]).unwrap());
        let image = iso.apply(&tri).unwrap();
        let found = tri.is_isomorphic_to(&image).unwrap();
        assert!(found.apply(&tri).unwrap().is_identical_to(&image));
    }

    #[test]
    fn empty_triangulations_are_isomorphic() {
        let empty = Triangulation::<4>::new();
        assert!(empty.is_isomorphic_to(&Triangulation::new()).is_some());
    }
}
