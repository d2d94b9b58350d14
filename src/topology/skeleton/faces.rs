//! Lower-dimensional faces and their enumeration.
//!
//! Faces of dimension `k` are found one at a time: simplices ascending, local
//! face numbers descending. A new face collects every local copy reachable by
//! crossing glued facets that contain it. Ridges (`k = D - 2`) are walked in
//! order around their link so that embeddings come out in cyclic or linear
//! order; facets have at most two embeddings; everything else uses a
//! depth-first search.

use crate::topology::face_numbering::FaceNumbering;
use crate::topology::perm::Perm;
use crate::topology::simplex::Simplex;

/// One copy of a face inside a top-dimensional simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceEmbedding<const N: usize> {
    pub(crate) simplex: usize,
    pub(crate) face: usize,
    pub(crate) vertices: Perm<N>,
}

impl<const N: usize> FaceEmbedding<N> {
    #[inline]
    pub fn simplex(&self) -> usize {
        self.simplex
    }

    /// Local face number inside [`simplex`](Self::simplex).
    #[inline]
    pub fn face(&self) -> usize {
        self.face
    }

    /// Maps the face's own vertices `0..=k` to simplex vertices.
    #[inline]
    pub fn vertices(&self) -> Perm<N> {
        self.vertices
    }
}

/// Topological type of a vertex link.
///
/// Links of 4-dimensional vertices are recognised only from their
/// combinatorics: every valid closed orientable link is reported as
/// [`Sphere`](LinkType::Sphere) and every valid bounded one as
/// [`Disc`](LinkType::Disc). A vertex whose link is, say, a 3-torus is
/// therefore neither flagged ideal nor cusped. Only closed non-orientable
/// links come out as [`NonStandardCusp`](LinkType::NonStandardCusp) there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkType {
    /// A 2-sphere in 3D, a circle in 2D. In 4D, any closed orientable link.
    Sphere,
    Disc,
    Torus,
    KleinBottle,
    /// Any other closed link; the vertex is ideal.
    NonStandardCusp,
    /// A bounded link that is not a disc.
    NonStandardBoundary,
    Invalid,
}

/// Combinatorial summary of a face link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSummary {
    pub closed: bool,
    pub orientable: bool,
    pub euler_char: i64,
}

impl Default for LinkSummary {
    fn default() -> Self {
        Self {
            closed: true,
            orientable: true,
            euler_char: 0,
        }
    }
}

/// A face of dimension `k < D`: an equivalence class of local faces.
#[derive(Debug, Clone)]
pub struct Face<const N: usize> {
    pub(crate) dim: usize,
    pub(crate) index: usize,
    pub(crate) embeddings: Vec<FaceEmbedding<N>>,
    pub(crate) component: usize,
    pub(crate) boundary_component: Option<usize>,
    pub(crate) bad_identification: bool,
    pub(crate) bad_link: bool,
    pub(crate) link: LinkSummary,
    pub(crate) link_type: Option<LinkType>,
    pub(crate) ideal: bool,
}

impl<const N: usize> Face<N> {
    fn new(dim: usize, index: usize) -> Self {
        Self {
            dim,
            index,
            embeddings: Vec::new(),
            component: 0,
            boundary_component: None,
            bad_identification: false,
            bad_link: false,
            link: LinkSummary::default(),
            link_type: None,
            ideal: false,
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn embeddings(&self) -> &[FaceEmbedding<N>] {
        &self.embeddings
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }

    #[inline]
    pub fn front(&self) -> &FaceEmbedding<N> {
        &self.embeddings[0]
    }

    #[inline]
    pub fn back(&self) -> &FaceEmbedding<N> {
        &self.embeddings[self.embeddings.len() - 1]
    }

    /// Index of the containing component.
    #[inline]
    pub fn component(&self) -> usize {
        self.component
    }

    /// Index of the boundary component this face lies in, real or ideal.
    #[inline]
    pub fn boundary_component(&self) -> Option<usize> {
        self.boundary_component
    }

    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.boundary_component.is_some()
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.bad_identification && !self.bad_link
    }

    /// The face is glued to itself with its own vertices permuted.
    #[inline]
    pub fn has_bad_identification(&self) -> bool {
        self.bad_identification
    }

    /// The link is not of an acceptable type.
    #[inline]
    pub fn has_bad_link(&self) -> bool {
        self.bad_link
    }

    #[inline]
    pub fn link(&self) -> LinkSummary {
        self.link
    }

    #[inline]
    pub fn is_link_closed(&self) -> bool {
        self.link.closed
    }

    #[inline]
    pub fn is_link_orientable(&self) -> bool {
        self.link.orientable
    }

    #[inline]
    pub fn link_euler_char(&self) -> i64 {
        self.link.euler_char
    }

    /// Link type; vertices only.
    #[inline]
    pub fn link_type(&self) -> Option<LinkType> {
        self.link_type
    }

    #[inline]
    pub fn is_ideal(&self) -> bool {
        self.ideal
    }
}

/// Where a local face ended up: its face index, its position among that
/// face's embeddings, and its vertex mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot<const N: usize> {
    pub face: usize,
    pub embedding: usize,
    pub mapping: Perm<N>,
}

const UNASSIGNED: usize = usize::MAX;

impl<const N: usize> Slot<N> {
    const EMPTY: Self = Slot {
        face: UNASSIGNED,
        embedding: 0,
        mapping: Perm::identity(),
    };

    #[inline]
    fn is_assigned(&self) -> bool {
        self.face != UNASSIGNED
    }
}

/// `a` and `b` send the face vertices `0..=k` to different places.
#[inline]
fn differs_on_face<const N: usize>(a: Perm<N>, b: Perm<N>, k: usize) -> bool {
    (0..=k).any(|i| a.image(i) != b.image(i))
}

struct Enumerator<'a, const N: usize> {
    simplices: &'a [Simplex<N>],
    k: usize,
    per_simplex: usize,
    slots: Vec<Slot<N>>,
    faces: Vec<Face<N>>,
}

impl<const N: usize> Enumerator<'_, N> {
    #[inline]
    fn slot(&self, s: usize, j: usize) -> Slot<N> {
        self.slots[s * self.per_simplex + j]
    }

    #[inline]
    fn mark(&mut self, s: usize, j: usize, face: usize, mapping: Perm<N>) {
        self.slots[s * self.per_simplex + j] = Slot {
            face,
            embedding: 0,
            mapping,
        };
    }

    /// Records `(t, mapping)` as a copy of `face`, or reports whether an
    /// existing copy disagrees on the face vertices. Returns `true` if the
    /// copy is new.
    fn visit(&mut self, face: usize, t: usize, mapping: Perm<N>) -> bool {
        let j = FaceNumbering::<N>::face_number(self.k, mapping);
        let existing = self.slot(t, j);
        if existing.is_assigned() {
            debug_assert_eq!(existing.face, face, "local face reached from two faces");
            if differs_on_face(existing.mapping, mapping, self.k) {
                self.faces[face].bad_identification = true;
            }
            return false;
        }
        self.mark(t, j, face, mapping);
        true
    }

    fn facet(&mut self, face: usize, s: usize, j: usize) {
        let m = FaceNumbering::<N>::ordering(self.k, j);
        self.mark(s, j, face, m);
        let mut embeddings = vec![FaceEmbedding { simplex: s, face: j, vertices: m }];
        if let Some((t, g)) = self.simplices[s].glued(j) {
            let m2 = g * m;
            if self.visit(face, t, m2) {
                embeddings.push(FaceEmbedding {
                    simplex: t,
                    face: g.image(j),
                    vertices: m2,
                });
            }
        }
        self.faces[face].embeddings = embeddings;
    }

    /// Walks around a ridge, leaving each simplex through the facet opposite
    /// image `N - 1` and relabelling so the entry facet becomes image `N - 2`.
    fn ridge(&mut self, face: usize, s: usize, j: usize) {
        let swap = Perm::<N>::transposition(N - 2, N - 1);
        let start = FaceNumbering::<N>::ordering(self.k, j);
        self.mark(s, j, face, start);

        let mut forward = vec![FaceEmbedding { simplex: s, face: j, vertices: start }];
        let mut cur = (s, start);
        let mut open = false;
        loop {
            let Some((t, g)) = self.simplices[cur.0].glued(cur.1.image(N - 1)) else {
                open = true;
                break;
            };
            let next = g * cur.1 * swap;
            if !self.visit(face, t, next) {
                break;
            }
            forward.push(FaceEmbedding {
                simplex: t,
                face: FaceNumbering::<N>::face_number(self.k, next),
                vertices: next,
            });
            cur = (t, next);
        }

        let mut backward = Vec::new();
        if open {
            let mut cur = (s, start);
            while let Some((t, g)) = self.simplices[cur.0].glued(cur.1.image(N - 2)) {
                let prev = g * cur.1 * swap;
                if !self.visit(face, t, prev) {
                    break;
                }
                backward.push(FaceEmbedding {
                    simplex: t,
                    face: FaceNumbering::<N>::face_number(self.k, prev),
                    vertices: prev,
                });
                cur = (t, prev);
            }
        }
        backward.reverse();
        backward.append(&mut forward);
        self.faces[face].embeddings = backward;
    }

    fn search(&mut self, face: usize, s: usize, j: usize) {
        let m = FaceNumbering::<N>::ordering(self.k, j);
        self.mark(s, j, face, m);
        let mut embeddings = vec![FaceEmbedding { simplex: s, face: j, vertices: m }];
        let mut stack = vec![(s, j)];
        while let Some((u, ju)) = stack.pop() {
            let mu = self.slot(u, ju).mapping;
            for f in (0..N).rev() {
                if FaceNumbering::<N>::contains_vertex(self.k, ju, f) {
                    continue;
                }
                let Some((t, g)) = self.simplices[u].glued(f) else {
                    continue;
                };
                let next = g * mu;
                if self.visit(face, t, next) {
                    let jt = FaceNumbering::<N>::face_number(self.k, next);
                    embeddings.push(FaceEmbedding { simplex: t, face: jt, vertices: next });
                    stack.push((t, jt));
                }
            }
        }
        self.faces[face].embeddings = embeddings;
    }
}

/// All `k`-faces, plus the slot table indexed by
/// `simplex * FaceNumbering::<N>::count(k) + local face`.
pub(crate) fn enumerate_faces<const N: usize>(
    simplices: &[Simplex<N>],
    k: usize,
) -> (Vec<Face<N>>, Vec<Slot<N>>) {
    let dim = N - 1;
    let per_simplex = FaceNumbering::<N>::count(k);
    let mut e = Enumerator {
        simplices,
        k,
        per_simplex,
        slots: vec![Slot::EMPTY; simplices.len() * per_simplex],
        faces: Vec::new(),
    };
    for s in 0..simplices.len() {
        for j in (0..per_simplex).rev() {
            if e.slot(s, j).is_assigned() {
                continue;
            }
            let face = e.faces.len();
            e.faces.push(Face::new(k, face));
            if k == dim - 1 {
                e.facet(face, s, j);
            } else if k + 2 == dim {
                e.ridge(face, s, j);
            } else {
                e.search(face, s, j);
            }
        }
    }
    for face in &e.faces {
        for (pos, emb) in face.embeddings.iter().enumerate() {
            e.slots[emb.simplex * per_simplex + emb.face].embedding = pos;
        }
    }
    (e.faces, e.slots)
}
