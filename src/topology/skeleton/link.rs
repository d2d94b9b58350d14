//! Combinatorial analysis of face links.
//!
//! The link of a `k`-face has one top cell per embedding, spanned by the
//! simplex vertices at positions `k+1..N` of the embedding's mapping. Two
//! cells meet wherever a glued facet contains the face. This module reads off
//! whether the link is closed, whether it is orientable and its Euler
//! characteristic, without building the link explicitly.

use crate::topology::face_numbering::FaceNumbering;
use crate::topology::orientation::{BitFlip, propagate_from};
use crate::topology::perm::Perm;
use crate::topology::simplex::Simplex;

use super::faces::{Face, LinkSummary, Slot};
use super::union_find::ClusterIds;

/// A step from one link cell to a neighbouring one.
struct LinkStep<const N: usize> {
    /// Position (in the source cell) of the vertex opposite the crossed facet.
    position: usize,
    target: usize,
    /// Sends source positions to target positions.
    relabel: Perm<N>,
}

fn link_steps<'a, const N: usize>(
    simplices: &'a [Simplex<N>],
    slots: &'a [Slot<N>],
    face: &Face<N>,
    embedding: usize,
) -> impl Iterator<Item = LinkStep<N>> + 'a {
    let k = face.dim;
    let per_simplex = FaceNumbering::<N>::count(k);
    let emb = face.embeddings[embedding];
    (k + 1..N).filter_map(move |position| {
        let (t, g) = simplices[emb.simplex].glued(emb.vertices.image(position))?;
        let mapped = g * emb.vertices;
        let slot = slots[t * per_simplex + FaceNumbering::<N>::face_number(k, mapped)];
        Some(LinkStep {
            position,
            target: slot.embedding,
            relabel: slot.mapping.inverse() * mapped,
        })
    })
}

/// Parity of `relabel` restricted to the link positions `k+1..N`.
fn link_parity_even<const N: usize>(relabel: Perm<N>, k: usize) -> bool {
    let images: Vec<usize> = (k + 1..N).map(|i| relabel.image(i)).collect();
    let inversions = (0..images.len())
        .flat_map(|a| (a + 1..images.len()).map(move |b| (a, b)))
        .filter(|&(a, b)| images[a] > images[b])
        .count();
    inversions % 2 == 0
}

/// Closedness, orientability and Euler characteristic of the link of `face`.
pub(crate) fn analyse_link<const N: usize>(
    simplices: &[Simplex<N>],
    slots: &[Slot<N>],
    face: &Face<N>,
) -> LinkSummary {
    let k = face.dim;
    let count = face.embeddings.len();

    let closed = face.embeddings.iter().all(|emb| {
        (k + 1..N).all(|p| simplices[emb.simplex].adj[emb.vertices.image(p)].is_some())
    });

    if k + 2 >= N {
        // facets: the link is one or two points
        return LinkSummary {
            closed,
            orientable: true,
            euler_char: if closed { 2 } else { 1 },
        };
    }

    let mut labels: Vec<Option<BitFlip>> = vec![None; count];
    let mut orientable = true;
    for seed in 0..count {
        if labels[seed].is_some() {
            continue;
        }
        let (_, consistent) = propagate_from(seed, &mut labels, |e| {
            link_steps(simplices, slots, face, e)
                .map(|step| (step.target, BitFlip(link_parity_even(step.relabel, k))))
                .collect::<Vec<_>>()
        });
        orientable &= consistent;
    }

    // One node per (embedding, nonempty set of link positions).
    let cells = 1usize << N;
    let link_mask: usize = ((1 << N) - 1) & !((1 << (k + 1)) - 1);
    let mut uf = ClusterIds::new(count * cells);
    for e in 0..count {
        for step in link_steps(simplices, slots, face, e) {
            for subset in subsets_of(link_mask) {
                if subset & (1 << step.position) != 0 {
                    continue;
                }
                let image = (0..N)
                    .filter(|&p| subset & (1 << p) != 0)
                    .fold(0usize, |m, p| m | (1 << step.relabel.image(p)));
                uf.union(e * cells + subset, step.target * cells + image);
            }
        }
    }
    let mut seen = vec![false; count * cells];
    let mut euler_char = 0i64;
    for e in 0..count {
        for subset in subsets_of(link_mask) {
            let root = uf.find(e * cells + subset);
            if !seen[root] {
                seen[root] = true;
                euler_char += if subset.count_ones() % 2 == 1 { 1 } else { -1 };
            }
        }
    }

    LinkSummary {
        closed,
        orientable,
        euler_char,
    }
}

/// Nonempty subsets of `mask`.
fn subsets_of(mask: usize) -> impl Iterator<Item = usize> {
    (1..=mask).filter(move |s| s & !mask == 0)
}
