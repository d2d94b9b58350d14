//! Orientation groups and consistent labelling of glued cells.
//!
//! - [`Orientation`] models a finite group with `compose` and `inverse`, so
//!   labels can be pushed along a path of gluings.
//! - [`BitFlip`] (alias [`Sign`]) is the two-element group used to orient
//!   simplices: crossing an even gluing flips the orientation, crossing an odd
//!   one keeps it.
//! - [`propagate_from`] walks a graph breadth-first from a seed, labelling
//!   every node it reaches and reporting whether any edge contradicted the
//!   labels already assigned.

use core::fmt::{Debug, Formatter};
use std::collections::VecDeque;

use crate::topology::perm::Perm;

/// A finite group capturing per-gluing orientations/permutations.
/// Implementations **must** satisfy for all `a`, `b`, `c`:
///   - associativity: `compose(a, compose(b, c)) == compose(compose(a, b), c)`
///   - identity:      `compose(id, a) == a == compose(a, id)` where `id = Default::default()`
///   - inverse:       `compose(a, inverse(a)) == id == compose(inverse(a), a)`
///
/// `compose(a, b)` = "do `a`, then `b`" along a path (left-accumulating).
pub trait Orientation: Copy + Default + Debug + 'static {
    fn compose(a: Self, b: Self) -> Self;
    fn inverse(a: Self) -> Self;
}

/// 1-bit flip; group C₂. `BitFlip(false)` is the positive orientation.
/// Compose = XOR; inverse = self.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[repr(transparent)]
pub struct BitFlip(pub bool);

impl BitFlip {
    /// The flip a top-dimensional gluing induces between its two simplices.
    #[inline]
    pub fn across<const N: usize>(gluing: Perm<N>) -> Self {
        BitFlip(gluing.is_even())
    }

    /// `+1` or `-1`.
    #[inline]
    pub fn sign(self) -> i32 {
        if self.0 { -1 } else { 1 }
    }
}

impl Debug for BitFlip {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("BitFlip").field(&self.0).finish()
    }
}

impl Orientation for BitFlip {
    #[inline]
    fn compose(a: Self, b: Self) -> Self {
        BitFlip(a.0 ^ b.0)
    }
    #[inline]
    fn inverse(a: Self) -> Self {
        a
    }
}

/// Cheap sign-flip alias.
pub use BitFlip as Sign;

/// Vertex relabellings compose as maps: `compose(a, b)` applies `a`, then `b`.
impl<const N: usize> Orientation for Perm<N> {
    #[inline]
    fn compose(a: Self, b: Self) -> Self {
        b.compose(a)
    }
    #[inline]
    fn inverse(a: Self) -> Self {
        a.inverse()
    }
}

/// Breadth-first labelling from `seed`.
///
/// `steps(u)` lists the edges leaving `u` as `(v, o)`, meaning
/// `label[v]` should equal `compose(label[u], o)`. Unlabelled nodes receive
/// that value; labelled ones are checked against it. The seed gets the
/// identity label.
///
/// Returns the nodes in discovery order and whether every edge agreed.
/// Nodes already labelled before the call are never revisited.
pub fn propagate_from<O, F, I>(seed: usize, labels: &mut [Option<O>], mut steps: F) -> (Vec<usize>, bool)
where
    O: Orientation + PartialEq,
    F: FnMut(usize) -> I,
    I: IntoIterator<Item = (usize, O)>,
{
    debug_assert!(labels[seed].is_none(), "seed {seed} already labelled");
    labels[seed] = Some(O::default());
    let mut order = vec![seed];
    let mut consistent = true;
    let mut queue = VecDeque::from([seed]);
    while let Some(u) = queue.pop_front() {
        let here = labels[u].unwrap_or_default();
        for (v, step) in steps(u) {
            let expected = O::compose(here, step);
            match labels[v] {
                None => {
                    labels[v] = Some(expected);
                    order.push(v);
                    queue.push_back(v);
                }
                Some(existing) if existing != expected => consistent = false,
                Some(_) => {}
            }
        }
    }
    (order, consistent)
}
