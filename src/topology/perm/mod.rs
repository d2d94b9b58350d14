//! `Perm<N>`: a permutation of `{0..N-1}` packed into one byte.
//!
//! Gluings between facets of top-dimensional simplices are permutations of
//! the simplex vertices, so a `D`-dimensional triangulation works with
//! `Perm<D + 1>`. Only `N ∈ {3, 4, 5}` is supported; any other `N` fails to
//! compile as soon as a permutation is constructed.
//!
//! The stored byte is the *signed* index (`Sn` index) of the permutation, so
//! even permutations have even codes. Composition, inversion, images and the
//! conversion to the lexicographic (*ordered*) index are all O(1) lookups
//! into tables built once per group, see [`tables`].
//!
//! Composition follows the usual convention: `p * q` (or `p.compose(q)`)
//! applies `q` first, then `p`.

pub(crate) mod tables;

use std::cmp::Ordering;
use std::fmt;
use std::ops::Mul;

use crate::tri_error::TriSieveError;
use tables::{MAX_N, PermTable};

const fn factorial(n: usize) -> usize {
    let mut acc = 1;
    let mut i = 2;
    while i <= n {
        acc *= i;
        i += 1;
    }
    acc
}

/// A permutation of `{0..N-1}`, stored as its signed index.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Perm<const N: usize> {
    code: u8,
}

impl<const N: usize> Perm<N> {
    pub(crate) const SUPPORTED: () = assert!(N >= 3 && N <= MAX_N, "Perm<N> requires 3 <= N <= 5");

    /// Number of permutations of `{0..N-1}`.
    pub const COUNT: usize = factorial(N);

    #[inline]
    fn table() -> &'static PermTable {
        let () = Self::SUPPORTED;
        tables::table(N)
    }

    /// The identity permutation.
    #[inline]
    pub const fn identity() -> Self {
        let () = Self::SUPPORTED;
        Perm { code: 0 }
    }

    /// The permutation with signed index `index`.
    ///
    /// # Panics
    /// Panics if `index >= Self::COUNT`.
    #[inline]
    pub fn from_sn_index(index: usize) -> Self {
        assert!(index < Self::COUNT, "Sn index {index} out of range for S{N}");
        let () = Self::SUPPORTED;
        Perm { code: index as u8 }
    }

    /// The permutation with signed index `index`, or `None` if out of range.
    #[inline]
    pub fn try_from_sn_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| Self::from_sn_index(index))
    }

    /// Signed index: even permutations at even indices.
    #[inline]
    pub fn sn_index(self) -> usize {
        self.code as usize
    }

    /// The permutation with lexicographic index `index`.
    ///
    /// # Panics
    /// Panics if `index >= Self::COUNT`.
    #[inline]
    pub fn from_ordered_index(index: usize) -> Self {
        assert!(index < Self::COUNT, "ordered index {index} out of range for S{N}");
        Perm {
            code: Self::table().from_ordered[index],
        }
    }

    /// The permutation with lexicographic index `index`, or `None` if out of range.
    #[inline]
    pub fn try_from_ordered_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then(|| Self::from_ordered_index(index))
    }

    /// Lexicographic index of the image tuple.
    #[inline]
    pub fn ordered_index(self) -> usize {
        Self::table().to_ordered[self.code as usize] as usize
    }

    /// Builds the permutation sending `i` to `images[i]`, rejecting tuples
    /// that are not bijections of `{0..N-1}`.
    pub fn from_images(images: [u8; N]) -> Result<Self, TriSieveError> {
        let mut seen = [false; MAX_N];
        for &img in &images {
            let img = img as usize;
            if img >= N || seen[img] {
                return Err(TriSieveError::InvalidPermutation(format!("{images:?}")));
            }
            seen[img] = true;
        }
        Ok(Self::from_images_unchecked(images))
    }

    /// Builds the permutation sending `i` to `images[i]`.
    ///
    /// The caller guarantees that `images` is a bijection; otherwise the
    /// resulting value is an unspecified permutation.
    #[inline]
    pub fn from_images_unchecked(images: [u8; N]) -> Self {
        debug_assert!(
            Self::is_bijection(&images),
            "not a permutation: {images:?}"
        );
        Perm {
            code: Self::table().code_of(&images),
        }
    }

    fn is_bijection(images: &[u8; N]) -> bool {
        let mut mask = 0u32;
        for &img in images {
            if img as usize >= N {
                return false;
            }
            mask |= 1 << img;
        }
        mask == (1 << N) - 1
    }

    /// The transposition swapping `a` and `b` (identity when `a == b`).
    #[inline]
    pub fn transposition(a: usize, b: usize) -> Self {
        debug_assert!(a < N && b < N, "transposition ({a} {b}) outside S{N}");
        Perm {
            code: Self::table().transposition[a][b],
        }
    }

    /// The full image tuple.
    #[inline]
    pub fn images(self) -> [u8; N] {
        let row = &Self::table().images[self.code as usize];
        let mut out = [0u8; N];
        out.copy_from_slice(&row[..N]);
        out
    }

    /// Image of `i`.
    #[inline]
    pub fn image(self, i: usize) -> usize {
        Self::table().images[self.code as usize][i] as usize
    }

    /// Preimage of `i`.
    #[inline]
    pub fn pre_image(self, i: usize) -> usize {
        Self::table().pre_images[self.code as usize][i] as usize
    }

    /// `self ∘ other`: apply `other`, then `self`.
    #[inline]
    pub fn compose(self, other: Self) -> Self {
        let table = Self::table();
        Perm {
            code: table.product[self.code as usize * table.count + other.code as usize],
        }
    }

    #[inline]
    pub fn inverse(self) -> Self {
        Perm {
            code: Self::table().inverse[self.code as usize],
        }
    }

    /// `+1` for even permutations, `-1` for odd ones.
    #[inline]
    pub fn sign(self) -> i32 {
        i32::from(Self::table().sign[self.code as usize])
    }

    #[inline]
    pub fn is_even(self) -> bool {
        self.code % 2 == 0
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self.code == 0
    }

    /// Sign of the lexicographic comparison of image tuples.
    #[inline]
    pub fn compare_with(self, other: Self) -> Ordering {
        self.ordered_index().cmp(&other.ordered_index())
    }

    /// The first `k` images as decimal digits.
    pub fn trunc(self, k: usize) -> String {
        self.images()[..k.min(N)]
            .iter()
            .map(|&d| char::from(b'0' + d))
            .collect()
    }

    /// First-generation code: the image of `i` stored in bits
    /// `[w*i, w*i + w)`, with `w = 2` for `N <= 4` and `w = 3` for `N = 5`.
    pub fn perm_code_legacy(self) -> u16 {
        let width = Self::legacy_width();
        self.images()
            .iter()
            .enumerate()
            .fold(0u16, |acc, (i, &img)| acc | (u16::from(img) << (width * i)))
    }

    /// Inverse of [`perm_code_legacy`](Self::perm_code_legacy); `None` if the
    /// code does not describe a permutation.
    pub fn from_perm_code_legacy(code: u16) -> Option<Self> {
        let width = Self::legacy_width();
        if u32::from(code) >> (width * N) != 0 {
            return None;
        }
        let mask = (1u16 << width) - 1;
        let mut images = [0u8; N];
        for (i, img) in images.iter_mut().enumerate() {
            *img = ((code >> (width * i)) & mask) as u8;
        }
        Self::from_images(images).ok()
    }

    #[inline]
    fn legacy_width() -> usize {
        if N <= 4 { 2 } else { 3 }
    }

    /// All permutations in signed-index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self::from_sn_index)
    }

    /// All permutations in lexicographic order.
    pub fn all_ordered() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self::from_ordered_index)
    }
}

impl<const N: usize> Default for Perm<N> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const N: usize> Mul for Perm<N> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.compose(rhs)
    }
}

impl<const N: usize> PartialOrd for Perm<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Lexicographic on image tuples.
impl<const N: usize> Ord for Perm<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_with(*other)
    }
}

impl<const N: usize> fmt::Display for Perm<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.trunc(N))
    }
}

impl<const N: usize> fmt::Debug for Perm<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Perm").field(&format_args!("{self}")).finish()
    }
}

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(Perm<3>, u8);
    assert_eq_size!(Perm<5>, u8);
    assert_eq_size!(Option<Perm<4>>, [u8; 2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_code_zero_in_both_orders() {
        let id = Perm::<4>::identity();
        assert_eq!(id.sn_index(), 0);
        assert_eq!(id.ordered_index(), 0);
        assert_eq!(id.images(), [0, 1, 2, 3]);
        assert!(id.is_identity());
    }

    #[test]
    fn compose_applies_right_operand_first() {
        let p = Perm::<3>::from_images([1, 2, 0]).unwrap();
        let q = Perm::<3>::from_images([0, 2, 1]).unwrap();
        // (p ∘ q)(1) = p(q(1)) = p(2) = 0
        assert_eq!((p * q).image(1), 0);
        assert_eq!((p * q).images(), [1, 0, 2]);
    }

    #[test]
    fn from_images_rejects_non_bijections() {
        assert!(Perm::<4>::from_images([0, 1, 1, 3]).is_err());
        assert!(Perm::<3>::from_images([0, 1, 3]).is_err());
    }

    #[test]
    fn transposition_and_sign() {
        let t = Perm::<5>::transposition(1, 4);
        assert_eq!(t.images(), [0, 4, 2, 3, 1]);
        assert_eq!(t.sign(), -1);
        assert_eq!(Perm::<5>::transposition(2, 2), Perm::identity());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside S3")]
    fn transposition_past_the_last_point_is_caught() {
        let _ = Perm::<3>::transposition(1, 3);
    }

    #[test]
    fn composition_table_is_square_in_the_group_order() {
        let table = Perm::<4>::table();
        assert_eq!(table.count, Perm::<4>::COUNT);
        assert_eq!(table.product.len(), table.count * table.count);
    }

    #[test]
    fn trunc_and_display() {
        let p = Perm::<4>::from_images([1, 3, 0, 2]).unwrap();
        assert_eq!(p.trunc(2), "13");
        assert_eq!(p.to_string(), "1302");
        assert_eq!(format!("{p:?}"), "Perm(1302)");
    }

    #[test]
    fn legacy_code_packs_two_bits_per_image() {
        let p = Perm::<4>::from_images([1, 3, 0, 2]).unwrap();
        assert_eq!(p.perm_code_legacy(), 1 | (3 << 2) | (0 << 4) | (2 << 6));
        assert_eq!(Perm::<4>::from_perm_code_legacy(p.perm_code_legacy()), Some(p));
        // images 0,0,0,0 is not a permutation
        assert_eq!(Perm::<4>::from_perm_code_legacy(0), None);
        let q = Perm::<5>::from_images([4, 0, 3, 1, 2]).unwrap();
        assert_eq!(Perm::<5>::from_perm_code_legacy(q.perm_code_legacy()), Some(q));
    }

    #[test]
    fn ordering_is_lexicographic_on_images() {
        let sorted: Vec<_> = {
            let mut v: Vec<_> = Perm::<3>::all().collect();
            v.sort();
            v
        };
        let lex: Vec<_> = Perm::<3>::all_ordered().collect();
        assert_eq!(sorted, lex);
    }
}
