//! Lookup tables backing [`Perm`](super::Perm).
//!
//! One table per supported group size (`S3`, `S4`, `S5`), built on first use
//! and shared for the lifetime of the process. Every permutation operation is
//! a single table lookup afterwards.
//!
//! Two index conventions are tabulated:
//! - *ordered*: lexicographic on the image tuple, so ordered index 0 is the
//!   identity and ordered index `n! - 1` is the reversal;
//! - *signed* (`Sn`): the ordered sequence with each adjacent pair
//!   `(2k, 2k+1)` swapped whenever needed so that even permutations sit at
//!   even indices. Signed index 0 is also the identity.

use itertools::Itertools;
use once_cell::sync::Lazy;

/// Largest supported permutation size.
pub(crate) const MAX_N: usize = 5;

pub(crate) struct PermTable {
    pub n: usize,
    pub count: usize,
    /// `images[code][i]`: image of `i` under the permutation with signed index `code`.
    pub images: Vec<[u8; MAX_N]>,
    /// `pre_images[code][i]`: preimage of `i`.
    pub pre_images: Vec<[u8; MAX_N]>,
    pub inverse: Vec<u8>,
    /// `product[a * count + b]` is the signed index of `a ∘ b` (apply `b` first).
    pub product: Vec<u8>,
    pub to_ordered: Vec<u8>,
    pub from_ordered: Vec<u8>,
    pub sign: Vec<i8>,
    /// `transposition[a][b]`: signed index of the swap `(a b)`; identity on the diagonal.
    pub transposition: [[u8; MAX_N]; MAX_N],
}

/// Lexicographic rank of an image tuple among all permutations of its length.
pub(crate) fn ordered_rank(images: &[u8]) -> usize {
    let n = images.len();
    let mut rank = 0usize;
    for i in 0..n {
        let smaller_later = images[i + 1..]
            .iter()
            .filter(|&&x| x < images[i])
            .count();
        rank = rank * (n - i) + smaller_later;
    }
    rank
}

fn parity_sign(images: &[u8]) -> i8 {
    let mut sign = 1i8;
    for (i, j) in (0..images.len()).tuple_combinations() {
        if images[i] > images[j] {
            sign = -sign;
        }
    }
    sign
}

impl PermTable {
    fn build(n: usize) -> Self {
        let ordered: Vec<Vec<u8>> = (0..n as u8).permutations(n).collect();
        let count = ordered.len();

        // Pair (2k, 2k+1) of the lexicographic list differs by the swap of the
        // last two images, so exactly one of them is even.
        let from_ordered: Vec<u8> = (0..count)
            .map(|o| {
                let lead_even = parity_sign(&ordered[o & !1]) == 1;
                (if lead_even { o } else { o ^ 1 }) as u8
            })
            .collect();
        let mut to_ordered = vec![0u8; count];
        for (o, &s) in from_ordered.iter().enumerate() {
            to_ordered[s as usize] = o as u8;
        }

        let mut images = vec![[0u8; MAX_N]; count];
        let mut pre_images = vec![[0u8; MAX_N]; count];
        let mut sign = vec![0i8; count];
        for code in 0..count {
            let tuple = &ordered[to_ordered[code] as usize];
            for (i, &img) in tuple.iter().enumerate() {
                images[code][i] = img;
                pre_images[code][img as usize] = i as u8;
            }
            sign[code] = parity_sign(tuple);
        }

        let code_of = |tuple: &[u8]| from_ordered[ordered_rank(tuple)];

        let inverse: Vec<u8> = (0..count)
            .map(|code| code_of(&pre_images[code][..n]))
            .collect();

        let mut product = vec![0u8; count * count];
        let mut composed = [0u8; MAX_N];
        for a in 0..count {
            for b in 0..count {
                for i in 0..n {
                    composed[i] = images[a][images[b][i] as usize];
                }
                product[a * count + b] = code_of(&composed[..n]);
            }
        }

        let mut transposition = [[0u8; MAX_N]; MAX_N];
        for a in 0..n {
            for b in 0..n {
                let mut tuple: Vec<u8> = (0..n as u8).collect();
                tuple.swap(a, b);
                transposition[a][b] = code_of(&tuple);
            }
        }

        Self {
            n,
            count,
            images,
            pre_images,
            inverse,
            product,
            to_ordered,
            from_ordered,
            sign,
            transposition,
        }
    }

    /// Signed index of an image tuple that is known to be a permutation.
    #[inline]
    pub fn code_of(&self, images: &[u8]) -> u8 {
        self.from_ordered[ordered_rank(images)]
    }
}

static TABLE_3: Lazy<PermTable> = Lazy::new(|| PermTable::build(3));
static TABLE_4: Lazy<PermTable> = Lazy::new(|| PermTable::build(4));
static TABLE_5: Lazy<PermTable> = Lazy::new(|| PermTable::build(5));

/// Table for permutations of `{0..n-1}`.
///
/// # Panics
/// Panics if `n` is not 3, 4 or 5. [`Perm`](super::Perm) rules this out at
/// compile time.
#[inline]
pub(crate) fn table(n: usize) -> &'static PermTable {
    let t: &'static PermTable = match n {
        3 => &TABLE_3,
        4 => &TABLE_4,
        5 => &TABLE_5,
        _ => panic!("no permutation table for S{n}"),
    };
    debug_assert_eq!(t.n, n);
    t
}
