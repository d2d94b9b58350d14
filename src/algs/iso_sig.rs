//! Isomorphism signatures.
//!
//! A signature is a printable string over a 64-character alphabet that
//! identifies a triangulation up to combinatorial isomorphism. Each connected
//! component is encoded separately from every `(start simplex, vertex
//! permutation)` pair; the smallest string wins, and the component strings
//! are sorted and concatenated.
//!
//! Layout of one component of `n` simplices:
//!
//! * the size: one character when `n < 63`, otherwise `63`, a limb count
//!   `m` and then `n` in `m` little-endian six-bit limbs;
//! * `⌈n·N/3⌉` characters of facet actions, three trits per character with
//!   the first trit lowest (`0` boundary, `1` new simplex, `2` earlier
//!   simplex);
//! * for every `2`: the destination simplex (as many limbs as the size) and
//!   the ordered index of the gluing (two limbs when `N! > 64`).
//!
//! The empty triangulation is the single character `a`.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::algs::isomorphism::Isomorphism;
use crate::debug_invariants::DebugInvariants;
use crate::topology::perm::Perm;
use crate::topology::simplex::Simplex;
use crate::topology::triangulation::Triangulation;
use crate::tri_error::TriSieveError;

const ALPHABET: &[u8; 64] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+-";

/// Value marking a size wider than one character.
const WIDE: usize = 63;

#[inline]
fn push_char(out: &mut String, value: usize) {
    out.push(ALPHABET[value] as char);
}

#[inline]
fn char_value(c: u8) -> Option<usize> {
    match c {
        b'a'..=b'z' => Some((c - b'a') as usize),
        b'A'..=b'Z' => Some((c - b'A') as usize + 26),
        b'0'..=b'9' => Some((c - b'0') as usize + 52),
        b'+' => Some(62),
        b'-' => Some(63),
        _ => None,
    }
}

/// `value` in `limbs` little-endian six-bit characters.
fn push_limbs(out: &mut String, mut value: usize, limbs: usize) {
    for _ in 0..limbs {
        push_char(out, value & 63);
        value >>= 6;
    }
}

/// Characters needed for a gluing index.
const fn gluing_limbs(count: usize) -> usize {
    if count <= 64 { 1 } else { 2 }
}

/// Limbs needed to write every simplex index of a component of size `n`.
fn size_limbs(n: usize) -> usize {
    let mut limbs = 1;
    while n >= 1usize << (6 * limbs) {
        limbs += 1;
    }
    limbs
}

/// One component encoded from one starting pair, with the labelling used.
#[derive(Debug, Clone)]
struct Encoding<const N: usize> {
    sig: String,
    order: Vec<usize>,
    perms: Vec<Perm<N>>,
}

fn encode_from<const N: usize>(
    simplices: &[Simplex<N>],
    size: usize,
    start: usize,
    perm: Perm<N>,
    image: &mut [Option<usize>],
) -> Encoding<N> {
    let mut order = Vec::with_capacity(size);
    let mut perms = Vec::with_capacity(size);
    let mut seen = vec![false; size * N];
    let mut trits: Vec<u8> = Vec::with_capacity(size * N);
    let mut joins: Vec<(usize, usize)> = Vec::new();

    image[start] = Some(0);
    order.push(start);
    perms.push(perm);

    let mut pos = 0;
    while pos < order.len() {
        let a = order[pos];
        let pa = perms[pos];
        for fimg in (0..N).rev() {
            if seen[pos * N + fimg] {
                continue;
            }
            seen[pos * N + fimg] = true;
            let f = pa.pre_image(fimg);
            let Some((b, g)) = simplices[a].glued(f) else {
                trits.push(0);
                continue;
            };
            let slot = match image[b] {
                Some(i) => {
                    trits.push(2);
                    let glue = perms[i] * g * pa.inverse();
                    joins.push((i, glue.ordered_index()));
                    i
                }
                None => {
                    let i = order.len();
                    image[b] = Some(i);
                    order.push(b);
                    perms.push(pa * g.inverse());
                    trits.push(1);
                    i
                }
            };
            seen[slot * N + perms[slot].image(g.image(f))] = true;
        }
        pos += 1;
    }
    for &s in &order {
        image[s] = None;
    }

    let limbs = size_limbs(size);
    let mut sig = String::new();
    if size < WIDE {
        push_char(&mut sig, size);
    } else {
        push_char(&mut sig, WIDE);
        push_char(&mut sig, limbs);
        push_limbs(&mut sig, size, limbs);
    }
    trits.resize((size * N).div_ceil(3) * 3, 0);
    for chunk in trits.chunks(3) {
        push_char(&mut sig, (chunk[0] + 3 * chunk[1] + 9 * chunk[2]) as usize);
    }
    for (dest, glue) in joins {
        push_limbs(&mut sig, dest, limbs);
        push_limbs(&mut sig, glue, gluing_limbs(Perm::<N>::COUNT));
    }
    Encoding { sig, order, perms }
}

/// Smallest encoding of the component listed in `members`.
#[cfg(not(feature = "rayon"))]
fn best_encoding<const N: usize>(simplices: &[Simplex<N>], members: &[usize]) -> Option<Encoding<N>> {
    let mut image = vec![None; simplices.len()];
    let mut best: Option<Encoding<N>> = None;
    for &start in members {
        for perm in Perm::<N>::all() {
            let found = encode_from(simplices, members.len(), start, perm, &mut image);
            if best.as_ref().is_none_or(|b| found.sig < b.sig) {
                best = Some(found);
            }
        }
    }
    best
}

/// Smallest encoding of the component listed in `members`.
#[cfg(feature = "rayon")]
fn best_encoding<const N: usize>(simplices: &[Simplex<N>], members: &[usize]) -> Option<Encoding<N>> {
    let count = Perm::<N>::COUNT;
    (0..members.len() * count)
        .into_par_iter()
        .map_init(
            || vec![None; simplices.len()],
            |image, i| {
                let perm = Perm::from_sn_index(i % count);
                encode_from(simplices, members.len(), members[i / count], perm, image)
            },
        )
        .min_by(|a, b| a.sig.cmp(&b.sig))
}

/// Signature of `tri` and the isomorphism onto its decoded form.
pub(crate) fn signature<const N: usize>(tri: &Triangulation<N>) -> (String, Isomorphism<N>) {
    let simplices = tri.simplices();
    let mut encodings: Vec<Encoding<N>> = tri
        .components()
        .iter()
        .filter_map(|c| best_encoding(simplices, c.simplices()))
        .collect();
    encodings.sort_by(|a, b| a.sig.cmp(&b.sig));

    let mut iso = Isomorphism::new(simplices.len());
    if encodings.is_empty() {
        let mut sig = String::new();
        push_char(&mut sig, 0);
        return (sig, iso);
    }
    let mut sig = String::new();
    let mut offset = 0;
    for enc in &encodings {
        sig.push_str(&enc.sig);
        for (i, (&s, &p)) in enc.order.iter().zip(&enc.perms).enumerate() {
            iso.set_simp_image(s, Some(offset + i));
            iso.set_facet_perm(s, p);
        }
        offset += enc.order.len();
    }
    (sig, iso)
}

/// Cursor over the bytes of a signature.
struct Reader<'s> {
    sig: &'s str,
    bytes: &'s [u8],
    pos: usize,
}

impl<'s> Reader<'s> {
    fn new(sig: &'s str) -> Self {
        Self {
            sig,
            bytes: sig.as_bytes(),
            pos: 0,
        }
    }

    fn fail(&self, reason: &'static str) -> TriSieveError {
        TriSieveError::InvalidIsoSig {
            sig: self.sig.to_owned(),
            reason,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn value(&mut self) -> Result<usize, TriSieveError> {
        let c = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| self.fail("unexpected end of signature"))?;
        self.pos += 1;
        char_value(c).ok_or_else(|| self.fail("character outside the signature alphabet"))
    }

    fn limbs(&mut self, limbs: usize) -> Result<usize, TriSieveError> {
        let mut digits = Vec::with_capacity(limbs);
        for _ in 0..limbs {
            digits.push(self.value()?);
        }
        digits
            .iter()
            .rev()
            .try_fold(0usize, |acc, &d| acc.checked_mul(64)?.checked_add(d))
            .ok_or_else(|| self.fail("integer too wide"))
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }
}

/// Decodes one component and appends it to `tri`.
fn decode_component<const N: usize>(
    reader: &mut Reader<'_>,
    tri: &mut Vec<Simplex<N>>,
) -> Result<(), TriSieveError> {
    let first = reader.value()?;
    let (n, limbs) = if first < WIDE {
        (first, 1)
    } else {
        let limbs = reader.value()?;
        if limbs == 0 {
            return Err(reader.fail("zero-width size"));
        }
        (reader.limbs(limbs)?, limbs)
    };
    if n == 0 {
        return Err(reader.fail("empty component"));
    }
    let total = n
        .checked_mul(N)
        .ok_or_else(|| reader.fail("component too large"))?;

    let width = total.div_ceil(3);
    if reader.remaining() < width {
        return Err(reader.fail("unexpected end of signature"));
    }
    let mut trits = Vec::with_capacity(width * 3);
    for _ in 0..width {
        let v = reader.value()?;
        if v >= 27 {
            return Err(reader.fail("facet action out of range"));
        }
        trits.extend([(v % 3) as u8, (v / 3 % 3) as u8, (v / 9) as u8]);
    }
    let mut joins = Vec::new();
    for _ in trits.iter().filter(|&&t| t == 2) {
        let dest = reader.limbs(limbs)?;
        let glue = reader.limbs(gluing_limbs(Perm::<N>::COUNT))?;
        joins.push((dest, glue));
    }

    let base = tri.len();
    let mut simplices = vec![Simplex::<N>::default(); n];
    let mut trit = trits.iter().copied();
    let mut join = joins.into_iter();
    let mut next = 1;
    for s in 0..n {
        if s >= next {
            return Err(reader.fail("component is disconnected"));
        }
        for f in (0..N).rev() {
            if simplices[s].adj[f].is_some() {
                continue;
            }
            match trit.next() {
                Some(0) => {}
                Some(1) => {
                    if next >= n {
                        return Err(reader.fail("too many simplices"));
                    }
                    glue(&mut simplices, s, f, next, Perm::identity());
                    next += 1;
                }
                Some(_) => {
                    let Some((dest, code)) = join.next() else {
                        return Err(reader.fail("missing gluing"));
                    };
                    if dest >= next {
                        return Err(reader.fail("gluing to an unseen simplex"));
                    }
                    let g = Perm::<N>::try_from_ordered_index(code)
                        .ok_or_else(|| reader.fail("gluing permutation out of range"))?;
                    let partner = g.image(f);
                    if dest < s || (dest == s && partner > f) {
                        return Err(reader.fail("gluing to a processed facet"));
                    }
                    if simplices[dest].adj[partner].is_some() {
                        return Err(reader.fail("gluing to a glued facet"));
                    }
                    if dest == s && partner == f && g.compose(g) != Perm::identity() {
                        return Err(reader.fail("illegal self-gluing"));
                    }
                    glue(&mut simplices, s, f, dest, g);
                }
                None => return Err(reader.fail("facet actions exhausted")),
            }
        }
    }
    if trit.any(|t| t != 0) {
        return Err(reader.fail("trailing facet actions"));
    }

    for simplex in &mut simplices {
        for adj in simplex.adj.iter_mut().flatten() {
            *adj += base;
        }
    }
    tri.extend(simplices);
    Ok(())
}

fn glue<const N: usize>(simplices: &mut [Simplex<N>], a: usize, f: usize, b: usize, g: Perm<N>) {
    simplices[a].adj[f] = Some(b);
    simplices[a].gluing[f] = g;
    let partner = g.image(f);
    simplices[b].adj[partner] = Some(a);
    simplices[b].gluing[partner] = g.inverse();
}

impl<const N: usize> Triangulation<N> {
    /// Isomorphism signature; equal for two triangulations exactly when they
    /// are combinatorially isomorphic.
    pub fn iso_sig(&self) -> String {
        signature(self).0
    }

    /// Signature together with an isomorphism taking `self` onto the
    /// triangulation the signature decodes to.
    pub fn iso_sig_with_isomorphism(&self) -> (String, Isomorphism<N>) {
        signature(self)
    }

    /// Rebuilds a triangulation from its isomorphism signature.
    pub fn from_iso_sig(sig: &str) -> Result<Self, TriSieveError> {
        let mut reader = Reader::new(sig);
        if sig == "a" {
            return Ok(Self::new());
        }
        if reader.at_end() {
            return Err(reader.fail("empty signature"));
        }
        let mut simplices = Vec::new();
        while !reader.at_end() {
            if let Err(err) = decode_component(&mut reader, &mut simplices) {
                log::debug!("from_iso_sig: rejected {sig:?}: {err}");
                return Err(err);
            }
        }
        let tri = Self::from_simplices(simplices);
        tri.debug_assert_invariants();
        Ok(tri)
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

    #[test]
    fn alphabet_values_round_trip() {
        for (v, &c) in ALPHABET.iter().enumerate() {
            assert_eq!(char_value(c), Some(v));
        }
        assert_eq!(char_value(b'*'), None);
    }

    #[test]
    fn size_limbs_grow_in_six_bit_steps() {
        assert_eq!(size_limbs(1), 1);
        assert_eq!(size_limbs(63), 1);
        assert_eq!(size_limbs(64), 2);
        assert_eq!(size_limbs(4095), 2);
        assert_eq!(size_limbs(4096), 3);
    }

    #[test]
    fn empty_and_single_simplex() {
        assert_eq!(Triangulation::<4>::new().iso_sig(), "a");
        assert!(Triangulation::<4>::from_iso_sig("a").unwrap().is_empty());

        let mut tri = Triangulation::<4>::new();
        tri.new_simplex();
        // size 1, four boundary trits in two characters
        assert_eq!(tri.iso_sig(), "baa");
    }

    #[test]
    fn sphere_signature() {
        // trits 1,2,2 then destination 1 twice with identity gluings
        let sig = sphere().iso_sig();
        assert_eq!(sig, "czababa");
        let back = Triangulation::<3>::from_iso_sig(&sig).unwrap();
        assert_eq!(back.iso_sig(), sig);
        assert_eq!(back.count_vertices(), 3);
    }

    #[test]
    fn signature_isomorphism_reproduces_decoding() {
        let mut tri = Triangulation::<4>::new();
        tri.new_simplices(3);
        tri.join(0, 0, 1, Perm::from_images([1, 0, 3, 2]).unwrap()).unwrap();
        tri.join(1, 3, 2, Perm::from_images([2, 3, 1, 0]).unwrap()).unwrap();
        tri.join(2, 2, 2, Perm::transposition(0, 1)).unwrap();
        let (sig, iso) = tri.iso_sig_with_isomorphism();
        let decoded = Triangulation::<4>::from_iso_sig(&sig).unwrap();
        assert!(iso.apply(&tri).unwrap().is_identical_to(&decoded));
    }

    #[test]
    fn malformed_signatures_are_rejected() {
        for bad in ["", "c", "c*ababa", "cvaaaa", "czabab", "aa", "c\u{e9}"] {
            let err = Triangulation::<3>::from_iso_sig(bad).unwrap_err();
            assert!(matches!(err, TriSieveError::InvalidIsoSig { .. }), "{bad}");
        }
    }
}
