//! Envelope records: the serialisable form of a triangulation.

use serde::{Deserialize, Serialize};

use crate::debug_invariants::check_reciprocity;
use crate::topology::perm::Perm;
use crate::topology::simplex::Simplex;
use crate::topology::triangulation::Triangulation;
use crate::tri_error::TriSieveError;

/// How gluing permutations are written in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PermCodeKind {
    /// Index into the signed enumeration of `S_N`.
    #[default]
    Signed,
    /// First-generation packed image code.
    Legacy,
}

/// Options for [`Triangulation::from_record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportOptions {
    /// Code kind assumed for records that do not name one.
    pub perm_codes: PermCodeKind,
}

/// One simplex: its description and one `[dest, code]` pair per facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplexRecord {
    #[serde(default)]
    pub description: String,
    pub gluings: Vec<[i64; 2]>,
}

/// A whole triangulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriangulationRecord {
    pub dimension: usize,
    /// `None` in older envelopes; the importer then falls back to
    /// [`ImportOptions::perm_codes`].
    #[serde(default)]
    pub perm_codes: Option<PermCodeKind>,
    pub simplices: Vec<SimplexRecord>,
}

const BOUNDARY: [i64; 2] = [-1, -1];

fn invalid(msg: String) -> TriSieveError {
    TriSieveError::InvalidRecord(msg)
}

fn decode_perm<const N: usize>(kind: PermCodeKind, code: i64) -> Option<Perm<N>> {
    match kind {
        PermCodeKind::Signed => usize::try_from(code).ok().and_then(Perm::try_from_sn_index),
        PermCodeKind::Legacy => u16::try_from(code).ok().and_then(Perm::from_perm_code_legacy),
    }
}

impl<const N: usize> Triangulation<N> {
    /// Record of this triangulation using signed permutation codes.
    pub fn to_record(&self) -> TriangulationRecord {
        TriangulationRecord {
            dimension: Self::DIM,
            perm_codes: Some(PermCodeKind::Signed),
            simplices: self
                .iter()
                .map(|s| SimplexRecord {
                    description: s.description().to_owned(),
                    gluings: (0..N)
                        .map(|f| match s.glued(f) {
                            Some((t, g)) => [t as i64, g.sn_index() as i64],
                            None => BOUNDARY,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Rebuilds a triangulation from a record.
    ///
    /// The record is checked in full first: dimension, one entry per facet,
    /// destinations in range, codes that decode to permutations, and
    /// gluings that agree from both sides.
    pub fn from_record(
        record: &TriangulationRecord,
        opts: &ImportOptions,
    ) -> Result<Self, TriSieveError> {
        if record.dimension != Self::DIM {
            return Err(TriSieveError::DimensionMismatch {
                expected: Self::DIM,
                found: record.dimension,
            });
        }
        let kind = record.perm_codes.unwrap_or(opts.perm_codes);
        let n = record.simplices.len();

        let mut simplices = Vec::with_capacity(n);
        for (s, entry) in record.simplices.iter().enumerate() {
            if entry.gluings.len() != N {
                return Err(invalid(format!(
                    "simplex {s} has {} facet entries, expected {N}",
                    entry.gluings.len()
                )));
            }
            let mut simplex = Simplex::<N>::new(entry.description.clone());
            for (f, &[dest, code]) in entry.gluings.iter().enumerate() {
                if [dest, code] == BOUNDARY {
                    continue;
                }
                let t = usize::try_from(dest)
                    .ok()
                    .filter(|&t| t < n)
                    .ok_or_else(|| invalid(format!("simplex {s} facet {f} points at {dest}")))?;
                let g = decode_perm::<N>(kind, code).ok_or_else(|| {
                    invalid(format!("simplex {s} facet {f} has bad {kind:?} code {code}"))
                })?;
                simplex.adj[f] = Some(t);
                simplex.gluing[f] = g;
            }
            simplices.push(simplex);
        }

        check_reciprocity(&simplices)?;
        log::debug!("from_record: imported {n} simplices ({kind:?} codes)");
        Ok(Self::from_simplices(simplices))
    }
}
