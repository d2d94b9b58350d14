//! Serialisation of triangulations.
//!
//! Triangulations travel as plain [`TriangulationRecord`]s: one entry per
//! simplex holding its description and, for every facet, either `[-1, -1]`
//! or the destination simplex and a permutation code. Records derive
//! `serde` traits, so any serde format can carry them.

pub mod envelope;

pub use envelope::{ImportOptions, PermCodeKind, SimplexRecord, TriangulationRecord};
