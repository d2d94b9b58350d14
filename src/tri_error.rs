//! TriSieveError: Unified error type for tri-sieve public APIs
//!
//! Every fallible public operation (gluing, construction, isomorphism
//! application, signature decoding, envelope import) reports through this
//! enum. Internal invariants are asserted instead, see
//! [`DebugInvariants`](crate::debug_invariants::DebugInvariants).

use thiserror::Error;

/// Unified error type for tri-sieve operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TriSieveError {
    /// A simplex index does not name a simplex of the triangulation.
    #[error("Simplex index {index} out of range (triangulation has {size} simplices)")]
    SimplexOutOfRange { index: usize, size: usize },
    /// A facet number is not in `0..=dim`.
    #[error("Facet {facet} out of range for a {dim}-simplex")]
    FacetOutOfRange { facet: usize, dim: usize },
    /// A face dimension is not in `0..dim`.
    #[error("Face dimension {subdim} out of range for a {dim}-dimensional triangulation")]
    FaceDimensionOutOfRange { subdim: usize, dim: usize },
    /// Attempted to glue a facet that is already glued.
    #[error("Facet {facet} of simplex {simplex} is already glued")]
    FacetAlreadyGlued { simplex: usize, facet: usize },
    /// Attempted to unglue a boundary facet.
    #[error("Facet {facet} of simplex {simplex} is not glued")]
    FacetNotGlued { simplex: usize, facet: usize },
    /// A facet glued onto itself must use an involution.
    #[error("Facet {facet} of simplex {simplex} cannot be glued to itself by a non-involution")]
    IllegalSelfGluing { simplex: usize, facet: usize },
    /// Facet gluings are not mutually inverse.
    #[error("Gluing across facet {facet} of simplex {simplex} is not reciprocated")]
    BrokenReciprocity { simplex: usize, facet: usize },
    /// The supplied image tuple is not a permutation.
    #[error("Invalid permutation images: {0}")]
    InvalidPermutation(String),
    /// Parallel construction tables disagree in shape or content.
    #[error("Construction tables are inconsistent: {0}")]
    ConstructionMismatch(String),
    /// An isomorphism was applied to a triangulation of the wrong size.
    #[error("Isomorphism of size {expected} cannot act on {found} simplices")]
    IsomorphismSizeMismatch { expected: usize, found: usize },
    /// An isomorphism with unassigned simplex images was applied.
    #[error("Isomorphism is incomplete: simplex {0} has no image")]
    IncompleteIsomorphism(usize),
    /// Two simplices share an image, or an image is out of range.
    #[error("Isomorphism is not a bijection: image {0} is repeated or out of range")]
    NonBijectiveIsomorphism(usize),
    /// The string is not a valid isomorphism signature.
    #[error("Invalid isomorphism signature `{sig}`: {reason}")]
    InvalidIsoSig { sig: String, reason: &'static str },
    /// A record or table describes a different dimension.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// A serialised triangulation record could not be imported.
    #[error("Invalid triangulation record: {0}")]
    InvalidRecord(String),
}
