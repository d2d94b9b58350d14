#![cfg_attr(docsrs, feature(doc_cfg))]
//! # tri-sieve
//!
//! tri-sieve is a library for combinatorial pseudo-triangulations of dimension
//! 2, 3 and 4: collections of triangles, tetrahedra or pentachora whose facets
//! are glued together in pairs by vertex permutations.
//!
//! ## Features
//! - `Perm<N>` permutations of `N = D + 1` vertices in a single byte
//! - `Triangulation<N>` owning its simplices, with change spans and listeners
//! - A lazily computed skeleton: faces of every dimension, links, components,
//!   boundary components, orientability and Euler characteristics
//! - Canonical relabelling, isomorphism and subcomplex search
//! - Isomorphism signatures, a compact text form that identifies a
//!   triangulation up to isomorphism
//! - Serde envelope records for storage and exchange
//!
//! ## Determinism
//!
//! Skeleton numbering, canonical forms and signatures are total functions of
//! the gluings. Randomised relabelling takes an explicit `Rng`; tests seed
//! `SmallRng` explicitly.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! tri-sieve = "0.1"
//! # Optional features:
//! # features = ["rayon", "strict-invariants"]
//! ```
//!
//! ```
//! use tri_sieve::prelude::*;
//!
//! let mut tri = Triangulation2::new();
//! tri.new_simplices(2);
//! for f in 0..3 {
//!     tri.join(0, f, 1, Perm::identity()).unwrap();
//! }
//! assert_eq!(tri.euler_char(), 2);
//! let sig = tri.iso_sig();
//! assert!(Triangulation2::from_iso_sig(&sig).unwrap().is_isomorphic_to(&tri).is_some());
//! ```

pub mod algs;
pub mod debug_invariants;
pub mod io;
pub mod topology;
pub mod tri_error;

pub use debug_invariants::DebugInvariants;
pub use tri_error::TriSieveError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::{IsoSearchOptions, Isomorphism};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::io::{ImportOptions, PermCodeKind, SimplexRecord, TriangulationRecord};
    pub use crate::topology::cache::InvalidateCache;
    pub use crate::topology::face_numbering::FaceNumbering;
    pub use crate::topology::orientation::{BitFlip, Orientation, Sign};
    pub use crate::topology::perm::Perm;
    pub use crate::topology::simplex::Simplex;
    pub use crate::topology::skeleton::{
        BoundaryComponent, Component, Face, FaceEmbedding, LinkSummary, LinkType, Skeleton,
    };
    pub use crate::topology::triangulation::{
        ChangeEvent, ChangeListener, ChangeSpan, Triangulation, Triangulation2, Triangulation3,
        Triangulation4,
    };
    pub use crate::tri_error::TriSieveError;
}
