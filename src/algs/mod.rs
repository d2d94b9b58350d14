//! Algorithms over whole triangulations: relabelling, canonical forms,
//! isomorphism search and signatures.

pub mod canonical;
pub mod iso_search;
pub mod iso_sig;
pub mod isomorphism;

pub use iso_search::IsoSearchOptions;
pub use isomorphism::Isomorphism;
