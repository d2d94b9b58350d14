//! Top-level module for triangulation topology.
//!
//! This module provides the core types for representing pseudo-triangulations:
//! - `Perm<N>` vertex permutations and the face numbering of a simplex
//! - `Simplex<N>` and the `Triangulation<N>` that owns them
//! - The lazily computed `Skeleton<N>`
//!
//! Most users will build a `Triangulation` with `new_simplex` and `join`, then
//! query it through the skeleton accessors.

pub mod cache;
pub mod face_numbering;
pub mod orientation;
pub mod perm;
pub mod simplex;
pub mod skeleton;
pub mod triangulation;

pub use cache::InvalidateCache;
pub use face_numbering::FaceNumbering;
pub use orientation::*;
pub use perm::Perm;
pub use simplex::Simplex;
pub use skeleton::Skeleton;
pub use triangulation::{Triangulation, Triangulation2, Triangulation3, Triangulation4};
