//! # TESSERA Shared
//!
//! Common math types and constants used by the whole mesh renderer.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - a GPU API
//! - file or network I/O
//!
//! If you need draw-path types, put them in `tessera_rendering`.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    NORMAL_DIVISOR, NORMAL_EPSILON, SCRATCH_INDEX_CAPACITY, SCRATCH_VERTEX_CAPACITY,
    SHADOW_LIFT, SHELL_INFLATE_DISTANCE,
};
pub use math::{Basis, Vec2, Vec3};
