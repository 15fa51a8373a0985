//! # Memory Management
//!
//! Pre-allocated scratch storage for the draw path.
//!
//! ## Design Philosophy
//!
//! All scratch memory is allocated once when a renderer is created. During
//! a draw:
//! - No heap allocations
//! - Overflow is reported, never absorbed by reallocation
//! - Contents live only until the next `clear`

mod scratch;

pub use scratch::{CapacityError, ScratchBuffer};
