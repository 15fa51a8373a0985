//! # TESSERA Core
//!
//! Memory primitives for the per-entity draw path.
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in hot path** - scratch memory is pre-allocated
//! 2. **No silent growth** - exceeding capacity is an error the caller sees
//! 3. **Call-scoped contents** - buffers are cleared, never freed, between uses
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::ScratchBuffer;
//!
//! let mut scratch: ScratchBuffer<u32> = ScratchBuffer::new(4);
//! scratch.extend_from_slice(&[0, 1, 2]).unwrap();
//! assert!(scratch.push(3).is_ok());
//! assert!(scratch.push(4).is_err());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod memory;

pub use memory::{CapacityError, ScratchBuffer};
