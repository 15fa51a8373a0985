//! # Rendering Error Types
//!
//! Three families, matching when each can happen:
//! - [`ConfigError`]: rejected when a configuration is applied
//! - [`ModelError`]: rejected when a model is assembled
//! - [`RenderError`]: rejects a single draw call
//!
//! Recoverable data-integrity problems (bad frame numbers, submesh ranges
//! past the end of the stream) are clamped and logged instead.

use tessera_core::CapacityError;
use thiserror::Error;

/// Errors that reject a draw call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A command-stream vertex record points outside the working buffer.
    #[error("vertex index {index} out of range at command word {offset} (vertex count {vertex_count})")]
    VertexIndexOutOfRange {
        /// Offending index.
        index: i64,
        /// Word offset of the record in the command stream.
        offset: usize,
        /// Vertices available in the working buffer.
        vertex_count: usize,
    },

    /// A primitive run declares more vertex records than the range holds.
    #[error("primitive run at word {offset} declares {declared} words, only {available} available")]
    CommandOverrun {
        /// Word offset of the run's count.
        offset: usize,
        /// Words the run needs.
        declared: usize,
        /// Words left in the range.
        available: usize,
    },

    /// Keyframe vertex data does not match the working buffer.
    #[error("keyframe holds {frame} vertices, working buffer holds {working}")]
    FrameVertexMismatch {
        /// Vertices in the keyframe.
        frame: usize,
        /// Vertices in the working buffer.
        working: usize,
    },

    /// Scratch storage could not hold the draw.
    #[error(transparent)]
    Scratch(#[from] CapacityError),
}

/// Result type for draw operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors raised while applying configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Tessellation level below the minimum drawable level.
    #[error("tessellation level {0} is below the minimum of 1")]
    LevelTooLow(u32),

    /// Per-triangle output would not fit the fixed scratch storage.
    #[error(
        "tessellation level {level} needs {vertices} vertices and {indices} indices per triangle, \
         scratch holds {vertex_capacity} and {index_capacity}"
    )]
    LevelExceedsScratch {
        /// Requested level.
        level: u32,
        /// Samples per triangle at that level.
        vertices: usize,
        /// Indices per triangle at that level.
        indices: usize,
        /// Scratch vertex capacity.
        vertex_capacity: usize,
        /// Scratch index capacity.
        index_capacity: usize,
    },

    /// Gamma must be finite and positive.
    #[error("invalid gamma: {0}")]
    InvalidGamma(f32),

    /// Overbright multiplier must be finite and non-negative.
    #[error("invalid overbright multiplier: {0}")]
    InvalidOverbright(f32),

    /// Malformed TOML.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file could not be read.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while assembling a model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A model needs at least one keyframe.
    #[error("model has no keyframes")]
    NoFrames,

    /// Keyframes disagree on vertex count.
    #[error("keyframe {frame} holds {found} vertices, expected {expected}")]
    FrameVertexCount {
        /// Offending frame.
        frame: usize,
        /// Vertices in that frame.
        found: usize,
        /// Vertices in frame 0.
        expected: usize,
    },
}
