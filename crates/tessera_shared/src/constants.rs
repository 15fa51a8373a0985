//! # Renderer Constants
//!
//! Values baked into the draw path. Changing any of these changes the
//! visual output of existing content.

// =============================================================================
// KEYFRAME DECODING
// =============================================================================

/// Divisor that turns a signed-byte normal component into `[-1, 1]`.
pub const NORMAL_DIVISOR: f32 = 127.0;

/// Distance (model units) shell-effect vertices are pushed out along
/// their normal.
pub const SHELL_INFLATE_DISTANCE: f32 = 4.0;

// =============================================================================
// TESSELLATION
// =============================================================================

/// Subdivision level used when no configuration is supplied.
pub const DEFAULT_TESSELLATION_LEVEL: u32 = 4;

/// Finite-difference step used to estimate patch normals.
pub const NORMAL_EPSILON: f32 = 0.001;

/// Vertex capacity of the tessellation scratch (per run, per flush).
pub const SCRATCH_VERTEX_CAPACITY: usize = 256;

/// Index capacity of the tessellation scratch (per run, per flush).
pub const SCRATCH_INDEX_CAPACITY: usize = 768;

// =============================================================================
// SHADING
// =============================================================================

/// Number of entries in the gamma and minimum-light lookup tables.
pub const LIGHT_TABLE_SIZE: usize = 256;

/// Channel floor applied by the minimum-light entity flag.
pub const MINLIGHT_FLOOR: f32 = 0.1;

/// Multiplier reported for the brightest channel of a weapon model.
pub const WEAPON_LIGHT_LEVEL_SCALE: f32 = 150.0;

/// Amplitude of the glow pulse.
pub const GLOW_AMPLITUDE: f32 = 0.1;

/// Angular speed of the glow pulse (radians per second).
pub const GLOW_FREQUENCY: f32 = 7.0;

/// Fraction of the base light a glow pulse may never drop below.
pub const GLOW_FLOOR: f32 = 0.8;

// =============================================================================
// SHADOWS
// =============================================================================

/// Lift applied above the light spot so the shadow does not z-fight.
pub const SHADOW_LIFT: f32 = 0.1;
