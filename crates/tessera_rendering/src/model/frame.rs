//! Keyframes: one stored pose of a mesh.
//!
//! Positions are fixed-point triples decoded with the frame's own
//! `scale`/`translate`. Normals are signed-byte triples divided by
//! [`NORMAL_DIVISOR`].

use bytemuck::{Pod, Zeroable};
use tessera_shared::{Vec3, NORMAL_DIVISOR};

/// One compressed vertex of a keyframe.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct CompressedVertex {
    /// Fixed-point position, decoded as `translate + position * scale`.
    pub position: [u16; 3],
    /// Signed-byte normal.
    pub normal: [i8; 3],
    /// Unused, keeps the record 2-byte aligned.
    pub reserved: u8,
}

impl CompressedVertex {
    /// Creates a vertex from its raw fields.
    #[inline]
    #[must_use]
    pub const fn new(position: [u16; 3], normal: [i8; 3]) -> Self {
        Self {
            position,
            normal,
            reserved: 0,
        }
    }

    /// Raw position as floats, before the frame transform.
    #[inline]
    #[must_use]
    pub fn raw_position(&self) -> Vec3 {
        Vec3::new(
            f32::from(self.position[0]),
            f32::from(self.position[1]),
            f32::from(self.position[2]),
        )
    }

    /// Decoded normal. Not renormalized.
    #[inline]
    #[must_use]
    pub fn decode_normal(&self) -> Vec3 {
        Vec3::new(
            f32::from(self.normal[0]) / NORMAL_DIVISOR,
            f32::from(self.normal[1]) / NORMAL_DIVISOR,
            f32::from(self.normal[2]) / NORMAL_DIVISOR,
        )
    }
}

/// A keyframe. Immutable once loaded; owned by its model.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    /// Frame name from the source asset.
    pub name: String,
    /// Per-axis decode scale.
    pub scale: Vec3,
    /// Per-axis decode offset.
    pub translate: Vec3,
    /// Compressed vertices.
    pub vertices: Vec<CompressedVertex>,
}

impl Keyframe {
    /// Creates a keyframe.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        scale: Vec3,
        translate: Vec3,
        vertices: Vec<CompressedVertex>,
    ) -> Self {
        Self {
            name: name.into(),
            scale,
            translate,
            vertices,
        }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Decoded model-space position of vertex `index`.
    #[inline]
    #[must_use]
    pub fn decode_position(&self, index: usize) -> Option<Vec3> {
        self.vertices
            .get(index)
            .map(|v| self.translate + v.raw_position().mul_per_axis(self.scale))
    }
}
