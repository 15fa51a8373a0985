//! # Frame Interpolation
//!
//! Blends two keyframes into the working vertex buffer:
//!
//! ```text
//! p = (move + prev * backv + cur * frontv [+ n * 4]) ∘ entity_scale
//!
//! frontv = cur.scale  * (1 - backlerp)
//! backv  = prev.scale * backlerp
//! move   = (R · (old_origin - origin) + prev.translate) * backlerp
//!        + cur.translate * (1 - backlerp)
//! ```
//!
//! `R` projects the origin delta onto the entity's forward, left and up
//! axes, so a moving entity does not visibly snap between frames.

use tessera_core::ScratchBuffer;
use tessera_shared::{Basis, Vec3, SHELL_INFLATE_DISTANCE};

use crate::entity::RenderEntity;
use crate::error::{RenderError, RenderResult};
use crate::model::Keyframe;

/// Precomputed blend terms for one entity and frame pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInterpolator {
    translate: Vec3,
    front: Vec3,
    back: Vec3,
    scale: Vec3,
}

impl FrameInterpolator {
    /// Builds the blend for `entity` between `current` and `previous`.
    ///
    /// `backlerp` is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(
        entity: &RenderEntity,
        current: &Keyframe,
        previous: &Keyframe,
        backlerp: f32,
    ) -> Self {
        let backlerp = backlerp.clamp(0.0, 1.0);
        let frontlerp = 1.0 - backlerp;

        let delta = entity.old_origin - entity.origin;
        let axes = Basis::from_angles(entity.angles);
        let motion = Vec3::new(
            delta.dot(axes.forward),
            -delta.dot(axes.right),
            delta.dot(axes.up),
        ) + previous.translate;

        Self {
            translate: motion * backlerp + current.translate * frontlerp,
            front: current.scale * frontlerp,
            back: previous.scale * backlerp,
            scale: entity.effective_scale(),
        }
    }

    /// Writes one position per vertex into `out`, replacing its contents.
    ///
    /// With `inflate`, each vertex is pushed out along the current frame's
    /// normal before the entity scale is applied.
    ///
    /// # Errors
    ///
    /// - [`RenderError::FrameVertexMismatch`] if the frames disagree on
    ///   vertex count
    /// - [`RenderError::Scratch`] if `out` cannot hold the model
    pub fn interpolate(
        &self,
        current: &Keyframe,
        previous: &Keyframe,
        inflate: bool,
        out: &mut ScratchBuffer<Vec3>,
    ) -> RenderResult<()> {
        let count = current.vertex_count();
        if previous.vertex_count() != count {
            return Err(RenderError::FrameVertexMismatch {
                frame: previous.vertex_count(),
                working: count,
            });
        }

        out.reset_to(count, Vec3::ZERO)?;

        let pairs = current.vertices.iter().zip(&previous.vertices);
        for (slot, (v, ov)) in out.as_mut_slice().iter_mut().zip(pairs) {
            let mut p = self.translate
                + ov.raw_position().mul_per_axis(self.back)
                + v.raw_position().mul_per_axis(self.front);
            if inflate {
                p = p.mul_add(SHELL_INFLATE_DISTANCE, v.decode_normal());
            }
            *slot = p.mul_per_axis(self.scale);
        }

        Ok(())
    }
}
