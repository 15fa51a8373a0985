//! Per-draw counters.

use std::ops::AddAssign;

use crate::entity::SkinSelection;

/// What one entity draw sent to the sink.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawStats {
    /// Batches begun.
    pub batches: u32,
    /// Vertices submitted (shadow included).
    pub vertices: u32,
    /// Triangle-list indices submitted.
    pub indices: u32,
    /// Source triangles run through the tessellator.
    pub triangles_tessellated: u32,
    /// Runs dropped as undrawable.
    pub runs_skipped: u32,
    /// Times a run's tessellated output was split because scratch filled up.
    pub scratch_flushes: u32,
    /// Vertices submitted by the shadow pass.
    pub shadow_vertices: u32,
    /// Light level reported by weapon models.
    pub light_level: Option<f32>,
    /// Skin the sink should bind for the lit batches; `None` when nothing
    /// was drawn.
    pub skin: Option<SkinSelection>,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: Self) {
        self.batches += rhs.batches;
        self.vertices += rhs.vertices;
        self.indices += rhs.indices;
        self.triangles_tessellated += rhs.triangles_tessellated;
        self.runs_skipped += rhs.runs_skipped;
        self.scratch_flushes += rhs.scratch_flushes;
        self.shadow_vertices += rhs.shadow_vertices;
        if rhs.light_level.is_some() {
            self.light_level = rhs.light_level;
        }
        if rhs.skin.is_some() {
            self.skin = rhs.skin;
        }
    }
}
