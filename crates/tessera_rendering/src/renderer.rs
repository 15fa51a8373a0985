//! # Alias Model Renderer
//!
//! One call draws one entity:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ snapshot config                                          │
//! │ clamp frames ─► resolve shade light ─► validate commands │
//! │ interpolate ─► interpret visible submeshes ─► shadow     │
//! │ flush                                                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command range is validated before the first submission, so a
//! rejected draw leaves the sink untouched.

use tessera_core::ScratchBuffer;
use tessera_shared::Vec3;

use crate::config::ConfigHandle;
use crate::entity::RenderEntity;
use crate::error::RenderResult;
use crate::interpreter::{CommandInterpreter, DrawContext};
use crate::lerp::FrameInterpolator;
use crate::model::AliasModel;
use crate::shading::{resolve_shade_light, DrawMode, LightSampler, SceneLighting};
use crate::shadow::ShadowProjector;
use crate::sink::MeshSink;
use crate::stats::DrawStats;

/// Default capacity of the working vertex buffer.
pub const DEFAULT_WORKING_VERTICES: usize = 4096;

/// Draws keyframe models.
///
/// Owns all per-draw scratch storage. Not shared between threads; give
/// each render thread its own renderer and a clone of the config handle.
#[derive(Debug)]
pub struct AliasRenderer {
    config: ConfigHandle,
    interpreter: CommandInterpreter,
    working: ScratchBuffer<Vec3>,
}

impl AliasRenderer {
    /// Creates a renderer reading settings from `config`.
    #[must_use]
    pub fn new(config: ConfigHandle) -> Self {
        Self::with_vertex_capacity(config, DEFAULT_WORKING_VERTICES)
    }

    /// Creates a renderer whose working buffer holds `vertices` vertices.
    #[must_use]
    pub fn with_vertex_capacity(config: ConfigHandle, vertices: usize) -> Self {
        Self {
            config,
            interpreter: CommandInterpreter::new(),
            working: ScratchBuffer::new(vertices),
        }
    }

    /// The configuration handle.
    #[must_use]
    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Positions produced by the last draw.
    #[must_use]
    pub fn working_positions(&self) -> &[Vec3] {
        self.working.as_slice()
    }

    /// Draws `entity` with `model`.
    ///
    /// A missing model is logged and draws nothing. An out-of-range frame
    /// or old frame draws frame 0 for both.
    ///
    /// # Errors
    ///
    /// Rejects the whole draw, before submitting anything, on a malformed
    /// command stream or when the model does not fit the working buffer.
    pub fn draw(
        &mut self,
        model: Option<&AliasModel>,
        entity: &RenderEntity,
        sampler: Option<&dyn LightSampler>,
        scene: &SceneLighting,
        sink: &mut dyn MeshSink,
    ) -> RenderResult<DrawStats> {
        let Some(model) = model else {
            tracing::warn!("alias model is not loaded, skipping draw");
            return Ok(DrawStats::default());
        };

        let settings = self.config.snapshot();
        let config = &settings.config;

        let (frame, old_frame) = clamp_frames(model, entity.frame, entity.old_frame);
        let (Some(current), Some(previous)) = (model.frame(frame), model.frame(old_frame)) else {
            tracing::warn!("{}: model has no frames, skipping draw", model.name());
            return Ok(DrawStats::default());
        };

        let backlerp = if config.lerp_models {
            entity.backlerp
        } else {
            0.0
        };
        let shade = resolve_shade_light(entity, sampler, scene, config.overbright_bits);
        let shadows = config.shadows && entity.casts_shadow();

        let commands = model.commands();
        let vertex_count = model.vertex_count();
        for (i, submesh) in model.submeshes().iter().enumerate() {
            if shadows || !entity.is_submesh_hidden(i) {
                commands.validate(submesh.range(), vertex_count)?;
            }
        }

        let interpolator = FrameInterpolator::new(entity, current, previous, backlerp);
        interpolator.interpolate(
            current,
            previous,
            shade.mode == DrawMode::ColorOnly,
            &mut self.working,
        )?;

        let ctx = DrawContext {
            positions: self.working.as_slice(),
            normals: &current.vertices,
            shade: &shade,
            tables: &settings.tables,
            alpha: entity.alpha_byte(),
            tessellator: &settings.tessellator,
        };

        let mut stats = DrawStats::default();
        for (i, submesh) in model.submeshes().iter().enumerate() {
            if entity.is_submesh_hidden(i) {
                continue;
            }
            stats += self
                .interpreter
                .interpret(commands, submesh.range(), &ctx, sink)?;
        }

        if shadows {
            let projector = ShadowProjector::for_entity(entity.origin, shade.spot, shade.shade_vector);
            for submesh in model.submeshes() {
                stats += projector.draw(commands, submesh.range(), ctx.positions, sink)?;
            }
        }

        sink.flush();
        stats.light_level = shade.light_level;
        stats.skin = Some(entity.select_skin(model.skin_count()));

        tracing::trace!(
            "{}: {} batches, {} vertices, {} tessellated triangles",
            model.name(),
            stats.batches,
            stats.vertices,
            stats.triangles_tessellated
        );
        Ok(stats)
    }
}

/// Either index out of range resets both to frame 0.
fn clamp_frames(model: &AliasModel, frame: i32, old_frame: i32) -> (usize, usize) {
    let valid = |f: i32| usize::try_from(f).ok().filter(|&i| i < model.frame_count());
    match (valid(frame), valid(old_frame)) {
        (Some(frame), Some(old_frame)) => (frame, old_frame),
        _ => {
            tracing::debug!(
                "{}: no such frame {} / old frame {}, using frame 0",
                model.name(),
                frame,
                old_frame
            );
            (0, 0)
        }
    }
}
