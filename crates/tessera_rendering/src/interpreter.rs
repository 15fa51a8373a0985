//! # Command Interpreter
//!
//! Walks the primitive runs of a command range and streams them into a
//! [`MeshSink`].
//!
//! ```text
//! run ─┬─ ColorOnly ─────────────────────► Fan batch, flat color
//!      └─ Lit ─┬─ tessellation off ──────► native Fan/Strip batch, lit
//!              └─ tessellation on  ─► per triangle: PN samples
//!                                     ─► TriangleList batch, lit
//! ```
//!
//! Run triangles are `(0, i-1, i)` for fans. Strips alternate winding:
//! `(i-2, i-1, i)` for even `i` and `(i-1, i-2, i)` for odd `i`.
//!
//! Callers validate the range ([`CommandStream::validate`]) before
//! interpreting it so that a bad index rejects the draw before anything
//! reaches the sink. Lookups are still checked here.
//!
//! [`CommandStream::validate`]: crate::model::CommandStream::validate

use std::ops::Range;

use tessera_shared::{Vec2, Vec3};

use crate::error::{RenderError, RenderResult};
use crate::model::{
    CommandStream, CommandVertex, CompressedVertex, PrimitiveRun, RunTopology, WORDS_PER_RECORD,
};
use crate::shading::{DrawMode, LightTables, ShadeLight};
use crate::sink::{MeshSink, Topology};
use crate::stats::DrawStats;
use crate::tessellation::{PatchTriangle, TessellationScratch, Tessellator};

/// Inputs shared by every run of one draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    /// Interpolated positions, indexed by command records.
    pub positions: &'a [Vec3],
    /// Current keyframe vertices, for normals.
    pub normals: &'a [CompressedVertex],
    /// Base light, shading direction and path.
    pub shade: &'a ShadeLight,
    /// Color remapping.
    pub tables: &'a LightTables,
    /// Alpha byte for every vertex.
    pub alpha: u8,
    /// Tessellation settings for this draw.
    pub tessellator: &'a Tessellator,
}

impl DrawContext<'_> {
    fn lookup(&self, vertex: CommandVertex, offset: usize) -> RenderResult<(Vec3, Vec3)> {
        usize::try_from(vertex.index)
            .ok()
            .and_then(|i| Some((*self.positions.get(i)?, self.normals.get(i)?.decode_normal())))
            .ok_or(RenderError::VertexIndexOutOfRange {
                index: i64::from(vertex.index),
                offset,
                vertex_count: self.positions.len().min(self.normals.len()),
            })
    }

    fn submit_lit(&self, sink: &mut dyn MeshSink, position: Vec3, normal: Vec3, tex: Vec2) {
        let [r, g, b] = self.shade.lit_rgb(normal, self.tables);
        sink.submit_vertex(position);
        sink.submit_color(r, g, b, self.alpha);
        sink.submit_tex_coord(tex);
    }
}

/// Run-local vertex picks for triangle `i` (`2 <= i < len`).
#[inline]
fn run_triangle(topology: RunTopology, i: usize) -> [usize; 3] {
    match topology {
        RunTopology::Fan => [0, i - 1, i],
        RunTopology::Strip if i % 2 == 0 => [i - 2, i - 1, i],
        RunTopology::Strip => [i - 1, i - 2, i],
    }
}

/// Interprets command ranges. Owns the tessellation scratch so repeated
/// draws never allocate.
#[derive(Debug, Clone, Default)]
pub struct CommandInterpreter {
    scratch: TessellationScratch,
}

impl CommandInterpreter {
    /// Creates an interpreter with the engine-wide scratch capacities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an interpreter with explicit scratch storage.
    #[must_use]
    pub fn with_scratch(scratch: TessellationScratch) -> Self {
        Self { scratch }
    }

    /// Interprets the runs of `range`.
    ///
    /// # Errors
    ///
    /// - [`RenderError::CommandOverrun`] for a truncated run
    /// - [`RenderError::VertexIndexOutOfRange`] for a bad record
    /// - [`RenderError::Scratch`] if a single triangle cannot fit the
    ///   tessellation scratch
    pub fn interpret(
        &mut self,
        commands: &CommandStream,
        range: Range<usize>,
        ctx: &DrawContext<'_>,
        sink: &mut dyn MeshSink,
    ) -> RenderResult<DrawStats> {
        let mut stats = DrawStats::default();

        for run in commands.runs(range) {
            let run = run?;
            match ctx.shade.mode {
                DrawMode::ColorOnly => Self::color_only_run(&run, ctx, sink, &mut stats)?,
                DrawMode::Lit if run.len() < 3 => {
                    tracing::trace!(
                        "skipping {}-vertex run at word {}",
                        run.len(),
                        run.offset()
                    );
                    stats.runs_skipped += 1;
                }
                DrawMode::Lit if ctx.tessellator.is_enabled() => {
                    self.tessellated_run(&run, ctx, sink, &mut stats)?;
                }
                DrawMode::Lit => Self::lit_run(&run, ctx, sink, &mut stats)?,
            }
        }

        Ok(stats)
    }

    fn color_only_run(
        run: &PrimitiveRun<'_>,
        ctx: &DrawContext<'_>,
        sink: &mut dyn MeshSink,
        stats: &mut DrawStats,
    ) -> RenderResult<()> {
        let [r, g, b] = ctx.shade.flat_rgb(ctx.tables);

        sink.begin_batch(Topology::Fan, run.len());
        for (i, vertex) in run.vertices().enumerate() {
            let position = usize::try_from(vertex.index)
                .ok()
                .and_then(|idx| ctx.positions.get(idx))
                .ok_or(RenderError::VertexIndexOutOfRange {
                    index: i64::from(vertex.index),
                    offset: run.record_offset(i),
                    vertex_count: ctx.positions.len(),
                })?;
            sink.submit_vertex(*position);
            sink.submit_color(r, g, b, ctx.alpha);
        }

        stats.batches += 1;
        stats.vertices += run.len() as u32;
        Ok(())
    }

    fn lit_run(
        run: &PrimitiveRun<'_>,
        ctx: &DrawContext<'_>,
        sink: &mut dyn MeshSink,
        stats: &mut DrawStats,
    ) -> RenderResult<()> {
        let topology = match run.topology {
            RunTopology::Fan => Topology::Fan,
            RunTopology::Strip => Topology::Strip,
        };

        sink.begin_batch(topology, run.len());
        for (i, vertex) in run.vertices().enumerate() {
            let (position, normal) = ctx.lookup(vertex, run.record_offset(i))?;
            ctx.submit_lit(sink, position, normal, vertex.tex_coord);
        }

        stats.batches += 1;
        stats.vertices += run.len() as u32;
        Ok(())
    }

    fn tessellated_run(
        &mut self,
        run: &PrimitiveRun<'_>,
        ctx: &DrawContext<'_>,
        sink: &mut dyn MeshSink,
        stats: &mut DrawStats,
    ) -> RenderResult<()> {
        let tess = ctx.tessellator;
        let (per_vertices, per_indices) = (tess.samples_per_triangle(), tess.indices_per_triangle());
        self.scratch.clear();

        for i in 2..run.len() {
            let picks = run_triangle(run.topology, i);
            let mut triangle = PatchTriangle {
                positions: [Vec3::ZERO; 3],
                normals: [Vec3::ZERO; 3],
            };
            let mut tex = [Vec2::ZERO; 3];

            for (slot, &k) in picks.iter().enumerate() {
                let vertex = run.vertex(k).ok_or(RenderError::CommandOverrun {
                    offset: run.offset(),
                    declared: (k + 1) * WORDS_PER_RECORD,
                    available: run.len() * WORDS_PER_RECORD,
                })?;
                let (position, normal) = ctx.lookup(vertex, run.record_offset(k))?;
                triangle.positions[slot] = position;
                triangle.normals[slot] = normal;
                tex[slot] = vertex.tex_coord;
            }

            if !self.scratch.is_empty() && !self.scratch.fits(per_vertices, per_indices) {
                tracing::debug!(
                    "tessellation scratch full at word {}, splitting batch",
                    run.offset()
                );
                self.submit_scratch(ctx, sink, stats);
                self.scratch.clear();
                stats.scratch_flushes += 1;
            }

            let base = self.scratch.vertex_count() as u32;
            let count = tess.tessellate(&triangle, &mut self.scratch)?;
            tess.triangulate(base, count, &mut self.scratch.indices)?;

            // Every sample shares the triangle's mean texcoord.
            let mean = Vec2::new(
                (tex[0].x + tex[1].x + tex[2].x) / 3.0,
                (tex[0].y + tex[1].y + tex[2].y) / 3.0,
            );
            for _ in 0..count {
                self.scratch.tex_coords.push(mean)?;
            }
            stats.triangles_tessellated += 1;
        }

        self.submit_scratch(ctx, sink, stats);
        self.scratch.clear();
        Ok(())
    }

    fn submit_scratch(&self, ctx: &DrawContext<'_>, sink: &mut dyn MeshSink, stats: &mut DrawStats) {
        let scratch = &self.scratch;
        if scratch.indices.is_empty() {
            if !scratch.is_empty() {
                tracing::trace!("dropping {} unindexed samples", scratch.vertex_count());
                stats.runs_skipped += 1;
            }
            return;
        }

        sink.begin_batch(Topology::TriangleList, scratch.indices.len());
        let samples = scratch
            .positions
            .as_slice()
            .iter()
            .zip(scratch.normals.as_slice())
            .zip(scratch.tex_coords.as_slice());
        for ((&position, &normal), &tex) in samples {
            ctx.submit_lit(sink, position, normal, tex);
        }
        for &index in scratch.indices.as_slice() {
            sink.submit_index(index);
        }

        stats.batches += 1;
        stats.vertices += scratch.vertex_count() as u32;
        stats.indices += scratch.indices.len() as u32;
    }
}
