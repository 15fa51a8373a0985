//! Planar ground shadow.
//!
//! Replays the command runs without tessellation or lighting, sliding each
//! interpolated vertex along the shade direction onto a flat plane:
//!
//! ```text
//! x' = x - dir.x * (z + light_height)
//! y' = y - dir.y * (z + light_height)
//! z' = height
//! ```

use std::ops::Range;

use tessera_shared::{Vec3, SHADOW_LIFT};

use crate::error::{RenderError, RenderResult};
use crate::model::{CommandStream, RunTopology};
use crate::sink::{MeshSink, Topology};
use crate::stats::DrawStats;

/// Projects interpolated vertices onto the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowProjector {
    direction: Vec3,
    light_height: f32,
    height: f32,
}

impl ShadowProjector {
    /// Creates a projector for `direction` and an entity-relative light
    /// height. The plane sits just above `-light_height`.
    #[must_use]
    pub fn new(direction: Vec3, light_height: f32) -> Self {
        Self {
            direction,
            light_height,
            height: -light_height + SHADOW_LIFT,
        }
    }

    /// Projector for an entity at `origin` standing over `spot`.
    #[must_use]
    pub fn for_entity(origin: Vec3, spot: Vec3, direction: Vec3) -> Self {
        Self::new(direction, origin.z - spot.z)
    }

    /// Z of every projected vertex.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Projects one point.
    #[inline]
    #[must_use]
    pub fn project(&self, point: Vec3) -> Vec3 {
        let reach = point.z + self.light_height;
        Vec3::new(
            point.x - self.direction.x * reach,
            point.y - self.direction.y * reach,
            self.height,
        )
    }

    /// Submits the projected runs of `range` as position-only batches.
    ///
    /// # Errors
    ///
    /// - [`RenderError::CommandOverrun`] for a truncated run
    /// - [`RenderError::VertexIndexOutOfRange`] for a bad record
    pub fn draw(
        &self,
        commands: &CommandStream,
        range: Range<usize>,
        positions: &[Vec3],
        sink: &mut dyn MeshSink,
    ) -> RenderResult<DrawStats> {
        let mut stats = DrawStats::default();

        for run in commands.runs(range) {
            let run = run?;
            let topology = match run.topology {
                RunTopology::Fan => Topology::Fan,
                RunTopology::Strip => Topology::Strip,
            };

            sink.begin_batch(topology, run.len());
            for (i, vertex) in run.vertices().enumerate() {
                let point = usize::try_from(vertex.index)
                    .ok()
                    .and_then(|idx| positions.get(idx))
                    .ok_or(RenderError::VertexIndexOutOfRange {
                        index: i64::from(vertex.index),
                        offset: run.record_offset(i),
                        vertex_count: positions.len(),
                    })?;
                sink.submit_vertex(self.project(*point));
            }

            stats.batches += 1;
            stats.vertices += run.len() as u32;
            stats.shadow_vertices += run.len() as u32;
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CommandVertex;
    use crate::sink::RecordingSink;

    #[test]
    fn test_projection() {
        let projector = ShadowProjector::for_entity(
            Vec3::new(0.0, 0.0, 24.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.5, 0.25, 0.8),
        );
        assert!((projector.height() - (-23.9)).abs() < 1e-5);

        let p = projector.project(Vec3::new(1.0, 2.0, 6.0));
        assert_eq!(p, Vec3::new(1.0 - 15.0, 2.0 - 7.5, projector.height()));
    }

    #[test]
    fn test_draw_flattens_every_vertex() {
        let commands = CommandStream::builder()
            .strip(&[
                CommandVertex::new(0.0, 0.0, 0),
                CommandVertex::new(0.0, 0.0, 1),
                CommandVertex::new(0.0, 0.0, 2),
            ])
            .fan(&[
                CommandVertex::new(0.0, 0.0, 2),
                CommandVertex::new(0.0, 0.0, 1),
                CommandVertex::new(0.0, 0.0, 0),
            ])
            .finish();
        let positions = [
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(5.0, 0.0, -3.0),
            Vec3::new(0.0, 5.0, 40.0),
        ];
        let projector = ShadowProjector::new(Vec3::new(0.3, 0.3, 0.9), 16.0);
        let mut sink = RecordingSink::new();

        let stats = projector
            .draw(&commands, 0..commands.len(), &positions, &mut sink)
            .unwrap();

        assert_eq!(stats.shadow_vertices, 6);
        assert_eq!(sink.batches[0].topology, Topology::Strip);
        assert_eq!(sink.batches[1].topology, Topology::Fan);
        assert!(sink.positions().all(|p| p.z == projector.height()));
        assert!(sink.batches.iter().all(|b| b.colors.is_empty() && b.tex_coords.is_empty()));
    }
}
