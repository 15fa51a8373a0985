//! Output side of the draw path.
//!
//! The renderer never rasterizes. It streams batches into a [`MeshSink`]:
//! `begin_batch`, then per vertex `submit_vertex`, `submit_color`,
//! `submit_tex_coord` (each optional after the position), then indices for
//! triangle lists, then `flush` once per draw.

use tessera_shared::{Vec2, Vec3};

/// Primitive topology of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Fan around the first vertex.
    Fan,
    /// Triangle strip.
    Strip,
    /// Independent triangles, three indices each.
    TriangleList,
}

/// Receiver of draw output.
///
/// For fans and strips `count` is the vertex count; for triangle lists it
/// is the index count. Indices are relative to the batch's first vertex.
pub trait MeshSink {
    /// Opens a new batch.
    fn begin_batch(&mut self, topology: Topology, count: usize);

    /// Appends a vertex position.
    fn submit_vertex(&mut self, position: Vec3);

    /// Sets the color of the last vertex.
    fn submit_color(&mut self, r: u8, g: u8, b: u8, a: u8);

    /// Sets the texture coordinate of the last vertex.
    fn submit_tex_coord(&mut self, tex_coord: Vec2);

    /// Appends a triangle-list index.
    fn submit_index(&mut self, index: u32);

    /// Ends the draw.
    fn flush(&mut self);
}

/// One recorded batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Topology.
    pub topology: Topology,
    /// Count passed to `begin_batch`.
    pub count: usize,
    /// Positions.
    pub positions: Vec<Vec3>,
    /// RGBA colors, one per colored vertex.
    pub colors: Vec<[u8; 4]>,
    /// Texture coordinates, one per textured vertex.
    pub tex_coords: Vec<Vec2>,
    /// Triangle-list indices.
    pub indices: Vec<u32>,
}

impl Batch {
    fn new(topology: Topology, count: usize) -> Self {
        Self {
            topology,
            count,
            positions: Vec::with_capacity(count),
            colors: Vec::new(),
            tex_coords: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Triangles described by the batch.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            Topology::Fan | Topology::Strip => self.positions.len().saturating_sub(2),
            Topology::TriangleList => self.indices.len() / 3,
        }
    }
}

/// A sink that keeps everything it is given.
///
/// Used by tests and benches, and by consumers that want the draw output
/// on the CPU.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Completed and in-progress batches, in submission order.
    pub batches: Vec<Batch>,
    /// Number of `flush` calls.
    pub flushes: usize,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all recorded output.
    pub fn clear(&mut self) {
        self.batches.clear();
        self.flushes = 0;
    }

    /// Total vertices over all batches.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.positions.len()).sum()
    }

    /// Every recorded position, in order.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.batches.iter().flat_map(|b| b.positions.iter().copied())
    }

    fn current(&mut self) -> Option<&mut Batch> {
        let batch = self.batches.last_mut();
        if batch.is_none() {
            tracing::warn!("sink received data outside a batch");
        }
        batch
    }
}

impl MeshSink for RecordingSink {
    fn begin_batch(&mut self, topology: Topology, count: usize) {
        self.batches.push(Batch::new(topology, count));
    }

    fn submit_vertex(&mut self, position: Vec3) {
        if let Some(batch) = self.current() {
            batch.positions.push(position);
        }
    }

    fn submit_color(&mut self, r: u8, g: u8, b: u8, a: u8) {
        if let Some(batch) = self.current() {
            batch.colors.push([r, g, b, a]);
        }
    }

    fn submit_tex_coord(&mut self, tex_coord: Vec2) {
        if let Some(batch) = self.current() {
            batch.tex_coords.push(tex_coord);
        }
    }

    fn submit_index(&mut self, index: u32) {
        if let Some(batch) = self.current() {
            batch.indices.push(index);
        }
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_batches() {
        let mut sink = RecordingSink::new();
        sink.begin_batch(Topology::Fan, 3);
        for i in 0..3 {
            sink.submit_vertex(Vec3::new(i as f32, 0.0, 0.0));
            sink.submit_color(1, 2, 3, 255);
        }
        sink.begin_batch(Topology::TriangleList, 3);
        for i in 0..3 {
            sink.submit_vertex(Vec3::ZERO);
            sink.submit_tex_coord(Vec2::ZERO);
            sink.submit_index(i);
        }
        sink.flush();

        assert_eq!(sink.batches.len(), 2);
        assert_eq!(sink.vertex_count(), 6);
        assert_eq!(sink.batches[0].colors.len(), 3);
        assert_eq!(sink.batches[0].triangle_count(), 1);
        assert_eq!(sink.batches[1].indices, vec![0, 1, 2]);
        assert_eq!(sink.batches[1].triangle_count(), 1);
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn test_ignores_data_outside_batch() {
        let mut sink = RecordingSink::new();
        sink.submit_vertex(Vec3::ONE);
        assert_eq!(sink.vertex_count(), 0);
    }
}
