//! # Keyframe Models
//!
//! In-memory form of an animated mesh: keyframes, the shared draw-command
//! stream and the submesh table slicing it. Parsing the on-disk format is
//! the loader's job; this module only guarantees that every offset and
//! count it hands out stays inside the model.

mod commands;
mod frame;

use std::ops::Range;

pub use commands::{
    CommandStream, CommandStreamBuilder, CommandVertex, PrimitiveRun, RunReader, RunTopology,
    WORDS_PER_RECORD,
};
pub use frame::{CompressedVertex, Keyframe};

use crate::error::ModelError;

/// A slice of the shared command stream belonging to one submesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submesh {
    /// First word.
    pub offset: usize,
    /// Length in words.
    pub len: usize,
}

impl Submesh {
    /// Creates a submesh descriptor.
    #[must_use]
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Word range (may need clamping against the stream).
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset.saturating_add(self.len)
    }
}

/// Counts describing a model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelHeader {
    /// Keyframes.
    pub num_frames: usize,
    /// Vertices per keyframe.
    pub num_vertices: usize,
    /// Source triangles (statistics only).
    pub num_triangles: usize,
    /// Submeshes.
    pub num_submeshes: usize,
    /// Skins.
    pub num_skins: usize,
    /// Command stream length in words.
    pub num_commands: usize,
}

/// An animated keyframe mesh.
#[derive(Debug, Clone)]
pub struct AliasModel {
    name: String,
    frames: Vec<Keyframe>,
    commands: CommandStream,
    submeshes: Vec<Submesh>,
    num_triangles: usize,
    num_skins: usize,
}

impl AliasModel {
    /// Assembles a model.
    ///
    /// Submesh ranges running past the command stream are clamped with a
    /// diagnostic. An empty submesh table means one submesh covering the
    /// whole stream.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if there are no keyframes or they disagree
    /// on vertex count.
    pub fn new(
        name: impl Into<String>,
        frames: Vec<Keyframe>,
        commands: CommandStream,
        submeshes: Vec<Submesh>,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        let expected = frames.first().ok_or(ModelError::NoFrames)?.vertex_count();

        if let Some((frame, found)) = frames
            .iter()
            .map(Keyframe::vertex_count)
            .enumerate()
            .find(|&(_, count)| count != expected)
        {
            return Err(ModelError::FrameVertexCount {
                frame,
                found,
                expected,
            });
        }

        let submeshes = if submeshes.is_empty() {
            vec![Submesh::new(0, commands.len())]
        } else {
            submeshes
                .into_iter()
                .enumerate()
                .map(|(i, mesh)| {
                    let clamped = commands.clamp_range(mesh.range());
                    if clamped != mesh.range() {
                        tracing::warn!(
                            "{}: submesh {} range {:?} clamped to {:?}",
                            name,
                            i,
                            mesh.range(),
                            clamped
                        );
                    }
                    Submesh::new(clamped.start, clamped.len())
                })
                .collect()
        };

        Ok(Self {
            name,
            frames,
            commands,
            submeshes,
            num_triangles: 0,
            num_skins: 0,
        })
    }

    /// Sets the source triangle count.
    #[must_use]
    pub fn with_triangle_count(mut self, num_triangles: usize) -> Self {
        self.num_triangles = num_triangles;
        self
    }

    /// Sets the skin count.
    #[must_use]
    pub fn with_skin_count(mut self, num_skins: usize) -> Self {
        self.num_skins = num_skins;
        self
    }

    /// Model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Counts.
    #[must_use]
    pub fn header(&self) -> ModelHeader {
        ModelHeader {
            num_frames: self.frames.len(),
            num_vertices: self.vertex_count(),
            num_triangles: self.num_triangles,
            num_submeshes: self.submeshes.len(),
            num_skins: self.num_skins,
            num_commands: self.commands.len(),
        }
    }

    /// Vertices per keyframe.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.frames.first().map_or(0, Keyframe::vertex_count)
    }

    /// Number of keyframes.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Keyframe `index`, if it exists.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&Keyframe> {
        self.frames.get(index)
    }

    /// All keyframes.
    #[must_use]
    pub fn frames(&self) -> &[Keyframe] {
        &self.frames
    }

    /// The shared command stream.
    #[must_use]
    pub fn commands(&self) -> &CommandStream {
        &self.commands
    }

    /// Submesh table (ranges already clamped).
    #[must_use]
    pub fn submeshes(&self) -> &[Submesh] {
        &self.submeshes
    }

    /// Number of skins.
    #[must_use]
    pub fn skin_count(&self) -> usize {
        self.num_skins
    }
}
