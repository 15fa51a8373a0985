//! Precompiled draw-command stream.
//!
//! ```text
//! Command stream (32-bit words):
//! ├── count         (i32: < 0 fan of |count|, > 0 strip of count, 0 end)
//! ├── record × |count|
//! │   ├── u         (f32 bits)
//! │   ├── v         (f32 bits)
//! │   └── index     (i32, into the working vertex buffer)
//! ├── count ...
//! └── 0
//! ```
//!
//! A reader stops on a zero count or when the range is exhausted. Records
//! are never trusted: [`CommandStream::validate`] checks every index before
//! the draw submits anything.

use std::ops::Range;

use tessera_shared::Vec2;

use crate::error::{RenderError, RenderResult};

/// Words per vertex record.
pub const WORDS_PER_RECORD: usize = 3;

/// Primitive topology of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunTopology {
    /// Triangle fan around the first record.
    Fan,
    /// Triangle strip.
    Strip,
}

/// One decoded vertex record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandVertex {
    /// Texture coordinate.
    pub tex_coord: Vec2,
    /// Index into the working vertex buffer. Signed as stored.
    pub index: i32,
}

impl CommandVertex {
    /// Creates a record.
    #[must_use]
    pub const fn new(u: f32, v: f32, index: i32) -> Self {
        Self {
            tex_coord: Vec2::new(u, v),
            index,
        }
    }
}

/// A contiguous run of vertex records sharing one topology.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveRun<'a> {
    /// Fan or strip.
    pub topology: RunTopology,
    /// Word offset of the count that opened this run.
    offset: usize,
    /// Raw record words, `len() * 3` of them.
    records: &'a [i32],
}

impl<'a> PrimitiveRun<'a> {
    /// Number of vertex records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len() / WORDS_PER_RECORD
    }

    /// True when the run holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Word offset of the run's count in the stream.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Word offset of record `i`.
    #[inline]
    #[must_use]
    pub fn record_offset(&self, i: usize) -> usize {
        self.offset + 1 + i * WORDS_PER_RECORD
    }

    /// Record `i`, if present.
    #[inline]
    #[must_use]
    pub fn vertex(&self, i: usize) -> Option<CommandVertex> {
        let base = i * WORDS_PER_RECORD;
        let words = self.records.get(base..base + WORDS_PER_RECORD)?;
        Some(CommandVertex {
            tex_coord: Vec2::new(
                f32::from_bits(words[0] as u32),
                f32::from_bits(words[1] as u32),
            ),
            index: words[2],
        })
    }

    /// Iterates over every record.
    pub fn vertices(&self) -> impl Iterator<Item = CommandVertex> + 'a {
        let run = *self;
        (0..run.len()).filter_map(move |i| run.vertex(i))
    }
}

/// Iterator over the primitive runs of a word range.
#[derive(Debug, Clone)]
pub struct RunReader<'a> {
    words: &'a [i32],
    pos: usize,
    end: usize,
}

impl<'a> Iterator for RunReader<'a> {
    type Item = RenderResult<PrimitiveRun<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }

        let offset = self.pos;
        let count = self.words[offset];
        let body = offset + 1;

        if count == 0 || body >= self.end {
            self.pos = self.end;
            return None;
        }

        let topology = if count < 0 {
            RunTopology::Fan
        } else {
            RunTopology::Strip
        };
        let declared = count.unsigned_abs() as usize * WORDS_PER_RECORD;
        let available = self.end - body;

        if declared > available {
            self.pos = self.end;
            return Some(Err(RenderError::CommandOverrun {
                offset,
                declared,
                available,
            }));
        }

        self.pos = body + declared;
        Some(Ok(PrimitiveRun {
            topology,
            offset,
            records: &self.words[body..body + declared],
        }))
    }
}

/// The shared command stream of a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandStream {
    words: Vec<i32>,
}

impl CommandStream {
    /// Wraps raw command words.
    #[must_use]
    pub fn new(words: Vec<i32>) -> Self {
        Self { words }
    }

    /// Starts building a stream run by run.
    #[must_use]
    pub fn builder() -> CommandStreamBuilder {
        CommandStreamBuilder::default()
    }

    /// Length in words.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the stream holds no words.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Clamps a word range to the stream.
    #[must_use]
    pub fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let end = range.end.min(self.words.len());
        range.start.min(end)..end
    }

    /// Reads the runs of `range` (clamped to the stream).
    #[must_use]
    pub fn runs(&self, range: Range<usize>) -> RunReader<'_> {
        let range = self.clamp_range(range);
        RunReader {
            words: &self.words,
            pos: range.start,
            end: range.end,
        }
    }

    /// Checks every run and vertex index of `range`.
    ///
    /// Returns the number of runs.
    ///
    /// # Errors
    ///
    /// - [`RenderError::CommandOverrun`] if a run is truncated
    /// - [`RenderError::VertexIndexOutOfRange`] if any index is negative or
    ///   `>= vertex_count`
    pub fn validate(&self, range: Range<usize>, vertex_count: usize) -> RenderResult<usize> {
        let mut runs = 0;
        for run in self.runs(range) {
            let run = run?;
            for (i, vertex) in run.vertices().enumerate() {
                let in_range = usize::try_from(vertex.index).is_ok_and(|idx| idx < vertex_count);
                if !in_range {
                    return Err(RenderError::VertexIndexOutOfRange {
                        index: i64::from(vertex.index),
                        offset: run.record_offset(i),
                        vertex_count,
                    });
                }
            }
            runs += 1;
        }
        Ok(runs)
    }
}

/// Builds a command stream run by run.
#[derive(Debug, Clone, Default)]
pub struct CommandStreamBuilder {
    words: Vec<i32>,
}

impl CommandStreamBuilder {
    fn push_run(mut self, count: i32, vertices: &[CommandVertex]) -> Self {
        self.words.push(count);
        for v in vertices {
            self.words.push(v.tex_coord.x.to_bits() as i32);
            self.words.push(v.tex_coord.y.to_bits() as i32);
            self.words.push(v.index);
        }
        self
    }

    /// Appends a fan run.
    #[must_use]
    pub fn fan(self, vertices: &[CommandVertex]) -> Self {
        let count = i32::try_from(vertices.len()).unwrap_or(i32::MAX);
        self.push_run(-count, vertices)
    }

    /// Appends a strip run.
    #[must_use]
    pub fn strip(self, vertices: &[CommandVertex]) -> Self {
        let count = i32::try_from(vertices.len()).unwrap_or(i32::MAX);
        self.push_run(count, vertices)
    }

    /// Current length in words; the offset the next run will start at.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Appends a terminating zero and finishes the stream.
    #[must_use]
    pub fn finish(mut self) -> CommandStream {
        self.words.push(0);
        CommandStream::new(self.words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: i32, b: i32, c: i32) -> [CommandVertex; 3] {
        [
            CommandVertex::new(0.0, 0.0, a),
            CommandVertex::new(1.0, 0.0, b),
            CommandVertex::new(0.0, 1.0, c),
        ]
    }

    #[test]
    fn test_reads_fan_and_strip() {
        let stream = CommandStream::builder()
            .fan(&tri(0, 1, 2))
            .strip(&tri(2, 1, 3))
            .finish();

        let runs: Vec<_> = stream.runs(0..stream.len()).collect::<Result<_, _>>().unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].topology, RunTopology::Fan);
        assert_eq!(runs[1].topology, RunTopology::Strip);
        assert_eq!(runs[1].vertex(2).unwrap().index, 3);
        assert_eq!(runs[0].vertex(1).unwrap().tex_coord, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_zero_count_terminates() {
        let stream = CommandStream::new(vec![0, -3, 0, 0, 0]);
        assert_eq!(stream.runs(0..stream.len()).count(), 0);
    }

    #[test]
    fn test_truncated_run_is_an_error() {
        // Declares a 3-vertex fan but only holds one record.
        let stream = CommandStream::new(vec![-3, 0, 0, 0]);
        let first = stream.runs(0..stream.len()).next().unwrap();
        assert!(matches!(first, Err(RenderError::CommandOverrun { offset: 0, .. })));
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let stream = CommandStream::builder().fan(&tri(0, 1, 7)).finish();
        let err = stream.validate(0..stream.len(), 3).unwrap_err();
        assert_eq!(
            err,
            RenderError::VertexIndexOutOfRange {
                index: 7,
                offset: 7,
                vertex_count: 3
            }
        );

        let negative = CommandStream::builder().fan(&tri(0, -1, 2)).finish();
        assert!(negative.validate(0..negative.len(), 3).is_err());
    }

    #[test]
    fn test_validate_counts_runs() {
        let stream = CommandStream::builder()
            .fan(&tri(0, 1, 2))
            .fan(&tri(0, 2, 1))
            .finish();
        assert_eq!(stream.validate(0..stream.len(), 3).unwrap(), 2);
    }

    #[test]
    fn test_range_is_clamped() {
        let stream = CommandStream::builder().fan(&tri(0, 1, 2)).finish();
        assert_eq!(stream.clamp_range(5..1000), 5..stream.len());
        assert_eq!(stream.clamp_range(1000..2000), stream.len()..stream.len());
        assert_eq!(stream.runs(0..1000).count(), 1);
    }
}
