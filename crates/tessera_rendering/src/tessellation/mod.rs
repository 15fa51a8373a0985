//! # PN-Triangle Tessellation
//!
//! Subdivides one triangle of a primitive run into a lattice of samples on
//! its PN patch, giving curved silhouettes without extra source geometry.
//!
//! ## Algorithm
//!
//! 1. Build the [`PnPatch`] from the triangle corners and vertex normals
//! 2. Sample `u = i / L`, `v = j / L` for `i in 0..=L`, `j in 0..=L - i`
//! 3. Estimate each sample normal by forward differences on the patch
//! 4. Emit indices under the configured [`TriangulationPolicy`]
//!
//! Level `L` yields `(L + 1)(L + 2) / 2` samples. Output goes into a
//! fixed-capacity [`TessellationScratch`]; the configured level is checked
//! against that capacity when the configuration is applied.

mod patch;

pub use patch::PnPatch;

use serde::{Deserialize, Serialize};
use tessera_core::{CapacityError, ScratchBuffer};
use tessera_shared::{Vec2, Vec3, SCRATCH_INDEX_CAPACITY, SCRATCH_VERTEX_CAPACITY};

/// How the sample lattice of one triangle is turned into indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangulationPolicy {
    /// Fan from the first sample over the sample list: `(0, k + 1, k + 2)`.
    ///
    /// Reproduces the output of existing content. Only tiles the patch
    /// correctly at level 1; higher levels overlap and leave gaps.
    #[default]
    LegacyFan,
    /// Row-by-row triangulation of the lattice, `L²` triangles wound like
    /// the source triangle.
    LatticeStrip,
}

/// Samples produced per triangle at `level`. Saturates at `usize::MAX`.
#[must_use]
pub const fn sample_count(level: u32) -> usize {
    let l = level as usize;
    let (a, b) = (l.saturating_add(1), l.saturating_add(2));
    // One of two consecutive numbers is even; halve it before multiplying.
    if a % 2 == 0 {
        (a / 2).saturating_mul(b)
    } else {
        a.saturating_mul(b / 2)
    }
}

/// Indices produced per triangle at `level` under `policy`. Saturates at
/// `usize::MAX`.
#[must_use]
pub const fn index_count(level: u32, policy: TriangulationPolicy) -> usize {
    let l = level as usize;
    match policy {
        TriangulationPolicy::LegacyFan => sample_count(level).saturating_sub(2).saturating_mul(3),
        TriangulationPolicy::LatticeStrip => l.saturating_mul(l).saturating_mul(3),
    }
}

/// One triangle to tessellate: corners and their unit normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchTriangle {
    /// Corners `v0, v1, v2`.
    pub positions: [Vec3; 3],
    /// Normals `n0, n1, n2`.
    pub normals: [Vec3; 3],
}

/// Fixed-capacity output storage for tessellated geometry.
///
/// Holds the accumulated output of one or more triangles until the caller
/// submits and clears it.
#[derive(Debug, Clone)]
pub struct TessellationScratch {
    /// Sample positions.
    pub positions: ScratchBuffer<Vec3>,
    /// Sample normals.
    pub normals: ScratchBuffer<Vec3>,
    /// Sample texture coordinates.
    pub tex_coords: ScratchBuffer<Vec2>,
    /// Triangle-list indices, relative to the first stored sample.
    pub indices: ScratchBuffer<u32>,
}

impl TessellationScratch {
    /// Creates scratch storage with explicit capacities.
    #[must_use]
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: ScratchBuffer::new(vertices),
            normals: ScratchBuffer::new(vertices),
            tex_coords: ScratchBuffer::new(vertices),
            indices: ScratchBuffer::new(indices),
        }
    }

    /// Creates scratch storage with the engine-wide capacities.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(SCRATCH_VERTEX_CAPACITY, SCRATCH_INDEX_CAPACITY)
    }

    /// Number of stored samples.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// True when no samples are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// True when `vertices` more samples and `indices` more indices fit.
    #[must_use]
    pub fn fits(&self, vertices: usize, indices: usize) -> bool {
        self.positions.fits(vertices) && self.indices.fits(indices)
    }

    /// Clears everything. Memory is kept.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.tex_coords.clear();
        self.indices.clear();
    }
}

impl Default for TessellationScratch {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-triangle PN tessellator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tessellator {
    enabled: bool,
    level: u32,
    policy: TriangulationPolicy,
}

impl Tessellator {
    /// Creates a tessellator. Level 0 is accepted here and produces a
    /// single, non-drawable sample per triangle.
    #[must_use]
    pub const fn new(enabled: bool, level: u32, policy: TriangulationPolicy) -> Self {
        Self {
            enabled,
            level,
            policy,
        }
    }

    /// A tessellator that passes triangles through unchanged.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(false, 1, TriangulationPolicy::LegacyFan)
    }

    /// Whether subdivision is performed.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Configured subdivision level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Configured triangulation.
    #[must_use]
    pub const fn policy(&self) -> TriangulationPolicy {
        self.policy
    }

    /// Samples emitted per triangle.
    #[must_use]
    pub const fn samples_per_triangle(&self) -> usize {
        if self.enabled {
            sample_count(self.level)
        } else {
            3
        }
    }

    /// Indices emitted per triangle.
    #[must_use]
    pub const fn indices_per_triangle(&self) -> usize {
        if self.enabled {
            index_count(self.level, self.policy)
        } else {
            3
        }
    }

    /// Appends the samples of `triangle` to `out` (positions and normals).
    ///
    /// Returns the number of samples written. When disabled, the three
    /// corners and normals are copied unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the samples do not fit; `out` is left
    /// unchanged in that case.
    pub fn tessellate(
        &self,
        triangle: &PatchTriangle,
        out: &mut TessellationScratch,
    ) -> Result<usize, CapacityError> {
        let count = self.samples_per_triangle();
        if !out.positions.fits(count) || !out.normals.fits(count) {
            return Err(CapacityError {
                capacity: out.positions.capacity(),
                len: out.positions.len(),
                requested: count,
            });
        }

        if !self.enabled {
            out.positions.extend_from_slice(&triangle.positions)?;
            out.normals.extend_from_slice(&triangle.normals)?;
            return Ok(3);
        }

        let patch = PnPatch::new(triangle.positions, triangle.normals);
        // Level is at least 1 here unless the caller built a level-0
        // tessellator; that case degenerates to the single sample (0, 0).
        let step = if self.level == 0 {
            0.0
        } else {
            1.0 / self.level as f32
        };

        for i in 0..=self.level {
            let u = i as f32 * step;
            for j in 0..=(self.level - i) {
                let v = j as f32 * step;
                let point = patch.evaluate(u, v);
                out.positions.push(point)?;
                out.normals.push(patch.normal_at(u, v, point))?;
            }
        }

        Ok(count)
    }

    /// Appends the triangle-list indices for `count` samples starting at
    /// sample `base`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the indices do not fit; nothing is
    /// written in that case.
    pub fn triangulate(
        &self,
        base: u32,
        count: usize,
        indices: &mut ScratchBuffer<u32>,
    ) -> Result<(), CapacityError> {
        let lattice = self.enabled && self.policy == TriangulationPolicy::LatticeStrip;
        let needed = if lattice {
            index_count(self.level, self.policy)
        } else {
            count.saturating_sub(2) * 3
        };
        if !indices.fits(needed) {
            return Err(CapacityError {
                capacity: indices.capacity(),
                len: indices.len(),
                requested: needed,
            });
        }

        if lattice {
            lattice_indices(base, self.level, indices)
        } else {
            for k in 0..count.saturating_sub(2) as u32 {
                indices.extend_from_slice(&[base, base + k + 1, base + k + 2])?;
            }
            Ok(())
        }
    }
}

/// First sample index of lattice row `i` at `level`.
#[inline]
const fn row_start(i: u32, level: u32) -> u32 {
    i * (level + 1) - i * i.saturating_sub(1) / 2
}

fn lattice_indices(
    base: u32,
    level: u32,
    indices: &mut ScratchBuffer<u32>,
) -> Result<(), CapacityError> {
    for i in 0..level {
        let row = base + row_start(i, level);
        let next = base + row_start(i + 1, level);
        let width = level - i;
        for j in 0..width {
            // (i, j) (i+1, j) (i, j+1)
            indices.extend_from_slice(&[row + j, next + j, row + j + 1])?;
            if j + 1 < width {
                // (i+1, j) (i+1, j+1) (i, j+1)
                indices.extend_from_slice(&[next + j, next + j + 1, row + j + 1])?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> PatchTriangle {
        PatchTriangle {
            positions: [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(8.0, 0.0, 1.0),
                Vec3::new(0.0, 8.0, -1.0),
            ],
            normals: [
                Vec3::new(-0.2, -0.2, 1.0).normalize_or_zero(),
                Vec3::new(0.3, 0.0, 1.0).normalize_or_zero(),
                Vec3::new(0.0, 0.3, 1.0).normalize_or_zero(),
            ],
        }
    }

    #[test]
    fn test_sample_counts() {
        assert_eq!(sample_count(0), 1);
        assert_eq!(sample_count(1), 3);
        assert_eq!(sample_count(2), 6);
        assert_eq!(sample_count(4), 15);
        assert_eq!(index_count(2, TriangulationPolicy::LegacyFan), 12);
        assert_eq!(index_count(2, TriangulationPolicy::LatticeStrip), 12);
        assert_eq!(index_count(4, TriangulationPolicy::LatticeStrip), 48);
        assert_eq!(sample_count(21), 253);
        assert_eq!(index_count(21, TriangulationPolicy::LegacyFan), 753);
    }

    #[test]
    fn test_counts_saturate_on_huge_levels() {
        assert!(sample_count(u32::MAX) > SCRATCH_VERTEX_CAPACITY);
        for policy in [TriangulationPolicy::LegacyFan, TriangulationPolicy::LatticeStrip] {
            assert!(index_count(u32::MAX, policy) > SCRATCH_INDEX_CAPACITY);
            assert!(index_count(3_000_000_000, policy) > SCRATCH_INDEX_CAPACITY);
        }
    }

    #[test]
    fn test_disabled_passes_corners_through() {
        for level in [0, 1, 5, 9] {
            let tess = Tessellator::new(false, level, TriangulationPolicy::LatticeStrip);
            let mut out = TessellationScratch::new();
            let tri = triangle();

            assert_eq!(tess.tessellate(&tri, &mut out).unwrap(), 3);
            assert_eq!(out.positions.as_slice(), &tri.positions);
            assert_eq!(out.normals.as_slice(), &tri.normals);
        }
    }

    #[test]
    fn test_enabled_sample_count() {
        for level in 1..=8 {
            let tess = Tessellator::new(true, level, TriangulationPolicy::LegacyFan);
            let mut out = TessellationScratch::new();
            let count = tess.tessellate(&triangle(), &mut out).unwrap();
            assert_eq!(count, sample_count(level));
            assert_eq!(out.vertex_count(), count);
        }
    }

    #[test]
    fn test_level_zero_is_single_sample() {
        let tess = Tessellator::new(true, 0, TriangulationPolicy::LegacyFan);
        let mut out = TessellationScratch::new();
        assert_eq!(tess.tessellate(&triangle(), &mut out).unwrap(), 1);
        assert_eq!(out.positions.as_slice()[0], triangle().positions[0]);

        tess.triangulate(0, 1, &mut out.indices).unwrap();
        assert!(out.indices.is_empty());
    }

    #[test]
    fn test_corner_samples_match_input() {
        let tess = Tessellator::new(true, 3, TriangulationPolicy::LegacyFan);
        let mut out = TessellationScratch::new();
        tess.tessellate(&triangle(), &mut out).unwrap();
        let p = out.positions.as_slice();
        let tri = triangle();

        // (0,0) first, (0,1) ends row 0, (1,0) is the last sample.
        assert!(p[0].abs_diff_eq(tri.positions[0], 1e-4));
        assert!(p[3].abs_diff_eq(tri.positions[2], 1e-4));
        assert!(p[p.len() - 1].abs_diff_eq(tri.positions[1], 1e-4));
    }

    #[test]
    fn test_sample_normals_are_unit() {
        let tess = Tessellator::new(true, 4, TriangulationPolicy::LegacyFan);
        let mut out = TessellationScratch::new();
        tess.tessellate(&triangle(), &mut out).unwrap();
        for n in out.normals.as_slice() {
            assert!((n.length() - 1.0).abs() < 1e-3);
            assert!(n.z > 0.0, "normal should face the front side: {n:?}");
        }
    }

    #[test]
    fn test_legacy_fan_indices() {
        let tess = Tessellator::new(true, 2, TriangulationPolicy::LegacyFan);
        let mut indices = ScratchBuffer::new(64);
        tess.triangulate(10, 6, &mut indices).unwrap();
        assert_eq!(
            indices.as_slice(),
            &[10, 11, 12, 10, 12, 13, 10, 13, 14, 10, 14, 15]
        );
    }

    #[test]
    fn test_lattice_indices_level_two() {
        // Samples: row 0 = (0,0)=0 (0,1)=1 (0,2)=2; row 1 = (1,0)=3 (1,1)=4; row 2 = (2,0)=5
        let tess = Tessellator::new(true, 2, TriangulationPolicy::LatticeStrip);
        let mut indices = ScratchBuffer::new(64);
        tess.triangulate(0, 6, &mut indices).unwrap();
        assert_eq!(
            indices.as_slice(),
            &[0, 3, 1, 3, 4, 1, 1, 4, 2, 3, 5, 4]
        );
    }

    #[test]
    fn test_lattice_covers_every_sample_with_consistent_winding() {
        let level = 5;
        let tess = Tessellator::new(true, level, TriangulationPolicy::LatticeStrip);
        let flat = PatchTriangle {
            positions: [Vec3::ZERO, Vec3::X, Vec3::Y],
            normals: [Vec3::Z; 3],
        };
        let mut out = TessellationScratch::new();
        let count = tess.tessellate(&flat, &mut out).unwrap();
        tess.triangulate(0, count, &mut out.indices).unwrap();

        let idx = out.indices.as_slice();
        assert_eq!(idx.len(), index_count(level, TriangulationPolicy::LatticeStrip));

        let p = out.positions.as_slice();
        let mut used = vec![false; count];
        for tri in idx.chunks(3) {
            let (a, b, c) = (p[tri[0] as usize], p[tri[1] as usize], p[tri[2] as usize]);
            // Same orientation as the source triangle (+Z).
            assert!((b - a).cross(c - a).z > 0.0);
            for &i in tri {
                used[i as usize] = true;
            }
        }
        assert!(used.iter().all(|&u| u));
    }

    #[test]
    fn test_capacity_is_checked_before_writing() {
        let tess = Tessellator::new(true, 4, TriangulationPolicy::LegacyFan);
        let mut out = TessellationScratch::with_capacity(10, 10);
        assert!(tess.tessellate(&triangle(), &mut out).is_err());
        assert!(out.is_empty());
    }
}
