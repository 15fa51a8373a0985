//! PN-triangle patches.
//!
//! A cubic Bezier triangle built from one flat triangle and its three
//! vertex normals. Control points use the `bUVW` naming of the
//! literature, where the digits give each corner's Bernstein exponent:
//!
//! ```text
//!              b003 (v2)
//!             /    \
//!          b102    b012
//!          /    b111   \
//!       b201          b021
//!        /               \
//!   b300 (v0) - b210 - b120 - b030 (v1)
//! ```
//!
//! Barycentric convention: `(u, v) = (0, 0)` is `v0`, `(1, 0)` is `v1`,
//! `(0, 1)` is `v2`; `w = 1 - u - v` weights `v0`.

use tessera_shared::{Vec3, NORMAL_EPSILON};

/// Ten control points of a PN-triangle patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PnPatch {
    /// Corner `v0`.
    pub b300: Vec3,
    /// Corner `v1`.
    pub b030: Vec3,
    /// Corner `v2`.
    pub b003: Vec3,
    /// Edge `v0→v1`, near `v0`.
    pub b210: Vec3,
    /// Edge `v0→v1`, near `v1`.
    pub b120: Vec3,
    /// Edge `v1→v2`, near `v1`.
    pub b021: Vec3,
    /// Edge `v1→v2`, near `v2`.
    pub b012: Vec3,
    /// Edge `v2→v0`, near `v2`.
    pub b102: Vec3,
    /// Edge `v2→v0`, near `v0`.
    pub b201: Vec3,
    /// Center.
    pub b111: Vec3,
}

/// Point on the straight edge, two thirds of the way toward `near`,
/// bent along `normal` by the edge tangent's projection onto it.
#[inline]
fn edge_point(near: Vec3, far: Vec3, normal: Vec3) -> Vec3 {
    let straight = (near * 2.0 + far) * (1.0 / 3.0);
    let tangent = straight - near;
    straight.mul_add(normal.dot(tangent), normal)
}

impl PnPatch {
    /// Builds the patch for corners `v` and unit normals `n`.
    ///
    /// Pure function of its inputs; a zero-area triangle yields a
    /// degenerate patch.
    #[must_use]
    pub fn new(v: [Vec3; 3], n: [Vec3; 3]) -> Self {
        let [v0, v1, v2] = v;
        let [n0, n1, n2] = n;

        let b210 = edge_point(v0, v1, n0);
        let b120 = edge_point(v1, v0, n1);
        let b021 = edge_point(v1, v2, n1);
        let b012 = edge_point(v2, v1, n2);
        let b102 = edge_point(v2, v0, n2);
        let b201 = edge_point(v0, v2, n0);

        let b111 = (v0 + v1 + v2 + b210 + b120 + b021 + b012 + b102 + b201) * (1.0 / 9.0);

        Self {
            b300: v0,
            b030: v1,
            b003: v2,
            b210,
            b120,
            b021,
            b012,
            b102,
            b201,
            b111,
        }
    }

    /// Surface point at barycentric `(u, v)`.
    #[must_use]
    pub fn evaluate(&self, u: f32, v: f32) -> Vec3 {
        let w = 1.0 - u - v;
        let (u2, v2, w2) = (u * u, v * v, w * w);

        (self.b300 * (w2 * w))
            .mul_add(u2 * u, self.b030)
            .mul_add(v2 * v, self.b003)
            .mul_add(3.0 * w2 * u, self.b210)
            .mul_add(3.0 * w * u2, self.b120)
            .mul_add(3.0 * w2 * v, self.b201)
            .mul_add(3.0 * u2 * v, self.b021)
            .mul_add(3.0 * w * v2, self.b102)
            .mul_add(3.0 * u * v2, self.b012)
            .mul_add(6.0 * w * u * v, self.b111)
    }

    /// Unit normal at `(u, v)`, estimated by forward differences.
    ///
    /// `point` must be `self.evaluate(u, v)`. Returns zero where the
    /// patch is degenerate.
    #[must_use]
    pub fn normal_at(&self, u: f32, v: f32, point: Vec3) -> Vec3 {
        let du = self.evaluate(u + NORMAL_EPSILON, v) - point;
        let dv = self.evaluate(u, v + NORMAL_EPSILON) - point;
        du.cross(dv).normalize_or_zero()
    }
}
