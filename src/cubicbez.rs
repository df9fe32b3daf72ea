// Copyright 2025 the Cu2Qu Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use std::ops::Range;

use smallvec::{smallvec, SmallVec};

use crate::{ParamCurve, Point, Vec2};

/// A single cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubicBez {
    /// The start point.
    pub p0: Point,
    /// The first control point.
    pub p1: Point,
    /// The second control point.
    pub p2: Point,
    /// The end point.
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// Is this curve finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite() && self.p2.is_finite() && self.p3.is_finite()
    }

    /// The derivative vector at parameter `t`.
    #[inline]
    fn tangent(&self, t: f64) -> Vec2 {
        let mt = 1.0 - t;
        ((self.p1 - self.p0) * (mt * mt)
            + (self.p2 - self.p1) * (2.0 * mt * t)
            + (self.p3 - self.p2) * (t * t))
            * 3.0
    }

    /// Power-basis coefficients, such that the curve is
    /// `a·t³ + b·t² + c·t + d`.
    fn parameters(&self) -> (Vec2, Vec2, Vec2, Vec2) {
        let c = (self.p1 - self.p0) * 3.0;
        let b = (self.p2 - self.p1) * 3.0 - c;
        let d = self.p0.to_vec2();
        let a = self.p3.to_vec2() - d - c - b;
        (a, b, c, d)
    }

    /// Reconstruct control points from power-basis coefficients.
    ///
    /// Inverse of [`CubicBez::parameters`].
    fn from_parameters(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> CubicBez {
        let p0 = d.to_point();
        let p1 = p0 + c / 3.0;
        let p2 = p1 + (b + c) / 3.0;
        let p3 = (a + b + c + d).to_point();
        CubicBez { p0, p1, p2, p3 }
    }

    /// Subdivide into thirds, using the closed-form expression.
    pub fn subdivide_3(&self) -> [CubicBez; 3] {
        let (p0, p1, p2, p3) = (
            self.p0.to_vec2(),
            self.p1.to_vec2(),
            self.p2.to_vec2(),
            self.p3.to_vec2(),
        );
        // The mid-points of the curve, and the vector to the neighboring
        // control points, both at one third and at two thirds.
        let mid1 = (p0 * 8.0 + p1 * 12.0 + p2 * 6.0 + p3) * (1.0 / 27.0);
        let deriv1 = (p3 + p2 * 3.0 - p0 * 4.0) * (1.0 / 27.0);
        let mid2 = (p0 + p1 * 6.0 + p2 * 12.0 + p3 * 8.0) * (1.0 / 27.0);
        let deriv2 = (p3 * 4.0 - p1 * 3.0 - p0) * (1.0 / 27.0);
        [
            CubicBez::new(
                self.p0,
                ((p0 * 2.0 + p1) / 3.0).to_point(),
                (mid1 - deriv1).to_point(),
                mid1.to_point(),
            ),
            CubicBez::new(
                mid1.to_point(),
                (mid1 + deriv1).to_point(),
                (mid2 - deriv2).to_point(),
                mid2.to_point(),
            ),
            CubicBez::new(
                mid2.to_point(),
                (mid2 + deriv2).to_point(),
                ((p2 + p3 * 2.0) / 3.0).to_point(),
                self.p3,
            ),
        ]
    }

    /// Subdivide into `n` sub-segments of equal parametric span `1/n`.
    ///
    /// Uses closed-form expressions for `n` of 2 and 3, and the power basis
    /// for larger `n`, which is numerically preferable to repeated bisection.
    /// All paths agree to within floating-point rounding.
    pub fn subdivide_into_n(&self, n: usize) -> SmallVec<[CubicBez; 4]> {
        match n {
            0 => SmallVec::new(),
            1 => smallvec![*self],
            2 => {
                let (left, right) = self.subdivide();
                smallvec![left, right]
            }
            3 => SmallVec::from_slice(&self.subdivide_3()),
            _ => {
                let (a, b, c, d) = self.parameters();
                let mut segments = SmallVec::with_capacity(n);
                let dt = (n as f64).recip();
                let delta_2 = dt * dt;
                let delta_3 = dt * delta_2;
                for i in 0..n {
                    let t1 = i as f64 * dt;
                    let t1_2 = t1 * t1;
                    let a1 = a * delta_3;
                    let b1 = (a * (3.0 * t1) + b) * delta_2;
                    let c1 = (b * (2.0 * t1) + c + a * (3.0 * t1_2)) * dt;
                    let d1 = a * (t1 * t1_2) + b * t1_2 + c * t1 + d;
                    segments.push(CubicBez::from_parameters(a1, b1, c1, d1));
                }
                segments
            }
        }
    }

    /// Partition the curve at the given parameter values.
    ///
    /// The values must be strictly increasing and in (0, 1); `k` split
    /// positions produce `k + 1` sub-segments.
    pub fn split_at(&self, ts: &[f64]) -> Vec<CubicBez> {
        let mut segments = Vec::with_capacity(ts.len() + 1);
        let mut t0 = 0.0;
        for &t in ts {
            debug_assert!(
                t0 < t && t < 1.0,
                "split positions must be increasing and in (0, 1)"
            );
            segments.push(self.subsegment(t0..t));
            t0 = t;
        }
        segments.push(self.subsegment(t0..1.0));
        segments
    }
}

impl ParamCurve for CubicBez {
    /// Evaluate by three nested lerps (de Casteljau).
    #[inline]
    fn eval(&self, t: f64) -> Point {
        let p01 = self.p0.lerp(self.p1, t);
        let p12 = self.p1.lerp(self.p2, t);
        let p23 = self.p2.lerp(self.p3, t);
        let p012 = p01.lerp(p12, t);
        let p123 = p12.lerp(p23, t);
        p012.lerp(p123, t)
    }

    fn subsegment(&self, range: Range<f64>) -> CubicBez {
        let (t0, t1) = (range.start, range.end);
        let p0 = self.eval(t0);
        let p3 = self.eval(t1);
        let scale = (t1 - t0) * (1.0 / 3.0);
        let p1 = p0 + self.tangent(t0) * scale;
        let p2 = p3 - self.tangent(t1) * scale;
        CubicBez { p0, p1, p2, p3 }
    }

    /// Subdivide into halves, using the closed-form expression.
    fn subdivide(&self) -> (CubicBez, CubicBez) {
        let (p0, p1, p2, p3) = (
            self.p0.to_vec2(),
            self.p1.to_vec2(),
            self.p2.to_vec2(),
            self.p3.to_vec2(),
        );
        let mid = (p0 + (p1 + p2) * 3.0 + p3) * 0.125;
        let deriv3 = (p3 + p2 - p1 - p0) * 0.125;
        (
            CubicBez::new(
                self.p0,
                ((p0 + p1) * 0.5).to_point(),
                (mid - deriv3).to_point(),
                mid.to_point(),
            ),
            CubicBez::new(
                mid.to_point(),
                (mid + deriv3).to_point(),
                ((p2 + p3) * 0.5).to_point(),
                self.p3,
            ),
        )
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p3
    }
}

#[cfg(test)]
mod tests {
    use crate::{CubicBez, ParamCurve, Point};

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!(p1.distance(p0) < epsilon, "{p0:?} != {p1:?}");
    }

    fn arch() -> CubicBez {
        CubicBez::new((0.0, 0.0), (0.0, 100.0), (100.0, 100.0), (100.0, 0.0))
    }

    #[test]
    fn cubicbez_eval() {
        let c = arch();
        assert_eq!(c.eval(0.0), c.p0);
        assert_eq!(c.eval(1.0), c.p3);
        assert_near(c.eval(0.5), Point::new(50.0, 75.0), 1e-12);
    }

    #[test]
    fn cubicbez_subsegment() {
        let c = CubicBez::new((3.1, 4.1), (5.9, 2.6), (5.3, 5.8), (7.2, 2.2));
        let t0 = 0.1;
        let t1 = 0.8;
        let cs = c.subsegment(t0..t1);
        let epsilon = 1e-12;
        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            let ts = t0 + t * (t1 - t0);
            assert_near(c.eval(ts), cs.eval(t), epsilon);
        }
    }

    #[test]
    fn cubicbez_subdivide() {
        let c = CubicBez::new((3.1, 4.1), (5.9, 2.6), (5.3, 5.8), (7.2, 2.2));
        let (left, right) = c.subdivide();
        assert_eq!(left.p0, c.p0);
        assert_eq!(right.p3, c.p3);
        assert_eq!(left.p3, right.p0);
        let epsilon = 1e-12;
        let n = 10;
        for i in 0..=n {
            let t = (i as f64) * (n as f64).recip();
            assert_near(c.eval(t * 0.5), left.eval(t), epsilon);
            assert_near(c.eval(0.5 + t * 0.5), right.eval(t), epsilon);
        }
    }

    #[test]
    fn subdivision_paths_agree() {
        // The closed-form halves and thirds, the power-basis form, and
        // de Casteljau splitting must all produce the same sub-segments.
        let c = CubicBez::new((0.0, 0.0), (10.0, 100.0), (90.0, 100.0), (100.0, 0.0));
        let epsilon = 1e-9;

        let (left, right) = c.subdivide();
        for (fast, slow) in [left, right].iter().zip(c.split_at(&[0.5])) {
            assert_cubic_near(fast, &slow, epsilon);
        }

        let thirds = c.subdivide_3();
        for (fast, slow) in thirds.iter().zip(c.split_at(&[1.0 / 3.0, 2.0 / 3.0])) {
            assert_cubic_near(fast, &slow, epsilon);
        }

        let quarters = c.subdivide_into_n(4);
        assert_eq!(quarters.len(), 4);
        for (poly, casteljau) in quarters.iter().zip(c.split_at(&[0.25, 0.5, 0.75])) {
            assert_cubic_near(poly, &casteljau, epsilon);
        }
    }

    #[test]
    fn subdivide_into_n_structure() {
        let c = arch();
        for n in 1..20 {
            let segments = c.subdivide_into_n(n);
            assert_eq!(segments.len(), n);
            assert_near(segments[0].p0, c.p0, 1e-12);
            assert_near(segments[n - 1].p3, c.p3, 1e-12);
            for pair in segments.windows(2) {
                assert_near(pair[0].p3, pair[1].p0, 1e-9);
            }
            // Each segment covers a parametric span of 1/n.
            for (i, seg) in segments.iter().enumerate() {
                let tm = (i as f64 + 0.5) / n as f64;
                assert_near(seg.eval(0.5), c.eval(tm), 1e-9);
            }
        }
    }

    fn assert_cubic_near(c0: &CubicBez, c1: &CubicBez, epsilon: f64) {
        assert_near(c0.p0, c1.p0, epsilon);
        assert_near(c0.p1, c1.p1, epsilon);
        assert_near(c0.p2, c1.p2, epsilon);
        assert_near(c0.p3, c1.p3, epsilon);
    }
}
