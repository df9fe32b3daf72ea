// Copyright 2025 the Cu2Qu Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic Bézier splines.

use crate::{Point, QuadBez};

/// A chain of quadratic Bézier segments approximating one cubic arc.
///
/// The spline is stored as `n + 2` control points for `n` segments: the
/// start point, one off-curve point per segment, and the end point. The
/// on-curve joints between consecutive segments are implied, each lying at
/// the midpoint of its neighboring off-curve points, and are reconstructed
/// by [`QuadSpline::to_quads`] rather than stored.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadSpline(Vec<Point>);

impl QuadSpline {
    /// Construct a new `QuadSpline` from an array of [`Point`]s.
    #[inline]
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Return the spline's control [`Point`]s.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consume the spline, returning its control [`Point`]s.
    #[inline]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    /// The number of quadratic segments in the spline.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.0.len().saturating_sub(2)
    }

    /// Return an iterator over the implied [`QuadBez`] sequence.
    ///
    /// The returned quads are guaranteed to be G1 continuous.
    pub fn to_quads(&self) -> impl Iterator<Item = QuadBez> + '_ {
        let points = &self.0;
        let n = self.segment_count();
        (0..n).map(move |i| {
            let mut p0 = points[i];
            let p1 = points[i + 1];
            let mut p2 = points[i + 2];
            if i != 0 {
                p0 = p0.midpoint(p1);
            }
            if i + 1 != n {
                p2 = p1.midpoint(p2);
            }
            QuadBez { p0, p1, p2 }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Point, QuadBez, QuadSpline};

    #[test]
    fn too_few_points_no_quads() {
        assert!(QuadSpline::new(Vec::new()).to_quads().next().is_none());
        assert!(QuadSpline::new(vec![Point::new(1.0, 1.0)])
            .to_quads()
            .next()
            .is_none());
        assert!(
            QuadSpline::new(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)])
                .to_quads()
                .next()
                .is_none()
        );
    }

    #[test]
    fn three_points_same_quad() {
        let p0 = Point::new(1.0, 1.0);
        let p1 = Point::new(2.0, 2.0);
        let p2 = Point::new(3.0, 3.0);
        let spline = QuadSpline::new(vec![p0, p1, p2]);
        assert_eq!(spline.segment_count(), 1);
        assert_eq!(
            vec![QuadBez { p0, p1, p2 }],
            spline.to_quads().collect::<Vec<_>>()
        );
    }

    #[test]
    fn four_points_implicit_on_curve() {
        let p0 = Point::new(1.0, 1.0);
        let p1 = Point::new(3.0, 3.0);
        let p2 = Point::new(5.0, 5.0);
        let p3 = Point::new(8.0, 8.0);
        let spline = QuadSpline::new(vec![p0, p1, p2, p3]);
        assert_eq!(spline.segment_count(), 2);
        assert_eq!(
            vec![
                QuadBez {
                    p0,
                    p1,
                    p2: p1.midpoint(p2)
                },
                QuadBez {
                    p0: p1.midpoint(p2),
                    p1: p2,
                    p2: p3
                }
            ],
            spline.to_quads().collect::<Vec<_>>()
        );
    }
}
