// Copyright 2025 the Cu2Qu Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Approximation of cubic Bézier curves by quadratic splines.
//!
//! The entry points are [`curve_to_quadratic`], which converts a single
//! cubic, and [`curves_to_quadratic`], which converts a family of cubics
//! such that every resulting spline has the same number of segments. The
//! latter is needed when the curves represent the same contour across
//! interpolation-compatible font masters.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;

use smallvec::{smallvec, SmallVec};

use crate::{CubicBez, ParamCurve, Point, QuadSpline, Vec2};

/// Maximum number of quadratic segments tried by the degree search.
///
/// Exceeding it means the input is degenerate or the tolerance
/// unsatisfiable, not that a larger spline would help.
pub const MAX_SPLINE_SEGMENTS: usize = 100;

/// An error which can be returned when no approximation is found.
#[derive(Clone, Debug)]
pub enum ApproxError {
    /// No spline within the error bound exists for any segment count up to
    /// [`MAX_SPLINE_SEGMENTS`].
    NotFound {
        /// The curve that could not be approximated.
        curve: CubicBez,
        /// Sampled error of the largest candidate spline, if one was built.
        best_err: Option<f64>,
    },
    /// No common segment count satisfied every curve of a family.
    FamilyNotFound {
        /// The curves, with their error bounds, that cannot be approximated
        /// at any segment count on their own. When every curve is
        /// individually satisfiable and only a common count is missing, all
        /// curves of the family are listed.
        curves: Vec<(CubicBez, f64)>,
    },
}

impl fmt::Display for ApproxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApproxError::NotFound { curve, best_err } => {
                write!(f, "no approximation found: {curve:?}")?;
                if let Some(err) = best_err {
                    write!(f, " (best error {err})")?;
                }
                Ok(())
            }
            ApproxError::FamilyNotFound { curves } => {
                write!(
                    f,
                    "no approximation found for {} curve(s) of the family",
                    curves.len()
                )
            }
        }
    }
}

impl StdError for ApproxError {}

/// Return a quadratic spline approximating this cubic Bézier within
/// `max_err` at every point, using the fewest possible segments.
///
/// The first and last points of the returned spline equal the cubic's
/// endpoints exactly.
///
/// # Errors
///
/// Returns [`ApproxError::NotFound`] if no suitable approximation exists for
/// any segment count up to [`MAX_SPLINE_SEGMENTS`].
pub fn curve_to_quadratic(curve: CubicBez, max_err: f64) -> Result<QuadSpline, ApproxError> {
    let mut last = None;
    for n in 1..=MAX_SPLINE_SEGMENTS {
        if let Some(spline) = spline_candidate(curve, n) {
            if spline_fits(curve, &spline, max_err) {
                return Ok(spline);
            }
            last = Some(spline);
        }
    }
    let best_err = last.map(|spline| sampled_spline_error(curve, &spline, 100));
    Err(ApproxError::NotFound { curve, best_err })
}

/// Return quadratic splines approximating these cubic Béziers, all with the
/// same number of segments.
///
/// The common segment count is the smallest one at which every curve
/// satisfies its own error bound; a candidate count is abandoned as soon as
/// one curve fails at it. Structural compatibility of the results is what
/// distinguishes this from converting each curve separately.
///
/// # Errors
///
/// Returns [`ApproxError::FamilyNotFound`] if no common segment count up to
/// [`MAX_SPLINE_SEGMENTS`] satisfies every `(curve, max_err)` pair.
///
/// # Panics
///
/// Panics unless `curves` and `max_errors` have the same length.
pub fn curves_to_quadratic(
    curves: &[CubicBez],
    max_errors: &[f64],
) -> Result<Vec<QuadSpline>, ApproxError> {
    assert_eq!(
        curves.len(),
        max_errors.len(),
        "one error bound per curve is required"
    );
    'next_n: for n in 1..=MAX_SPLINE_SEGMENTS {
        let mut splines = Vec::with_capacity(curves.len());
        for (&curve, &max_err) in curves.iter().zip(max_errors) {
            match spline_candidate(curve, n) {
                Some(spline) if spline_fits(curve, &spline, max_err) => splines.push(spline),
                _ => continue 'next_n,
            }
        }
        return Ok(splines);
    }
    Err(ApproxError::FamilyNotFound {
        curves: unsatisfiable(curves, max_errors),
    })
}

/// The `(curve, max_err)` pairs that fail even on their own; all pairs if
/// each is individually satisfiable.
fn unsatisfiable(curves: &[CubicBez], max_errors: &[f64]) -> Vec<(CubicBez, f64)> {
    let offenders: Vec<_> = curves
        .iter()
        .zip(max_errors)
        .filter(|&(&curve, &max_err)| curve_to_quadratic(curve, max_err).is_err())
        .map(|(&curve, &max_err)| (curve, max_err))
        .collect();
    if offenders.is_empty() {
        curves
            .iter()
            .zip(max_errors)
            .map(|(&curve, &max_err)| (curve, max_err))
            .collect()
    } else {
        offenders
    }
}

/// Build the candidate spline of `n` quadratic segments for a cubic.
///
/// Only construction; whether the candidate is close enough is decided
/// separately by [`spline_fits`]. Returns `None` only for `n` of 1, when the
/// cubic's endpoint tangents are parallel and no single quadratic can share
/// both of them.
fn spline_candidate(c: CubicBez, n: usize) -> Option<QuadSpline> {
    if n == 1 {
        let q1 = tangent_intersect(c)?;
        return Some(QuadSpline::new(vec![c.p0, q1, c.p3]));
    }
    let segments = c.subdivide_into_n(n);
    let mut points = Vec::with_capacity(n + 2);
    points.push(c.p0);
    for (i, segment) in segments.iter().enumerate() {
        points.push(approx_control(segment, i as f64 / (n - 1) as f64));
    }
    points.push(c.p3);
    Some(QuadSpline::new(points))
}

/// Intersect the two endpoint tangent lines of a cubic.
///
/// This is the control point of the unique quadratic sharing both endpoint
/// tangents. `None` if the tangents are parallel (which includes zero-length
/// tangent vectors).
fn tangent_intersect(c: CubicBez) -> Option<Point> {
    let ab = c.p1 - c.p0;
    let cd = c.p3 - c.p2;
    let p = ab.turn_90();
    let denom = p.dot(cd);
    if denom == 0.0 {
        return None;
    }
    let h = p.dot(c.p0 - c.p2) / denom;
    Some(c.p2 + cd * h)
}

/// Candidate off-curve point for one sub-cubic of a multi-segment spline: a
/// blend of the sub-cubic's extended endpoint tangents, weighted by the
/// segment's position `t` across the spline.
fn approx_control(c: &CubicBez, t: f64) -> Point {
    let p1 = c.p0 + (c.p1 - c.p0) * 1.5;
    let p2 = c.p3 + (c.p2 - c.p3) * 1.5;
    p1.lerp(p2, t)
}

/// Does the candidate spline lie within `tolerance` of the cubic everywhere?
///
/// Each quadratic segment is degree-elevated to cubic form and its
/// deviation from the matching equal-parameter sub-cubic is bounded
/// analytically, short-circuiting on the first failing segment.
fn spline_fits(c: CubicBez, spline: &QuadSpline, tolerance: f64) -> bool {
    let n = spline.segment_count();
    if n == 0 {
        return false;
    }
    // For a single segment the sub-"division" is the curve itself; going
    // through the power basis would only add rounding noise.
    let segments: SmallVec<[CubicBez; 4]> = if n == 1 {
        smallvec![c]
    } else {
        c.subdivide_into_n(n)
    };
    for (segment, quad) in segments.iter().zip(spline.to_quads()) {
        let hull = quad.raise();
        // The joint offset accumulates from segment to segment; its start
        // side was already checked as the previous segment's end.
        let d0 = hull.p0 - segment.p0;
        let d1 = hull.p3 - segment.p3;
        if d1.hypot() > tolerance
            || !deviation_within(d0, hull.p1 - segment.p1, hull.p2 - segment.p2, d1, tolerance)
        {
            return false;
        }
    }
    true
}

/// Does a difference cubic, given by its control vectors, stay within
/// `tolerance` of the origin everywhere?
///
/// Assumes `p0` and `p3` are already known to fit, and recursively bisects
/// to bound the inside of the curve. This is an analytic upper bound, not a
/// sampling: acceptance guarantees the true maximum deviation fits.
fn deviation_within(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, tolerance: f64) -> bool {
    // Check p2 before p1, as it carries more of the error early on.
    if p2.hypot() <= tolerance && p1.hypot() <= tolerance {
        return true;
    }
    let mid = (p0 + (p1 + p2) * 3.0 + p3) * 0.125;
    if mid.hypot() > tolerance {
        return false;
    }
    let deriv3 = (p3 + p2 - p1 - p0) * 0.125;
    deviation_within(p0, (p0 + p1) * 0.5, mid - deriv3, mid, tolerance)
        && deviation_within(mid, mid + deriv3, (p2 + p3) * 0.5, p3, tolerance)
}

/// Maximum pointwise distance between a cubic and a spline, by dense
/// sampling at matching parametric positions.
///
/// `total_steps` is divided among the spline's segments. This is an
/// empirical measurement, independent of the analytic bound the conversion
/// uses internally, and is intended for verification and diagnostics.
pub fn sampled_spline_error(curve: CubicBez, spline: &QuadSpline, total_steps: usize) -> f64 {
    let n = spline.segment_count();
    if n == 0 {
        return 0.0;
    }
    let steps = (total_steps / n).max(1);
    let mut worst = 0.0_f64;
    for (i, quad) in spline.to_quads().enumerate() {
        for j in 0..=steps {
            let t = j as f64 / steps as f64;
            let p = quad.eval(t);
            let q = curve.eval((i as f64 + t) / n as f64);
            worst = worst.max(p.distance(q));
        }
    }
    worst
}

/// Histogram of spline segment counts over a series of conversions.
///
/// Callers converting many curves (for instance a whole glyph outline) can
/// record each result here and report approximation statistics afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplineStats {
    counts: BTreeMap<usize, usize>,
}

impl SplineStats {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one converted spline.
    pub fn record(&mut self, spline: &QuadSpline) {
        *self.counts.entry(spline.segment_count()).or_insert(0) += 1;
    }

    /// The number of splines recorded with the given segment count.
    pub fn count(&self, segments: usize) -> usize {
        self.counts.get(&segments).copied().unwrap_or(0)
    }

    /// Iterate over `(segment_count, occurrences)` pairs in increasing
    /// segment-count order.
    pub fn counts(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(&n, &c)| (n, c))
    }

    /// Total number of splines recorded.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}
