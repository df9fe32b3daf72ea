// Copyright 2025 the Cu2Qu Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion of cubic Bézier curves to quadratic splines.
//!
//! Font formats and rendering pipelines restricted to quadratic outlines
//! (such as TrueType) cannot represent cubic source curves directly. This
//! crate approximates a cubic Bézier by a chain of quadratic segments that
//! stays within a caller-specified maximum distance of the original,
//! using as few segments as possible.
//!
//! The algorithm is the one used by the font production ecosystem: split
//! the cubic into `n` equal-parameter pieces, approximate each piece by a
//! quadratic derived from its endpoint tangents, bound the error
//! analytically, and increase `n` until the tolerance is met.
//! [`curves_to_quadratic`] applies the same search jointly to a family of
//! curves so that every result has the same number of segments, which keeps
//! interpolation-compatible font masters compatible after conversion.
//!
//! # Examples
//!
//! Converting a single curve:
//!
//! ```
//! use cu2qu::{curve_to_quadratic, CubicBez};
//!
//! let cubic = CubicBez::new((0., 0.), (0., 100.), (100., 100.), (100., 0.));
//! let spline = curve_to_quadratic(cubic, 5.0).unwrap();
//! assert_eq!(spline.segment_count(), 2);
//! assert_eq!(spline.points()[0], cubic.p0);
//! ```
//!
//! Converting a family of interpolation-compatible curves to splines of
//! identical structure:
//!
//! ```
//! use cu2qu::{curves_to_quadratic, CubicBez};
//!
//! let thin = CubicBez::new((0., 0.), (10., 100.), (90., 100.), (100., 0.));
//! let bold = CubicBez::new((0., 0.), (15., 95.), (85., 95.), (100., 0.));
//! let splines = curves_to_quadratic(&[thin, bold], &[5.0, 5.0]).unwrap();
//! assert_eq!(splines[0].segment_count(), splines[1].segment_count());
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::unreadable_literal, clippy::many_single_char_names)]

mod approx;
mod cubicbez;
mod param_curve;
mod point;
mod quadbez;
mod quadspline;
mod vec2;

pub use crate::approx::*;
pub use crate::cubicbez::*;
pub use crate::param_curve::*;
pub use crate::point::*;
pub use crate::quadbez::*;
pub use crate::quadspline::*;
pub use crate::vec2::*;
