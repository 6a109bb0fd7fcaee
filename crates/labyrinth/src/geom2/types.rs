//! Basic 2D types and tolerances for the export geometry.
//!
//! - `GeomCfg`: centralizes flattening resolution and join limits.
//! - `IPoint`/`Contour`: fixed-point point runs (1 unit = 1 µm).
//! - `ShapeClass`: which cut layer a contour belongs to.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Fixed-point units per millimetre.
pub const SCALE: f64 = 1000.0;

/// Point on the fixed-point grid.
pub type IPoint = Vector2<i64>;

/// Largest fixed-point magnitude accepted from input (2^52 units, exact in f64).
pub const MAX_FIXED: f64 = 4_503_599_627_370_496.0;

#[inline]
pub fn to_fixed(p: Vector2<f64>) -> IPoint {
    IPoint::new((p.x * SCALE).round() as i64, (p.y * SCALE).round() as i64)
}

/// `to_fixed`, or `None` when a coordinate is not finite or exceeds `MAX_FIXED`.
#[inline]
pub fn try_to_fixed(p: Vector2<f64>) -> Option<IPoint> {
    let x = (p.x * SCALE).round();
    let y = (p.y * SCALE).round();
    let ok = |v: f64| v.is_finite() && v.abs() <= MAX_FIXED;
    (ok(x) && ok(y)).then(|| IPoint::new(x as i64, y as i64))
}

#[inline]
pub fn to_mm(p: IPoint) -> Vector2<f64> {
    Vector2::new(p.x as f64 / SCALE, p.y as f64 / SCALE)
}

/// Geometry configuration (flattening and join tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// Largest angle (radians) swept by one flattened arc segment.
    pub max_arc_step: f64,
    /// Segment count of a full circle (holes, boundary).
    pub circle_segments: usize,
    /// Miter length / half-width above which a miter join is squared off.
    pub miter_limit: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            max_arc_step: 5f64.to_radians(),
            circle_segments: 64,
            miter_limit: 2.0,
        }
    }
}

impl GeomCfg {
    /// Segments needed to flatten a sweep of `angle` radians (at least one).
    #[inline]
    pub fn arc_segments(&self, angle: f64) -> usize {
        let step = self.max_arc_step.max(1e-3);
        ((angle.abs() / step).ceil() as usize).max(1)
    }
}

/// Corner treatment when offsetting polylines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinStyle {
    Round,
    Miter,
    Square,
}

impl JoinStyle {
    /// `cornerRounding` switches between round and miter joins.
    pub fn from_corner_rounding(rounded: bool) -> Self {
        if rounded {
            JoinStyle::Round
        } else {
            JoinStyle::Miter
        }
    }
}

/// Open or closed run of fixed-point points.
///
/// Closed contours do not repeat their first point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<IPoint>,
    pub closed: bool,
}

impl Contour {
    pub fn open(points: Vec<IPoint>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn closed(points: Vec<IPoint>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    /// Append unless it repeats the last point.
    #[inline]
    pub fn push(&mut self, p: IPoint) {
        if self.points.last() != Some(&p) {
            self.points.push(p);
        }
    }

    #[inline]
    pub fn first(&self) -> Option<IPoint> {
        self.points.first().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<IPoint> {
        self.points.last().copied()
    }

    /// Twice the signed area (closed interpretation), exact in integers.
    pub fn signed_area2(&self) -> i128 {
        let n = self.points.len();
        if n < 3 {
            return 0;
        }
        (0..n)
            .map(|i| {
                let p = self.points[i];
                let q = self.points[(i + 1) % n];
                p.x as i128 * q.y as i128 - q.x as i128 * p.y as i128
            })
            .sum()
    }

    /// Axis-aligned bounds `(min, max)`.
    pub fn bounds(&self) -> Option<(IPoint, IPoint)> {
        let first = self.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                IPoint::new(lo.x.min(p.x), lo.y.min(p.y)),
                IPoint::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

/// Shape classes kept apart through union and serialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeClass {
    Corridors,
    Boundary,
    CenterHole,
    EntryHole,
    Wedge,
    WedgeHole,
}

impl ShapeClass {
    pub const ALL: [ShapeClass; 6] = [
        ShapeClass::Corridors,
        ShapeClass::Boundary,
        ShapeClass::CenterHole,
        ShapeClass::EntryHole,
        ShapeClass::Wedge,
        ShapeClass::WedgeHole,
    ];

    /// DXF layer; holes are cut on the boundary layer.
    pub fn layer(self) -> &'static str {
        match self {
            ShapeClass::Corridors => "CORRIDORS",
            ShapeClass::Boundary | ShapeClass::CenterHole | ShapeClass::EntryHole => "BOUNDARY",
            ShapeClass::Wedge => "WEDGE_CUT",
            ShapeClass::WedgeHole => "WEDGE_HOLE",
        }
    }

    pub fn svg_id(self) -> &'static str {
        match self {
            ShapeClass::Corridors => "corridors",
            ShapeClass::Boundary => "boundary",
            ShapeClass::CenterHole => "center-hole",
            ShapeClass::EntryHole => "entry-hole",
            ShapeClass::Wedge => "wedge",
            ShapeClass::WedgeHole => "wedge-hole",
        }
    }

    /// Filled (engraved pocket) vs stroke-only (through cut).
    pub fn is_filled(self) -> bool {
        matches!(self, ShapeClass::Corridors)
    }
}
