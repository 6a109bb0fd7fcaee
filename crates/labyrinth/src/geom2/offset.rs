//! Polyline offsetting (strokes) and boolean union on the fixed-point grid.
//!
//! Model
//! - A stroke of half-width `h` is the union of simple convex-ish pieces:
//!   one quad per segment, one wedge per turning vertex on the outer side
//!   (round / miter / square), and end caps for open runs.
//! - Every piece vertex is snapped to the integer grid before the union, so
//!   the boolean stage only ever sees grid coordinates.
//! - Unions run as a balanced pairwise reduction over `geo::BooleanOps`.
//!
//! Degenerate runs (fewer than two distinct points, or self-touching) are
//! skipped and reported; everything else is still stroked.

use geo::orient::Direction;
use geo::{BooleanOps, Coord, LineString, MultiPolygon, Orient, Polygon};
use nalgebra::{Rotation2, Vector2};

use crate::error::{DegenerateKind, GeometryWarning};

use super::types::{Contour, GeomCfg, IPoint, JoinStyle, SCALE};
use super::util::has_self_intersection;

/// Per-sub-path strokes plus the warnings for skipped sub-paths.
#[derive(Clone, Debug, Default)]
pub struct StrokeSet {
    pub strokes: Vec<MultiPolygon<f64>>,
    pub warnings: Vec<GeometryWarning>,
}

/// Why a run cannot be stroked, if it cannot.
pub fn degenerate_kind(path: &Contour) -> Option<DegenerateKind> {
    let distinct = path
        .points
        .iter()
        .skip(1)
        .any(|p| Some(*p) != path.first());
    if !distinct {
        return Some(DegenerateKind::ZeroLength);
    }
    if has_self_intersection(path) {
        return Some(DegenerateKind::SelfIntersecting);
    }
    None
}

/// Stroke every sub-path with half-width `half_width_mm`.
pub fn stroke_paths(paths: &[Contour], half_width_mm: f64, join: JoinStyle, cfg: &GeomCfg) -> StrokeSet {
    let h = half_width_mm * SCALE;
    let mut out = StrokeSet::default();
    for (i, path) in paths.iter().enumerate() {
        if let Some(kind) = degenerate_kind(path) {
            let warning = GeometryWarning { subpath: i, kind };
            tracing::warn!(subpath = i, ?kind, "skipping degenerate sub-path");
            out.warnings.push(warning);
            continue;
        }
        let pieces = stroke_pieces(path, h, join, cfg)
            .into_iter()
            .map(|p| MultiPolygon::new(vec![p]))
            .collect();
        out.strokes.push(union_all(pieces));
    }
    out
}

/// Stroke, union and convert back to closed contours.
pub fn offset_union(
    paths: &[Contour],
    half_width_mm: f64,
    join: JoinStyle,
    cfg: &GeomCfg,
) -> (Vec<Contour>, Vec<GeometryWarning>) {
    let set = stroke_paths(paths, half_width_mm, join, cfg);
    let merged = union_all(set.strokes);
    (to_contours(&merged), set.warnings)
}

/// Balanced pairwise union.
pub fn union_all(mut shapes: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while shapes.len() > 1 {
        let mut next = Vec::with_capacity(shapes.len().div_ceil(2));
        let mut it = shapes.into_iter();
        while let Some(a) = it.next() {
            match it.next() {
                Some(b) => next.push(a.union(&b)),
                None => next.push(a),
            }
        }
        shapes = next;
    }
    shapes.pop().unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

/// Exterior and interior rings as closed contours (no repeated end point).
pub fn to_contours(mp: &MultiPolygon<f64>) -> Vec<Contour> {
    let mut out = Vec::new();
    for poly in &mp.0 {
        for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
            let mut c = Contour::closed(Vec::with_capacity(ring.0.len()));
            for coord in &ring.0 {
                c.push(IPoint::new(coord.x.round() as i64, coord.y.round() as i64));
            }
            if c.points.len() > 1 && c.first() == c.last() {
                c.points.pop();
            }
            if c.points.len() >= 3 {
                out.push(c);
            }
        }
    }
    out
}

/// Snap to the grid and wrap as a CCW polygon; drops slivers.
fn snapped_polygon(pts: &[Vector2<f64>]) -> Option<Polygon<f64>> {
    let mut c = Contour::closed(Vec::with_capacity(pts.len()));
    for p in pts {
        c.push(IPoint::new(p.x.round() as i64, p.y.round() as i64));
    }
    if c.points.len() > 1 && c.first() == c.last() {
        c.points.pop();
    }
    if c.points.len() < 3 || c.signed_area2().abs() < 2 {
        return None;
    }
    let coords: Vec<Coord<f64>> = c
        .points
        .iter()
        .map(|p| Coord {
            x: p.x as f64,
            y: p.y as f64,
        })
        .collect();
    Some(Polygon::new(LineString::from(coords), Vec::new()).orient(Direction::Default))
}

#[inline]
fn left_normal(d: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-d.y, d.x)
}

/// Pieces whose union is the stroke of `path` (grid units, half-width `h`).
fn stroke_pieces(path: &Contour, h: f64, join: JoinStyle, cfg: &GeomCfg) -> Vec<Polygon<f64>> {
    let pts: Vec<Vector2<f64>> = path
        .points
        .iter()
        .map(|p| Vector2::new(p.x as f64, p.y as f64))
        .collect();
    let n = pts.len();
    let closed = path.closed && n >= 3;
    let seg_count = if closed { n } else { n - 1 };
    let mut pieces = Vec::with_capacity(seg_count * 2 + 2);

    let dirs: Vec<Vector2<f64>> = (0..seg_count)
        .map(|i| (pts[(i + 1) % n] - pts[i]).normalize())
        .collect();

    for i in 0..seg_count {
        let d = dirs[i];
        let nrm = left_normal(d) * h;
        let mut a = pts[i];
        let mut b = pts[(i + 1) % n];
        if !closed && join != JoinStyle::Round {
            if i == 0 {
                a -= d * h;
            }
            if i == seg_count - 1 {
                b += d * h;
            }
        }
        pieces.extend(snapped_polygon(&[a + nrm, a - nrm, b - nrm, b + nrm]));
    }

    let joints: Box<dyn Iterator<Item = usize>> = if closed {
        Box::new(0..n)
    } else {
        Box::new(1..n - 1)
    };
    for v in joints {
        let d_in = dirs[(v + seg_count - 1) % seg_count];
        let d_out = dirs[v % seg_count];
        if let Some(wedge) = join_wedge(pts[v], d_in, d_out, h, join, cfg) {
            pieces.extend(snapped_polygon(&wedge));
        }
    }

    if !closed && join == JoinStyle::Round {
        pieces.extend(snapped_polygon(&round_cap(pts[0], -dirs[0], h, cfg)));
        pieces.extend(snapped_polygon(&round_cap(pts[n - 1], dirs[seg_count - 1], h, cfg)));
    }
    pieces
}

/// Half disc at `v` bulging towards `outward`.
fn round_cap(v: Vector2<f64>, outward: Vector2<f64>, h: f64, cfg: &GeomCfg) -> Vec<Vector2<f64>> {
    let start = Vector2::new(outward.y, -outward.x) * h;
    let k = cfg.arc_segments(std::f64::consts::PI);
    (0..=k)
        .map(|j| v + Rotation2::new(std::f64::consts::PI * j as f64 / k as f64) * start)
        .collect()
}

/// Outer-side gap filler at a turning vertex; `None` when the run goes straight on.
fn join_wedge(
    v: Vector2<f64>,
    d_in: Vector2<f64>,
    d_out: Vector2<f64>,
    h: f64,
    join: JoinStyle,
    cfg: &GeomCfg,
) -> Option<Vec<Vector2<f64>>> {
    let cross = d_in.x * d_out.y - d_in.y * d_out.x;
    let dot = d_in.dot(&d_out);
    let reversal = cross.abs() < 1e-12 && dot < 0.0;
    if cross.abs() < 1e-12 && !reversal {
        return None;
    }
    // Signed turn; the outer side is right of a left turn and vice versa.
    let (turn, side) = if reversal {
        (std::f64::consts::PI, -1.0)
    } else {
        (cross.atan2(dot), if cross > 0.0 { -1.0 } else { 1.0 })
    };
    let o_in = left_normal(d_in) * (h * side);
    let o_out = left_normal(d_out) * (h * side);
    let p1 = v + o_in;
    let p2 = v + o_out;

    let bisector = if reversal {
        d_in
    } else {
        (o_in + o_out).try_normalize(1e-12)?
    };
    let half_cos = o_in.dot(&bisector) / h;

    let squared = |bisector: Vector2<f64>| -> Option<Vec<Vector2<f64>>> {
        let den_in = d_in.dot(&bisector);
        let den_out = -d_out.dot(&bisector);
        if den_in.abs() < 1e-12 || den_out.abs() < 1e-12 {
            return None;
        }
        let t1 = (h - o_in.dot(&bisector)) / den_in;
        let t2 = (h - o_out.dot(&bisector)) / den_out;
        Some(vec![v, p1, p1 + d_in * t1, p2 - d_out * t2, p2])
    };

    match join {
        JoinStyle::Round => {
            let k = cfg.arc_segments(turn);
            let mut pts = Vec::with_capacity(k + 2);
            pts.push(v);
            for j in 0..=k {
                pts.push(v + Rotation2::new(turn * j as f64 / k as f64) * o_in);
            }
            Some(pts)
        }
        JoinStyle::Square => squared(bisector),
        JoinStyle::Miter => {
            if reversal || half_cos <= 0.0 || 1.0 / half_cos > cfg.miter_limit {
                squared(bisector)
            } else {
                Some(vec![v, p1, v + bisector * (h / half_cos), p2])
            }
        }
    }
}
