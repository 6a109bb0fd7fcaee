use std::f64::consts::{PI, TAU};

use nalgebra::Vector2;

use super::types::{to_fixed, Contour, IPoint};

/// Normalize an angle into (−π, π].
#[inline]
pub fn normalize_angle(a: f64) -> f64 {
    let r = a.rem_euclid(TAU);
    if r > PI {
        r - TAU
    } else {
        r
    }
}

/// Millimetre value with at most three decimals, trailing zeros trimmed.
pub fn fmt_mm(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// Regular `segments`-gon approximating a circle (CCW, closed).
pub fn regular_polygon(center: Vector2<f64>, radius: f64, segments: usize) -> Contour {
    let n = segments.max(3);
    let mut c = Contour::closed(Vec::with_capacity(n));
    for k in 0..n {
        let th = TAU * k as f64 / n as f64;
        c.push(to_fixed(center + Vector2::new(th.cos(), th.sin()) * radius));
    }
    c
}

/// Orientation of `c` relative to the line `a → b` (exact).
#[inline]
pub fn orient(a: IPoint, b: IPoint, c: IPoint) -> i128 {
    let abx = b.x as i128 - a.x as i128;
    let aby = b.y as i128 - a.y as i128;
    let acx = c.x as i128 - a.x as i128;
    let acy = c.y as i128 - a.y as i128;
    abx * acy - aby * acx
}

#[inline]
fn on_segment(a: IPoint, b: IPoint, p: IPoint) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed-segment intersection test, touching included.
pub fn segments_intersect(a: IPoint, b: IPoint, c: IPoint, d: IPoint) -> bool {
    let d1 = orient(c, d, a).signum();
    let d2 = orient(c, d, b).signum();
    let d3 = orient(a, b, c).signum();
    let d4 = orient(a, b, d).signum();
    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }
    (d1 == 0 && on_segment(c, d, a))
        || (d2 == 0 && on_segment(c, d, b))
        || (d3 == 0 && on_segment(a, b, c))
        || (d4 == 0 && on_segment(a, b, d))
}

/// Whether two non-adjacent segments of the run touch or cross.
///
/// Quadratic; fine for corridor chains and cut contours.
pub fn has_self_intersection(c: &Contour) -> bool {
    let pts = &c.points;
    let n = pts.len();
    if n < 3 {
        return false;
    }
    let seg_count = if c.closed { n } else { n - 1 };
    let seg = |i: usize| (pts[i], pts[(i + 1) % n]);
    for i in 0..seg_count {
        for j in (i + 2)..seg_count {
            if c.closed && i == 0 && j == seg_count - 1 {
                continue;
            }
            let (a, b) = seg(i);
            let (p, q) = seg(j);
            if segments_intersect(a, b, p, q) {
                return true;
            }
        }
    }
    false
}
