//! Removable pie-slice cutout at the entry.
//!
//! The slice opens at the entry radius with exactly the corridor width and
//! runs past the outer boundary by one corridor width. Each radial edge
//! carries a small rectangular ear so the cut piece clamps back in place.

use nalgebra::Vector2;

use super::types::{to_fixed, Contour, GeomCfg};
use super::util::regular_polygon;

/// Where the ears sit along the radial edges, as a fraction of the
/// entry-to-outer span.
const EAR_POSITION: f64 = 0.65;

/// Inputs in millimetres and radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WedgeSpec {
    pub entry_angle: f64,
    pub entry_radius: f64,
    pub outer_radius: f64,
    pub corridor_width: f64,
}

/// Cut outline plus the pull hole inside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wedge {
    pub cut: Contour,
    pub hole: Contour,
}

#[inline]
fn polar(theta: f64, r: f64) -> Vector2<f64> {
    Vector2::new(theta.cos(), theta.sin()) * r
}

/// Pie slice with ears and pull hole; `None` for degenerate inputs.
pub fn wedge(spec: &WedgeSpec, cfg: &GeomCfg) -> Option<Wedge> {
    let WedgeSpec {
        entry_angle: theta,
        entry_radius: r_in,
        outer_radius: r_out,
        corridor_width: w,
    } = *spec;
    let finite = [theta, r_in, r_out, w].iter().all(|v| v.is_finite());
    if !finite || r_in <= 0.0 || w <= 0.0 || r_out <= r_in {
        return None;
    }
    let alpha = ((w / 2.0) / r_in).min(1.0).asin();
    let r_far = r_out + w;
    let ear_mid = r_in + EAR_POSITION * (r_out - r_in);
    let ear_lo = ear_mid - w / 4.0;
    let ear_hi = ear_mid + w / 4.0;
    let ears = ear_lo > r_in && ear_hi < r_far;
    let protrude = w / 3.0;

    let mut cut = Contour::closed(Vec::new());

    // Right edge, outward.
    let right = theta - alpha;
    let e = polar(right, 1.0);
    let away = Vector2::new(e.y, -e.x) * protrude;
    cut.push(to_fixed(e * r_in));
    if ears {
        cut.push(to_fixed(e * ear_lo));
        cut.push(to_fixed(e * ear_lo + away));
        cut.push(to_fixed(e * ear_hi + away));
        cut.push(to_fixed(e * ear_hi));
    }

    // Wide end.
    let n = cfg.arc_segments(2.0 * alpha);
    for k in 0..=n {
        let th = right + 2.0 * alpha * k as f64 / n as f64;
        cut.push(to_fixed(polar(th, r_far)));
    }

    // Left edge, inward.
    let left = theta + alpha;
    let e = polar(left, 1.0);
    let away = Vector2::new(-e.y, e.x) * protrude;
    if ears {
        cut.push(to_fixed(e * ear_hi));
        cut.push(to_fixed(e * ear_hi + away));
        cut.push(to_fixed(e * ear_lo + away));
        cut.push(to_fixed(e * ear_lo));
    }
    cut.push(to_fixed(e * r_in));
    if cut.points.len() > 1 && cut.first() == cut.last() {
        cut.points.pop();
    }
    if cut.points.len() < 3 {
        return None;
    }

    let r_hole_center = (r_in + r_out) / 2.0;
    let chord = 2.0 * r_hole_center * alpha.sin();
    let hole_radius = (w / 4.0).min(chord / 4.0);
    let hole = regular_polygon(polar(theta, r_hole_center), hole_radius, cfg.circle_segments);

    Some(Wedge { cut, hole })
}
