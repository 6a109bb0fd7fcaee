//! Outline SVG serializer.
//!
//! One `<path>` per non-empty shape class. Corridors are filled pockets
//! (`evenodd`, so union holes stay open); every other class is a hairline
//! through-cut. Pure function, returns a `String`.

use std::fmt::Write;

use crate::geom2::{fmt_mm, to_mm, Contour, ShapeClass};

use super::ShapeSet;

/// Stroke width of through-cut outlines (mm).
const HAIRLINE: f64 = 0.1;

/// `M x y L x y ... [Z]` for every contour, millimetres.
fn contours_to_path_d(contours: &[Contour]) -> String {
    let mut d = String::new();
    for c in contours {
        for (i, p) in c.points.iter().enumerate() {
            let q = to_mm(*p);
            if !d.is_empty() {
                d.push(' ');
            }
            let cmd = if i == 0 { "M" } else { "L" };
            let _ = write!(d, "{cmd} {} {}", fmt_mm(q.x), fmt_mm(q.y));
        }
        if c.closed && !c.points.is_empty() {
            d.push_str(" Z");
        }
    }
    d
}

/// Physical-size SVG centred on the disc (`D = diameter + padding`).
pub fn write_svg(shapes: &ShapeSet, diameter: f64, padding: f64) -> String {
    let size = diameter + padding;
    let half = fmt_mm(-size / 2.0);
    let size = fmt_mm(size);
    let mut out = String::new();

    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}mm" height="{size}mm" viewBox="{half} {half} {size} {size}">"#,
    );

    for class in ShapeClass::ALL {
        let Some(contours) = shapes.get(&class).filter(|c| !c.is_empty()) else {
            continue;
        };
        let d = contours_to_path_d(contours);
        let style = if class.is_filled() {
            r#"fill="black" fill-rule="evenodd" stroke="none""#.to_string()
        } else {
            format!(r#"fill="none" stroke="red" stroke-width="{}""#, fmt_mm(HAIRLINE))
        };
        let _ = writeln!(
            out,
            r#"  <path id="{}" data-layer="{}" {style} d="{d}"/>"#,
            class.svg_id(),
            class.layer(),
        );
    }

    let _ = writeln!(out, "</svg>");
    out
}
