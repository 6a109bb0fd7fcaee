//! DXF R12 (AC1009) ASCII serializer.
//!
//! Group-code/value line pairs; one `POLYLINE`/`VERTEX…`/`SEQEND` group per
//! contour. DXF is y-up, so y is mirrored to keep the entry at the top as in
//! the SVG output.
//!
//! `$INSUNITS` (millimetres) is an R2000 header variable written into an R12
//! file on purpose: newer readers pick up the unit, strict R12 readers skip
//! the unknown variable.

use std::fmt::Write;

use crate::geom2::{fmt_mm, to_mm, Contour, IPoint, ShapeClass};

use super::ShapeSet;

/// ACI colour per layer.
fn layer_color(layer: &str) -> u8 {
    match layer {
        "CORRIDORS" => 1,
        "WEDGE_CUT" => 3,
        "WEDGE_HOLE" => 5,
        _ => 7,
    }
}

#[inline]
fn pair(out: &mut String, code: u16, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{code:>3}");
    let _ = writeln!(out, "{value}");
}

/// Layers in table order: the two fixed ones, then wedge layers if used.
fn layers(shapes: &ShapeSet) -> Vec<&'static str> {
    let mut names = vec!["CORRIDORS", "BOUNDARY"];
    for class in ShapeClass::ALL {
        let used = shapes.get(&class).is_some_and(|c| !c.is_empty());
        if used && !names.contains(&class.layer()) {
            names.push(class.layer());
        }
    }
    names
}

/// Drawing extents (mm, y mirrored); zero box when empty.
fn extents(shapes: &ShapeSet) -> ((f64, f64), (f64, f64)) {
    let mut bounds = shapes.values().flatten().filter_map(Contour::bounds);
    let Some(first) = bounds.next() else {
        return ((0.0, 0.0), (0.0, 0.0));
    };
    let (lo, hi) = bounds.fold(first, |(lo, hi), (a, b)| {
        (
            IPoint::new(lo.x.min(a.x), lo.y.min(a.y)),
            IPoint::new(hi.x.max(b.x), hi.y.max(b.y)),
        )
    });
    let (lo, hi) = (to_mm(lo), to_mm(hi));
    ((lo.x, -hi.y), (hi.x, -lo.y))
}

fn write_polyline(out: &mut String, layer: &str, c: &Contour) {
    pair(out, 0, "POLYLINE");
    pair(out, 8, layer);
    pair(out, 66, 1);
    pair(out, 70, if c.closed { 1 } else { 0 });
    pair(out, 10, "0.0");
    pair(out, 20, "0.0");
    pair(out, 30, "0.0");
    for p in &c.points {
        let q = to_mm(*p);
        pair(out, 0, "VERTEX");
        pair(out, 8, layer);
        pair(out, 10, fmt_mm(q.x));
        pair(out, 20, fmt_mm(-q.y));
        pair(out, 30, "0.0");
    }
    pair(out, 0, "SEQEND");
    pair(out, 8, layer);
}

/// Full DXF document for a shape set. Infallible.
pub fn write_dxf(shapes: &ShapeSet) -> String {
    let mut out = String::new();
    let ((min_x, min_y), (max_x, max_y)) = extents(shapes);

    pair(&mut out, 0, "SECTION");
    pair(&mut out, 2, "HEADER");
    pair(&mut out, 9, "$ACADVER");
    pair(&mut out, 1, "AC1009");
    pair(&mut out, 9, "$INSUNITS");
    pair(&mut out, 70, 4);
    pair(&mut out, 9, "$EXTMIN");
    pair(&mut out, 10, fmt_mm(min_x));
    pair(&mut out, 20, fmt_mm(min_y));
    pair(&mut out, 9, "$EXTMAX");
    pair(&mut out, 10, fmt_mm(max_x));
    pair(&mut out, 20, fmt_mm(max_y));
    pair(&mut out, 0, "ENDSEC");

    pair(&mut out, 0, "SECTION");
    pair(&mut out, 2, "TABLES");
    pair(&mut out, 0, "TABLE");
    pair(&mut out, 2, "LTYPE");
    pair(&mut out, 70, 1);
    pair(&mut out, 0, "LTYPE");
    pair(&mut out, 2, "CONTINUOUS");
    pair(&mut out, 70, 0);
    pair(&mut out, 3, "Solid line");
    pair(&mut out, 72, 65);
    pair(&mut out, 73, 0);
    pair(&mut out, 40, "0.0");
    pair(&mut out, 0, "ENDTAB");
    let names = layers(shapes);
    pair(&mut out, 0, "TABLE");
    pair(&mut out, 2, "LAYER");
    pair(&mut out, 70, names.len());
    for name in &names {
        pair(&mut out, 0, "LAYER");
        pair(&mut out, 2, name);
        pair(&mut out, 70, 0);
        pair(&mut out, 62, layer_color(name));
        pair(&mut out, 6, "CONTINUOUS");
    }
    pair(&mut out, 0, "ENDTAB");
    pair(&mut out, 0, "ENDSEC");

    pair(&mut out, 0, "SECTION");
    pair(&mut out, 2, "ENTITIES");
    for (class, contours) in shapes {
        for c in contours.iter().filter(|c| !c.points.is_empty()) {
            write_polyline(&mut out, class.layer(), c);
        }
    }
    pair(&mut out, 0, "ENDSEC");
    pair(&mut out, 0, "EOF");
    out
}
