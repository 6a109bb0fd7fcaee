//! Fixed-point 2D geometry for cut export.
//!
//! Purpose
//! - Parse path descriptions into point runs, stroke corridor centrelines to
//!   channel outlines, union them, and build the auxiliary cut shapes
//!   (circles, entry wedge).
//!
//! Why fixed point
//! - All emitted coordinates live on an integer grid (`SCALE` units per mm).
//!   Boolean unions then see exactly representable vertices, which keeps
//!   adjacent corridor outlines from producing slivers or cracks.
//! - Floating point is used only transiently: arc flattening and offset
//!   directions; every result is snapped back to the grid.
//!
//! Layout
//! - `types.rs` (grid, `GeomCfg`, `Contour`, `ShapeClass`), `util.rs`
//!   (angles, formatting, circles, intersection tests), `parse.rs`,
//!   `offset.rs` (stroke + union via `geo`), `wedge.rs`.
//!
//! Code cross-refs: `parse_path`, `offset_union`, `wedge`, `GeomCfg`.

mod offset;
mod parse;
mod types;
mod util;
mod wedge;

pub use offset::{degenerate_kind, offset_union, stroke_paths, to_contours, union_all, StrokeSet};
pub use parse::parse_path;
pub use types::{
    to_fixed, to_mm, try_to_fixed, Contour, GeomCfg, IPoint, JoinStyle, ShapeClass, MAX_FIXED,
    SCALE,
};
pub use util::{fmt_mm, has_self_intersection, normalize_angle, regular_polygon, segments_intersect};
pub use wedge::{wedge, Wedge, WedgeSpec};
