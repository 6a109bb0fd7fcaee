//! Polar labyrinth generation and cut-geometry export.
//!
//! Pipeline
//! - `maze`: config → polar graph → growing-tree spanning tree → entry
//!   selection → corridor/solution path descriptions (`MazeModel`).
//! - `geom2`: path parsing, stroking and union on a fixed-point grid.
//! - `export`: staged `ExportJob` producing SVG or DXF documents.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API; `api`
//!   is the curated surface the CLI and benches import from.

pub mod api;
pub mod error;
pub mod export;
pub mod geom2;
pub mod maze;
pub mod rng;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{ExportError, GeometryWarning, MazeError, ParseError};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::export::{ExportFormat, ExportJob, ExportOptions, ExportOutput};
    pub use crate::geom2::{parse_path, GeomCfg, JoinStyle, ShapeClass};
    pub use crate::maze::{generate, MazeConfig, MazeModel};
    pub use crate::rng::MazeRng;
    pub use nalgebra::Vector2 as Vec2;
}
