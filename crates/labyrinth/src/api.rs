//! Curated internal API (UNSTABLE).
//!
//! Important
//! - This is not a public API. It is a convenience surface for the CLI,
//!   benches and examples. Breaking changes are allowed and expected.

// Generation
pub use crate::maze::{
    generate, ChainStats, Direction, MazeConfig, MazeModel, MazeStats, Node, NodeId, Point,
};
// Geometry
pub use crate::geom2::{
    offset_union, parse_path, wedge, Contour, GeomCfg, JoinStyle, ShapeClass, Wedge, WedgeSpec,
};
// Export
pub use crate::export::{
    write_dxf, write_svg, ExportFormat, ExportInput, ExportJob, ExportOptions, ExportOutput,
    ExportProgress, ShapeSet, Stage,
};
pub use crate::error::{DegenerateKind, ExportError, GeometryWarning, MazeError, ParseError};
pub use crate::rng::MazeRng;

/// Model plus cut document in one call.
pub fn generate_and_export(
    config: &MazeConfig,
    options: ExportOptions,
) -> Result<(MazeModel, ExportOutput), ExportError> {
    let model = generate(config)?;
    let output = ExportJob::from_model(&model, options)?.run()?;
    Ok((model, output))
}
