//! Cut-geometry export: corridor path → unioned contours → SVG or DXF.
//!
//! Purpose
//! - Turn a corridor path description (usually `MazeModel::corridor_path`)
//!   plus the physical configuration into one cut document.
//!
//! Why a staged job
//! - The union of a large maze is the only slow step. `ExportJob` runs the
//!   pipeline `Parse → Offset → Union → Serialize` one stage per `advance()`,
//!   so a host can report progress, interleave other work, or drop the job
//!   between stages. The document is returned as a `String`; nothing touches
//!   the filesystem, so an abandoned job leaves nothing behind.
//!
//! Model
//! - Shape classes (`ShapeClass`) never mix: corridors are unioned among
//!   themselves; boundary, holes and wedge are emitted as-is.
//! - Geometry warnings do not abort; they ride along in `ExportOutput`.
//!
//! Code cross-refs: `ExportJob`, `write_svg`, `write_dxf`, `offset_union`.

mod dxf;
mod svg;

pub use dxf::write_dxf;
pub use svg::write_svg;

use std::collections::BTreeMap;
use std::ops::ControlFlow;

use geo::MultiPolygon;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, GeometryWarning};
use crate::geom2::{
    parse_path, regular_polygon, stroke_paths, to_contours, union_all, wedge, Contour, GeomCfg,
    JoinStyle, ShapeClass, WedgeSpec,
};
use crate::maze::{MazeConfig, MazeModel, Point};

/// Contours keyed by shape class, in serialization order.
pub type ShapeSet = BTreeMap<ShapeClass, Vec<Contour>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Svg,
    Dxf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Dxf => "dxf",
        }
    }
}

/// Output knobs. `join` overrides the config's `cornerRounding`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub join: Option<JoinStyle>,
    /// Margin added to the diameter for the SVG canvas (mm).
    pub padding_mm: f64,
    #[serde(skip)]
    pub geom: GeomCfg,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Svg,
            join: None,
            padding_mm: 10.0,
            geom: GeomCfg::default(),
        }
    }
}

/// What to cut: a corridor description, its physical config and the entry point.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportInput {
    pub corridor_path: String,
    pub config: MazeConfig,
    /// Entry point (mm); enables the entry hole and the wedge.
    pub start: Option<Point>,
}

impl From<&MazeModel> for ExportInput {
    fn from(model: &MazeModel) -> Self {
        Self {
            corridor_path: model.corridor_path.clone(),
            config: model.config.clone(),
            start: Some(model.start_point),
        }
    }
}

/// Pipeline stage; the job's current stage is the next one to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Parse,
    Offset,
    Union,
    Serialize,
    Done,
}

impl Stage {
    pub const COUNT: usize = 4;

    fn index(self) -> usize {
        match self {
            Stage::Parse => 0,
            Stage::Offset => 1,
            Stage::Union => 2,
            Stage::Serialize => 3,
            Stage::Done => 4,
        }
    }
}

/// Coarse progress after one `advance()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExportProgress {
    pub completed: Stage,
    pub next: Stage,
}

impl ExportProgress {
    /// Completed share of the pipeline in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        self.next.index() as f64 / Stage::COUNT as f64
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportOutput {
    pub format: ExportFormat,
    pub document: String,
    pub warnings: Vec<GeometryWarning>,
    pub shapes: ShapeSet,
}

/// Resumable export pipeline.
#[derive(Debug)]
pub struct ExportJob {
    input: ExportInput,
    options: ExportOptions,
    stage: Stage,
    paths: Vec<Contour>,
    strokes: Vec<MultiPolygon<f64>>,
    shapes: ShapeSet,
    warnings: Vec<GeometryWarning>,
    document: String,
}

impl ExportJob {
    /// Validate the configuration and set up a job at `Stage::Parse`.
    pub fn new(input: ExportInput, options: ExportOptions) -> Result<Self, ExportError> {
        input.config.validate()?;
        Ok(Self {
            input,
            options,
            stage: Stage::Parse,
            paths: Vec::new(),
            strokes: Vec::new(),
            shapes: ShapeSet::new(),
            warnings: Vec::new(),
            document: String::new(),
        })
    }

    pub fn from_model(model: &MazeModel, options: ExportOptions) -> Result<Self, ExportError> {
        Self::new(ExportInput::from(model), options)
    }

    /// Next stage to run.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn join(&self) -> JoinStyle {
        self.options
            .join
            .unwrap_or_else(|| JoinStyle::from_corner_rounding(self.input.config.corner_rounding))
    }

    /// Run exactly one stage. A finished job stays at `Stage::Done`.
    pub fn advance(&mut self) -> Result<ExportProgress, ExportError> {
        let completed = self.stage;
        let geom = self.options.geom;
        match self.stage {
            Stage::Parse => {
                self.paths = parse_path(&self.input.corridor_path, &geom)?;
                tracing::debug!(subpaths = self.paths.len(), "export: parsed");
                self.stage = Stage::Offset;
            }
            Stage::Offset => {
                let half = self.input.config.corridor_width / 2.0;
                let set = stroke_paths(&self.paths, half, self.join(), &geom);
                self.strokes = set.strokes;
                self.warnings = set.warnings;
                tracing::debug!(
                    strokes = self.strokes.len(),
                    warnings = self.warnings.len(),
                    "export: offset"
                );
                self.stage = Stage::Union;
            }
            Stage::Union => {
                let merged = union_all(std::mem::take(&mut self.strokes));
                let corridors = to_contours(&merged);
                tracing::debug!(contours = corridors.len(), "export: union");
                self.shapes = self.auxiliary_shapes();
                self.shapes.insert(ShapeClass::Corridors, corridors);
                self.stage = Stage::Serialize;
            }
            Stage::Serialize => {
                self.document = match self.options.format {
                    ExportFormat::Svg => {
                        write_svg(&self.shapes, self.input.config.diameter, self.options.padding_mm)
                    }
                    ExportFormat::Dxf => write_dxf(&self.shapes),
                };
                tracing::debug!(bytes = self.document.len(), "export: serialized");
                self.stage = Stage::Done;
            }
            Stage::Done => {}
        }
        Ok(ExportProgress {
            completed,
            next: self.stage,
        })
    }

    /// Boundary, holes and (optionally) the entry wedge.
    fn auxiliary_shapes(&self) -> ShapeSet {
        let cfg = &self.input.config;
        let geom = &self.options.geom;
        let n = geom.circle_segments;
        let mut shapes = ShapeSet::new();
        shapes.insert(
            ShapeClass::Boundary,
            vec![regular_polygon(Vector2::zeros(), cfg.radius(), n)],
        );
        shapes.insert(
            ShapeClass::CenterHole,
            vec![regular_polygon(Vector2::zeros(), cfg.hole_radius, n)],
        );
        if let Some(start) = self.input.start {
            let p: Vector2<f64> = start.into();
            shapes.insert(
                ShapeClass::EntryHole,
                vec![regular_polygon(p, cfg.hole_radius, n)],
            );
            if cfg.show_entry_wedge {
                let spec = WedgeSpec {
                    entry_angle: p.y.atan2(p.x),
                    entry_radius: p.norm(),
                    outer_radius: cfg.radius(),
                    corridor_width: cfg.corridor_width,
                };
                match wedge(&spec, geom) {
                    Some(w) => {
                        shapes.insert(ShapeClass::Wedge, vec![w.cut]);
                        shapes.insert(ShapeClass::WedgeHole, vec![w.hole]);
                    }
                    None => tracing::warn!(?spec, "entry wedge is degenerate; omitted"),
                }
            }
        }
        shapes
    }

    /// Run to completion.
    pub fn run(self) -> Result<ExportOutput, ExportError> {
        self.run_with(|_| ControlFlow::Continue(()))
    }

    /// Run to completion, asking `on_progress` after each stage whether to go on.
    ///
    /// `Break` before the last stage yields `ExportError::Cancelled` naming the
    /// stage that would have run next.
    pub fn run_with<F>(mut self, mut on_progress: F) -> Result<ExportOutput, ExportError>
    where
        F: FnMut(&ExportProgress) -> ControlFlow<()>,
    {
        while self.stage != Stage::Done {
            let progress = self.advance()?;
            if on_progress(&progress).is_break() && progress.next != Stage::Done {
                tracing::debug!(stage = ?progress.next, "export cancelled");
                return Err(ExportError::Cancelled {
                    stage: progress.next,
                });
            }
        }
        Ok(ExportOutput {
            format: self.options.format,
            document: self.document,
            warnings: self.warnings,
            shapes: self.shapes,
        })
    }
}

#[cfg(test)]
mod tests;
