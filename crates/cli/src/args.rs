use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use labyrinth::api::{ExportFormat, JoinStyle, MazeConfig};
use std::fs;
use std::path::PathBuf;

/// Maze configuration: optional JSON file, then per-field overrides.
#[derive(Args, Clone, Debug, Default)]
pub struct MazeArgs {
    /// JSON file with MazeConfig fields (camelCase); missing fields use defaults
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Disc diameter in mm
    #[arg(long)]
    pub diameter: Option<f64>,
    #[arg(long)]
    pub wall_width: Option<f64>,
    #[arg(long)]
    pub corridor_width: Option<f64>,
    /// 1 (easy) to 5 (hard)
    #[arg(long)]
    pub difficulty: Option<u8>,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub hole_radius: Option<f64>,
    /// Miter instead of round corridor corners
    #[arg(long)]
    pub no_corner_rounding: bool,
    /// Add the removable entry wedge
    #[arg(long)]
    pub wedge: bool,
}

impl MazeArgs {
    /// File values (or defaults), overridden by whichever flags were given.
    pub fn resolve(&self) -> Result<MazeConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let bytes =
                    fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_slice::<MazeConfig>(&bytes)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => MazeConfig::default(),
        };
        if let Some(v) = self.diameter {
            cfg.diameter = v;
        }
        if let Some(v) = self.wall_width {
            cfg.wall_width = v;
        }
        if let Some(v) = self.corridor_width {
            cfg.corridor_width = v;
        }
        if let Some(v) = self.difficulty {
            cfg.difficulty = v;
        }
        if let Some(v) = self.seed {
            cfg.seed = v;
        }
        if let Some(v) = self.hole_radius {
            cfg.hole_radius = v;
        }
        if self.no_corner_rounding {
            cfg.corner_rounding = false;
        }
        if self.wedge {
            cfg.show_entry_wedge = true;
        }
        Ok(cfg)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Svg,
    Dxf,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Svg => ExportFormat::Svg,
            FormatArg::Dxf => ExportFormat::Dxf,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinArg {
    Round,
    Miter,
    Square,
}

impl From<JoinArg> for JoinStyle {
    fn from(j: JoinArg) -> Self {
        match j {
            JoinArg::Round => JoinStyle::Round,
            JoinArg::Miter => JoinStyle::Miter,
            JoinArg::Square => JoinStyle::Square,
        }
    }
}
