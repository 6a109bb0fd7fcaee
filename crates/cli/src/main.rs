use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use labyrinth::api::{
    generate, ExportFormat, ExportInput, ExportJob, ExportOptions, MazeConfig,
};
use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod args;
mod provenance;

use args::{FormatArg, JoinArg, MazeArgs};
use provenance::{write_sidecar, Provenance};

#[derive(Parser)]
#[command(name = "labyrinth")]
#[command(about = "Polar labyrinth generator and cut-file exporter")]
struct Cmd {
    /// Debug-level logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Generate a maze and write the model as JSON (stdout without --out)
    Generate {
        #[command(flatten)]
        maze: MazeArgs,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write an SVG or DXF cut file
    Export {
        #[command(flatten)]
        maze: MazeArgs,
        #[arg(long, value_enum, default_value_t = FormatArg::Svg)]
        format: FormatArg,
        /// Override the join style implied by corner rounding
        #[arg(long, value_enum)]
        join: Option<JoinArg>,
        /// Canvas margin around the disc (mm, SVG only)
        #[arg(long, default_value_t = 10.0)]
        padding: f64,
        /// Cut an external corridor path description instead of generating one
        #[arg(long)]
        path_file: Option<PathBuf>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print version and code revision as JSON
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Generate { maze, out } => generate_cmd(&maze, out.as_deref()),
        Action::Export {
            maze,
            format,
            join,
            padding,
            path_file,
            out,
        } => {
            let options = ExportOptions {
                format: format.into(),
                join: join.map(Into::into),
                padding_mm: padding,
                ..Default::default()
            };
            export_cmd(&maze, options, path_file.as_deref(), &out).map(|_| ())
        }
        Action::Report => report(),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}

fn provenance(command: &'static str, maze: &MazeArgs, cfg: &MazeConfig) -> Provenance {
    let prov = Provenance::new(command, cfg.clone());
    match &maze.config {
        Some(path) => prov.with_input(path),
        None => prov,
    }
}

fn generate_cmd(maze: &MazeArgs, out: Option<&Path>) -> Result<()> {
    let cfg = maze.resolve()?;
    let model = generate(&cfg).context("generating maze")?;
    tracing::info!(
        seed = cfg.seed,
        rings = model.stats.rings,
        nodes = model.stats.nodes,
        entry_score = model.stats.entry_score,
        "generated"
    );
    let json = serde_json::to_string_pretty(&model)?;
    match out {
        None => println!("{json}"),
        Some(out) => {
            ensure_parent(out)?;
            fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
            let prov = provenance("generate", maze, &cfg)
                .with_param("entryScore", model.stats.entry_score);
            write_sidecar(out, &prov)?;
        }
    }
    Ok(())
}

/// Run the export job to completion, then write the document and its sidecar.
fn export_cmd(
    maze: &MazeArgs,
    options: ExportOptions,
    path_file: Option<&Path>,
    out: &Path,
) -> Result<PathBuf> {
    let cfg: MazeConfig = maze.resolve()?;
    let input = match path_file {
        Some(path) => ExportInput {
            corridor_path: fs::read_to_string(path)
                .with_context(|| format!("reading path file {}", path.display()))?,
            config: cfg.clone(),
            start: None,
        },
        None => ExportInput::from(&generate(&cfg).context("generating maze")?),
    };
    let format: ExportFormat = options.format;
    let join = serde_json::to_value(options.join)?;
    let job = ExportJob::new(input, options).context("preparing export")?;
    let output = job
        .run_with(|p| {
            tracing::info!(stage = ?p.completed, progress = p.fraction(), "export");
            ControlFlow::Continue(())
        })
        .context("exporting")?;
    for w in &output.warnings {
        tracing::warn!(subpath = w.subpath, kind = ?w.kind, "geometry warning");
    }

    ensure_parent(out)?;
    fs::write(out, &output.document).with_context(|| format!("writing {}", out.display()))?;
    let mut prov = provenance("export", maze, &cfg)
        .with_param("format", format.extension())
        .with_param("join", join)
        .with_param("warnings", output.warnings.len());
    if let Some(path) = path_file {
        prov = prov.with_input(path);
    }
    write_sidecar(out, &prov)?;
    tracing::info!(out = %out.display(), bytes = output.document.len(), "written");
    Ok(out.to_path_buf())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "version": labyrinth::VERSION,
        "defaults": MazeConfig::default(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
