use anyhow::{Context, Result};
use labyrinth::api::MazeConfig;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// How a written maze artifact was produced.
#[derive(Clone, Debug)]
pub struct Provenance {
    pub command: &'static str,
    pub config: MazeConfig,
    /// Files the artifact was derived from (config, external path file).
    pub inputs: Vec<String>,
    /// Command-specific knobs (format, join, warning count, ...).
    pub params: Map<String, Value>,
}

impl Provenance {
    pub fn new(command: &'static str, config: MazeConfig) -> Self {
        Self {
            command,
            config,
            inputs: Vec::new(),
            params: Map::new(),
        }
    }

    pub fn with_input<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inputs
            .push(path.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn with_param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Output {
    path: String,
    bytes: u64,
}

/// On-disk layout of a sidecar; seed and difficulty are lifted out of the
/// config so a maze can be regenerated from the sidecar at a glance.
#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    version: &'static str,
    callsite: Callsite,
    command: &'static str,
    seed: u64,
    difficulty: u8,
    config: &'a MazeConfig,
    inputs: &'a [String],
    params: &'a Map<String, Value>,
    output: Output,
}

/// Write `<artifact file name>.provenance.json` next to an already written artifact.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, prov: &Provenance) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let bytes = fs::metadata(artifact)
        .with_context(|| format!("reading artifact {}", artifact.display()))?
        .len();
    let callsite = Location::caller();
    let doc = Sidecar {
        code_rev: current_git_rev(),
        version: labyrinth::VERSION,
        callsite: Callsite {
            file: callsite.file(),
            line: callsite.line(),
        },
        command: prov.command,
        seed: prov.config.seed,
        difficulty: prov.config.difficulty,
        config: &prov.config,
        inputs: &prov.inputs,
        params: &prov.params,
        output: Output {
            path: artifact.to_string_lossy().into_owned(),
            bytes,
        },
    };
    let path = provenance_path(artifact);
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), seed = doc.seed, "provenance written");
    Ok(path)
}

/// `maze.svg` → `maze.svg.provenance.json`, so both cut formats of one maze
/// keep their own record.
fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "artifact".into());
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

fn git_head() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}

/// Build-time `GIT_COMMIT`, then runtime `GIT_COMMIT`, then `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .into_iter()
        .chain(std::env::var("GIT_COMMIT").ok())
        .chain(std::iter::once_with(git_head).flatten())
        .find(|rev| !rev.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
