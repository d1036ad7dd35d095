use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use polyfit::{reconstruct, Config, PlanarSegment};

#[derive(Parser)]
#[command(name = "polyfit-cli")]
#[command(about = "Diagnostics CLI for the polyfit reconstruction core")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Reconstruct a mesh from a JSON segment list.
    Reconstruct {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load and validate a config file without running a reconstruction.
    ValidateConfig {
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Reconstruct { input, out, config } => run_reconstruct(&input, &out, config.as_deref()),
        Action::ValidateConfig { config } => validate_config(&config),
    }
}

fn run_reconstruct(input: &Path, out: &Path, config_path: Option<&Path>) -> Result<()> {
    let segments = load_segments(input)?;
    let config = match config_path {
        Some(p) => load_config(p)?,
        None => Config::default(),
    };

    let (mesh, diagnostics) = reconstruct(segments, config).context("reconstruction failed")?;

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mesh_json = serde_json::to_string_pretty(&mesh)?;
    std::fs::write(out, mesh_json).with_context(|| format!("writing mesh to {}", out.display()))?;

    tracing::info!(
        objective = diagnostics.objective_value,
        fit_term = diagnostics.fit_term,
        coverage_term = diagnostics.coverage_term,
        complexity_term = diagnostics.complexity_term,
        num_selected_faces = diagnostics.num_selected_faces,
        num_selected_edges = diagnostics.num_selected_edges,
        empty_result = diagnostics.empty_result,
        elapsed_seconds = diagnostics.elapsed_seconds,
        "reconstruct_diagnostics"
    );
    println!("{}", serde_json::to_string_pretty(&json!({ "diagnostics": diagnostics }))?);
    Ok(())
}

fn validate_config(path: &Path) -> Result<()> {
    match load_config(path) {
        Ok(_) => {
            println!("config ok: {}", path.display());
            Ok(())
        }
        Err(e) => {
            println!("config invalid: {}: {e}", path.display());
            Err(e)
        }
    }
}

fn load_segments(path: &Path) -> Result<Vec<PlanarSegment>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let segments: Vec<PlanarSegment> =
        serde_json::from_str(&text).with_context(|| format!("parsing segments from {}", path.display()))?;
    Ok(segments)
}

fn load_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config = serde_json::from_str(&text).with_context(|| format!("parsing config from {}", path.display()))?;
    config.validate().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(config)
}
