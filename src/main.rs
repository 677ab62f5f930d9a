//! fluidmesh - mesh fluid volumes from a scene file
//!
//! Loads a TOML scene plus the atlas metadata and fluid registry it points at,
//! meshes every volume and writes a JSON report.

mod config;
mod scene;

use anyhow::{Context, Result};
use clap::Parser;
use config::SceneConfig;
use fluidmesh_assets::{fluids_from_file, SpriteAtlas};
use scene::SceneMesher;
use std::{fs, path::PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fluid cuboid mesher", long_about = None)]
struct Args {
    /// Scene TOML describing the atlas, fluid registry and volumes
    #[arg(short, long)]
    scene: PathBuf,

    /// Report path; overrides the scene's `output` (stdout when neither is set)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include every vertex in the report
    #[arg(long)]
    dump_vertices: bool,
}

fn main() -> Result<()> {
    // WARN by default; override with RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let scene = SceneConfig::load_from_path(&args.scene)?;
    let atlas = SpriteAtlas::load_file(&scene.atlas)
        .with_context(|| format!("Failed to load atlas {}", scene.atlas.display()))?;
    let registry = fluids_from_file(&scene.fluids)
        .with_context(|| format!("Failed to load fluids {}", scene.fluids.display()))?;
    info!(
        sprites = atlas.len(),
        fluids = registry.len(),
        volumes = scene.volumes.len(),
        "loaded scene"
    );

    let report = SceneMesher::new(&registry, &atlas).run(&scene, args.dump_vertices)?;
    let json = serde_json::to_string_pretty(&report)?;

    match args.output.or(scene.output) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create directory {parent:?}"))?;
                }
            }
            fs::write(&path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
