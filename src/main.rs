use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use scene_mirror::config::{CliArgs, ConverterConfig};
use scene_mirror::convert::{MaterialNamer, MeshConverter, MeshReference};
use scene_mirror::scene::{MemoryStage, usda};

const SCENE_FILE: &str = "scene.usda";

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Init tracing
    let filter = if args.verbose {
        EnvFilter::new("scene_mirror=debug")
    } else {
        EnvFilter::new("scene_mirror=info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    let config = ConverterConfig::from(&args);
    let mesh = MeshReference::new(args.input.clone(), args.prim_path.clone()).with_scale(args.scale_vec());

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.output_dir.display())
    })?;
    let scene_path = config.output_dir.join(SCENE_FILE);

    let mut converter = MeshConverter::new(config);
    let mut stage = MemoryStage::new();
    let mut namer = MaterialNamer::new();

    let report = match converter.update_mesh(&mesh, &mut stage, &mut namer) {
        Ok(report) => report,
        Err(e) => {
            error!(%e, "Conversion failed");
            return Err(anyhow::anyhow!(e)).context("scene-mirror conversion failed");
        }
    };

    usda::write_usda(&stage, &scene_path)
        .with_context(|| format!("Failed to write {}", scene_path.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        let copied = report.textures.iter().filter(|t| t.copied).count();
        println!(
            "Done: {} mesh prims, {} materials ({} bound), {}/{} textures copied in {:.2}s -> {}",
            report.geometry_prims.len(),
            report.material_prims.len(),
            report.bound_count,
            copied,
            report.textures.len(),
            start.elapsed().as_secs_f64(),
            scene_path.display()
        );
    }
    Ok(())
}
