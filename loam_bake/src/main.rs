mod obj;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glam::Vec3;
use loam_terrain::{GenerationConfig, GenerationReport, Generator, MemorySink};
use serde::Serialize;

/// Bake a procedural terrain into OBJ sections
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON generation config; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(long, default_value = "terrain_out")]
    out: PathBuf,

    /// Override the configured seed (0 draws a random one)
    #[arg(long)]
    seed: Option<u32>,

    /// World origin as x,y,z
    #[arg(long, value_parser = parse_origin, default_value = "0,0,0")]
    origin: Vec3,
}

fn parse_origin(text: &str) -> Result<Vec3, String> {
    let parts: Vec<f32> = text
        .split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|e| format!("bad coordinate '{part}': {e}")))
        .collect::<Result<_, _>>()?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z, got '{text}'")),
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    config: &'a GenerationConfig,
    origin: Vec3,
    report: &'a GenerationReport,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut generator = Generator::new(config, args.origin)?;
    let mut sink = MemorySink::default();
    let report = generator.generate(&mut sink)?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;

    for (section, mesh) in &sink.sections {
        let path = args.out.join(format!("section_{section}.obj"));
        let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        obj::write_section_obj(BufWriter::new(file), *section, &mesh.buffers())
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let summary = Summary {
        config: generator.config(),
        origin: generator.origin(),
        report: &report,
    };
    let summary_path = args.out.join("summary.json");
    let file = File::create(&summary_path).with_context(|| format!("creating {}", summary_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &summary)?;

    log::info!(
        "Wrote {} sections to {} (seed {})",
        sink.sections.len(),
        args.out.display(),
        report.seed
    );

    Ok(())
}
