use anyhow::{Context, Result};
use clap::Parser;
use glb2mz3::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "glb2mz3")]
#[command(about = "Merge every mesh of a GLB file into a single MZ3 surface")]
#[command(version)]
struct Cli {
    /// Input .glb file (or .mz3 file with --inspect)
    input: PathBuf,

    /// Output .mz3 file (defaults to the input path with an .mz3 extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Never emit per-primitive labels or the region lookup table
    #[arg(long)]
    no_annotation: bool,

    /// Print the header and lookup of an existing .mz3 file instead of converting
    #[arg(long, conflicts_with_all = ["output", "no_annotation"])]
    inspect: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    if cli.inspect {
        return inspect(&cli.input);
    }

    let output = cli.output.unwrap_or_else(|| default_output(&cli.input));
    let mode = if cli.no_annotation { AnnotationMode::Disabled } else { AnnotationMode::Auto };
    convert(&cli.input, &output, &merge::Config::default().with_annotation(mode))
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("mz3")
}

fn convert(input: &Path, output: &Path, cfg: &merge::Config) -> Result<()> {
    let start = Instant::now();
    tracing::info!("Converting {:?} -> {:?}", input, output);

    let data = std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    let mesh = glb_to_merged(&data, cfg).with_context(|| format!("Failed to convert {:?}", input))?;
    let buffer = encode::encode_mesh(&mesh).context("Failed to encode MZ3")?;
    std::fs::write(output, &buffer).with_context(|| format!("Failed to write {:?}", output))?;

    tracing::info!(
        "Wrote {} vertices, {} faces ({} bytes) in {:.1} ms",
        mesh.num_vertices(),
        mesh.num_faces(),
        buffer.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let data = std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    let mz3 = decode(&data).with_context(|| format!("Failed to parse {:?}", input))?;

    println!("attributes: {:?}", mz3.header.attr);
    println!("faces:      {}", mz3.header.num_faces);
    println!("vertices:   {}", mz3.header.num_vertices);
    println!("skip:       {}", mz3.header.num_skip);
    println!("layers:     {}", mz3.num_scalar_layers());
    if let Some(lookup) = &mz3.lookup {
        match mz3.annotation() {
            Ok(Some(annotation)) if !annotation.is_empty() => {
                println!("regions:");
                for (label, region) in annotation.iter() {
                    println!("  {:>4} {} ({}, {}, {})", label, region.name, region.r, region.g, region.b);
                }
            }
            _ => println!("lookup:     {}", lookup),
        }
    }
    Ok(())
}
