//! OpenGL shader minification tool
//!
//! Processes the OpenGL programs of a shader set and writes embeddable
//! `R"r( ... )r"` headers. Release runs minify the sources and regenerate the
//! uniform/attribute macro header; debug runs copy the sources verbatim.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use rsc_build::batch::write_session_json;
use rsc_build::predefined::{DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR};
use rsc_build::{BuildMode, ShaderSetManifest, run_batch};

/// Command-line arguments for the minifier
#[derive(Parser)]
#[command(version, about = "Minifies GLSL programs into embeddable headers")]
struct Args {
    /// YAML manifest describing the shader set (defaults to the predefined programs)
    #[arg(long, short)]
    manifest: Option<PathBuf>,

    /// Shader source directory, used without a manifest
    #[arg(long, default_value = DEFAULT_SOURCE_DIR)]
    source_dir: PathBuf,

    /// Output directory, used without a manifest
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Copy sources verbatim instead of minifying them
    #[arg(long)]
    debug: bool,

    /// Write the collected macro records and shared aliases as JSON
    #[arg(long)]
    dump_json: Option<PathBuf>,

    /// Log every file processed
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let subscriber = tracing_subscriber::fmt().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let manifest = match &args.manifest {
        Some(path) => ShaderSetManifest::from_file(path)?,
        None => ShaderSetManifest::predefined(&args.source_dir, &args.output_dir),
    };
    let mode = if args.debug { BuildMode::Debug } else { BuildMode::Release };

    let outcome = run_batch(&manifest, mode)?;
    if let Some(path) = &args.dump_json {
        write_session_json(&outcome.session, path)?;
    }

    let report = &outcome.report;
    println!(
        "Processed {} program(s), skipped {}, wrote {} file(s)",
        report.processed,
        report.skipped,
        report.written.len()
    );
    if report.skipped > 0 || report.failed_writes > 0 {
        process::exit(1);
    }
    Ok(())
}
