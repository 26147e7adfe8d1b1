//! Compiled shader embedding tool
//!
//! Compiles HLSL (fxc) or Vulkan GLSL (glslc) shaders in both debug and
//! release configurations and writes each binary as a hex literal list.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use rsc_build::BuildMode;
use rsc_build::embed::{Toolchain, compile_and_embed};
use rsc_build::predefined::{DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR, PREDEFINED_HLSL_SHADERS, PREDEFINED_VULKAN_SHADERS};

/// Command-line arguments for the embedding tool
#[derive(Parser)]
#[command(version, about = "Compiles shaders and embeds the binaries as hex literals")]
struct Args {
    /// Compiler to use (fxc, glslc)
    toolchain: Toolchain,

    /// Shader files relative to the source directory (defaults to the predefined list)
    files: Vec<String>,

    #[arg(long, default_value = DEFAULT_SOURCE_DIR)]
    source_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Path of the compiler executable, if not on PATH
    #[arg(long)]
    compiler: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let files: Vec<String> = if args.files.is_empty() {
        let predefined = match args.toolchain {
            Toolchain::Fxc => PREDEFINED_HLSL_SHADERS,
            Toolchain::Glslc => PREDEFINED_VULKAN_SHADERS,
        };
        predefined.iter().map(|f| f.to_string()).collect()
    } else {
        args.files.clone()
    };

    std::fs::create_dir_all(&args.output_dir)?;

    let mut failures = 0;
    for file in &files {
        let source = args.source_dir.join(file);
        for mode in [BuildMode::Debug, BuildMode::Release] {
            if let Err(e) = compile_and_embed(args.toolchain, args.compiler.as_deref(), &source, &args.output_dir, mode) {
                eprintln!("Error embedding '{file}' ({}): {e}", mode.suffix());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        eprintln!("{failures} compilation(s) failed");
        process::exit(1);
    }
    Ok(())
}
