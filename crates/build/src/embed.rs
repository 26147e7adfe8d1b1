//! Compiled shader embedding
//!
//! Runs an external shader compiler (fxc for HLSL, glslc for Vulkan GLSL) and
//! turns the compiled binary into a comma-separated hex literal list that can
//! be `#include`d into an array initializer.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use crate::batch::BuildMode;
use crate::{Error, Result};

/// How compiled bytes are grouped into literals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordPacking {
    /// One literal per byte
    Byte,
    /// One literal per little-endian 32-bit word (SPIR-V)
    Word32Le,
}

/// Formats `data` as `0x..` literals separated by `,\n`, with a trailing line feed
///
/// # Errors
/// [`WordPacking::Word32Le`] requires the length to be a multiple of four.
pub fn encode_hex_literal(data: &[u8], packing: WordPacking) -> Result<String> {
    let items: Vec<String> = match packing {
        WordPacking::Byte => data.iter().map(|b| format!("0x{b:X}")).collect(),
        WordPacking::Word32Le => {
            if data.len() % 4 != 0 {
                return Err(Error::MisalignedWords { len: data.len() });
            }
            data.chunks_exact(4)
                .map(|w| format!("0x{:X}", u32::from_le_bytes([w[0], w[1], w[2], w[3]])))
                .collect()
        }
    };
    let mut text = items.join(",\n");
    text.push('\n');
    Ok(text)
}

/// Supported external compilers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toolchain {
    /// Direct3D shader compiler producing DXBC
    Fxc,
    /// Shaderc's GLSL compiler producing SPIR-V for Vulkan
    Glslc,
}

impl FromStr for Toolchain {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fxc" => Ok(Self::Fxc),
            "glslc" => Ok(Self::Glslc),
            other => Err(format!("unknown toolchain: {other}")),
        }
    }
}

/// Shader model profile for an HLSL file: `vs_5_0` when the stem ends in `vs`, `ps_5_0` otherwise
pub fn hlsl_profile(stem: &str) -> &'static str {
    if stem.to_lowercase().ends_with("vs") { "vs_5_0" } else { "ps_5_0" }
}

impl Toolchain {
    /// Executable name looked up on `PATH`
    pub fn program(self) -> &'static str {
        match self {
            Self::Fxc => "fxc",
            Self::Glslc => "glslc",
        }
    }

    pub fn packing(self) -> WordPacking {
        match self {
            Self::Fxc => WordPacking::Byte,
            Self::Glslc => WordPacking::Word32Le,
        }
    }

    fn binary_extension(self) -> &'static str {
        match self {
            Self::Fxc => "cso",
            Self::Glslc => "spv",
        }
    }

    /// Base name of the outputs: the file stem for fxc, the full file name for glslc
    pub fn output_base(self, file_name: &str) -> String {
        match self {
            Self::Fxc => Path::new(file_name).file_stem().map_or_else(|| file_name.to_string(), |s| s.to_string_lossy().into_owned()),
            Self::Glslc => file_name.to_string(),
        }
    }

    /// Command line compiling `source` into `binary`
    pub fn arguments(self, source: &Path, binary: &Path, mode: BuildMode) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        match self {
            Self::Fxc => {
                let stem = source.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
                args.extend(["/Ges", "/Gis", "/T", hlsl_profile(&stem), "/Fo"].map(OsString::from));
                args.push(binary.into());
                args.push(source.into());
                let optimization: &[&str] = match mode {
                    BuildMode::Debug => &["/Od", "/Zi"],
                    BuildMode::Release => &["/O1"],
                };
                args.extend(optimization.iter().map(OsString::from));
            }
            Self::Glslc => {
                let optimization = match mode {
                    BuildMode::Debug => "-g",
                    BuildMode::Release => "-O",
                };
                args.extend(["--target-env=vulkan1.0", "--target-spv=spv1.0", optimization, "-o"].map(OsString::from));
                args.push(binary.into());
                args.push(source.into());
            }
        }
        args
    }
}

/// Runs an external compiler, logging anything it prints
///
/// # Errors
/// [`Error::CompilerLaunch`] if the program cannot be started,
/// [`Error::CompilerFailed`] if it exits unsuccessfully.
pub fn run_compiler(program: &str, args: &[OsString]) -> Result<()> {
    let output = Command::new(program).args(args).output().map_err(|source| Error::CompilerLaunch {
        program: program.to_string(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        tracing::info!(program, "stdout: {}", stdout.trim());
    }
    if !stderr.trim().is_empty() {
        tracing::warn!(program, "stderr: {}", stderr.trim());
    }

    if !output.status.success() {
        return Err(Error::CompilerFailed {
            program: program.to_string(),
            status: output.status,
            stderr: stderr.into_owned(),
        });
    }
    Ok(())
}

/// Compiles one shader and writes `{base}.{dbg|rel}.h` into `output_dir`
///
/// The intermediate binary is written next to the header and removed afterwards.
/// `program` overrides the toolchain's executable name.
///
/// # Errors
/// [`Error::InvalidShaderName`] when `source` has no file name, otherwise any
/// compiler, encoding or I/O failure.
pub fn compile_and_embed(toolchain: Toolchain, program: Option<&str>, source: &Path, output_dir: &Path, mode: BuildMode) -> Result<PathBuf> {
    let file_name = source
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| Error::InvalidShaderName(source.display().to_string()))?;
    let base = toolchain.output_base(&file_name);
    let binary = output_dir.join(format!("{base}.{}.{}", mode.suffix(), toolchain.binary_extension()));
    let header = output_dir.join(format!("{base}.{}.h", mode.suffix()));

    run_compiler(program.unwrap_or(toolchain.program()), &toolchain.arguments(source, &binary, mode))?;

    let data = std::fs::read(&binary).map_err(|e| Error::io(&binary, e))?;
    let literal = encode_hex_literal(&data, toolchain.packing())?;
    std::fs::write(&header, literal).map_err(|e| Error::io(&header, e))?;
    if let Err(e) = std::fs::remove_file(&binary) {
        tracing::warn!(path = %binary.display(), error = %e, "failed to remove intermediate binary");
    }

    tracing::info!(source = %source.display(), header = %header.display(), bytes = data.len(), "embedded shader");
    Ok(header)
}
