//! Shader resource build utilities
//!
//! This crate turns shader sources into files that can be embedded in the
//! engine. OpenGL programs are minified in a single session so that names
//! shared between stages keep the same alias, and a macro header exposes the
//! aliases of uniforms and attributes to host code. HLSL and Vulkan shaders
//! are compiled with their external compilers and embedded as hex literals.

mod error;

pub mod batch;
pub mod embed;
pub mod glsl;
pub mod manifest;
pub mod predefined;

pub use batch::{BatchOutcome, BatchReport, BuildMode, run_batch};
pub use error::{Error, Result};
pub use manifest::{ProgramSpec, ShaderSetManifest};

/// Minifies a single vertex/fragment pair held in memory
///
/// Returns the two minified sources and the macro header for the pair. File
/// names follow the `glName.vert` / `glName.frag` convention.
///
/// # Arguments
/// * `vertex` - Vertex shader as (file name, source text)
/// * `fragment` - Fragment shader as (file name, source text)
/// * `options` - Minifier options
pub fn minify_program(vertex: (&str, &str), fragment: (&str, &str), options: glsl::MinifyOptions) -> Result<(String, String, String)> {
    let vertex = glsl::ShaderSource::from_file_name(vertex.0, vertex.1)?;
    let fragment = glsl::ShaderSource::with_program(fragment.0, &vertex.program, fragment.1)?;

    let mut session = glsl::Session::new(options);
    let vertex_text = session.minify(&vertex)?;
    let fragment_text = session.minify(&fragment)?;
    Ok((vertex_text, fragment_text, session.macro_header()))
}

/// Runs the shader set described by a YAML manifest file
pub fn minify_shader_set<P: AsRef<std::path::Path>>(manifest_path: P, mode: BuildMode) -> Result<BatchOutcome> {
    let manifest = ShaderSetManifest::from_file(manifest_path)?;
    run_batch(&manifest, mode)
}
