//! Shader Set Manifest Parser
//!
//! A YAML manifest lists the OpenGL programs to minify together with the
//! source/output directories and minifier options:
//!
//! ```yaml
//! source_dir: rsc/shaders
//! output_dir: src/engine/shaders
//! programs:
//!   - vertex: glGui.vert
//!     fragment: glGui.frag
//! options:
//!   max_alias_len: 6
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::glsl::MinifyOptions;
use crate::predefined::{DEFAULT_MACRO_HEADER, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_DIR, PREDEFINED_GL_PROGRAMS};
use crate::{Error, Result};

/// A vertex/fragment pair forming one program
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgramSpec {
    /// Vertex shader file name, relative to the source directory
    pub vertex: String,
    /// Fragment shader file name, relative to the source directory
    pub fragment: String,
    /// Program tag for macro names; derived from the vertex file name when absent
    #[serde(default)]
    pub program: Option<String>,
}

impl ProgramSpec {
    pub fn new(vertex: &str, fragment: &str) -> Self {
        Self {
            vertex: vertex.to_string(),
            fragment: fragment.to_string(),
            program: None,
        }
    }
}

/// Raw shader set manifest as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct ShaderSetManifest {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File name of the macro header written to the output directory
    #[serde(default = "default_macro_header")]
    pub macro_header: String,
    pub programs: Vec<ProgramSpec>,
    #[serde(default)]
    pub options: MinifyOptions,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_macro_header() -> String {
    DEFAULT_MACRO_HEADER.to_string()
}

impl ShaderSetManifest {
    /// Manifest covering the predefined OpenGL programs
    pub fn predefined(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            macro_header: default_macro_header(),
            programs: PREDEFINED_GL_PROGRAMS.iter().map(|(vertex, fragment)| ProgramSpec::new(vertex, fragment)).collect(),
            options: MinifyOptions::default(),
        }
    }

    /// Parses a manifest from YAML content
    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        Ok(serde_norway::from_str(yaml_content)?)
    }

    /// Loads a manifest file
    ///
    /// Relative directories in the manifest are resolved against the manifest's own directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut manifest = Self::from_yaml(&content)?;
        if let Some(base) = path.parent() {
            manifest.source_dir = base.join(&manifest.source_dir);
            manifest.output_dir = base.join(&manifest.output_dir);
        }
        Ok(manifest)
    }
}
