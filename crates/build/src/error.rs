//! Error type shared by the minifier, the batch driver and the compiler wrapper.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors produced while building shader resources
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// File that was being accessed
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The shader set manifest is not valid YAML or misses fields
    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_norway::Error),

    /// Serializing a session summary failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// No unused alias fits within the configured length
    #[error("alias space exhausted (no free alias of at most {max_len} characters)")]
    AliasExhausted {
        /// Longest alias the allocator was allowed to produce
        max_len: usize,
    },

    /// A `#define` names a word already issued as an alias, so the preprocessor
    /// would substitute every use of that alias
    #[error("#define of {name:?} in {file} clashes with an issued alias")]
    DefinedAliasClash { file: String, name: String },

    /// A shader file name does not carry a recognizable stage extension
    #[error("cannot derive program and stage from shader file name {0:?}")]
    InvalidShaderName(String),

    /// The external compiler could not be started
    #[error("failed to launch {program}: {source}")]
    CompilerLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external compiler ran but reported failure
    #[error("{program} exited with {status}: {stderr}")]
    CompilerFailed { program: String, status: ExitStatus, stderr: String },

    /// Compiled output cannot be packed into 32-bit words
    #[error("binary size {len} is not divisible by 4")]
    MisalignedWords {
        /// Size of the compiled binary in bytes
        len: usize,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
