//! GLSL source minification
//!
//! The minifier strips comments and whitespace from GLSL sources and renames
//! every non-reserved identifier to a short alias. Names declared as uniforms
//! or vertex attributes are collected as [`MacroRecord`]s so host code can
//! look them up through a generated header in both build variants.

pub mod alias;
pub mod declaration;
mod macros;
pub mod rewriter;
mod session;
pub mod tokenizer;
pub mod vocabulary;

pub use macros::{MacroRecord, write_macro_header};
pub use rewriter::{copy_source, minify_source, wrap_raw_string};
pub use session::{AliasTable, MinifyOptions, Session, SessionSummary, ShaderSource, ShaderStage};
pub use vocabulary::{Vocabulary, is_reserved};
