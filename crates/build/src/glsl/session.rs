//! Minification session
//!
//! A [`Session`] spans every shader processed in one invocation. It owns the
//! alias table shared between stages and the macro records collected so far.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::alias::DEFAULT_MAX_ALIAS_LEN;
use super::macros::{MacroRecord, write_macro_header};
use super::rewriter;
use super::vocabulary::Vocabulary;
use crate::{Error, Result};

/// `glGui.vert` -> program `Gui`, stage `vert`
static SHADER_FILE_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}(?<program>\w+)\.(?<stage>\w+)$").unwrap());

/// Pipeline stage a shader file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Maps a file extension (`vert`, `frag`) to a stage
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "vert" => Some(Self::Vertex),
            "frag" => Some(Self::Fragment),
            _ => None,
        }
    }
}

/// One shader file ready for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// File name, used for output naming and diagnostics
    pub name: String,
    /// Program tag used in macro names, e.g. `GUI`
    pub program: String,
    pub stage: ShaderStage,
    pub text: String,
}

impl ShaderSource {
    pub fn new(name: impl Into<String>, program: impl Into<String>, stage: ShaderStage, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into().to_uppercase(),
            stage,
            text: text.into(),
        }
    }

    /// Creates a source whose program and stage come from a file name like `glGui.vert`
    ///
    /// The two-letter backend prefix and the extension are dropped and the rest
    /// is uppercased to form the program tag.
    pub fn from_file_name(name: &str, text: impl Into<String>) -> Result<Self> {
        let caps = SHADER_FILE_NAME.captures(name).ok_or_else(|| Error::InvalidShaderName(name.to_string()))?;
        let stage = ShaderStage::from_extension(&caps["stage"]).ok_or_else(|| Error::InvalidShaderName(name.to_string()))?;
        Ok(Self::new(name, &caps["program"], stage, text))
    }

    /// Same as [`from_file_name`](Self::from_file_name) with an explicit program tag
    pub fn with_program(name: &str, program: &str, text: impl Into<String>) -> Result<Self> {
        let mut source = Self::from_file_name(name, text)?;
        source.program = program.to_uppercase();
        Ok(source)
    }
}

/// Minifier settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MinifyOptions {
    /// Emit `OUT_*` macros for stage outputs as well
    #[serde(default)]
    pub record_outputs: bool,
    /// Longest alias the allocator may produce before giving up
    #[serde(default = "default_max_alias_len")]
    pub max_alias_len: usize,
    /// Additional words that must never be renamed
    #[serde(default)]
    pub extra_reserved: Vec<String>,
}

fn default_max_alias_len() -> usize {
    DEFAULT_MAX_ALIAS_LEN
}

impl Default for MinifyOptions {
    fn default() -> Self {
        Self {
            record_outputs: false,
            max_alias_len: DEFAULT_MAX_ALIAS_LEN,
            extra_reserved: Vec::new(),
        }
    }
}

/// Mapping from original identifiers to aliases
///
/// Entries are never replaced once inserted, and every alias appears at most once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AliasTable {
    #[serde(flatten)]
    aliases: BTreeMap<String, String>,
    #[serde(skip)]
    issued: HashSet<String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.issued.contains(alias)
    }

    /// Registers `name -> alias`; returns false and keeps the old entry if `name` is known
    pub fn insert(&mut self, name: &str, alias: &str) -> bool {
        if self.aliases.contains_key(name) {
            return false;
        }
        self.aliases.insert(name.to_string(), alias.to_string());
        self.issued.insert(alias.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(name, alias)| (name.as_str(), alias.as_str()))
    }
}

/// Serializable snapshot of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub records: Vec<MacroRecord>,
    pub shared_aliases: AliasTable,
}

/// State of one minifier invocation
#[derive(Debug, Clone, Default)]
pub struct Session {
    vocabulary: Vocabulary,
    options: MinifyOptions,
    shared: AliasTable,
    records: Vec<MacroRecord>,
    recorded_names: HashSet<String>,
}

impl Session {
    pub fn new(options: MinifyOptions) -> Self {
        Self {
            vocabulary: Vocabulary::with_extra(&options.extra_reserved),
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &MinifyOptions {
        &self.options
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Aliases of uniforms, attributes and outputs seen so far
    pub fn shared_aliases(&self) -> &AliasTable {
        &self.shared
    }

    /// Macro records in discovery order
    pub fn records(&self) -> &[MacroRecord] {
        &self.records
    }

    /// Minifies one shader, extending the shared table and the macro records
    pub fn minify(&mut self, source: &ShaderSource) -> Result<String> {
        rewriter::minify_source(source, self)
    }

    /// Renders the macro header for every record collected so far
    pub fn macro_header(&self) -> String {
        write_macro_header(&self.records)
    }

    pub fn summary(&self) -> SessionSummary {
        let mut records = self.records.clone();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        SessionSummary {
            records,
            shared_aliases: self.shared.clone(),
        }
    }

    pub(crate) fn share(&mut self, name: &str, alias: &str) {
        self.shared.insert(name, alias);
    }

    /// Keeps the first record for each macro name
    pub(crate) fn record(&mut self, record: MacroRecord) {
        if self.recorded_names.insert(record.name.clone()) {
            tracing::debug!(name = %record.name, alias = %record.alias, "recorded shader-visible name");
            self.records.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_file_name() {
        let source = ShaderSource::from_file_name("glGui.vert", "void main(){}").unwrap();
        assert_eq!(source.program, "GUI");
        assert_eq!(source.stage, ShaderStage::Vertex);

        let source = ShaderSource::from_file_name("glSel.frag", "").unwrap();
        assert_eq!(source.program, "SEL");
        assert_eq!(source.stage, ShaderStage::Fragment);

        let source = ShaderSource::with_program("glSel.frag", "picker", "").unwrap();
        assert_eq!(source.program, "PICKER");
    }

    #[test]
    fn test_invalid_file_names() {
        for name in ["glGui.comp", "glGui", "g.vert", "glGui.vert.bak"] {
            assert!(matches!(ShaderSource::from_file_name(name, ""), Err(Error::InvalidShaderName(_))), "{name}");
        }
    }

    #[test]
    fn test_alias_table_never_reassigns() {
        let mut table = AliasTable::new();
        assert!(table.insert("color", "a"));
        assert!(!table.insert("color", "b"));
        assert_eq!(table.get("color"), Some("a"));
        assert!(table.contains_alias("a"));
        assert!(!table.contains_alias("b"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_records_are_deduplicated_by_name() {
        let mut session = Session::new(MinifyOptions::default());
        session.record(MacroRecord::new("UNI", "GUI", "color", "a"));
        session.record(MacroRecord::new("UNI", "GUI", "color", "a"));
        session.record(MacroRecord::new("UNI", "SEL", "color", "a"));
        assert_eq!(session.records().len(), 2);
    }

    #[test]
    fn test_options_defaults() {
        let options = MinifyOptions::default();
        assert!(!options.record_outputs);
        assert_eq!(options.max_alias_len, DEFAULT_MAX_ALIAS_LEN);
        assert!(options.extra_reserved.is_empty());
    }
}
