//! Macro table emission
//!
//! Host code looks up uniform and attribute locations through macros so the
//! same call works against minified (release) and verbatim (debug) shaders.

use serde::Serialize;

/// A shader-visible name with its alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroRecord {
    /// Macro name, e.g. `UNI_GUI_COLOR`
    pub name: String,
    /// Identifier as written in the shader source
    pub original: String,
    /// Identifier in the minified source
    pub alias: String,
}

impl MacroRecord {
    /// Builds the record for `original`, naming the macro `{prefix}_{program}_{ORIGINAL}`
    pub fn new(prefix: &str, program: &str, original: &str, alias: &str) -> Self {
        Self {
            name: format!("{prefix}_{}_{}", program.to_uppercase(), original.to_uppercase()),
            original: original.to_string(),
            alias: alias.to_string(),
        }
    }
}

/// Renders the macro header, records sorted by name
///
/// The release branch (`NDEBUG`) binds each macro to the alias, the debug
/// branch to the original identifier.
pub fn write_macro_header(records: &[MacroRecord]) -> String {
    let mut sorted: Vec<&MacroRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut header = String::from("#pragma once\n\n#ifdef NDEBUG\n");
    for record in &sorted {
        header.push_str(&format!("#define {} \"{}\"\n", record.name, record.alias));
    }
    header.push_str("#else\n");
    for record in &sorted {
        header.push_str(&format!("#define {} \"{}\"\n", record.name, record.original));
    }
    header.push_str("#endif\n");
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_name() {
        let record = MacroRecord::new("UNI", "gui", "colorMap", "f");
        assert_eq!(record.name, "UNI_GUI_COLORMAP");
        assert_eq!(record.original, "colorMap");
        assert_eq!(record.alias, "f");
    }

    #[test]
    fn test_header_layout() {
        let records = vec![
            MacroRecord::new("UNI", "GUI", "rect", "b"),
            MacroRecord::new("ATTR", "GUI", "vpos", "d"),
            MacroRecord::new("UNI", "GUI", "color", "g"),
        ];
        let expected = "\
#pragma once

#ifdef NDEBUG
#define ATTR_GUI_VPOS \"d\"
#define UNI_GUI_COLOR \"g\"
#define UNI_GUI_RECT \"b\"
#else
#define ATTR_GUI_VPOS \"vpos\"
#define UNI_GUI_COLOR \"color\"
#define UNI_GUI_RECT \"rect\"
#endif
";
        assert_eq!(write_macro_header(&records), expected);
    }

    #[test]
    fn test_empty_header() {
        assert_eq!(write_macro_header(&[]), "#pragma once\n\n#ifdef NDEBUG\n#else\n#endif\n");
    }
}
