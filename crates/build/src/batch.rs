//! Batch processing of shader sets
//!
//! Runs every program listed in a [`ShaderSetManifest`] through one minifier
//! session and writes the embeddable outputs. A program whose sources cannot
//! be read is skipped; alias exhaustion aborts the whole run.

use std::path::{Path, PathBuf};

use crate::glsl::{Session, ShaderSource, ShaderStage, copy_source, wrap_raw_string};
use crate::manifest::{ProgramSpec, ShaderSetManifest};
use crate::{Error, Result};

/// Which variant of the embedded sources to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Minified sources with aliased names, plus the macro header
    #[default]
    Release,
    /// Verbatim sources for debugging
    Debug,
}

impl BuildMode {
    /// Suffix distinguishing the variants in output file names
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Release => "rel",
            Self::Debug => "dbg",
        }
    }
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Programs whose both stages were processed
    pub processed: usize,
    /// Programs skipped because a source could not be loaded
    pub skipped: usize,
    /// Output files that could not be written
    pub failed_writes: usize,
    /// Output files written successfully
    pub written: Vec<PathBuf>,
}

/// Result of a batch run: the report and the session it built
#[derive(Debug)]
pub struct BatchOutcome {
    pub report: BatchReport,
    pub session: Session,
}

/// Reads a shader file and checks that it belongs to the expected stage
fn load_source(source_dir: &Path, name: &str, program: Option<&str>, stage: ShaderStage) -> Result<ShaderSource> {
    let path = source_dir.join(name);
    let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let source = match program {
        Some(program) => ShaderSource::with_program(name, program, text)?,
        None => ShaderSource::from_file_name(name, text)?,
    };
    if source.stage != stage {
        return Err(Error::InvalidShaderName(name.to_string()));
    }
    Ok(source)
}

/// Loads both stages of a program before anything is processed
fn load_program(source_dir: &Path, spec: &ProgramSpec) -> Result<[ShaderSource; 2]> {
    let vertex = load_source(source_dir, &spec.vertex, spec.program.as_deref(), ShaderStage::Vertex)?;
    // Both stages share the vertex shader's tag unless one is given
    let program = spec.program.as_deref().unwrap_or(&vertex.program);
    let fragment = load_source(source_dir, &spec.fragment, Some(program), ShaderStage::Fragment)?;
    Ok([vertex, fragment])
}

/// Produces the output text of both stages; nothing is written unless both succeed
fn process_program(session: &mut Session, sources: &[ShaderSource], mode: BuildMode) -> Result<Vec<String>> {
    sources
        .iter()
        .map(|source| match mode {
            BuildMode::Release => session.minify(source),
            BuildMode::Debug => Ok(copy_source(source)),
        })
        .collect()
}

fn write_output(path: &Path, content: &str, report: &mut BatchReport) {
    match std::fs::write(path, content) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "wrote output");
            report.written.push(path.to_path_buf());
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to write output");
            report.failed_writes += 1;
        }
    }
}

/// Processes every program of `manifest`
///
/// In release mode each source is minified and `{name}.rel.h` is written,
/// followed by the macro header. In debug mode the trimmed sources are written
/// to `{name}.dbg.h` and no header is produced.
///
/// # Errors
/// Returns an error when the output directory cannot be created or the alias
/// space is exhausted. Unreadable sources, other minification errors and
/// failed writes are logged and counted in the report instead.
pub fn run_batch(manifest: &ShaderSetManifest, mode: BuildMode) -> Result<BatchOutcome> {
    let output_dir = &manifest.output_dir;
    std::fs::create_dir_all(output_dir).map_err(|e| Error::io(output_dir, e))?;

    let mut session = Session::new(manifest.options.clone());
    let mut report = BatchReport::default();

    for spec in &manifest.programs {
        let sources = match load_program(&manifest.source_dir, spec) {
            Ok(sources) => sources,
            Err(e) => {
                tracing::error!(vertex = %spec.vertex, fragment = %spec.fragment, error = %e, "skipping program");
                report.skipped += 1;
                continue;
            }
        };

        let outputs = match process_program(&mut session, &sources, mode) {
            Ok(outputs) => outputs,
            Err(e @ Error::AliasExhausted { .. }) => return Err(e),
            Err(e) => {
                tracing::error!(program = %sources[0].program, error = %e, "skipping program");
                report.skipped += 1;
                continue;
            }
        };

        for (source, text) in sources.iter().zip(&outputs) {
            let path = output_dir.join(format!("{}.{}.h", source.name, mode.suffix()));
            write_output(&path, &wrap_raw_string(text), &mut report);
        }

        tracing::info!(program = %sources[0].program, "processed program");
        report.processed += 1;
    }

    if mode == BuildMode::Release {
        let path = output_dir.join(&manifest.macro_header);
        write_output(&path, &session.macro_header(), &mut report);
        tracing::info!(records = session.records().len(), path = %path.display(), "wrote macro header");
    }

    Ok(BatchOutcome { report, session })
}

/// Writes the session's records and shared aliases as pretty JSON
pub fn write_session_json(session: &Session, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&session.summary())?;
    std::fs::write(path, json).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Creates an empty scratch directory unique to the calling test
    fn scratch_dir(test_name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rsc-build-{}-{test_name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("src")).unwrap();
        dir
    }

    fn write_sources(dir: &Path) {
        std::fs::write(
            dir.join("src/glGui.vert"),
            "#version 330 core\nuniform vec4 rect;\nin vec2 vpos;\nout vec2 uv;\nvoid main() {\n    uv = vpos;\n    gl_Position = vec4(rect.xy + vpos * rect.zw, 0.0, 1.0);\n}\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("src/glGui.frag"),
            "#version 330 core\nuniform sampler2D colorMap;\nin vec2 uv;\nout vec4 fragColor;\nvoid main() {\n    fragColor = texture(colorMap, uv);\n}\n",
        )
        .unwrap();
    }

    fn manifest(dir: &Path, programs: Vec<ProgramSpec>) -> ShaderSetManifest {
        ShaderSetManifest {
            source_dir: dir.join("src"),
            output_dir: dir.join("out"),
            macro_header: "glDefs.h".to_string(),
            programs,
            options: Default::default(),
        }
    }

    /// Tests a release run over one program, including the macro header
    #[test]
    fn test_release_batch() {
        let dir = scratch_dir("release");
        write_sources(&dir);
        let manifest = manifest(&dir, vec![ProgramSpec::new("glGui.vert", "glGui.frag")]);

        let outcome = run_batch(&manifest, BuildMode::Release).unwrap();
        assert_eq!(outcome.report.processed, 1);
        assert_eq!(outcome.report.skipped, 0);
        assert_eq!(outcome.report.written.len(), 3);

        let vert = std::fs::read_to_string(dir.join("out/glGui.vert.rel.h")).unwrap();
        assert_eq!(
            vert,
            "R\"r(#version 330 core\nuniform vec4 a;in vec2 b;out vec2 c;void main(){c=b;gl_Position=vec4(a.xy+b*a.zw,0.0,1.0);})r\"\n"
        );
        let frag = std::fs::read_to_string(dir.join("out/glGui.frag.rel.h")).unwrap();
        assert_eq!(frag, "R\"r(#version 330 core\nuniform sampler2D d;in vec2 c;out vec4 e;void main(){e=texture(d,c);})r\"\n");

        let header = std::fs::read_to_string(dir.join("out/glDefs.h")).unwrap();
        assert!(header.contains("#define ATTR_GUI_VPOS \"b\"\n"));
        assert!(header.contains("#define UNI_GUI_COLORMAP \"colorMap\"\n"));
        assert!(header.contains("#define UNI_GUI_RECT \"a\"\n"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Tests that debug runs copy trimmed sources and write no header
    #[test]
    fn test_debug_batch() {
        let dir = scratch_dir("debug");
        write_sources(&dir);
        let manifest = manifest(&dir, vec![ProgramSpec::new("glGui.vert", "glGui.frag")]);

        let outcome = run_batch(&manifest, BuildMode::Debug).unwrap();
        assert_eq!(outcome.report.written.len(), 2);
        assert!(outcome.session.records().is_empty());
        assert!(!dir.join("out/glDefs.h").exists());

        let frag = std::fs::read_to_string(dir.join("out/glGui.frag.dbg.h")).unwrap();
        assert!(frag.starts_with("R\"r(#version 330 core\nuniform sampler2D colorMap;"));
        assert!(frag.ends_with("texture(colorMap, uv);\n})r\"\n"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Tests that a program with a missing source is skipped without aborting the run
    #[test]
    fn test_missing_sources_are_skipped() {
        let dir = scratch_dir("missing");
        write_sources(&dir);
        let manifest = manifest(
            &dir,
            vec![ProgramSpec::new("glSel.vert", "glSel.frag"), ProgramSpec::new("glGui.vert", "glGui.frag")],
        );

        let outcome = run_batch(&manifest, BuildMode::Release).unwrap();
        assert_eq!(outcome.report.skipped, 1);
        assert_eq!(outcome.report.processed, 1);
        assert!(!dir.join("out/glSel.vert.rel.h").exists());
        assert!(dir.join("out/glGui.frag.rel.h").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Tests that swapped stages are rejected
    #[test]
    fn test_stage_mismatch_is_skipped() {
        let dir = scratch_dir("mismatch");
        write_sources(&dir);
        let manifest = manifest(&dir, vec![ProgramSpec::new("glGui.frag", "glGui.vert")]);

        let outcome = run_batch(&manifest, BuildMode::Release).unwrap();
        assert_eq!(outcome.report.skipped, 1);
        assert_eq!(outcome.report.processed, 0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Tests that two programs in one run share the aliases of common uniforms
    #[test]
    fn test_programs_share_session_aliases() {
        let dir = scratch_dir("shared");
        let vertex = "uniform vec4 color;\nin vec2 vpos;\nvoid main() {\n    gl_Position = color * vec4(vpos, 0.0, 1.0);\n}\n";
        let fragment = "uniform vec4 color;\nout vec4 fragColor;\nvoid main() {\n    fragColor = color;\n}\n";
        for program in ["glGui", "glSel"] {
            std::fs::write(dir.join(format!("src/{program}.vert")), vertex).unwrap();
            std::fs::write(dir.join(format!("src/{program}.frag")), fragment).unwrap();
        }
        let manifest = manifest(
            &dir,
            vec![ProgramSpec::new("glGui.vert", "glGui.frag"), ProgramSpec::new("glSel.vert", "glSel.frag")],
        );

        let outcome = run_batch(&manifest, BuildMode::Release).unwrap();
        assert_eq!(outcome.report.processed, 2);

        for program in ["glGui", "glSel"] {
            let vert = std::fs::read_to_string(dir.join(format!("out/{program}.vert.rel.h"))).unwrap();
            assert_eq!(vert, "R\"r(uniform vec4 a;in vec2 b;void main(){gl_Position=a*vec4(b,0.0,1.0);})r\"\n");
            let frag = std::fs::read_to_string(dir.join(format!("out/{program}.frag.rel.h"))).unwrap();
            assert_eq!(frag, "R\"r(uniform vec4 a;out vec4 c;void main(){c=a;})r\"\n");
        }

        let header = std::fs::read_to_string(dir.join("out/glDefs.h")).unwrap();
        assert!(header.contains("#define UNI_GUI_COLOR \"a\"\n"));
        assert!(header.contains("#define UNI_SEL_COLOR \"a\"\n"));
        assert!(header.contains("#define ATTR_SEL_VPOS \"b\"\n"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Tests that a define clashing with a shared alias skips only its program
    #[test]
    fn test_define_clash_skips_program() {
        let dir = scratch_dir("clash");
        write_sources(&dir);
        std::fs::write(dir.join("src/glSel.vert"), "#define a 2.0\nin vec2 vpos;\nvoid main() { gl_Position = vec4(vpos * a, 0.0, 1.0); }\n").unwrap();
        std::fs::write(dir.join("src/glSel.frag"), "out vec4 fragColor;\nvoid main() { fragColor = vec4(1.0); }\n").unwrap();
        let manifest = manifest(
            &dir,
            vec![ProgramSpec::new("glGui.vert", "glGui.frag"), ProgramSpec::new("glSel.vert", "glSel.frag")],
        );

        let outcome = run_batch(&manifest, BuildMode::Release).unwrap();
        assert_eq!(outcome.report.processed, 1);
        assert_eq!(outcome.report.skipped, 1);
        assert!(dir.join("out/glGui.vert.rel.h").exists());
        assert!(!dir.join("out/glSel.vert.rel.h").exists());
        assert!(!dir.join("out/glSel.frag.rel.h").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Tests the JSON dump of a session
    #[test]
    fn test_session_json() {
        let dir = scratch_dir("json");
        write_sources(&dir);
        let manifest = manifest(&dir, vec![ProgramSpec::new("glGui.vert", "glGui.frag")]);
        let outcome = run_batch(&manifest, BuildMode::Release).unwrap();

        let path = dir.join("session.json");
        write_session_json(&outcome.session, &path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["records"][0]["name"], "ATTR_GUI_VPOS");
        assert_eq!(json["shared_aliases"]["uv"], "c");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
