//! xsltproc engine wrapper
//!
//! Supports:
//! - XSLT 1.0 transformation through an external processor
//! - standalone documents (`<?xml-stylesheet?>` in the prolog)
//! - string parameters, network lock-down and depth limits
//!
//! Does NOT support:
//! - locale collation probing
//! - parse options without a command-line equivalent (`NODICT`, `DTDATTR`, `NOCDATA`)

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;
use xslt_engine_traits::{
    DiagnosticSink, DocumentSource, EngineSettings, Error, Parameters, ParseOptions, Result,
    XsltEngine,
};

use crate::prolog::find_stylesheet_pi;

/// Processor looked up on `PATH` when none is configured.
pub const DEFAULT_PROGRAM: &str = "xsltproc";

/// xsltproc engine wrapper
#[derive(Debug, Clone)]
pub struct XsltprocEngine {
    program: PathBuf,
    leading_args: Vec<OsString>,
    settings: EngineSettings,
}

impl Default for XsltprocEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl XsltprocEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            settings: EngineSettings::default(),
        }
    }

    /// Arguments placed before the generated ones on every invocation.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Build the command line for one transformation.
    pub fn command(
        &self,
        stylesheet: &ProcStylesheet,
        source: &ProcDocument,
        params: &Parameters,
    ) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args);
        cmd.current_dir(&source.base_dir);

        if self.settings.no_network {
            cmd.arg("--nonet");
        }
        cmd.arg("--maxdepth").arg(self.settings.max_depth.to_string());
        for flag in option_flags(source.options) {
            cmd.arg(flag);
        }
        for (name, expr) in params.iter() {
            cmd.arg("--param").arg(name).arg(expr);
        }

        match stylesheet {
            ProcStylesheet::Embedded { path } => {
                cmd.arg(path);
            }
            ProcStylesheet::File { path } => {
                cmd.arg(path).arg(&source.path);
            }
        }

        cmd.stdin(Stdio::null());
        cmd
    }
}

/// Document handle: the raw bytes plus where they came from
#[derive(Debug, Clone)]
pub struct ProcDocument {
    base_dir: PathBuf,
    path: PathBuf,
    options: ParseOptions,
    content: Vec<u8>,
}

impl ProcDocument {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Stylesheet handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcStylesheet {
    /// The document names its own stylesheet; it is passed alone
    Embedded { path: PathBuf },
    /// A stylesheet file applied to a separate document
    File { path: PathBuf },
}

/// Transformation result, as the processor wrote it to stdout
#[derive(Debug, Clone)]
pub struct ProcOutput {
    bytes: Vec<u8>,
}

impl ProcOutput {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl XsltEngine for XsltprocEngine {
    type Document = ProcDocument;
    type Stylesheet = ProcStylesheet;
    type Output = ProcOutput;

    fn name(&self) -> &'static str {
        "xsltproc"
    }

    fn configure(&mut self, settings: &EngineSettings) -> Result<()> {
        if settings.max_depth == 0 {
            return Err(Error::Configuration(
                "maximum template depth must be positive".to_string(),
            ));
        }
        self.settings = settings.clone();
        Ok(())
    }

    fn parse_document(
        &mut self,
        source: &DocumentSource<'_>,
        options: ParseOptions,
        diag: &mut dyn DiagnosticSink,
    ) -> Result<Self::Document> {
        match fs::read(source.resolved()) {
            Ok(content) => Ok(ProcDocument {
                base_dir: source.base_dir.to_path_buf(),
                path: source.path.to_path_buf(),
                options,
                content,
            }),
            Err(e) => {
                diag.report_fmt(format_args!(
                    "I/O error : failed to load external entity \"{}\"\n",
                    source.path.display()
                ));
                Err(e.into())
            }
        }
    }

    fn load_embedded_stylesheet(
        &mut self,
        doc: &Self::Document,
        _diag: &mut dyn DiagnosticSink,
    ) -> Result<Option<Self::Stylesheet>> {
        Ok(find_stylesheet_pi(&doc.content).map(|pi| {
            debug!(path = %doc.path.display(), href = %pi.href, "standalone document");
            ProcStylesheet::Embedded {
                path: doc.path.clone(),
            }
        }))
    }

    fn compile_stylesheet(
        &mut self,
        doc: Self::Document,
        _diag: &mut dyn DiagnosticSink,
    ) -> Result<Self::Stylesheet> {
        // Compilation happens inside the processor, at transform time.
        Ok(ProcStylesheet::File { path: doc.path })
    }

    fn transform(
        &mut self,
        stylesheet: &Self::Stylesheet,
        source: &Self::Document,
        params: &Parameters,
        diag: &mut dyn DiagnosticSink,
    ) -> Result<Self::Output> {
        let mut cmd = self.command(stylesheet, source, params);
        debug!(command = ?cmd, "running processor");

        let output = match cmd.output() {
            Ok(output) => output,
            Err(e) => {
                diag.report_fmt(format_args!(
                    "failed to run {}: {}\n",
                    self.program.display(),
                    e
                ));
                return Err(Error::EngineUnavailable(format!(
                    "{}: {}",
                    self.program.display(),
                    e
                )));
            }
        };

        if !output.stderr.is_empty() {
            diag.report_bytes(&output.stderr);
        }

        if !output.status.success() && output.stdout.is_empty() {
            return Err(Error::xslt_transform(format!(
                "{} exited with {}",
                self.program.display(),
                output.status
            )));
        }

        Ok(ProcOutput {
            bytes: output.stdout,
        })
    }

    fn serialize(
        &mut self,
        output: &Self::Output,
        _stylesheet: &Self::Stylesheet,
    ) -> Result<Vec<u8>> {
        // The processor already applied xsl:output.
        Ok(output.bytes.clone())
    }
}

/// Command-line flags for the parse options the processor understands.
fn option_flags(options: ParseOptions) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if options.contains(ParseOptions::NOENT) {
        flags.push("--noent");
    }
    if options.contains(ParseOptions::XINCLUDE) {
        flags.push("--xinclude");
    }
    if options.contains(ParseOptions::HUGE) {
        flags.push("--huge");
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(path: &str, options: ParseOptions) -> ProcDocument {
        ProcDocument {
            base_dir: PathBuf::from("/suite/REC"),
            path: PathBuf::from(path),
            options,
            content: Vec::new(),
        }
    }

    fn args_of(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn command_for_stylesheet_and_document() {
        let engine = XsltprocEngine::default();
        let style = ProcStylesheet::File {
            path: PathBuf::from("./a.xsl"),
        };
        let params = Parameters::new().with("test", "'passed_value'");
        let cmd = engine.command(&style, &document("./a.xml", ParseOptions::NONE), &params);

        assert_eq!(cmd.get_program(), "xsltproc");
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/suite/REC")));
        assert_eq!(
            args_of(&cmd),
            vec![
                "--nonet",
                "--maxdepth",
                "200",
                "--param",
                "test",
                "'passed_value'",
                "./a.xsl",
                "./a.xml"
            ]
        );
    }

    #[test]
    fn command_for_standalone_document() {
        let mut engine = XsltprocEngine::new("/opt/bin/xsltproc").with_leading_args(["--verbose"]);
        engine
            .configure(&EngineSettings {
                no_network: false,
                max_depth: 50,
            })
            .unwrap();
        let style = ProcStylesheet::Embedded {
            path: PathBuf::from("./stand1.xml"),
        };
        let doc = document("./stand1.xml", ParseOptions::XINCLUDE | ParseOptions::NODICT);
        let cmd = engine.command(&style, &doc, &Parameters::new());

        assert_eq!(
            args_of(&cmd),
            vec!["--verbose", "--maxdepth", "50", "--xinclude", "./stand1.xml"]
        );
    }

    #[test]
    fn zero_depth_is_rejected() {
        let mut engine = XsltprocEngine::default();
        let err = engine
            .configure(&EngineSettings {
                no_network: true,
                max_depth: 0,
            })
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
