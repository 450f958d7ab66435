//! XSLT engine abstraction trait

use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::options::{EngineSettings, Parameters, ParseOptions};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Location of an input document.
///
/// `path` is relative to `base_dir` and is what diagnostics should name;
/// I/O resolves against [`DocumentSource::resolved`].
#[derive(Debug, Clone, Copy)]
pub struct DocumentSource<'a> {
    pub base_dir: &'a Path,
    pub path: &'a Path,
}

impl<'a> DocumentSource<'a> {
    pub fn new(base_dir: &'a Path, path: &'a Path) -> Self {
        Self { base_dir, path }
    }

    /// The path to open for reading.
    pub fn resolved(&self) -> PathBuf {
        self.base_dir.join(self.path)
    }
}

/// Trait for XSLT transformation engines.
///
/// This is the whole surface the harness relies on. Each step reports its
/// human-readable diagnostics through `diag`; the `Err` side of a result
/// only tells the caller that the step produced nothing usable.
pub trait XsltEngine {
    /// Type representing a parsed document
    type Document;

    /// Type representing a compiled stylesheet
    type Stylesheet;

    /// Type representing a transformation result
    type Output;

    /// Short engine name, used in reports
    fn name(&self) -> &'static str;

    /// Apply engine-wide settings. Called once, before any document is parsed.
    fn configure(&mut self, settings: &EngineSettings) -> Result<()>;

    /// Parse a document from disk
    fn parse_document(
        &mut self,
        source: &DocumentSource<'_>,
        options: ParseOptions,
        diag: &mut dyn DiagnosticSink,
    ) -> Result<Self::Document>;

    /// Look for a stylesheet the document references inline
    /// (`<?xml-stylesheet?>`). `Ok(None)` means the document is not standalone.
    fn load_embedded_stylesheet(
        &mut self,
        doc: &Self::Document,
        diag: &mut dyn DiagnosticSink,
    ) -> Result<Option<Self::Stylesheet>>;

    /// Compile a parsed document as a stylesheet
    fn compile_stylesheet(
        &mut self,
        doc: Self::Document,
        diag: &mut dyn DiagnosticSink,
    ) -> Result<Self::Stylesheet>;

    /// Transform a source document using a compiled stylesheet
    fn transform(
        &mut self,
        stylesheet: &Self::Stylesheet,
        source: &Self::Document,
        params: &Parameters,
        diag: &mut dyn DiagnosticSink,
    ) -> Result<Self::Output>;

    /// Serialize a result the way the stylesheet's output method asks for
    fn serialize(&mut self, output: &Self::Output, stylesheet: &Self::Stylesheet)
        -> Result<Vec<u8>>;

    /// Compare two strings under `locale`'s collation.
    ///
    /// `None` means the locale is not available to this engine.
    fn collate(&self, _locale: &str, _a: &str, _b: &str) -> Option<Ordering> {
        None
    }
}
