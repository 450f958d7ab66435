//! Core trait abstractions for XSLT processing engines.
//!
//! This crate defines the narrow call interface the golden-file harness
//! uses to drive an engine: parse a document, find or compile a stylesheet,
//! apply it, serialize the result. Engine diagnostics flow back through
//! the [`DiagnosticSink`] hook instead of an inherited output stream.

pub mod diagnostics;
pub mod error;
pub mod options;
pub mod xslt;

pub use diagnostics::{DiagnosticSink, DiscardDiagnostics};
pub use error::{Error, Result};
pub use options::{EngineSettings, Parameters, ParseOptions};
pub use xslt::{DocumentSource, XsltEngine};
