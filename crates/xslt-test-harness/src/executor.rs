//! Test case execution
//!
//! One fixture, end to end: parse the input, decide whether it is a
//! standalone document or a stylesheet with a companion `.xml`, apply, then
//! check the serialized result and the captured diagnostics against their
//! golden files.

use std::cmp::Ordering;
use std::path::Path;

use tracing::debug;
use xslt_engine_traits::{DiagnosticSink, DocumentSource, Parameters, ParseOptions, XsltEngine};

use crate::capture::CapturedDiagnostics;
use crate::console::Console;
use crate::golden::GoldenComparator;
use crate::paths::{change_suffix, is_regular_file};
use crate::registry::CaseHandler;

/// The fixture that depends on German collation.
pub const COLLATION_FIXTURE: &str = "./test-10-3.xsl";

/// Golden suffixes for a stylesheet applied to its companion document.
pub const PLAIN_SUFFIXES: GoldenSuffixes = GoldenSuffixes {
    out: ".out",
    err: ".err",
};

/// Golden suffixes for a document that carries its own stylesheet.
pub const STANDALONE_SUFFIXES: GoldenSuffixes = GoldenSuffixes {
    out: ".stand.out",
    err: ".stand.err",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoldenSuffixes {
    pub out: &'static str,
    pub err: &'static str,
}

/// The parameters every transformation receives, whatever the stylesheet.
pub fn test_parameters() -> Parameters {
    Parameters::new()
        .with("test", "'passed_value'")
        .with("test2", "'passed_value2'")
}

/// What happened to one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Pass,
    /// One message per failed golden comparison
    Fail(Vec<String>),
    /// Not applicable here; counts as a success
    Skipped(String),
}

impl CaseOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CaseOutcome::Fail(_))
    }
}

/// Everything one case needs, borrowed from the harness.
pub struct CaseContext<'a, E: XsltEngine> {
    pub engine: &'a mut E,
    pub diagnostics: &'a mut CapturedDiagnostics,
    pub comparator: &'a GoldenComparator,
    pub console: &'a mut Console,
    /// Directory fixture paths are relative to
    pub base_dir: &'a Path,
}

impl CaseHandler {
    /// Run one case. Pattern-less groups pass no path.
    pub fn run<E: XsltEngine>(
        self,
        ctx: &mut CaseContext<'_, E>,
        path: Option<&Path>,
        options: ParseOptions,
    ) -> CaseOutcome {
        match self {
            CaseHandler::Xslt => match path {
                Some(path) => xslt_case(ctx, path, options),
                None => CaseOutcome::Skipped("no fixture path".to_string()),
            },
        }
    }
}

/// Run one XSLT fixture.
pub fn xslt_case<E: XsltEngine>(
    ctx: &mut CaseContext<'_, E>,
    filename: &Path,
    options: ParseOptions,
) -> CaseOutcome {
    if filename == Path::new(COLLATION_FIXTURE) {
        if let Some(skip) = check_collation(ctx) {
            return skip;
        }
    }

    let base_dir = ctx.base_dir;
    let params = test_parameters();

    let style_doc = ctx.engine.parse_document(
        &DocumentSource::new(base_dir, filename),
        options,
        &mut *ctx.diagnostics,
    );
    let embedded = match &style_doc {
        Ok(doc) => ctx
            .engine
            .load_embedded_stylesheet(doc, &mut *ctx.diagnostics)
            .unwrap_or_else(|e| {
                debug!(path = %filename.display(), error = %e, "stylesheet probe failed");
                None
            }),
        Err(e) => {
            debug!(path = %filename.display(), error = %e, "input did not parse");
            None
        }
    };

    let (style, doc, doc_name, suffixes) = match embedded {
        Some(style) => (
            Some(style),
            style_doc.ok(),
            filename.to_path_buf(),
            STANDALONE_SUFFIXES,
        ),
        None => {
            let doc_name = change_suffix(filename, ".xml");
            if !is_regular_file(&base_dir.join(&doc_name)) {
                debug!(path = %filename.display(), "no companion document, skipping");
                return CaseOutcome::Skipped(format!(
                    "no companion document {}",
                    doc_name.display()
                ));
            }

            let style = style_doc.ok().and_then(|doc| {
                ctx.engine
                    .compile_stylesheet(doc, &mut *ctx.diagnostics)
                    .map_err(|e| debug!(path = %filename.display(), error = %e, "stylesheet did not compile"))
                    .ok()
            });
            let doc = match &style {
                Some(_) => ctx
                    .engine
                    .parse_document(
                        &DocumentSource::new(base_dir, &doc_name),
                        options,
                        &mut *ctx.diagnostics,
                    )
                    .map_err(|e| debug!(path = %doc_name.display(), error = %e, "document did not parse"))
                    .ok(),
                None => None,
            };
            (style, doc, doc_name, PLAIN_SUFFIXES)
        }
    };

    let mut out = Vec::new();
    if let Some(style) = &style {
        let result = doc.as_ref().and_then(|doc| {
            ctx.engine
                .transform(style, doc, &params, &mut *ctx.diagnostics)
                .map_err(|e| debug!(path = %filename.display(), error = %e, "transformation failed"))
                .ok()
        });
        match result {
            // Same wording as the command-line processor.
            None => ctx
                .diagnostics
                .report_fmt(format_args!("no result for {}\n", doc_name.display())),
            Some(output) => match ctx.engine.serialize(&output, style) {
                Ok(bytes) => out = bytes,
                Err(e) => debug!(path = %filename.display(), error = %e, "serialization failed"),
            },
        }
    }

    let mut failures = Vec::new();

    let out_name = change_suffix(filename, suffixes.out);
    let outcome = ctx.comparator.compare(&base_dir.join(&out_name), &out);
    if let Some(message) = outcome.describe(&out_name) {
        ctx.console.err_line(format_args!("{message}"));
        ctx.console
            .err_line(format_args!("Result for {} failed", filename.display()));
        failures.push(format!("result: {message}"));
    }

    let err_name = change_suffix(filename, suffixes.err);
    let outcome = ctx
        .comparator
        .compare(&base_dir.join(&err_name), ctx.diagnostics.as_bytes());
    if let Some(message) = outcome.describe(&err_name) {
        ctx.console.err_line(format_args!("{message}"));
        ctx.console
            .err_line(format_args!("Error for {} failed", filename.display()));
        failures.push(format!("diagnostics: {message}"));
    }

    if failures.is_empty() {
        CaseOutcome::Pass
    } else {
        CaseOutcome::Fail(failures)
    }
}

/// `Some(skip)` when the engine cannot collate under the German locale.
fn check_collation<E: XsltEngine>(ctx: &mut CaseContext<'_, E>) -> Option<CaseOutcome> {
    match ctx.engine.collate("de", "\u{e4}", "b") {
        None => {
            debug!(fixture = COLLATION_FIXTURE, "locale \"de\" unavailable, skipping");
            Some(CaseOutcome::Skipped("locale \"de\" unavailable".to_string()))
        }
        Some(Ordering::Less) => None,
        Some(_) => {
            debug!(engine = ctx.engine.name(), "collation ignores the locale");
            ctx.console.err_line(format_args!(
                "Warning: Your engine doesn't seem to support collation with locales"
            ));
            Some(CaseOutcome::Skipped(
                "collation with locales unsupported".to_string(),
            ))
        }
    }
}
