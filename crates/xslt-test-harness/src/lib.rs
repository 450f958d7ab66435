//! xslt-test-harness: golden-file conformance testing for XSLT engines
//!
//! Each fixture (an `.xsl` stylesheet with its companion `.xml` document, or
//! a standalone document naming its own stylesheet) is run through an
//! [`XsltEngine`](xslt_engine_traits::XsltEngine). The serialized result and
//! the captured engine diagnostics are compared byte for byte against two
//! recorded golden files, or rewrite them in update mode.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use xslt_test_harness::{registry, Harness, HarnessConfig};
//!
//! let mut harness = Harness::initialize(engine, HarnessConfig::new("tests"))?;
//! for group in registry::select_groups(&registry::builtin_groups(), &[]) {
//!     harness.run_reported(group);
//! }
//! println!("{}", harness.counters().summary());
//! ```

pub mod capture;
pub mod console;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod golden;
pub mod paths;
pub mod registry;
pub mod reporter;
pub mod runner;

// Re-export core types
pub use capture::{CapturedDiagnostics, CAPACITY};
pub use console::Console;
pub use error::HarnessError;
pub use executor::{CaseContext, CaseOutcome};
pub use discovery::{default_expander, NativeGlob, PathExpander, PortableGlob};
pub use golden::{GoldenComparator, GoldenOutcome, Mismatch};
pub use registry::{CaseHandler, TestGroup};
pub use reporter::RunReport;
pub use runner::{Harness, HarnessConfig, RunCounters};
