//! xsltproc engine adapter for the XSLT golden-file harness
//!
//! This adapter drives an external `xsltproc`-compatible command-line
//! processor to implement the xslt-engine-traits interface. The processor's
//! standard error is forwarded, line for line, into the diagnostic hook.

pub mod engine;
pub mod prolog;

// Re-export main types
pub use engine::{ProcDocument, ProcOutput, ProcStylesheet, XsltprocEngine, DEFAULT_PROGRAM};
pub use prolog::{find_stylesheet_pi, StylesheetPi};
