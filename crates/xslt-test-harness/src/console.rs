//! Where the harness writes its user-visible lines
//!
//! Normal runs go straight to stdout/stderr. Tests use the captured variant
//! to assert on the exact text.

use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Default)]
pub enum Console {
    #[default]
    Std,
    Captured { out: String, err: String },
}

impl Console {
    pub fn captured() -> Self {
        Console::Captured {
            out: String::new(),
            err: String::new(),
        }
    }

    /// Write one line to standard output.
    pub fn out_line(&mut self, args: fmt::Arguments<'_>) {
        match self {
            Console::Std => {
                let mut stdout = io::stdout().lock();
                let _ = writeln!(stdout, "{args}");
            }
            Console::Captured { out, .. } => {
                out.push_str(&args.to_string());
                out.push('\n');
            }
        }
    }

    /// Write one line to standard error.
    pub fn err_line(&mut self, args: fmt::Arguments<'_>) {
        match self {
            Console::Std => {
                let mut stderr = io::stderr().lock();
                let _ = writeln!(stderr, "{args}");
            }
            Console::Captured { err, .. } => {
                err.push_str(&args.to_string());
                err.push('\n');
            }
        }
    }

    pub fn captured_out(&self) -> &str {
        match self {
            Console::Std => "",
            Console::Captured { out, .. } => out,
        }
    }

    pub fn captured_err(&self) -> &str {
        match self {
            Console::Std => "",
            Console::Captured { err, .. } => err,
        }
    }
}
