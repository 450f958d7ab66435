//! Parse options, engine-wide settings and stylesheet parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Document parser option flags.
///
/// The bit values follow the conventional libxml2 numbering so option sets
/// written down in test tables read the same everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParseOptions(u32);

impl ParseOptions {
    pub const NONE: ParseOptions = ParseOptions(0);
    /// Substitute entities
    pub const NOENT: ParseOptions = ParseOptions(1 << 1);
    /// Default DTD attributes
    pub const DTDATTR: ParseOptions = ParseOptions(1 << 3);
    /// Perform XInclude substitution
    pub const XINCLUDE: ParseOptions = ParseOptions(1 << 10);
    /// Do not reuse the context dictionary
    pub const NODICT: ParseOptions = ParseOptions(1 << 12);
    /// Merge CDATA as text nodes
    pub const NOCDATA: ParseOptions = ParseOptions(1 << 14);
    /// Relax hardcoded parser limits
    pub const HUGE: ParseOptions = ParseOptions(1 << 19);

    pub const fn from_bits(bits: u32) -> Self {
        ParseOptions(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: ParseOptions) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: ParseOptions) -> Self {
        ParseOptions(self.0 | other.0)
    }
}

impl BitOr for ParseOptions {
    type Output = ParseOptions;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign for ParseOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl fmt::Display for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(ParseOptions, &str); 6] = [
            (ParseOptions::NOENT, "NOENT"),
            (ParseOptions::DTDATTR, "DTDATTR"),
            (ParseOptions::XINCLUDE, "XINCLUDE"),
            (ParseOptions::NODICT, "NODICT"),
            (ParseOptions::NOCDATA, "NOCDATA"),
            (ParseOptions::HUGE, "HUGE"),
        ];
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Engine-wide configuration, applied once before any test group runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Refuse to fetch external entities over the network
    pub no_network: bool,
    /// Maximum template recursion depth
    pub max_depth: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            no_network: true,
            max_depth: 200,
        }
    }
}

/// Ordered stylesheet parameters, each bound to an XPath expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to the XPath expression `expr`. String literals must
    /// carry their own quotes, e.g. `'value'`.
    pub fn with(mut self, name: impl Into<String>, expr: impl Into<String>) -> Self {
        self.entries.push((name.into(), expr.into()));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
