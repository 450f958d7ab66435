//! Golden file comparison
//!
//! Every fixture reduces to two calls of [`GoldenComparator::compare`]: one
//! for the serialized result, one for the captured diagnostics. A missing
//! golden file is the same as an empty one.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Chunk size used when scanning a golden file.
const READ_CHUNK: usize = 4096;

/// Compares in-memory bytes against golden files, or rewrites them.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoldenComparator {
    update: bool,
}

/// Ways actual bytes can differ from a golden file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Lengths differ; contents were not scanned
    Size { golden: u64, actual: usize },
    /// First differing byte
    Content { offset: usize },
    /// The file yielded fewer bytes than its recorded size
    ShortRead { read: usize, expected: usize },
}

/// Which file operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldenIo {
    Stat,
    Read,
    Write,
}

/// Result of one golden comparison.
#[derive(Debug)]
pub enum GoldenOutcome {
    /// Bytes equal the golden file (or both are empty)
    Match,
    /// Update mode wrote the golden file
    Written { bytes: usize },
    /// Update mode removed the golden file, nothing is expected any more
    Removed,
    Mismatch(Mismatch),
    Io { op: GoldenIo, source: io::Error },
}

impl GoldenOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            GoldenOutcome::Match | GoldenOutcome::Written { .. } | GoldenOutcome::Removed
        )
    }

    /// Failure message naming the golden file as `name`, `None` on success.
    pub fn describe(&self, name: &Path) -> Option<String> {
        let name = name.display();
        match self {
            GoldenOutcome::Match | GoldenOutcome::Written { .. } | GoldenOutcome::Removed => None,
            GoldenOutcome::Mismatch(Mismatch::Size { golden, actual }) => Some(format!(
                "file {name} is {golden} bytes, result is {actual} bytes"
            )),
            GoldenOutcome::Mismatch(Mismatch::Content { offset }) => {
                Some(format!("Compare error at position {offset}"))
            }
            GoldenOutcome::Mismatch(Mismatch::ShortRead { read, expected }) => {
                Some(format!("Compare error index {read}, size {expected}"))
            }
            GoldenOutcome::Io { op, .. } => Some(match op {
                GoldenIo::Stat => format!("failed to stat {name}"),
                GoldenIo::Read => format!("failed to open {name} for reading"),
                GoldenIo::Write => format!("failed to open {name} for writing"),
            }),
        }
    }
}

impl GoldenComparator {
    /// Comparator that checks golden files.
    pub fn checking() -> Self {
        Self { update: false }
    }

    /// Comparator that rewrites golden files from the actual bytes.
    pub fn updating() -> Self {
        Self { update: true }
    }

    pub fn new(update: bool) -> Self {
        Self { update }
    }

    pub fn compare(&self, golden: &Path, actual: &[u8]) -> GoldenOutcome {
        if self.update {
            update_golden(golden, actual)
        } else {
            check_golden(golden, actual)
        }
    }
}

fn update_golden(golden: &Path, actual: &[u8]) -> GoldenOutcome {
    if actual.is_empty() {
        // A file that is already gone is just as good.
        let _ = fs::remove_file(golden);
        return GoldenOutcome::Removed;
    }
    match fs::write(golden, actual) {
        Ok(()) => GoldenOutcome::Written {
            bytes: actual.len(),
        },
        Err(source) => GoldenOutcome::Io {
            op: GoldenIo::Write,
            source,
        },
    }
}

fn check_golden(golden: &Path, actual: &[u8]) -> GoldenOutcome {
    let meta = match fs::metadata(golden) {
        Ok(meta) => meta,
        Err(_) if actual.is_empty() => return GoldenOutcome::Match,
        Err(source) => {
            return GoldenOutcome::Io {
                op: GoldenIo::Stat,
                source,
            }
        }
    };

    if meta.len() != actual.len() as u64 {
        return GoldenOutcome::Mismatch(Mismatch::Size {
            golden: meta.len(),
            actual: actual.len(),
        });
    }

    let mut file = match File::open(golden) {
        Ok(file) => file,
        Err(source) => {
            return GoldenOutcome::Io {
                op: GoldenIo::Read,
                source,
            }
        }
    };

    let mut chunk = [0u8; READ_CHUNK];
    let mut idx = 0;
    while idx < actual.len() {
        let n = match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        };
        if idx + n > actual.len() {
            break;
        }
        let expected = &actual[idx..idx + n];
        if let Some(ix) = chunk[..n].iter().zip(expected).position(|(g, a)| g != a) {
            return GoldenOutcome::Mismatch(Mismatch::Content { offset: idx + ix });
        }
        idx += n;
    }

    if idx != actual.len() {
        return GoldenOutcome::Mismatch(Mismatch::ShortRead {
            read: idx,
            expected: actual.len(),
        });
    }
    GoldenOutcome::Match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_golden_expects_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let golden = dir.path().join("a.err");
        let cmp = GoldenComparator::checking();

        assert!(matches!(cmp.compare(&golden, b""), GoldenOutcome::Match));

        let outcome = cmp.compare(&golden, b"warning\n");
        assert!(matches!(outcome, GoldenOutcome::Io { op: GoldenIo::Stat, .. }));
        assert_eq!(
            outcome.describe(Path::new("./a.err")).unwrap(),
            "failed to stat ./a.err"
        );
    }

    #[test]
    fn identical_bytes_match() {
        let dir = tempfile::tempdir().unwrap();
        let golden = dir.path().join("a.out");
        fs::write(&golden, "<r>1</r>\n").unwrap();

        let outcome = GoldenComparator::checking().compare(&golden, b"<r>1</r>\n");
        assert!(outcome.is_success());
        assert_eq!(outcome.describe(&golden), None);
    }

    #[test]
    fn size_is_checked_before_content() {
        let dir = tempfile::tempdir().unwrap();
        let golden = dir.path().join("a.out");
        fs::write(&golden, "<r>1</r>\n\n").unwrap();

        let outcome = GoldenComparator::checking().compare(&golden, b"<r>2</r>\n");
        assert!(matches!(
            outcome,
            GoldenOutcome::Mismatch(Mismatch::Size {
                golden: 10,
                actual: 9
            })
        ));
        assert_eq!(
            outcome.describe(Path::new("./a.out")).unwrap(),
            "file ./a.out is 10 bytes, result is 9 bytes"
        );
    }

    #[test]
    fn first_differing_byte_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let golden = dir.path().join("big.out");
        let mut expected = vec![b'a'; READ_CHUNK * 2 + 17];
        fs::write(&golden, &expected).unwrap();
        expected[READ_CHUNK + 5] = b'b';

        let outcome = GoldenComparator::checking().compare(&golden, &expected);
        assert!(matches!(
            outcome,
            GoldenOutcome::Mismatch(Mismatch::Content { offset }) if offset == READ_CHUNK + 5
        ));
        assert_eq!(
            outcome.describe(Path::new("big.out")).unwrap(),
            format!("Compare error at position {}", READ_CHUNK + 5)
        );
    }

    #[test]
    fn update_mode_writes_then_check_mode_matches() {
        let dir = tempfile::tempdir().unwrap();
        let golden = dir.path().join("a.out");

        let outcome = GoldenComparator::updating().compare(&golden, b"<r>1</r>\n");
        assert!(matches!(outcome, GoldenOutcome::Written { bytes: 9 }));
        let first = fs::read(&golden).unwrap();

        GoldenComparator::updating().compare(&golden, b"<r>1</r>\n");
        assert_eq!(fs::read(&golden).unwrap(), first);

        assert!(GoldenComparator::checking()
            .compare(&golden, b"<r>1</r>\n")
            .is_success());
    }

    #[test]
    fn update_mode_removes_golden_for_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let golden = dir.path().join("a.err");
        fs::write(&golden, "stale warning\n").unwrap();

        let outcome = GoldenComparator::updating().compare(&golden, b"");
        assert!(matches!(outcome, GoldenOutcome::Removed));
        assert!(!golden.exists());

        // Removing again is still a success.
        assert!(GoldenComparator::updating().compare(&golden, b"").is_success());
        assert!(GoldenComparator::checking().compare(&golden, b"").is_success());
    }

    #[test]
    fn update_mode_reports_unwritable_golden() {
        let dir = tempfile::tempdir().unwrap();
        let golden = dir.path().join("no-such-dir").join("a.out");

        let outcome = GoldenComparator::updating().compare(&golden, b"data");
        assert!(matches!(outcome, GoldenOutcome::Io { op: GoldenIo::Write, .. }));
        assert!(!outcome.is_success());
    }
}
