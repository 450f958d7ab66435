//! Capture of engine diagnostics
//!
//! Every warning or error an engine emits while one fixture runs lands in a
//! fixed-size buffer, which is then compared against the fixture's `.err`
//! golden file. The buffer is reset before and after each fixture.

use xslt_engine_traits::DiagnosticSink;

/// Buffer size in bytes, terminator included.
pub const CAPACITY: usize = 32768;

/// Fixed-capacity diagnostic text buffer.
///
/// When a message does not fit, the space left minus one byte receives its
/// prefix and the last byte becomes a NUL terminator, exactly as a bounded
/// `snprintf` into the buffer would leave it. The buffer is then full and
/// later messages are dropped until the next [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct CapturedDiagnostics {
    text: Vec<u8>,
}

impl Default for CapturedDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl CapturedDiagnostics {
    pub fn new() -> Self {
        Self {
            text: Vec::with_capacity(CAPACITY),
        }
    }

    pub fn reset(&mut self) {
        self.text.clear();
    }

    pub fn append(&mut self, message: &[u8]) {
        if self.is_full() {
            return;
        }
        let remaining = CAPACITY - self.text.len();
        if message.len() >= remaining {
            self.text.extend_from_slice(&message[..remaining - 1]);
            self.text.push(0);
        } else {
            self.text.extend_from_slice(message);
        }
    }

    pub fn is_full(&self) -> bool {
        self.text.len() >= CAPACITY
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }
}

impl DiagnosticSink for CapturedDiagnostics {
    fn report(&mut self, message: &str) {
        self.append(message.as_bytes());
    }

    fn report_bytes(&mut self, message: &[u8]) {
        self.append(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_and_resets() {
        let mut diag = CapturedDiagnostics::new();
        diag.report("a.xsl:3: parser error\n");
        diag.report_fmt(format_args!("no result for {}\n", "./a.xml"));
        assert_eq!(diag.as_bytes(), b"a.xsl:3: parser error\nno result for ./a.xml\n");

        diag.reset();
        assert!(diag.is_empty());
        assert!(!diag.is_full());
    }

    #[test]
    fn raw_bytes_are_kept_verbatim() {
        let mut diag = CapturedDiagnostics::new();
        diag.report_bytes(b"caf\xe9\n");
        assert_eq!(diag.as_bytes(), b"caf\xe9\n");
    }

    #[test]
    fn overflow_truncates_and_terminates() {
        let mut diag = CapturedDiagnostics::new();
        diag.append(&vec![b'x'; CAPACITY - 10]);
        diag.append(b"0123456789abcdef");

        assert_eq!(diag.len(), CAPACITY);
        assert!(diag.is_full());
        assert_eq!(&diag.as_bytes()[CAPACITY - 10..], b"012345678\0");

        diag.append(b"dropped");
        assert_eq!(diag.len(), CAPACITY);
    }

    #[test]
    fn message_filling_all_but_the_terminator_fits() {
        let mut diag = CapturedDiagnostics::new();
        diag.append(&vec![b'y'; CAPACITY - 1]);
        assert_eq!(diag.len(), CAPACITY - 1);
        assert!(!diag.is_full());

        diag.append(b"");
        assert_eq!(diag.len(), CAPACITY - 1);

        diag.append(b"z");
        assert_eq!(diag.len(), CAPACITY);
        assert_eq!(diag.as_bytes()[CAPACITY - 1], 0);
    }
}
