//! Diagnostic hook abstraction
//!
//! Engines never write warnings or errors to an inherited stream. Every
//! message goes through a [`DiagnosticSink`] handed to each engine call, so
//! the harness can compare the text against a recorded golden file.

use std::fmt;

/// Receiver for engine-emitted warning and error text.
pub trait DiagnosticSink {
    /// Record one already formatted message, verbatim.
    fn report(&mut self, message: &str);

    /// Record raw message bytes. Sinks that keep text as `str` replace
    /// invalid UTF-8; byte-oriented sinks keep it as is.
    fn report_bytes(&mut self, message: &[u8]) {
        self.report(&String::from_utf8_lossy(message));
    }

    /// Format and record a message.
    fn report_fmt(&mut self, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(s) => self.report(s),
            None => self.report(&args.to_string()),
        }
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardDiagnostics;

impl DiagnosticSink for DiscardDiagnostics {
    fn report(&mut self, _message: &str) {}
}

impl DiagnosticSink for String {
    fn report(&mut self, message: &str) {
        self.push_str(message);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, message: &str) {
        (**self).report(message);
    }

    fn report_bytes(&mut self, message: &[u8]) {
        (**self).report_bytes(message);
    }

    fn report_fmt(&mut self, args: fmt::Arguments<'_>) {
        (**self).report_fmt(args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_sink_accumulates_messages() {
        let mut sink = String::new();
        sink.report("first\n");
        sink.report_fmt(format_args!("no result for {}\n", "./a.xml"));
        assert_eq!(sink, "first\nno result for ./a.xml\n");
    }

    #[test]
    fn text_sink_replaces_invalid_utf8() {
        let mut sink = String::new();
        sink.report_bytes(b"caf\xe9\n");
        assert_eq!(sink, "caf\u{fffd}\n");
    }

    #[derive(Default)]
    struct ByteSink(Vec<u8>);

    impl DiagnosticSink for ByteSink {
        fn report(&mut self, message: &str) {
            self.0.extend_from_slice(message.as_bytes());
        }

        fn report_bytes(&mut self, message: &[u8]) {
            self.0.extend_from_slice(message);
        }
    }

    #[test]
    fn forwarding_through_mut_ref_keeps_raw_bytes() {
        let mut inner = ByteSink::default();
        let mut sink: &mut ByteSink = &mut inner;
        <&mut ByteSink as DiagnosticSink>::report_bytes(&mut sink, b"caf\xe9\n");
        assert_eq!(inner.0, b"caf\xe9\n");
    }

    #[test]
    fn discard_sink_ignores_everything() {
        let mut sink = DiscardDiagnostics;
        sink.report("dropped");
    }
}
