//! Shared diagnostic collector.
//!
//! Ingestion runs single-threaded, but the metric passes fan out over nets
//! with rayon and every worker reports into the same sink.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Collects diagnostics from any number of threads.
///
/// Per-severity tallies live outside the lock so callers can poll
/// [`has_errors`](Self::has_errors) between passes cheaply. Tallies count
/// everything ever emitted; draining with [`take_all`](Self::take_all) does
/// not reset them.
pub struct DiagnosticSink {
    records: Mutex<Vec<Diagnostic>>,
    tallies: [AtomicUsize; 3],
}

fn slot(severity: Severity) -> usize {
    match severity {
        Severity::Note => 0,
        Severity::Warning => 1,
        Severity::Error => 2,
    }
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            tallies: [AtomicUsize::new(0), AtomicUsize::new(0), AtomicUsize::new(0)],
        }
    }

    /// Records one diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        self.tallies[slot(diag.severity)].fetch_add(1, Ordering::Relaxed);
        self.records.lock().unwrap().push(diag);
    }

    /// Records a batch under a single lock acquisition, keeping its order.
    pub fn extend(&self, batch: impl IntoIterator<Item = Diagnostic>) {
        let mut records = self.records.lock().unwrap();
        for diag in batch {
            self.tallies[slot(diag.severity)].fetch_add(1, Ordering::Relaxed);
            records.push(diag);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of diagnostics of `severity` emitted over the sink's lifetime.
    pub fn count(&self, severity: Severity) -> usize {
        self.tallies[slot(severity)].load(Ordering::Relaxed)
    }

    /// Number of currently held diagnostics carrying `code`.
    pub fn count_code(&self, code: DiagnosticCode) -> usize {
        self.records.lock().unwrap().iter().filter(|d| d.code == code).count()
    }

    /// Drains the held diagnostics in emission order.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.lock().unwrap())
    }

    /// Copies the held diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{Location, RecordSection};

    fn rejected_edge(index: usize) -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::UNKNOWN_EDGE_ENDPOINT,
            "edge endpoint is not a known node",
            Location::Record { section: RecordSection::Edge, index },
        )
    }

    fn duplicate_node(index: usize) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticCode::DUPLICATE_NODE,
            "node id already defined, keeping the first",
            Location::Record { section: RecordSection::Node, index },
        )
    }

    #[test]
    fn fresh_sink_reports_nothing() {
        let sink = DiagnosticSink::default();
        assert!(!sink.has_errors());
        for sev in Severity::ALL {
            assert_eq!(sink.count(sev), 0);
        }
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn mixed_ingestion_tallies_by_severity_and_code() {
        let sink = DiagnosticSink::new();
        sink.emit(duplicate_node(3));
        sink.emit(rejected_edge(0));
        sink.emit(duplicate_node(7));

        assert!(sink.has_errors());
        assert_eq!(sink.count(Severity::Warning), 2);
        assert_eq!(sink.error_count(), 1);
        assert_eq!(sink.count_code(DiagnosticCode::DUPLICATE_NODE), 2);
        assert_eq!(sink.count_code(DiagnosticCode::DUPLICATE_NET), 0);
    }

    #[test]
    fn snapshot_keeps_records_but_drain_does_not() {
        let sink = DiagnosticSink::new();
        sink.extend([duplicate_node(1), rejected_edge(2)]);

        let snap = sink.diagnostics();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].code, DiagnosticCode::DUPLICATE_NODE);
        assert_eq!(sink.diagnostics().len(), 2);

        assert_eq!(sink.take_all().len(), 2);
        assert!(sink.diagnostics().is_empty());
        assert_eq!(sink.count_code(DiagnosticCode::UNKNOWN_EDGE_ENDPOINT), 0);
        assert_eq!(sink.count(Severity::Error), 1);
    }

    #[test]
    fn extended_batches_stay_contiguous_across_threads() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let workers: Vec<_> = (0..6)
            .map(|net| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    let batch = (0..20).map(|i| {
                        let mut d = duplicate_node(i);
                        d.notes.push(format!("net {net}"));
                        d
                    });
                    sink.extend(batch);
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        let all = sink.take_all();
        assert_eq!(all.len(), 120);
        assert_eq!(sink.count(Severity::Warning), 120);
        for chunk in all.chunks(20) {
            assert!(chunk.iter().all(|d| d.notes == chunk[0].notes));
        }
    }
}
