//! Destinations for finished spans.

use crate::span::FinishedSpan;

/// Receives spans once they finish.
///
/// Implementations must not block: spans are reported from `Drop` on the
/// request path.
pub trait SpanSink: Send + Sync {
    /// Accept one finished span.
    fn export(&self, span: FinishedSpan);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpanSink;

impl SpanSink for NoopSpanSink {
    fn export(&self, _span: FinishedSpan) {}
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingSpanSink;

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use std::sync::{Mutex, PoisonError};

    use super::SpanSink;
    use crate::span::FinishedSpan;

    /// In-memory sink capturing spans for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSpanSink {
        spans: Mutex<Vec<FinishedSpan>>,
    }

    impl RecordingSpanSink {
        /// Snapshot of the spans recorded so far, in finish order.
        #[must_use]
        pub fn spans(&self) -> Vec<FinishedSpan> {
            self.spans
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Names of the recorded spans, in finish order.
        #[must_use]
        pub fn names(&self) -> Vec<&'static str> {
            self.spans().iter().map(|span| span.name).collect()
        }

        /// Return the only span with `name`.
        ///
        /// # Panics
        ///
        /// Panics when no span, or more than one span, carries `name`.
        #[must_use]
        pub fn single(&self, name: &str) -> FinishedSpan {
            let mut matching = self
                .spans()
                .into_iter()
                .filter(|span| span.name == name)
                .collect::<Vec<_>>();
            assert_eq!(matching.len(), 1, "expected exactly one `{name}` span");
            matching.remove(0)
        }
    }

    impl SpanSink for RecordingSpanSink {
        fn export(&self, span: FinishedSpan) {
            self.spans
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(span);
        }
    }
}
