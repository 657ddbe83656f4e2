//! Traffic source seam
//!
//! The cache never talks to the browser host directly; it pulls exchange
//! batches through [`TrafficSource`]. Production implementations wrap the
//! host's tab object, tests and benches use [`ScriptedSource`].

use std::collections::VecDeque;

use crate::exchange::RawExchange;
use crate::Result;

/// Supplier of the current captured exchange list for one browser tab.
///
/// Capture must be explicitly enabled on the host side before any exchange
/// is observable; [`TrafficCache::refresh`](crate::TrafficCache::refresh)
/// checks [`capture_enabled`](TrafficSource::capture_enabled) first.
pub trait TrafficSource {
    /// Whether traffic capture is currently enabled for the tab.
    fn capture_enabled(&self) -> bool;

    /// Pull the full current exchange list, in capture order.
    ///
    /// Every call returns the complete list as the host sees it now; there
    /// is no incremental delivery.
    ///
    /// # Errors
    ///
    /// Returns [`TabtraceError::SourceUnavailable`](crate::TabtraceError::SourceUnavailable)
    /// if the host call fails (e.g., tab not ready).
    fn exchanges(&mut self) -> Result<Vec<RawExchange>>;
}

/// A [`TrafficSource`] that replays scripted batches of exchanges.
///
/// Each pull consumes the next batch; once the script runs out, the last
/// batch repeats. Useful for driving retry loops through miss-then-hit
/// sequences in tests.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    batches: VecDeque<Vec<RawExchange>>,
    current: Vec<RawExchange>,
    enabled: bool,
}

impl ScriptedSource {
    /// Create a source that always returns the same batch.
    #[must_use]
    pub fn fixed(batch: Vec<RawExchange>) -> Self {
        Self {
            batches: VecDeque::new(),
            current: batch,
            enabled: true,
        }
    }

    /// Create a source that steps through `batches`, repeating the last one.
    #[must_use]
    pub fn scripted(batches: Vec<Vec<RawExchange>>) -> Self {
        Self {
            batches: batches.into(),
            current: Vec::new(),
            enabled: true,
        }
    }

    /// Toggle the capture-enabled flag.
    pub fn set_capture_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

impl TrafficSource for ScriptedSource {
    fn capture_enabled(&self) -> bool {
        self.enabled
    }

    fn exchanges(&mut self) -> Result<Vec<RawExchange>> {
        if let Some(next) = self.batches.pop_front() {
            self.current = next;
        }
        Ok(self.current.clone())
    }
}
