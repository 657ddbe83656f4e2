//! Traffic snapshot cache with pattern lookup and retry

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::CaptureConfig;
use crate::exchange::{Exchange, UrlMatch};
use crate::source::TrafficSource;
use crate::{Result, TabtraceError};

/// Pacing for [`TrafficCache::find_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Deadline for the whole retry loop
    pub timeout: Duration,
    /// Sleep between poll rounds
    pub poll_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Lookup and refresh counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that returned a match
    pub hits: usize,
    /// Lookups that returned no match
    pub misses: usize,
    /// Completed full refreshes
    pub refreshes: usize,
    /// Exchanges in the current snapshot (0 if never populated)
    pub size: usize,
}

/// Best-effort snapshot of one browser tab's captured HTTP exchanges.
///
/// The snapshot is either never populated or exactly the result of the most
/// recent full [`refresh`](Self::refresh); there is no incremental update.
/// Lookups scan in capture order. Misses are values, never errors; only
/// [`find_with_retry`](Self::find_with_retry) escalates absence, because it
/// is the only operation with a deadline contract.
///
/// Not synchronized: all mutating operations take `&mut self` and there is
/// no internal locking. Confine one instance per tab/session.
pub struct TrafficCache<S> {
    source: S,
    entries: Option<Vec<Exchange>>,
    captured_at: Option<Instant>,
    config: CaptureConfig,
    hits: usize,
    misses: usize,
    refreshes: usize,
}

impl<S: TrafficSource> TrafficCache<S> {
    /// Create a cache over `source` with the default capture filter.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_config(source, CaptureConfig::default())
    }

    /// Create a cache over `source` with an explicit capture filter.
    #[must_use]
    pub fn with_config(source: S, config: CaptureConfig) -> Self {
        Self {
            source,
            entries: None,
            captured_at: None,
            config,
            hits: 0,
            misses: 0,
            refreshes: 0,
        }
    }

    /// Pull the full current exchange list and replace the snapshot.
    ///
    /// Exchanges whose method is in the configured drop set (by default
    /// `OPTIONS`, the CORS preflight noise) never enter the snapshot. The
    /// replacement is a single assignment; a failed pull leaves the previous
    /// snapshot untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TabtraceError::CaptureDisabled`] if the source reports
    /// capture off, and propagates source failures unchanged (no internal
    /// retry).
    pub fn refresh(&mut self) -> Result<()> {
        if !self.source.capture_enabled() {
            return Err(TabtraceError::CaptureDisabled);
        }

        let raw = self.source.exchanges()?;
        let total = raw.len();

        let entries: Vec<Exchange> = raw
            .into_iter()
            .filter(|r| !self.config.drops_method(&r.method))
            .map(Exchange::from_raw)
            .collect();

        debug!(
            kept = entries.len(),
            dropped = total - entries.len(),
            "refreshed traffic snapshot"
        );

        self.entries = Some(entries);
        self.captured_at = Some(Instant::now());
        self.refreshes += 1;

        Ok(())
    }

    /// Find the first exchange whose URL matches `pattern` under `mode`.
    ///
    /// Refreshes lazily if the snapshot was never populated; beyond that it
    /// is a pure read. Absence is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Propagates [`refresh`](Self::refresh) failures from the lazy populate.
    pub fn find(&mut self, pattern: &str, mode: UrlMatch) -> Result<Option<Exchange>> {
        self.ensure_populated()?;

        let found = self
            .snapshot()
            .iter()
            .find(|e| e.url_matches(pattern, mode))
            .cloned();

        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }

        Ok(found)
    }

    /// Find every exchange whose URL matches `pattern`, in capture order.
    ///
    /// Same lazy-populate rule as [`find`](Self::find); a populated snapshot
    /// with no matches is returned as an empty vector without refreshing.
    ///
    /// # Errors
    ///
    /// Propagates [`refresh`](Self::refresh) failures from the lazy populate.
    pub fn find_all(&mut self, pattern: &str, mode: UrlMatch) -> Result<Vec<Exchange>> {
        self.ensure_populated()?;

        let found: Vec<Exchange> = self
            .snapshot()
            .iter()
            .filter(|e| e.url_matches(pattern, mode))
            .cloned()
            .collect();

        if found.is_empty() {
            self.misses += 1;
        } else {
            self.hits += 1;
        }

        Ok(found)
    }

    /// Poll for a matching exchange until found or the deadline expires.
    ///
    /// Each round: deadline check, lookup against the current snapshot, one
    /// forced refresh and re-check on miss, then a `poll_interval` sleep.
    /// This is the only operation that blocks the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TabtraceError::Timeout`] carrying the pattern and elapsed
    /// time if no match appears before `policy.timeout`; propagates refresh
    /// failures unchanged.
    pub async fn find_with_retry(
        &mut self,
        pattern: &str,
        mode: UrlMatch,
        policy: RetryPolicy,
    ) -> Result<Exchange> {
        let start = Instant::now();

        loop {
            let elapsed = start.elapsed();
            if elapsed >= policy.timeout {
                return Err(TabtraceError::Timeout {
                    pattern: pattern.to_string(),
                    elapsed,
                    timeout: policy.timeout,
                });
            }

            if let Some(found) = self.find(pattern, mode)? {
                return Ok(found);
            }

            // One forced refresh before conceding the round
            self.refresh()?;
            if let Some(found) = self.find(pattern, mode)? {
                return Ok(found);
            }

            trace!(pattern, ?elapsed, "no match yet, sleeping");
            tokio::time::sleep(policy.poll_interval).await;
        }
    }

    /// Discard the snapshot, returning to the never-populated state.
    ///
    /// The next lookup will lazily refresh. Counters are untouched.
    pub fn clear(&mut self) {
        self.entries = None;
    }

    /// Number of exchanges in the current snapshot (0 if never populated).
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Whether the current snapshot holds no exchanges (also true when
    /// never populated).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Whether a refresh has populated the snapshot since creation/clear.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.entries.is_some()
    }

    /// Timestamp of the last completed refresh, if any.
    #[must_use]
    pub fn captured_at(&self) -> Option<Instant> {
        self.captured_at
    }

    /// Current lookup/refresh counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            refreshes: self.refreshes,
            size: self.len(),
        }
    }

    fn ensure_populated(&mut self) -> Result<()> {
        if self.entries.is_none() {
            self.refresh()?;
        }
        Ok(())
    }

    fn snapshot(&self) -> &[Exchange] {
        self.entries.as_deref().unwrap_or_default()
    }
}
