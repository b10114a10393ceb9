//! Shared progress accounting for compression workers.
//!
//! Workers running on separate threads report finalized input bytes into one
//! [`Progress`] counter; the controlling thread polls [`Progress::total`] to
//! render a bar. Updates are coarse (a worker flushes once it has accumulated
//! at least [`ProgressTicker::GRANULARITY`] bytes) to keep contention off the
//! hot path.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic count of input bytes whose compressed form is finalized.
#[derive(Debug, Default)]
pub struct Progress {
    finalized: AtomicU64,
}

impl Progress {
    /// Create a zeroed counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add finalized bytes. Callable from any worker thread.
    #[inline]
    pub fn add(&self, bytes: u64) {
        self.finalized.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Total finalized bytes so far.
    #[inline]
    pub fn total(&self) -> u64 {
        self.finalized.load(Ordering::Relaxed)
    }
}

/// Worker-local accumulator batching updates into a [`Progress`].
#[derive(Debug)]
pub struct ProgressTicker<'a> {
    progress: &'a Progress,
    pending: u64,
}

impl<'a> ProgressTicker<'a> {
    /// Minimum number of bytes accumulated before touching the shared counter.
    pub const GRANULARITY: u64 = 64;

    /// Create a ticker feeding `progress`.
    pub fn new(progress: &'a Progress) -> Self {
        Self {
            progress,
            pending: 0,
        }
    }

    /// Record `bytes` finalized; flushes once the granularity is reached.
    #[inline]
    pub fn advance(&mut self, bytes: u64) {
        self.pending += bytes;
        if self.pending >= Self::GRANULARITY {
            self.flush();
        }
    }

    /// Push any pending bytes to the shared counter.
    pub fn flush(&mut self) {
        if self.pending > 0 {
            self.progress.add(self.pending);
            self.pending = 0;
        }
    }
}

impl Drop for ProgressTicker<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_batches_updates() {
        let progress = Progress::new();
        let mut ticker = ProgressTicker::new(&progress);

        ticker.advance(10);
        assert_eq!(progress.total(), 0);
        ticker.advance(60);
        assert_eq!(progress.total(), 70);
        ticker.advance(1);
        assert_eq!(progress.total(), 70);
        drop(ticker);
        assert_eq!(progress.total(), 71);
    }

    #[test]
    fn test_concurrent_adds() {
        let progress = Progress::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let mut ticker = ProgressTicker::new(&progress);
                    for _ in 0..1000 {
                        ticker.advance(3);
                    }
                });
            }
        });
        assert_eq!(progress.total(), 4 * 3000);
    }
}
