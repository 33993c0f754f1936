// Live counters for connections and in-flight requests
// Each tracked item holds a guard that decrements on drop

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Counter {
    count: Arc<AtomicUsize>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more item until the returned guard is dropped.
    pub fn track(&self) -> CountGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        CountGuard {
            count: Arc::clone(&self.count),
        }
    }

    /// Like [`Counter::track`], but refuses once `limit` items are live.
    pub fn try_track(&self, limit: Option<usize>) -> Option<CountGuard> {
        // Increment first, then check, so concurrent callers cannot both slip under the limit
        let prev = self.count.fetch_add(1, Ordering::SeqCst);
        let guard = CountGuard {
            count: Arc::clone(&self.count),
        };
        match limit {
            Some(max) if prev >= max => None,
            _ => Some(guard),
        }
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct CountGuard {
    count: Arc<AtomicUsize>,
}

impl Drop for CountGuard {
    fn drop(&mut self) {
        self.count.fetch_sub(1, Ordering::SeqCst);
    }
}
