use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Sliding-window limiter keyed by client address.
#[derive(Debug, Clone)]
pub struct IpRateLimiter {
    inner: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    window: Duration,
    max_requests: usize,
}

impl IpRateLimiter {
    pub fn new(window: Duration, max_requests: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            window,
            max_requests,
        }
    }

    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    fn allow_at(&self, key: &str, now: Instant) -> bool {
        let mut guard = self.inner.lock();

        // Keys come from client headers; drop every key whose window has emptied.
        guard.retain(|_, queue| {
            while let Some(front) = queue.front() {
                if now.duration_since(*front) > self.window {
                    queue.pop_front();
                } else {
                    break;
                }
            }
            !queue.is_empty()
        });

        let queue = guard.entry(key.to_string()).or_default();
        if queue.len() >= self.max_requests {
            return false;
        }

        queue.push_back(now);
        true
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.inner.lock().len()
    }
}
