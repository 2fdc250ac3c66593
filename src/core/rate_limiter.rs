//! Admission control for incoming connections

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::constants::RATE_LIMITER_CLEANUP_INTERVAL_SECS;
use crate::error::{GridMatchError, Result};

/// Per-address token bucket state
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(capacity: u32) -> Self {
        Self {
            tokens: capacity as f64,
            last_refill: Instant::now(),
        }
    }

    /// Credit tokens for the time elapsed since the last refill, capped
    /// at capacity; an empty bucket refills to full over one window.
    fn refill(&mut self, capacity: u32, window: Duration) {
        let elapsed = self.last_refill.elapsed();
        let rate = capacity as f64 / window.as_secs_f64();
        self.tokens = (self.tokens + elapsed.as_secs_f64() * rate).min(capacity as f64);
        self.last_refill = Instant::now();
    }

    fn is_full(&self, capacity: u32) -> bool {
        self.tokens >= capacity as f64
    }
}

/// Rate limiter for connection admission per source address
pub struct ConnectionLimiter {
    buckets: RwLock<HashMap<IpAddr, TokenBucket>>,
    capacity: u32,
    window: Duration,
}

impl ConnectionLimiter {
    pub fn new(capacity: u32, window: Duration) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            capacity,
            window,
        }
    }

    /// Take one token for a new connection from this address.
    /// Denied connections must be rejected before the upgrade completes.
    pub async fn admit(&self, ip: IpAddr) -> Result<()> {
        let mut buckets = self.buckets.write().await;
        let bucket = buckets
            .entry(ip)
            .or_insert_with(|| TokenBucket::new(self.capacity));
        bucket.refill(self.capacity, self.window);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            Err(GridMatchError::AdmissionError(format!(
                "Rate limit exceeded for {}",
                ip
            )))
        }
    }

    /// Number of addresses currently tracked
    pub async fn tracked_addresses(&self) -> usize {
        let buckets = self.buckets.read().await;
        buckets.len()
    }

    /// Drop buckets that have refilled to full so the map does not grow
    /// without bound over the process lifetime
    pub async fn cleanup_old_entries(&self) {
        let mut buckets = self.buckets.write().await;
        buckets.retain(|_, bucket| {
            bucket.refill(self.capacity, self.window);
            !bucket.is_full(self.capacity)
        });
    }

    /// Start cleanup task for the admission limiter
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(RATE_LIMITER_CLEANUP_INTERVAL_SECS));
            loop {
                interval.tick().await;
                self.cleanup_old_entries().await;
            }
        });
    }
}
