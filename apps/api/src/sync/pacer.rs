//! Batch pacing: a pluggable scheduler between consecutive items.
//!
//! The batch loop only calls `wait_turn`; the policy lives here so it can be
//! tuned without touching the pipeline.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};

use crate::config::PacerKind;

#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits until item `index` (0-based within a batch) may start.
    async fn wait_turn(&self, index: usize);
}

/// Sleeps a fixed interval between items; the first item starts immediately.
pub struct FixedIntervalPacer {
    interval: Duration,
}

impl FixedIntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait]
impl Pacer for FixedIntervalPacer {
    async fn wait_turn(&self, index: usize) {
        if index > 0 && !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

/// One item per interval, measured from item start rather than item end.
/// Shared across batches, so back-to-back batches are paced too.
pub struct TokenBucketPacer {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TokenBucketPacer {
    pub fn new(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval)
            .map(|quota| RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN)));
        Self { limiter }
    }
}

#[async_trait]
impl Pacer for TokenBucketPacer {
    async fn wait_turn(&self, _index: usize) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

pub fn build_pacer(kind: PacerKind, interval: Duration) -> Arc<dyn Pacer> {
    match kind {
        PacerKind::FixedInterval => Arc::new(FixedIntervalPacer::new(interval)),
        PacerKind::TokenBucket => Arc::new(TokenBucketPacer::new(interval)),
    }
}
