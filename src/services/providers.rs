//! Sources of time, identifiers and simulated latency for the chat endpoint.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

const ID_LEN: usize = 12;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub trait Clock: Send + Sync {
    /// Current time in unix seconds.
    fn now_unix(&self) -> i64;
}

pub trait IdGenerator: Send + Sync {
    /// Random opaque identifier, without prefix.
    fn next_id(&self) -> String;
}

pub trait Latency: Send + Sync {
    /// Delay to apply before replying.
    fn next_delay(&self) -> Duration;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Base36 ids drawn from v4 UUID randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> String {
        let mut bits = Uuid::new_v4().as_u128();
        let base = ALPHABET.len() as u128;
        (0..ID_LEN)
            .map(|_| {
                let c = ALPHABET[(bits % base) as usize] as char;
                bits /= base;
                c
            })
            .collect()
    }
}

/// Uniform delay in `[min, max)`.
#[derive(Debug, Clone, Copy)]
pub struct UniformLatency {
    min_ms: u64,
    max_ms: u64,
}

impl UniformLatency {
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: max_ms.max(min_ms),
        }
    }
}

impl Latency for UniformLatency {
    fn next_delay(&self) -> Duration {
        let span = self.max_ms - self.min_ms;
        if span == 0 {
            return Duration::from_millis(self.min_ms);
        }
        let offset = (Uuid::new_v4().as_u128() % u128::from(span)) as u64;
        Duration::from_millis(self.min_ms + offset)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct FixedId(pub String);

impl IdGenerator for FixedId {
    fn next_id(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedLatency(pub Duration);

impl Latency for FixedLatency {
    fn next_delay(&self) -> Duration {
        self.0
    }
}

/// The three providers bundled for the request handler.
#[derive(Clone)]
pub struct Providers {
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    pub latency: Arc<dyn Latency>,
}

impl Providers {
    pub fn system(min_latency_ms: u64, max_latency_ms: u64) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            ids: Arc::new(RandomIds),
            latency: Arc::new(UniformLatency::new(min_latency_ms, max_latency_ms)),
        }
    }

    /// Fixed clock and ids, no delay.
    pub fn fixed(now: i64, id: impl Into<String>) -> Self {
        Self {
            clock: Arc::new(FixedClock(now)),
            ids: Arc::new(FixedId(id.into())),
            latency: Arc::new(FixedLatency(Duration::ZERO)),
        }
    }

    #[must_use]
    pub fn with_latency(mut self, latency: impl Latency + 'static) -> Self {
        self.latency = Arc::new(latency);
        self
    }

    #[must_use]
    pub fn with_ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_ids_shape() {
        let ids = RandomIds;
        let id = ids.next_id();
        assert_eq!(id.len(), ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_random_ids_are_distinct() {
        let ids = RandomIds;
        let set: HashSet<String> = (0..200).map(|_| ids.next_id()).collect();
        assert_eq!(set.len(), 200);
    }

    #[test]
    fn test_uniform_latency_bounds() {
        let latency = UniformLatency::new(300, 1000);
        for _ in 0..500 {
            let d = latency.next_delay();
            assert!(d >= Duration::from_millis(300));
            assert!(d < Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_uniform_latency_degenerate_range() {
        assert_eq!(
            UniformLatency::new(50, 50).next_delay(),
            Duration::from_millis(50)
        );
        assert_eq!(UniformLatency::new(0, 0).next_delay(), Duration::ZERO);
    }

    #[test]
    fn test_fixed_providers() {
        let p = Providers::fixed(1_700_000_000, "abc123");
        assert_eq!(p.clock.now_unix(), 1_700_000_000);
        assert_eq!(p.ids.next_id(), "abc123");
        assert_eq!(p.latency.next_delay(), Duration::ZERO);
    }
}
