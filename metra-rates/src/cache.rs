//! Time-boxed rate cache

use std::time::{Duration, Instant};

use crate::RateTable;

/// The last fetched rate table of one converter.
///
/// Valid while `now - fetched_at < ttl`; never shared between converters.
#[derive(Debug, Clone)]
pub struct RateCache {
    rates: Option<RateTable>,
    fetched_at: Option<Instant>,
    ttl: Duration,
}

impl RateCache {
    /// An empty cache
    pub fn new(ttl: Duration) -> Self {
        RateCache {
            rates: None,
            fetched_at: None,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn rates(&self) -> Option<&RateTable> {
        self.rates.as_ref()
    }

    pub fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    pub fn is_valid_at(&self, now: Instant) -> bool {
        match (&self.rates, self.fetched_at) {
            (Some(_), Some(at)) => now.saturating_duration_since(at) < self.ttl,
            _ => false,
        }
    }

    /// The cached table, if still valid at `now`
    pub fn valid_rates(&self, now: Instant) -> Option<&RateTable> {
        if self.is_valid_at(now) {
            self.rates.as_ref()
        } else {
            None
        }
    }

    pub fn store(&mut self, rates: RateTable, now: Instant) {
        self.rates = Some(rates);
        self.fetched_at = Some(now);
    }
}
