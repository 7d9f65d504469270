//! Earnings credited for time spent away from the game.

use chrono::{DateTime, Utc};
use idle_core::{CurrencyId, GeneratorId};
use indexmap::IndexMap;
use serde::Serialize;

const SECONDS_PER_HOUR: f64 = 3600.0;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Production credited for time spent away, computed but not yet applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OfflineEarnings {
    /// Hours credited after clamping to `[0, cap]`.
    pub hours: f64,
    pub seconds: f64,
    pub currency_earnings: IndexMap<CurrencyId, f64>,
    pub generator_breakdown: IndexMap<GeneratorId, f64>,
    pub total_earned: f64,
}

impl OfflineEarnings {
    pub(crate) fn new(hours: f64) -> Self {
        Self {
            hours,
            seconds: hours * SECONDS_PER_HOUR,
            ..Self::default()
        }
    }

    pub(crate) fn add(&mut self, currency: &CurrencyId, generator: &GeneratorId, amount: f64) {
        *self
            .currency_earnings
            .entry(currency.clone())
            .or_insert(0.0) += amount;
        *self
            .generator_breakdown
            .entry(generator.clone())
            .or_insert(0.0) += amount;
        self.total_earned += amount;
    }

    pub fn is_empty(&self) -> bool {
        self.generator_breakdown.is_empty()
    }
}

/// Elapsed hours between `last` and `now`, clamped to `[0, cap_hours]`.
pub(crate) fn clamped_hours(last: DateTime<Utc>, now: DateTime<Utc>, cap_hours: f64) -> f64 {
    let elapsed = (now - last).num_milliseconds() as f64 / MILLIS_PER_HOUR;
    elapsed.min(cap_hours).max(0.0)
}
