//! The on-disk save schema and its mapping to engine state.

use chrono::{DateTime, Utc};
use idle_core::{CurrencyId, GeneratorId, UpgradeId};
use idle_econ::{EconomyEngine, EconomySnapshot, PrestigeEngine};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Schema version written by this build.
pub const CURRENT_VERSION: u32 = 1;

/// Persisted snapshot of economy and prestige state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveModel {
    pub version: u32,
    #[serde(rename = "lastSaveUtc", alias = "lastSaveTimestamp")]
    pub last_save: DateTime<Utc>,
    pub currencies: IndexMap<CurrencyId, f64>,
    /// Generator id to level.
    pub generators: IndexMap<GeneratorId, u32>,
    pub purchased_upgrades: Vec<UpgradeId>,
    pub lifetime_per_generator: IndexMap<GeneratorId, f64>,
    pub total_lifetime_produced: f64,
    pub prestige_currency: f64,
    #[serde(rename = "lastPrestigeUtc", alias = "lastPrestigeTimestamp")]
    pub last_prestige: DateTime<Utc>,
}

impl Default for SaveModel {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            last_save: DateTime::<Utc>::default(),
            currencies: IndexMap::new(),
            generators: IndexMap::new(),
            purchased_upgrades: Vec::new(),
            lifetime_per_generator: IndexMap::new(),
            total_lifetime_produced: 0.0,
            prestige_currency: 0.0,
            last_prestige: DateTime::<Utc>::default(),
        }
    }
}

impl SaveModel {
    /// Capture both engines at `now`, tagged with [`CURRENT_VERSION`].
    pub fn capture(economy: &EconomyEngine, prestige: &PrestigeEngine, now: DateTime<Utc>) -> Self {
        let EconomySnapshot {
            balances,
            levels,
            lifetime_per_generator,
            purchased_upgrades,
            total_lifetime_produced,
        } = economy.snapshot();
        Self {
            version: CURRENT_VERSION,
            last_save: now,
            currencies: balances,
            generators: levels,
            purchased_upgrades,
            lifetime_per_generator,
            total_lifetime_produced,
            prestige_currency: prestige.prestige_currency(),
            last_prestige: prestige.last_prestige(),
        }
    }

    pub fn economy_snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            balances: self.currencies.clone(),
            levels: self.generators.clone(),
            lifetime_per_generator: self.lifetime_per_generator.clone(),
            purchased_upgrades: self.purchased_upgrades.clone(),
            total_lifetime_produced: self.total_lifetime_produced,
        }
    }

    /// Push this model into both engines.
    pub fn apply(&self, economy: &mut EconomyEngine, prestige: &mut PrestigeEngine) {
        economy.load_state(&self.economy_snapshot());
        prestige.load_state(economy, self.prestige_currency, self.last_prestige);
    }
}
