//! Economy engine: balances, generator levels, production and purchases.
//!
//! All operations are synchronous transactions against the current state.
//! A failed purchase never mutates anything.

use crate::error::PurchaseError;
use crate::events::{StateChanged, SubscriptionId, Subscribers};
use crate::modifiers::ModifierIndex;
use crate::offline::{clamped_hours, OfflineEarnings};
use chrono::{DateTime, Utc};
use idle_core::{Catalog, CurrencyId, GeneratorId, GeneratorSpec, UpgradeId, UpgradeSpec};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;
use tracing::debug;

/// Runtime state of one generator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratorState {
    pub level: u32,
    /// Total produced since the last reset.
    pub lifetime_produced: f64,
}

/// Restorable economy state, as carried by a save.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EconomySnapshot {
    pub balances: IndexMap<CurrencyId, f64>,
    pub levels: IndexMap<GeneratorId, u32>,
    pub lifetime_per_generator: IndexMap<GeneratorId, f64>,
    /// In purchase order.
    pub purchased_upgrades: Vec<UpgradeId>,
    pub total_lifetime_produced: f64,
}

/// Owns balances, generator levels and purchased upgrades for one catalog.
#[derive(Debug)]
pub struct EconomyEngine {
    catalog: Arc<Catalog>,
    generators: IndexMap<GeneratorId, GeneratorState>,
    balances: IndexMap<CurrencyId, f64>,
    purchased: IndexSet<UpgradeId>,
    modifiers: ModifierIndex,
    external_multiplier: f64,
    total_lifetime_produced: f64,
    state_changed: Subscribers<StateChanged>,
}

impl EconomyEngine {
    /// Fresh economy: every generator at level 0, every currency at its start.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let generators = catalog
            .generators()
            .map(|g| (g.id.clone(), GeneratorState::default()))
            .collect();
        let balances = catalog
            .currencies()
            .map(|c| (c.id.clone(), catalog.starting_balance(&c.id)))
            .collect();
        Self {
            catalog,
            generators,
            balances,
            purchased: IndexSet::new(),
            modifiers: ModifierIndex::default(),
            external_multiplier: 1.0,
            total_lifetime_produced: 0.0,
            state_changed: Subscribers::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn balances(&self) -> &IndexMap<CurrencyId, f64> {
        &self.balances
    }

    /// Balance of `currency`, zero if never seen.
    pub fn balance(&self, currency: &str) -> f64 {
        self.balances.get(currency).copied().unwrap_or(0.0)
    }

    /// Generator states in catalog order.
    pub fn generators(&self) -> impl Iterator<Item = (&GeneratorId, &GeneratorState)> {
        self.generators.iter()
    }

    pub fn generator(&self, id: &str) -> Option<&GeneratorState> {
        self.generators.get(id)
    }

    pub fn level(&self, id: &str) -> u32 {
        self.generators.get(id).map_or(0, |s| s.level)
    }

    /// Purchased upgrades in purchase order.
    pub fn purchased_upgrades(&self) -> impl Iterator<Item = &UpgradeId> {
        self.purchased.iter()
    }

    pub fn has_upgrade(&self, id: &str) -> bool {
        self.purchased.contains(id)
    }

    pub fn modifiers(&self) -> &ModifierIndex {
        &self.modifiers
    }

    pub fn total_lifetime_produced(&self) -> f64 {
        self.total_lifetime_produced
    }

    pub fn external_multiplier(&self) -> f64 {
        self.external_multiplier
    }

    /// Set the multiplier applied on top of upgrades (e.g. from prestige). Clamped at zero.
    pub fn set_external_global_multiplier(&mut self, multiplier: f64) {
        self.external_multiplier = multiplier.max(0.0);
    }

    pub fn subscribe_state_changed<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StateChanged) + Send + 'static,
    {
        self.state_changed.subscribe(listener)
    }

    pub fn unsubscribe_state_changed(&mut self, id: SubscriptionId) -> bool {
        self.state_changed.unsubscribe(id)
    }

    /// Advance production by `dt` seconds. Non-positive or non-finite `dt` is a no-op.
    pub fn tick(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let Self {
            catalog,
            generators,
            balances,
            modifiers,
            external_multiplier,
            total_lifetime_produced,
            ..
        } = self;
        for (id, state) in generators.iter_mut() {
            if state.level == 0 {
                continue;
            }
            let Some(spec) = catalog.generator(id.as_str()) else {
                continue;
            };
            let produced = production_rate(spec, state.level, modifiers, *external_multiplier) * dt;
            if !produced.is_finite() || produced <= 0.0 {
                continue;
            }
            *balances.entry(spec.currency.clone()).or_insert(0.0) += produced;
            state.lifetime_produced += produced;
            *total_lifetime_produced += produced;
        }
        self.state_changed.emit(&StateChanged);
    }

    /// Credit `amount` to `currency`, creating the balance if needed.
    pub fn add_currency(&mut self, currency: &CurrencyId, amount: f64) {
        *self.balances.entry(currency.clone()).or_insert(0.0) += amount;
    }

    /// Current production per second of one generator; zero for unknown or unowned.
    pub fn production_per_sec(&self, id: &str) -> f64 {
        match (self.catalog.generator(id), self.generators.get(id)) {
            (Some(spec), Some(state)) => {
                production_rate(spec, state.level, &self.modifiers, self.external_multiplier)
            }
            _ => 0.0,
        }
    }

    /// Sum of [`Self::production_per_sec`] across all generators.
    pub fn total_production_per_sec(&self) -> f64 {
        self.generators
            .keys()
            .map(|id| self.production_per_sec(id.as_str()))
            .sum()
    }

    /// Price of the next level, discounted by cost reductions.
    pub fn next_generator_cost(&self, id: &str) -> Option<f64> {
        let spec = self.catalog.generator(id)?;
        let level = self.level(id);
        Some(spec.cost_at(level) * self.modifiers.effective_cost_reduction(&spec.id))
    }

    /// Check, in order: exists, unlocked, below max level, affordable.
    pub fn can_buy_generator_level(&self, id: &str) -> Result<(), PurchaseError> {
        self.generator_purchase(id).map(|_| ())
    }

    /// Buy one level of `id`, debiting exactly its next cost.
    pub fn try_buy_generator_level(&mut self, id: &str) -> Result<(), PurchaseError> {
        let (currency, cost) = self.generator_purchase(id)?;
        self.spend(&currency, cost);
        if let Some(state) = self.generators.get_mut(id) {
            state.level += 1;
            debug!(generator = id, level = state.level, cost, "bought generator level");
        }
        self.state_changed.emit(&StateChanged);
        Ok(())
    }

    fn generator_purchase(&self, id: &str) -> Result<(CurrencyId, f64), PurchaseError> {
        let spec = self
            .catalog
            .generator(id)
            .ok_or(PurchaseError::UnknownGenerator)?;
        if !self.is_unlocked(spec) {
            return Err(PurchaseError::Locked);
        }
        let level = self.level(id);
        if spec.max_level.is_some_and(|max| level >= max) {
            return Err(PurchaseError::MaxLevel);
        }
        let cost = spec.cost_at(level) * self.modifiers.effective_cost_reduction(&spec.id);
        if self.balance(spec.currency.as_str()) < cost {
            return Err(PurchaseError::InsufficientCurrency);
        }
        Ok((spec.currency.clone(), cost))
    }

    /// Whether the unlock requirement of `spec` is met. Each condition is checked only if set.
    pub fn is_unlocked(&self, spec: &GeneratorSpec) -> bool {
        let req = &spec.unlock;
        if let Some(currency) = &req.currency {
            if self.balance(currency.as_str()) < req.amount {
                return false;
            }
        }
        if let Some(dep) = &req.generator {
            if self.level(dep.as_str()) < req.min_level {
                return false;
            }
        }
        true
    }

    /// Check, in order: not owned, exists, generator level, currency total, affordable.
    pub fn can_purchase_upgrade(&self, id: &str) -> Result<(), PurchaseError> {
        self.upgrade_purchase(id).map(|_| ())
    }

    /// Buy upgrade `id` and rebuild all modifier aggregates.
    pub fn try_buy_upgrade(&mut self, id: &str) -> Result<(), PurchaseError> {
        let (upgrade_id, currency, price) = self.upgrade_purchase(id)?;
        self.spend(&currency, price);
        debug!(upgrade = id, price, "bought upgrade");
        self.purchased.insert(upgrade_id);
        self.rebuild_modifiers();
        self.state_changed.emit(&StateChanged);
        Ok(())
    }

    fn upgrade_purchase(&self, id: &str) -> Result<(UpgradeId, CurrencyId, f64), PurchaseError> {
        if self.purchased.contains(id) {
            return Err(PurchaseError::AlreadyPurchased);
        }
        let spec = self
            .catalog
            .upgrade(id)
            .ok_or(PurchaseError::UnknownUpgrade)?;
        let cond = &spec.conditions;
        if let Some(generator) = &cond.generator {
            if self.level(generator.as_str()) < cond.min_level {
                return Err(PurchaseError::GeneratorLevelTooLow);
            }
        }
        let currency = self.payment_currency(spec)?;
        if cond.min_total > 0.0 && self.balance(currency.as_str()) < cond.min_total {
            return Err(PurchaseError::InsufficientTotal);
        }
        if self.balance(currency.as_str()) < spec.price {
            return Err(PurchaseError::InsufficientCurrency);
        }
        Ok((spec.id.clone(), currency, spec.price))
    }

    fn payment_currency(&self, spec: &UpgradeSpec) -> Result<CurrencyId, PurchaseError> {
        spec.conditions
            .currency
            .as_ref()
            .or_else(|| self.catalog.primary_currency())
            .cloned()
            .ok_or(PurchaseError::NoPaymentCurrency)
    }

    // Preconditions guarantee affordability; the floor only guards against drift.
    fn spend(&mut self, currency: &CurrencyId, amount: f64) {
        let balance = self.balances.entry(currency.clone()).or_insert(0.0);
        *balance = (*balance - amount).max(0.0);
    }

    /// Replay every purchased upgrade's effect into a fresh index.
    fn rebuild_modifiers(&mut self) {
        let catalog = &self.catalog;
        self.modifiers = ModifierIndex::rebuild(
            self.purchased
                .iter()
                .filter_map(|id| catalog.upgrade(id.as_str()))
                .map(|u| &u.effect),
        );
    }

    /// Production earned between `last` and `now`, capped at `cap_hours`. Does not mutate balances.
    pub fn compute_offline_earnings(
        &self,
        last: DateTime<Utc>,
        now: DateTime<Utc>,
        cap_hours: f64,
    ) -> OfflineEarnings {
        let mut result = OfflineEarnings::new(clamped_hours(last, now, cap_hours));
        if result.seconds <= 0.0 {
            return result;
        }
        for spec in self.catalog.generators() {
            let per_sec = self.production_per_sec(spec.id.as_str());
            if per_sec <= 0.0 {
                continue;
            }
            result.add(&spec.currency, &spec.id, per_sec * result.seconds);
        }
        result
    }

    /// Credit previously computed offline earnings.
    pub fn apply_offline_earnings(&mut self, earnings: &OfflineEarnings) {
        for (currency, amount) in &earnings.currency_earnings {
            self.add_currency(currency, *amount);
        }
        self.state_changed.emit(&StateChanged);
    }

    /// Zero levels, lifetimes and upgrades; restore starting balances.
    pub fn reset_progress(&mut self) {
        for state in self.generators.values_mut() {
            *state = GeneratorState::default();
        }
        let catalog = &self.catalog;
        for (currency, balance) in self.balances.iter_mut() {
            *balance = catalog.starting_balance(currency);
        }
        self.purchased.clear();
        self.rebuild_modifiers();
        self.total_lifetime_produced = 0.0;
        self.state_changed.emit(&StateChanged);
    }

    /// Copy of the restorable state.
    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            balances: self.balances.clone(),
            levels: self
                .generators
                .iter()
                .map(|(id, s)| (id.clone(), s.level))
                .collect(),
            lifetime_per_generator: self
                .generators
                .iter()
                .map(|(id, s)| (id.clone(), s.lifetime_produced))
                .collect(),
            purchased_upgrades: self.purchased.iter().cloned().collect(),
            total_lifetime_produced: self.total_lifetime_produced,
        }
    }

    /// Overwrite state from `snapshot`.
    ///
    /// Known balances missing from the snapshot keep their value; unknown
    /// snapshot currencies are added. Generators missing from the snapshot
    /// go to zero. Upgrades unknown to the catalog are dropped.
    pub fn load_state(&mut self, snapshot: &EconomySnapshot) {
        for (currency, balance) in self.balances.iter_mut() {
            if let Some(saved) = snapshot.balances.get(currency) {
                *balance = *saved;
            }
        }
        for (currency, saved) in &snapshot.balances {
            if !self.balances.contains_key(currency) {
                self.balances.insert(currency.clone(), *saved);
            }
        }
        for (id, state) in self.generators.iter_mut() {
            state.level = snapshot.levels.get(id).copied().unwrap_or(0);
            state.lifetime_produced = snapshot
                .lifetime_per_generator
                .get(id)
                .copied()
                .unwrap_or(0.0);
        }
        self.purchased.clear();
        for id in &snapshot.purchased_upgrades {
            if self.catalog.upgrade(id.as_str()).is_some() {
                self.purchased.insert(id.clone());
            } else {
                debug!(upgrade = %id, "dropping unknown upgrade from snapshot");
            }
        }
        self.rebuild_modifiers();
        self.total_lifetime_produced = snapshot.total_lifetime_produced;
    }

    #[cfg(test)]
    pub(crate) fn set_level(&mut self, id: &str, level: u32) {
        if let Some(state) = self.generators.get_mut(id) {
            state.level = level;
        }
    }
}

/// `max(0, base_rate * level * multiplier + additive)`, zero when unowned.
fn production_rate(
    spec: &GeneratorSpec,
    level: u32,
    modifiers: &ModifierIndex,
    external_multiplier: f64,
) -> f64 {
    if level == 0 {
        return 0.0;
    }
    let base = spec.base_rate_per_sec * f64::from(level);
    let multiplier = modifiers.effective_multiplier(&spec.id) * external_multiplier;
    let additive = modifiers.effective_additive(&spec.id);
    (base * multiplier + additive).max(0.0)
}
