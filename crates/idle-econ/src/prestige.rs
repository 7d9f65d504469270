//! Prestige: convert lifetime production into a permanent multiplier.

use crate::engine::EconomyEngine;
use crate::events::{PrestigeOccurred, SubscriptionId, Subscribers};
use chrono::{DateTime, Utc};
use idle_core::{Catalog, Clock, PrestigeFormulaDef};
use std::sync::Arc;
use tracing::info;

/// Extra production granted per unit of prestige currency.
pub const MULTIPLIER_PER_PRESTIGE: f64 = 0.05;

/// `floor(A * sqrt(max(0, total) / max(1, B)))`.
pub fn calculate_prestige(formula: PrestigeFormulaDef, total_lifetime_produced: f64) -> u64 {
    let total = total_lifetime_produced.max(0.0);
    let raw = (formula.a * (total / formula.b.max(1.0)).sqrt()).floor();
    if raw.is_finite() && raw > 0.0 {
        raw as u64
    } else {
        0
    }
}

/// Owns prestige currency and pushes the derived multiplier into the economy.
pub struct PrestigeEngine {
    formula: PrestigeFormulaDef,
    clock: Arc<dyn Clock>,
    prestige_currency: f64,
    last_prestige: DateTime<Utc>,
    occurred: Subscribers<PrestigeOccurred>,
}

impl PrestigeEngine {
    /// Starts with no prestige currency; the last prestige is "now".
    pub fn new(catalog: &Catalog, clock: Arc<dyn Clock>, economy: &mut EconomyEngine) -> Self {
        let last_prestige = clock.now();
        let engine = Self {
            formula: catalog.prestige_formula(),
            clock,
            prestige_currency: 0.0,
            last_prestige,
            occurred: Subscribers::new(),
        };
        engine.push_multiplier(economy);
        engine
    }

    pub fn prestige_currency(&self) -> f64 {
        self.prestige_currency
    }

    pub fn last_prestige(&self) -> DateTime<Utc> {
        self.last_prestige
    }

    /// `1 + prestige_currency * 0.05`.
    pub fn global_multiplier(&self) -> f64 {
        1.0 + self.prestige_currency * MULTIPLIER_PER_PRESTIGE
    }

    pub fn calculate_prestige(&self, total_lifetime_produced: f64) -> u64 {
        calculate_prestige(self.formula, total_lifetime_produced)
    }

    /// Payout a prestige would award right now.
    pub fn preview_prestige(&self, economy: &EconomyEngine) -> u64 {
        self.calculate_prestige(economy.total_lifetime_produced())
    }

    /// Reset the economy for a payout. Returns 0 and changes nothing when
    /// there is nothing to award.
    pub fn perform_prestige(&mut self, economy: &mut EconomyEngine) -> u64 {
        let payout = self.preview_prestige(economy);
        if payout == 0 {
            return 0;
        }
        self.prestige_currency += payout as f64;
        economy.reset_progress();
        self.push_multiplier(economy);
        self.last_prestige = self.clock.now();
        info!(
            payout,
            prestige_currency = self.prestige_currency,
            multiplier = self.global_multiplier(),
            "prestige performed"
        );
        self.occurred.emit(&PrestigeOccurred { payout });
        payout
    }

    /// Restore saved prestige state without resetting the economy.
    pub fn load_state(
        &mut self,
        economy: &mut EconomyEngine,
        prestige_currency: f64,
        last_prestige: DateTime<Utc>,
    ) {
        self.prestige_currency = prestige_currency.max(0.0);
        self.last_prestige = last_prestige;
        self.push_multiplier(economy);
    }

    pub fn subscribe_prestige<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PrestigeOccurred) + Send + 'static,
    {
        self.occurred.subscribe(listener)
    }

    pub fn unsubscribe_prestige(&mut self, id: SubscriptionId) -> bool {
        self.occurred.unsubscribe(id)
    }

    fn push_multiplier(&self, economy: &mut EconomyEngine) {
        economy.set_external_global_multiplier(self.global_multiplier());
    }
}

impl std::fmt::Debug for PrestigeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrestigeEngine")
            .field("formula", &self.formula)
            .field("prestige_currency", &self.prestige_currency)
            .field("last_prestige", &self.last_prestige)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::classic;
    use chrono::Duration;
    use idle_core::{CurrencyId, ManualClock};
    use proptest::prelude::*;
    use std::sync::Mutex;

    fn setup() -> (Arc<ManualClock>, EconomyEngine, PrestigeEngine) {
        let catalog = classic();
        let clock = Arc::new(ManualClock::default());
        let mut economy = EconomyEngine::new(catalog.clone());
        let prestige = PrestigeEngine::new(&catalog, clock.clone(), &mut economy);
        (clock, economy, prestige)
    }

    #[test]
    fn formula_floors_and_clamps() {
        let f = PrestigeFormulaDef { a: 1.0, b: 1.0 };
        assert_eq!(calculate_prestige(f, 0.0), 0);
        assert_eq!(calculate_prestige(f, -50.0), 0);
        assert_eq!(calculate_prestige(f, 99.0), 9);
        assert_eq!(calculate_prestige(f, 100.0), 10);
        let f = PrestigeFormulaDef { a: 2.0, b: 0.0 };
        assert_eq!(calculate_prestige(f, 16.0), 8);
        let f = PrestigeFormulaDef { a: 1.0, b: 1000.0 };
        assert_eq!(calculate_prestige(f, 1_000_000.0), 31);
    }

    #[test]
    fn new_pushes_neutral_multiplier() {
        let (_, economy, prestige) = setup();
        assert_eq!(prestige.global_multiplier(), 1.0);
        assert_eq!(economy.external_multiplier(), 1.0);
        assert_eq!(prestige.last_prestige(), DateTime::<Utc>::default());
    }

    #[test]
    fn nothing_to_award_is_noop() {
        let (_, mut economy, mut prestige) = setup();
        economy.set_level("gen_oven", 3);
        let before = economy.snapshot();
        assert_eq!(prestige.perform_prestige(&mut economy), 0);
        assert_eq!(economy.snapshot(), before);
        assert_eq!(prestige.prestige_currency(), 0.0);
    }

    #[test]
    fn prestige_resets_economy_and_grants_multiplier() {
        let (clock, mut economy, mut prestige) = setup();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        prestige.subscribe_prestige(move |e| s.lock().unwrap().push(e.payout));

        economy.set_level("gen_oven", 10);
        economy.add_currency(&CurrencyId::from("soft"), 5000.0);
        economy.try_buy_upgrade("upg_hotter_ovens").unwrap();
        economy.tick(100.0);
        let expected = prestige.preview_prestige(&economy);
        assert!(expected > 0);

        clock.advance(Duration::hours(2));
        let payout = prestige.perform_prestige(&mut economy);
        assert_eq!(payout, expected);
        assert_eq!(prestige.prestige_currency(), expected as f64);
        assert_eq!(economy.level("gen_oven"), 0);
        assert_eq!(economy.purchased_upgrades().count(), 0);
        assert_eq!(economy.total_lifetime_produced(), 0.0);
        assert_eq!(economy.balance("soft"), 10.0);
        assert_eq!(
            economy.external_multiplier(),
            1.0 + expected as f64 * MULTIPLIER_PER_PRESTIGE
        );
        assert_eq!(
            prestige.last_prestige(),
            DateTime::<Utc>::default() + Duration::hours(2)
        );
        assert_eq!(*seen.lock().unwrap(), vec![expected]);
    }

    #[test]
    fn load_state_restores_without_reset() {
        let (_, mut economy, mut prestige) = setup();
        economy.set_level("gen_oven", 4);
        let at = DateTime::<Utc>::default() + Duration::days(3);
        prestige.load_state(&mut economy, 20.0, at);
        assert_eq!(prestige.prestige_currency(), 20.0);
        assert_eq!(prestige.last_prestige(), at);
        assert_eq!(economy.external_multiplier(), 2.0);
        assert_eq!(economy.level("gen_oven"), 4);
    }

    proptest! {
        #[test]
        fn preview_is_monotonic(x in 0.0f64..1e12, dx in 0.0f64..1e12, a in 0.1f64..10.0, b in 0.0f64..1e4) {
            let f = PrestigeFormulaDef { a, b };
            prop_assert!(calculate_prestige(f, x) <= calculate_prestige(f, x + dx));
        }
    }
}
