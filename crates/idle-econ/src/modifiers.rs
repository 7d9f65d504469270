//! Aggregation of upgrade effects into per-target modifiers.
//!
//! The index is always rebuilt from the full purchased set; nothing mutates
//! it incrementally. All-then-specific multiplication order is fixed so
//! results are reproducible bit for bit.

use idle_core::{Effect, GeneratorId, ModifierSink, Target};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
struct Keyed {
    all: Option<f64>,
    generators: BTreeMap<GeneratorId, f64>,
}

impl Keyed {
    fn get(&self, target: &Target) -> Option<f64> {
        match target {
            Target::All => self.all,
            Target::Generator(id) => self.generators.get(id).copied(),
        }
    }

    fn slot(&mut self, target: &Target, initial: f64) -> &mut f64 {
        match target {
            Target::All => self.all.get_or_insert(initial),
            Target::Generator(id) => self.generators.entry(id.clone()).or_insert(initial),
        }
    }
}

/// Multiplicative, additive and cost-reduction aggregates keyed by target.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModifierIndex {
    multipliers: Keyed,
    additives: Keyed,
    cost_reductions: Keyed,
}

impl ModifierIndex {
    /// Replay `effects` in order into a fresh index.
    pub fn rebuild<'a, I>(effects: I) -> Self
    where
        I: IntoIterator<Item = &'a Effect>,
    {
        let mut index = Self::default();
        for effect in effects {
            effect.apply(&mut index);
        }
        index
    }

    /// Multiplier aggregate for exactly `target` (1.0 when untouched).
    pub fn multiplier(&self, target: &Target) -> f64 {
        self.multipliers.get(target).unwrap_or(1.0)
    }

    /// Additive aggregate for exactly `target` (0.0 when untouched).
    pub fn additive(&self, target: &Target) -> f64 {
        self.additives.get(target).unwrap_or(0.0)
    }

    /// Cost-reduction aggregate for exactly `target` (1.0 when untouched).
    pub fn cost_reduction(&self, target: &Target) -> f64 {
        self.cost_reductions.get(target).unwrap_or(1.0)
    }

    /// `all * specific`, without any external multiplier.
    pub fn effective_multiplier(&self, generator: &GeneratorId) -> f64 {
        let mut value = 1.0;
        if let Some(all) = self.multipliers.all {
            value *= all;
        }
        if let Some(specific) = self.multipliers.generators.get(generator) {
            value *= specific;
        }
        value
    }

    /// `all + specific`.
    pub fn effective_additive(&self, generator: &GeneratorId) -> f64 {
        let mut value = 0.0;
        if let Some(all) = self.additives.all {
            value += all;
        }
        if let Some(specific) = self.additives.generators.get(generator) {
            value += specific;
        }
        value
    }

    /// `all * specific` cost factor.
    pub fn effective_cost_reduction(&self, generator: &GeneratorId) -> f64 {
        let mut value = 1.0;
        if let Some(all) = self.cost_reductions.all {
            value *= all;
        }
        if let Some(specific) = self.cost_reductions.generators.get(generator) {
            value *= specific;
        }
        value
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl ModifierSink for ModifierIndex {
    fn add_multiplier(&mut self, target: &Target, percent: f64) {
        *self.multipliers.slot(target, 1.0) *= 1.0 + percent;
    }

    fn add_additive(&mut self, target: &Target, amount_per_sec: f64) {
        *self.additives.slot(target, 0.0) += amount_per_sec;
    }

    fn add_cost_reduction(&mut self, target: &Target, percent: f64) {
        *self.cost_reductions.slot(target, 1.0) *= (1.0 - percent).max(0.0);
    }
}
