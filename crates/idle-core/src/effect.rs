//! Compiled upgrade effects.
//!
//! Each upgrade compiles once, at catalog build, into one [`Effect`]. Effects
//! are stateless: applying one only feeds its contribution into a
//! [`ModifierSink`], which owns the aggregation rules.

use crate::defs::UpgradeEffectDef;
use crate::error::ConfigError;
use crate::ids::{Target, UpgradeId};

/// Receiver of effect contributions, keyed by target.
pub trait ModifierSink {
    /// Multiply the target's production factor by `1 + percent`.
    fn add_multiplier(&mut self, target: &Target, percent: f64);
    /// Add a flat per-second amount to the target's production.
    fn add_additive(&mut self, target: &Target, amount_per_sec: f64);
    /// Multiply the target's cost factor by `max(0, 1 - percent)`.
    fn add_cost_reduction(&mut self, target: &Target, percent: f64);
}

/// One upgrade's contribution to the modifier aggregates.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Multiplier { target: Target, percent: f64 },
    Additive { target: Target, amount_per_sec: f64 },
    CostReduction { target: Target, percent: f64 },
}

impl Effect {
    /// Compile a raw effect definition for `upgrade`.
    ///
    /// Additive effects read `amountPerSec`, falling back to `amount` when the
    /// former is zero.
    pub fn compile(upgrade: &UpgradeId, def: &UpgradeEffectDef) -> Result<Self, ConfigError> {
        let target = Target::parse(def.target.as_deref());
        let kind = def.kind.trim().to_ascii_lowercase().replace(&['_', '-'][..], "");
        let effect = match kind.as_str() {
            "multiplier" => Effect::Multiplier {
                target,
                percent: def.percent,
            },
            "additive" => Effect::Additive {
                target,
                amount_per_sec: if def.amount_per_sec != 0.0 {
                    def.amount_per_sec
                } else {
                    def.amount
                },
            },
            "costreduction" => Effect::CostReduction {
                target,
                percent: def.percent,
            },
            _ => {
                return Err(ConfigError::UnknownEffectType {
                    upgrade: upgrade.to_string(),
                    kind: def.kind.clone(),
                })
            }
        };
        if !effect.value().is_finite() {
            return Err(ConfigError::NonFinite {
                owner: format!("upgrade {upgrade}"),
                field: "effect",
            });
        }
        Ok(effect)
    }

    /// Scope of this effect.
    pub fn target(&self) -> &Target {
        match self {
            Effect::Multiplier { target, .. }
            | Effect::Additive { target, .. }
            | Effect::CostReduction { target, .. } => target,
        }
    }

    /// Feed this effect into `sink`.
    pub fn apply<S: ModifierSink + ?Sized>(&self, sink: &mut S) {
        match self {
            Effect::Multiplier { target, percent } => sink.add_multiplier(target, *percent),
            Effect::Additive {
                target,
                amount_per_sec,
            } => sink.add_additive(target, *amount_per_sec),
            Effect::CostReduction { target, percent } => sink.add_cost_reduction(target, *percent),
        }
    }

    fn value(&self) -> f64 {
        match self {
            Effect::Multiplier { percent, .. } | Effect::CostReduction { percent, .. } => *percent,
            Effect::Additive { amount_per_sec, .. } => *amount_per_sec,
        }
    }
}
