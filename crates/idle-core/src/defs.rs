//! Declarative content definitions as they appear in a skin.
//!
//! These are the raw, unvalidated shapes. [`crate::Catalog::build`] checks
//! cross-references and compiles curves and effects into their typed forms.

use crate::ids::{CurrencyId, GeneratorId, UpgradeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A unit of account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyDef {
    /// Currency identifier.
    pub id: CurrencyId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Starting balance for a fresh game.
    #[serde(default)]
    pub start: f64,
}

/// A purchasable producer of one currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorDef {
    /// Generator identifier.
    pub id: GeneratorId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Presentation icon reference.
    #[serde(default)]
    pub icon_id: String,
    /// Currency produced by, and spent on, this generator.
    pub currency_id: CurrencyId,
    /// Price of the first level.
    pub base_cost: f64,
    /// Price progression across levels.
    #[serde(default)]
    pub cost_curve: CostCurveDef,
    /// Production per second per owned level.
    pub base_rate_per_sec: f64,
    /// Conditions to unlock purchasing.
    #[serde(default, rename = "unlockReq")]
    pub unlock_requirement: UnlockRequirementDef,
    /// Highest purchasable level; absent means unbounded.
    #[serde(default)]
    pub max_level: Option<u32>,
}

/// Raw cost curve parameters. Only the fields relevant to `kind` are read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostCurveDef {
    /// One of `linear`, `geometric`, `polynomial`.
    #[serde(rename = "type")]
    pub kind: String,
    pub step: f64,
    pub growth: f64,
    pub a: f64,
    pub b: f64,
}

impl Default for CostCurveDef {
    fn default() -> Self {
        Self {
            kind: "linear".to_string(),
            step: 1.0,
            growth: 1.07,
            a: 0.0,
            b: 0.0,
        }
    }
}

/// Unlock conditions for a generator. Each condition is checked only if set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnlockRequirementDef {
    pub currency_id: Option<CurrencyId>,
    pub amount: f64,
    pub generator_id: Option<GeneratorId>,
    pub min_level: u32,
}

/// A one-shot purchase that modifies production or cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeDef {
    pub id: UpgradeId,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "desc")]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub icon_id: String,
    #[serde(default)]
    pub conditions: UpgradeConditionDef,
    pub effect: UpgradeEffectDef,
}

/// Preconditions for buying an upgrade.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpgradeConditionDef {
    pub generator_id: Option<GeneratorId>,
    pub min_level: u32,
    /// Currency checked against `min_total` and spent on the price.
    pub currency_id: Option<CurrencyId>,
    pub min_total: f64,
}

/// Raw effect definition. `kind` selects which numeric field is read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpgradeEffectDef {
    /// One of `multiplier`, `additive`, `costReduction`.
    #[serde(rename = "type")]
    pub kind: String,
    /// `"all"` or a generator id; missing means `"all"`.
    pub target: Option<String>,
    pub percent: f64,
    pub amount_per_sec: f64,
    pub amount: f64,
}

/// Achievement metadata. The simulation never interprets these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AchievementDef {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
}

/// Theme presentation and meta tuning for a skin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeDef {
    pub primary_color: String,
    pub font_id: String,
    pub sfx_pack_id: String,
    pub art_atlas_id: String,
    pub prestige_formula: PrestigeFormulaDef,
    /// Upper bound on credited offline time.
    pub offline_cap_hours: f64,
    /// Per-currency overrides of the starting balance.
    pub starting_balances: IndexMap<CurrencyId, f64>,
}

impl Default for ThemeDef {
    fn default() -> Self {
        Self {
            primary_color: "#FFFFFF".to_string(),
            font_id: "default".to_string(),
            sfx_pack_id: String::new(),
            art_atlas_id: String::new(),
            prestige_formula: PrestigeFormulaDef::default(),
            offline_cap_hours: 12.0,
            starting_balances: IndexMap::new(),
        }
    }
}

/// Parameters of `floor(A * sqrt(total / B))`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrestigeFormulaDef {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
}

impl Default for PrestigeFormulaDef {
    fn default() -> Self {
        Self { a: 1.0, b: 1.0 }
    }
}

/// All collections of one skin, ready for [`crate::Catalog::build`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogDefs {
    pub currencies: Vec<CurrencyDef>,
    pub generators: Vec<GeneratorDef>,
    pub upgrades: Vec<UpgradeDef>,
    pub achievements: Vec<AchievementDef>,
    pub theme: ThemeDef,
}
