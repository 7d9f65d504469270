//! Validated, immutable content for one skin.

use crate::curve::CostCurve;
use crate::defs::{
    AchievementDef, CatalogDefs, CurrencyDef, GeneratorDef, PrestigeFormulaDef, ThemeDef,
    UpgradeDef,
};
use crate::effect::Effect;
use crate::error::ConfigError;
use crate::ids::{CurrencyId, GeneratorId, Target, UpgradeId};
use indexmap::IndexMap;
use tracing::debug;

/// Compiled generator definition.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorSpec {
    pub id: GeneratorId,
    pub name: String,
    pub icon_id: String,
    pub currency: CurrencyId,
    pub base_cost: f64,
    pub curve: CostCurve,
    pub base_rate_per_sec: f64,
    pub unlock: UnlockRequirement,
    pub max_level: Option<u32>,
}

impl GeneratorSpec {
    /// Undiscounted price of the level after `level`.
    pub fn cost_at(&self, level: u32) -> f64 {
        self.curve.cost(self.base_cost, level)
    }
}

/// Unlock conditions with empty ids already stripped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnlockRequirement {
    /// Balance of `currency` must be at least `amount`.
    pub currency: Option<CurrencyId>,
    pub amount: f64,
    /// Level of `generator` must be at least `min_level`.
    pub generator: Option<GeneratorId>,
    pub min_level: u32,
}

/// Compiled upgrade definition.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeSpec {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    pub icon_id: String,
    pub price: f64,
    pub conditions: UpgradeConditions,
    pub effect: Effect,
}

/// Upgrade preconditions with empty ids already stripped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpgradeConditions {
    pub generator: Option<GeneratorId>,
    pub min_level: u32,
    /// Currency for `min_total` and for paying the price; primary currency when unset.
    pub currency: Option<CurrencyId>,
    pub min_total: f64,
}

/// Content catalog: currencies, generators, upgrades, achievements and theme.
///
/// Collections keep their declaration order. The first declared currency is
/// the primary currency.
#[derive(Clone, Debug)]
pub struct Catalog {
    currencies: IndexMap<CurrencyId, CurrencyDef>,
    generators: IndexMap<GeneratorId, GeneratorSpec>,
    upgrades: IndexMap<UpgradeId, UpgradeSpec>,
    achievements: IndexMap<String, AchievementDef>,
    theme: ThemeDef,
}

impl Catalog {
    /// Validate and compile raw definitions.
    pub fn build(defs: CatalogDefs) -> Result<Self, ConfigError> {
        let CatalogDefs {
            currencies: raw_currencies,
            generators: raw_generators,
            upgrades: raw_upgrades,
            achievements: raw_achievements,
            mut theme,
        } = defs;

        let mut currencies = IndexMap::with_capacity(raw_currencies.len());
        for c in raw_currencies {
            finite(&format!("currency {}", c.id), "start", c.start)?;
            if currencies.contains_key(&c.id) {
                return Err(duplicate("currency", c.id.as_str()));
            }
            currencies.insert(c.id.clone(), c);
        }

        // Starting balances default to each currency's own start value.
        for c in currencies.values() {
            theme.starting_balances.entry(c.id.clone()).or_insert(c.start);
        }
        finite("theme", "offlineCapHours", theme.offline_cap_hours)?;
        finite("theme", "prestigeFormula", theme.prestige_formula.a)?;
        finite("theme", "prestigeFormula", theme.prestige_formula.b)?;

        let mut generators = IndexMap::with_capacity(raw_generators.len());
        for g in raw_generators {
            if generators.contains_key(&g.id) {
                return Err(duplicate("generator", g.id.as_str()));
            }
            let spec = compile_generator(g)?;
            generators.insert(spec.id.clone(), spec);
        }

        let mut upgrades = IndexMap::with_capacity(raw_upgrades.len());
        for u in raw_upgrades {
            if upgrades.contains_key(&u.id) {
                return Err(duplicate("upgrade", u.id.as_str()));
            }
            let spec = compile_upgrade(u)?;
            upgrades.insert(spec.id.clone(), spec);
        }

        let mut achievements = IndexMap::with_capacity(raw_achievements.len());
        for a in raw_achievements {
            if achievements.contains_key(&a.id) {
                return Err(duplicate("achievement", &a.id));
            }
            achievements.insert(a.id.clone(), a);
        }

        let catalog = Self {
            currencies,
            generators,
            upgrades,
            achievements,
            theme,
        };
        catalog.validate_references()?;
        debug!(
            currencies = catalog.currencies.len(),
            generators = catalog.generators.len(),
            upgrades = catalog.upgrades.len(),
            "catalog built"
        );
        Ok(catalog)
    }

    fn validate_references(&self) -> Result<(), ConfigError> {
        for g in self.generators.values() {
            let owner = format!("generator {}", g.id);
            self.require_currency(&owner, &g.currency)?;
            if let Some(c) = &g.unlock.currency {
                self.require_currency(&owner, c)?;
            }
            if let Some(dep) = &g.unlock.generator {
                self.require_generator(&owner, dep)?;
            }
        }
        for u in self.upgrades.values() {
            let owner = format!("upgrade {}", u.id);
            if let Some(g) = &u.conditions.generator {
                self.require_generator(&owner, g)?;
            }
            if let Some(c) = &u.conditions.currency {
                self.require_currency(&owner, c)?;
            }
            if let Target::Generator(g) = u.effect.target() {
                self.require_generator(&owner, g)?;
            }
        }
        Ok(())
    }

    fn require_currency(&self, owner: &str, id: &CurrencyId) -> Result<(), ConfigError> {
        if self.currencies.contains_key(id) {
            Ok(())
        } else {
            Err(ConfigError::UnknownCurrency {
                owner: owner.to_string(),
                currency: id.to_string(),
            })
        }
    }

    fn require_generator(&self, owner: &str, id: &GeneratorId) -> Result<(), ConfigError> {
        if self.generators.contains_key(id) {
            Ok(())
        } else {
            Err(ConfigError::UnknownGenerator {
                owner: owner.to_string(),
                generator: id.to_string(),
            })
        }
    }

    /// Currencies in declaration order.
    pub fn currencies(&self) -> impl Iterator<Item = &CurrencyDef> {
        self.currencies.values()
    }

    pub fn currency(&self, id: &str) -> Option<&CurrencyDef> {
        self.currencies.get(id)
    }

    /// Generators in declaration order.
    pub fn generators(&self) -> impl Iterator<Item = &GeneratorSpec> {
        self.generators.values()
    }

    pub fn generator(&self, id: &str) -> Option<&GeneratorSpec> {
        self.generators.get(id)
    }

    /// Upgrades in declaration order.
    pub fn upgrades(&self) -> impl Iterator<Item = &UpgradeSpec> {
        self.upgrades.values()
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeSpec> {
        self.upgrades.get(id)
    }

    pub fn achievements(&self) -> impl Iterator<Item = &AchievementDef> {
        self.achievements.values()
    }

    pub fn theme(&self) -> &ThemeDef {
        &self.theme
    }

    /// The first declared currency, used when an upgrade names none.
    pub fn primary_currency(&self) -> Option<&CurrencyId> {
        self.currencies.keys().next()
    }

    /// Balance a currency holds on a fresh game or after a reset.
    ///
    /// Currencies unknown to the theme (e.g. only seen in save data) start at zero.
    pub fn starting_balance(&self, id: &CurrencyId) -> f64 {
        self.theme
            .starting_balances
            .get(id)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn offline_cap_hours(&self) -> f64 {
        self.theme.offline_cap_hours
    }

    pub fn prestige_formula(&self) -> PrestigeFormulaDef {
        self.theme.prestige_formula
    }
}

fn compile_generator(g: GeneratorDef) -> Result<GeneratorSpec, ConfigError> {
    let owner = format!("generator {}", g.id);
    finite(&owner, "baseCost", g.base_cost)?;
    finite(&owner, "baseRatePerSec", g.base_rate_per_sec)?;
    finite(&owner, "unlockReq.amount", g.unlock_requirement.amount)?;
    let curve = CostCurve::from_def(&g.id, &g.cost_curve)?;
    let req = g.unlock_requirement;
    Ok(GeneratorSpec {
        id: g.id,
        name: g.name,
        icon_id: g.icon_id,
        currency: g.currency_id,
        base_cost: g.base_cost,
        curve,
        base_rate_per_sec: g.base_rate_per_sec,
        unlock: UnlockRequirement {
            currency: req.currency_id.filter(|c| !c.as_str().is_empty()),
            amount: req.amount,
            generator: req.generator_id.filter(|g| !g.as_str().is_empty()),
            min_level: req.min_level,
        },
        max_level: g.max_level,
    })
}

fn compile_upgrade(u: UpgradeDef) -> Result<UpgradeSpec, ConfigError> {
    let owner = format!("upgrade {}", u.id);
    finite(&owner, "price", u.price)?;
    finite(&owner, "conditions.minTotal", u.conditions.min_total)?;
    let effect = Effect::compile(&u.id, &u.effect)?;
    let cond = u.conditions;
    Ok(UpgradeSpec {
        id: u.id,
        name: u.name,
        description: u.description,
        icon_id: u.icon_id,
        price: u.price,
        conditions: UpgradeConditions {
            generator: cond.generator_id.filter(|g| !g.as_str().is_empty()),
            min_level: cond.min_level,
            currency: cond.currency_id.filter(|c| !c.as_str().is_empty()),
            min_total: cond.min_total,
        },
        effect,
    })
}

fn finite(owner: &str, field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            owner: owner.to_string(),
            field,
        })
    }
}

fn duplicate(kind: &'static str, id: &str) -> ConfigError {
    ConfigError::DuplicateId {
        kind,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{CostCurveDef, UnlockRequirementDef, UpgradeConditionDef, UpgradeEffectDef};

    fn currency(id: &str, start: f64) -> CurrencyDef {
        CurrencyDef {
            id: id.into(),
            name: id.to_uppercase(),
            start,
        }
    }

    fn generator(id: &str, currency: &str) -> GeneratorDef {
        GeneratorDef {
            id: id.into(),
            name: id.to_string(),
            icon_id: String::new(),
            currency_id: currency.into(),
            base_cost: 10.0,
            cost_curve: CostCurveDef::default(),
            base_rate_per_sec: 1.0,
            unlock_requirement: UnlockRequirementDef::default(),
            max_level: None,
        }
    }

    fn upgrade(id: &str, target: Option<&str>) -> UpgradeDef {
        UpgradeDef {
            id: id.into(),
            name: id.to_string(),
            description: String::new(),
            price: 100.0,
            icon_id: String::new(),
            conditions: UpgradeConditionDef::default(),
            effect: UpgradeEffectDef {
                kind: "multiplier".into(),
                target: target.map(str::to_string),
                percent: 0.1,
                ..UpgradeEffectDef::default()
            },
        }
    }

    fn defs() -> CatalogDefs {
        CatalogDefs {
            currencies: vec![currency("soft", 5.0), currency("gems", 0.0)],
            generators: vec![generator("gen_a", "soft"), generator("gen_b", "soft")],
            upgrades: vec![upgrade("upg_a", Some("gen_a")), upgrade("upg_all", None)],
            achievements: vec![],
            theme: ThemeDef::default(),
        }
    }

    #[test]
    fn builds_valid_content_in_declaration_order() {
        let catalog = Catalog::build(defs()).unwrap();
        let ids: Vec<_> = catalog.generators().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["gen_a", "gen_b"]);
        assert_eq!(catalog.primary_currency().map(|c| c.as_str()), Some("soft"));
        assert_eq!(catalog.starting_balance(&"soft".into()), 5.0);
        assert_eq!(catalog.starting_balance(&"unknown".into()), 0.0);
    }

    #[test]
    fn theme_override_wins_over_currency_start() {
        let mut d = defs();
        d.theme.starting_balances.insert("soft".into(), 42.0);
        let catalog = Catalog::build(d).unwrap();
        assert_eq!(catalog.starting_balance(&"soft".into()), 42.0);
    }

    #[test]
    fn rejects_generator_with_missing_currency() {
        let mut d = defs();
        d.generators.push(generator("gen_c", "hard"));
        assert_eq!(
            Catalog::build(d).unwrap_err(),
            ConfigError::UnknownCurrency {
                owner: "generator gen_c".into(),
                currency: "hard".into()
            }
        );
    }

    #[test]
    fn rejects_unlock_on_missing_generator() {
        let mut d = defs();
        d.generators[1].unlock_requirement.generator_id = Some("gen_z".into());
        assert!(matches!(
            Catalog::build(d),
            Err(ConfigError::UnknownGenerator { .. })
        ));
    }

    #[test]
    fn empty_optional_ids_are_ignored() {
        let mut d = defs();
        d.generators[1].unlock_requirement.currency_id = Some("".into());
        d.upgrades[0].conditions.generator_id = Some("".into());
        let catalog = Catalog::build(d).unwrap();
        assert_eq!(catalog.generator("gen_b").unwrap().unlock.currency, None);
        assert_eq!(catalog.upgrade("upg_a").unwrap().conditions.generator, None);
    }

    #[test]
    fn rejects_effect_targeting_missing_generator() {
        let mut d = defs();
        d.upgrades.push(upgrade("upg_bad", Some("gen_missing")));
        assert!(matches!(
            Catalog::build(d),
            Err(ConfigError::UnknownGenerator { .. })
        ));
    }

    #[test]
    fn rejects_unknown_curve_at_build_time() {
        let mut d = defs();
        d.generators[0].cost_curve.kind = "cubic".into();
        assert!(matches!(
            Catalog::build(d),
            Err(ConfigError::UnknownCostCurve { .. })
        ));
    }

    #[test]
    fn rejects_duplicates_and_non_finite_values() {
        let mut d = defs();
        d.currencies.push(currency("soft", 0.0));
        assert_eq!(
            Catalog::build(d).unwrap_err(),
            ConfigError::DuplicateId {
                kind: "currency",
                id: "soft".into()
            }
        );

        let mut d = defs();
        d.generators[0].base_rate_per_sec = f64::NAN;
        assert!(matches!(
            Catalog::build(d),
            Err(ConfigError::NonFinite { .. })
        ));
    }
}
