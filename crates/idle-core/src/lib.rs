#![deny(warnings)]

//! Core content model for the idle economy.
//!
//! This crate defines the declarative skin definitions, the validated
//! [`Catalog`] built from them, cost curves, compiled upgrade effects and the
//! injectable [`Clock`]. Everything here is immutable once built and may be
//! shared freely across threads.

mod catalog;
mod clock;
mod curve;
mod defs;
mod effect;
mod error;
mod format;
mod ids;

pub use catalog::{Catalog, GeneratorSpec, UnlockRequirement, UpgradeConditions, UpgradeSpec};
pub use clock::{Clock, ManualClock, SystemClock};
pub use curve::{geometric, linear, polynomial, CostCurve};
pub use defs::{
    AchievementDef, CatalogDefs, CostCurveDef, CurrencyDef, GeneratorDef, PrestigeFormulaDef,
    ThemeDef, UnlockRequirementDef, UpgradeConditionDef, UpgradeDef, UpgradeEffectDef,
};
pub use effect::{Effect, ModifierSink};
pub use error::ConfigError;
pub use format::format_number;
pub use ids::{CurrencyId, GeneratorId, Target, UpgradeId, ALL_TARGET};
