#![deny(warnings)]

//! Runtime economy simulation.
//!
//! [`EconomyEngine`] owns balances, generator levels and purchased upgrades
//! and is the only place production is credited. [`PrestigeEngine`] sits on
//! top of it and trades lifetime production for a permanent multiplier.
//! Both are single-writer: callers serialize all mutating calls.

mod engine;
mod error;
mod events;
#[cfg(test)]
mod fixtures;
mod modifiers;
mod offline;
mod prestige;

pub use engine::{EconomyEngine, EconomySnapshot, GeneratorState};
pub use error::PurchaseError;
pub use events::{PrestigeOccurred, StateChanged, SubscriptionId, Subscribers};
pub use modifiers::ModifierIndex;
pub use offline::OfflineEarnings;
pub use prestige::{calculate_prestige, PrestigeEngine, MULTIPLIER_PER_PRESTIGE};
