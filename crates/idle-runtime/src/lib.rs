#![deny(warnings)]

//! Runtime wiring for the idle economy.
//!
//! [`Session`] owns a catalog, both engines and a save service, and drives
//! them from a [`FixedStepTicker`]. [`RuntimeConfig`] carries the knobs a
//! host sets from YAML or flags.

mod config;
mod session;
mod ticker;

pub use config::RuntimeConfig;
pub use session::Session;
pub use ticker::{FixedStepTicker, DEFAULT_TICK_RATE, MIN_TICK_RATE};
