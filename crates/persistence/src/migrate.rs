//! Forward migration of older save models.

use crate::error::{PersistenceError, Result};
use crate::model::SaveModel;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

type Migration = Box<dyn Fn(SaveModel) -> SaveModel + Send + Sync>;

/// Ordered `version -> model -> model` steps up to a target version.
pub struct MigrationChain {
    target: u32,
    steps: BTreeMap<u32, Migration>,
}

impl MigrationChain {
    pub fn new(target: u32) -> Self {
        Self {
            target,
            steps: BTreeMap::new(),
        }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Register the step that upgrades a model at `from_version`. Replaces any earlier one.
    pub fn register<F>(&mut self, from_version: u32, migration: F)
    where
        F: Fn(SaveModel) -> SaveModel + Send + Sync + 'static,
    {
        self.steps.insert(from_version, Box::new(migration));
    }

    /// Bring `model` up to the target version.
    ///
    /// Each version below the target runs its registered step, if any, and
    /// then moves to the next version. Versions without a step are plain
    /// bumps. A model newer than the target is rejected.
    pub fn run(&self, mut model: SaveModel) -> Result<SaveModel> {
        if model.version > self.target {
            return Err(PersistenceError::UnsupportedVersion {
                found: model.version,
                supported: self.target,
            });
        }
        while model.version < self.target {
            let from = model.version;
            if let Some(step) = self.steps.get(&from) {
                debug!(from, "running save migration");
                model = step(model);
            }
            model.version = from + 1;
        }
        Ok(model)
    }
}

impl fmt::Debug for MigrationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationChain")
            .field("target", &self.target)
            .field("steps", &self.steps.keys().collect::<Vec<_>>())
            .finish()
    }
}
