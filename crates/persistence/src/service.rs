//! Save orchestration: snapshot, encode, store, and the reverse with migrations.

use crate::cipher::{SaveCipher, XorCipher};
use crate::error::Result;
use crate::format::SaveFormat;
use crate::migrate::MigrationChain;
use crate::model::{SaveModel, CURRENT_VERSION};
use crate::store::SaveStore;
use idle_core::Clock;
use idle_econ::{EconomyEngine, PrestigeEngine};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Seconds between autosaves unless configured otherwise.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: f64 = 30.0;

/// Reads and writes one save slot for a pair of engines.
pub struct SaveService {
    store: Box<dyn SaveStore>,
    cipher: Box<dyn SaveCipher>,
    format: SaveFormat,
    clock: Arc<dyn Clock>,
    migrations: MigrationChain,
    autosave_interval: f64,
    accumulator: f64,
}

impl SaveService {
    /// XOR cipher with the default key, JSON, 30 second autosave.
    pub fn new(store: Box<dyn SaveStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            cipher: Box::new(XorCipher::default()),
            format: SaveFormat::default(),
            clock,
            migrations: MigrationChain::new(CURRENT_VERSION),
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL_SECS,
            accumulator: 0.0,
        }
    }

    pub fn with_cipher(mut self, cipher: Box<dyn SaveCipher>) -> Self {
        self.cipher = cipher;
        self
    }

    pub fn with_format(mut self, format: SaveFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_autosave_interval(mut self, secs: f64) -> Self {
        self.autosave_interval = secs;
        self
    }

    pub fn current_version(&self) -> u32 {
        self.migrations.target()
    }

    pub fn format(&self) -> SaveFormat {
        self.format
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    pub fn autosave_interval(&self) -> f64 {
        self.autosave_interval
    }

    /// Register the step applied to models stored at `from_version`.
    pub fn register_migration<F>(&mut self, from_version: u32, migration: F)
    where
        F: Fn(SaveModel) -> SaveModel + Send + Sync + 'static,
    {
        self.migrations.register(from_version, migration);
    }

    /// Snapshot both engines and write them to the store.
    pub fn save(&mut self, economy: &EconomyEngine, prestige: &PrestigeEngine) -> Result<SaveModel> {
        let model = SaveModel::capture(economy, prestige, self.clock.now());
        self.write_model(&model)?;
        info!(location = %self.store.location(), version = model.version, "game saved");
        Ok(model)
    }

    /// Encode and store `model` as is.
    pub fn write_model(&mut self, model: &SaveModel) -> Result<()> {
        let bytes = self.format.encode(model)?;
        let encoded = self.cipher.encode(&bytes);
        self.store.write(&encoded)
    }

    /// Decode and migrate the stored model without touching any engine.
    pub fn read_model(&self) -> Result<Option<SaveModel>> {
        let Some(encoded) = self.store.read()? else {
            return Ok(None);
        };
        let bytes = self.cipher.decode(&encoded);
        let model = self.format.decode(&bytes)?;
        let stored_version = model.version;
        let model = self.migrations.run(model)?;
        debug!(stored_version, version = model.version, "save decoded");
        Ok(Some(model))
    }

    /// Load the stored model into both engines.
    ///
    /// With nothing stored, returns a fresh model and leaves the engines alone.
    pub fn load(
        &self,
        economy: &mut EconomyEngine,
        prestige: &mut PrestigeEngine,
    ) -> Result<SaveModel> {
        match self.read_model()? {
            Some(model) => {
                model.apply(economy, prestige);
                info!(location = %self.store.location(), "save loaded");
                Ok(model)
            }
            None => {
                debug!(location = %self.store.location(), "no save found");
                Ok(self.fresh_model())
            }
        }
    }

    /// Like [`Self::load`], but an unreadable save falls back to a fresh model.
    pub fn load_or_default(
        &self,
        economy: &mut EconomyEngine,
        prestige: &mut PrestigeEngine,
    ) -> SaveModel {
        match self.load(economy, prestige) {
            Ok(model) => model,
            Err(err) => {
                warn!(location = %self.store.location(), error = %err, "save unreadable, starting fresh");
                self.fresh_model()
            }
        }
    }

    /// Accumulate `dt` and save once the autosave interval is reached.
    ///
    /// Time past the interval is dropped; non-positive or non-finite `dt` is ignored.
    /// Returns whether a save happened.
    pub fn update(
        &mut self,
        dt: f64,
        economy: &EconomyEngine,
        prestige: &PrestigeEngine,
    ) -> Result<bool> {
        if !dt.is_finite() || dt <= 0.0 {
            return Ok(false);
        }
        self.accumulator += dt;
        if self.accumulator < self.autosave_interval {
            return Ok(false);
        }
        self.accumulator = 0.0;
        self.save(economy, prestige)?;
        Ok(true)
    }

    pub fn delete(&mut self) -> Result<()> {
        self.store.delete()
    }

    fn fresh_model(&self) -> SaveModel {
        SaveModel {
            version: self.current_version(),
            ..SaveModel::default()
        }
    }
}

impl std::fmt::Debug for SaveService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveService")
            .field("location", &self.store.location())
            .field("format", &self.format)
            .field("migrations", &self.migrations)
            .field("autosave_interval", &self.autosave_interval)
            .finish_non_exhaustive()
    }
}
