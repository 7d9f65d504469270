//! A running game: catalog, engines, saves and cadence wired together.

use crate::config::RuntimeConfig;
use crate::ticker::FixedStepTicker;
use anyhow::{Context, Result};
use idle_core::{Catalog, Clock};
use idle_econ::{EconomyEngine, OfflineEarnings, PrestigeEngine, PurchaseError};
use persistence::{default_save_dir, FileStore, PersistenceError, SaveModel, SaveService, XorCipher};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Session {
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    economy: EconomyEngine,
    prestige: PrestigeEngine,
    saves: SaveService,
    ticker: FixedStepTicker,
    pending_offline: Option<OfflineEarnings>,
}

impl Session {
    /// Fresh engines for `catalog`. Nothing is loaded yet; see [`Self::restore`].
    pub fn new(catalog: Arc<Catalog>, clock: Arc<dyn Clock>, saves: SaveService) -> Self {
        let mut economy = EconomyEngine::new(catalog.clone());
        let prestige = PrestigeEngine::new(&catalog, clock.clone(), &mut economy);
        Self {
            catalog,
            clock,
            economy,
            prestige,
            saves,
            ticker: FixedStepTicker::default(),
            pending_offline: None,
        }
    }

    /// Load the configured skin, open the save slot and restore it.
    pub fn start(config: &RuntimeConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let catalog = content_loader::load_skin(&config.skins_root, &config.skin)?;
        let dir = match &config.save_dir {
            Some(dir) => dir.clone(),
            None => default_save_dir()?,
        };
        let store = FileStore::in_dir(&dir)
            .with_context(|| format!("Failed to open save directory {}", dir.display()))?;
        let saves = SaveService::new(Box::new(store), clock.clone())
            .with_cipher(Box::new(XorCipher::new(&config.cipher_key)?))
            .with_format(config.save_format)
            .with_autosave_interval(config.autosave_interval_secs);

        let mut session = Self::new(Arc::new(catalog), clock, saves);
        session.ticker.set_tick_rate(config.tick_rate);
        session.restore();
        Ok(session)
    }

    /// Apply the stored save, if readable, and compute offline earnings since it was written.
    ///
    /// An unreadable save is logged and the session continues from a fresh state.
    pub fn restore(&mut self) -> Option<&OfflineEarnings> {
        self.pending_offline = None;
        let model = match self.saves.read_model() {
            Ok(Some(model)) => model,
            Ok(None) => {
                info!(location = %self.saves.location(), "no save found, starting new game");
                return None;
            }
            Err(err) => {
                warn!(location = %self.saves.location(), error = %err, "save unreadable, starting fresh");
                return None;
            }
        };
        model.apply(&mut self.economy, &mut self.prestige);
        let earnings = self.economy.compute_offline_earnings(
            model.last_save,
            self.clock.now(),
            self.catalog.offline_cap_hours(),
        );
        info!(
            hours = earnings.hours,
            total = earnings.total_earned,
            "save restored"
        );
        if earnings.total_earned > 0.0 {
            self.pending_offline = Some(earnings);
        }
        self.pending_offline.as_ref()
    }

    pub fn pending_offline_earnings(&self) -> Option<&OfflineEarnings> {
        self.pending_offline.as_ref()
    }

    /// Credit the pending offline earnings. Returns what was credited.
    pub fn claim_offline_earnings(&mut self) -> Option<OfflineEarnings> {
        let earnings = self.pending_offline.take()?;
        self.economy.apply_offline_earnings(&earnings);
        debug!(total = earnings.total_earned, "offline earnings claimed");
        Some(earnings)
    }

    /// Drop the pending offline earnings without crediting them.
    pub fn discard_offline_earnings(&mut self) {
        self.pending_offline = None;
    }

    /// Feed a frame delta through the ticker. Returns the number of steps run.
    pub fn advance(&mut self, frame_delta: f64) -> u32 {
        let Self {
            economy,
            prestige,
            saves,
            ticker,
            ..
        } = self;
        ticker.advance(frame_delta, |dt| step(economy, prestige, saves, dt))
    }

    /// Run exactly one step of `dt` seconds, bypassing the ticker.
    pub fn step(&mut self, dt: f64) {
        step(&mut self.economy, &self.prestige, &mut self.saves, dt);
    }

    pub fn buy_generator(&mut self, id: &str) -> Result<(), PurchaseError> {
        self.economy.try_buy_generator_level(id)
    }

    pub fn buy_upgrade(&mut self, id: &str) -> Result<(), PurchaseError> {
        self.economy.try_buy_upgrade(id)
    }

    /// Prestige and, if anything was awarded, save immediately.
    pub fn prestige(&mut self) -> Result<u64, PersistenceError> {
        let payout = self.prestige.perform_prestige(&mut self.economy);
        if payout > 0 {
            self.saves.save(&self.economy, &self.prestige)?;
        }
        Ok(payout)
    }

    pub fn save(&mut self) -> Result<SaveModel, PersistenceError> {
        self.saves.save(&self.economy, &self.prestige)
    }

    /// Buy every affordable upgrade, then the cheapest affordable generator
    /// level, until nothing is affordable. Returns the number of purchases.
    pub fn autobuy(&mut self) -> u32 {
        let mut bought = 0;
        loop {
            let upgrade = self
                .catalog
                .upgrades()
                .find(|u| self.economy.can_purchase_upgrade(u.id.as_str()).is_ok())
                .map(|u| u.id.clone());
            if let Some(id) = upgrade {
                if self.economy.try_buy_upgrade(id.as_str()).is_ok() {
                    bought += 1;
                    continue;
                }
            }
            let cheapest = self
                .catalog
                .generators()
                .filter(|g| self.economy.can_buy_generator_level(g.id.as_str()).is_ok())
                .filter_map(|g| Some((g.id.clone(), self.economy.next_generator_cost(g.id.as_str())?)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(id, _)| id);
            match cheapest {
                Some(id) if self.economy.try_buy_generator_level(id.as_str()).is_ok() => {
                    bought += 1;
                }
                _ => return bought,
            }
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn economy(&self) -> &EconomyEngine {
        &self.economy
    }

    pub fn economy_mut(&mut self) -> &mut EconomyEngine {
        &mut self.economy
    }

    pub fn prestige_engine(&self) -> &PrestigeEngine {
        &self.prestige
    }

    pub fn prestige_engine_mut(&mut self) -> &mut PrestigeEngine {
        &mut self.prestige
    }

    pub fn saves(&self) -> &SaveService {
        &self.saves
    }

    pub fn saves_mut(&mut self) -> &mut SaveService {
        &mut self.saves
    }

    pub fn ticker(&self) -> &FixedStepTicker {
        &self.ticker
    }

    pub fn ticker_mut(&mut self) -> &mut FixedStepTicker {
        &mut self.ticker
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("economy", &self.economy)
            .field("prestige", &self.prestige)
            .field("saves", &self.saves)
            .field("ticker", &self.ticker)
            .finish_non_exhaustive()
    }
}

/// Production, then autosave. A failed autosave is logged and play continues.
fn step(economy: &mut EconomyEngine, prestige: &PrestigeEngine, saves: &mut SaveService, dt: f64) {
    economy.tick(dt);
    if let Err(err) = saves.update(dt, economy, prestige) {
        warn!(error = %err, "autosave failed");
    }
}
