#![deny(warnings)]

//! Skin loading.
//!
//! A skin is a directory holding `currencies.json`, `generators.json`,
//! `upgrades.json`, `achievements.json` and `theme.json`. Loading reads all
//! five and hands them to [`Catalog::build`], so a loaded skin is always
//! validated.

use anyhow::{bail, Context};
use idle_core::{Catalog, CatalogDefs};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub const CURRENCIES_FILE: &str = "currencies.json";
pub const GENERATORS_FILE: &str = "generators.json";
pub const UPGRADES_FILE: &str = "upgrades.json";
pub const ACHIEVEMENTS_FILE: &str = "achievements.json";
pub const THEME_FILE: &str = "theme.json";

/// Reads skins from a root directory containing one folder per skin.
#[derive(Clone, Debug)]
pub struct SkinLoader {
    root: PathBuf,
}

impl SkinLoader {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of the skin folders under the root, sorted.
    pub fn available(&self) -> LoadResult<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list skins in {}", self.root.display()))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Raw definitions of `skin`, unvalidated.
    pub fn load_defs(&self, skin: &str) -> LoadResult<CatalogDefs> {
        let dir = self.root.join(skin);
        if !dir.is_dir() {
            bail!("Skin folder not found: {}", dir.display());
        }
        debug!(skin, dir = %dir.display(), "reading skin");
        Ok(CatalogDefs {
            currencies: read_json(&dir.join(CURRENCIES_FILE))?,
            generators: read_json(&dir.join(GENERATORS_FILE))?,
            upgrades: read_json(&dir.join(UPGRADES_FILE))?,
            achievements: read_json(&dir.join(ACHIEVEMENTS_FILE))?,
            theme: read_json(&dir.join(THEME_FILE))?,
        })
    }

    /// Validated catalog of `skin`.
    pub fn load(&self, skin: &str) -> LoadResult<Catalog> {
        let defs = self.load_defs(skin)?;
        let catalog =
            Catalog::build(defs).with_context(|| format!("Invalid content in skin {skin}"))?;
        info!(
            skin,
            currencies = catalog.currencies().count(),
            generators = catalog.generators().count(),
            upgrades = catalog.upgrades().count(),
            "skin loaded"
        );
        Ok(catalog)
    }
}

/// Shorthand for `SkinLoader::new(root).load(skin)`.
pub fn load_skin<P: AsRef<Path>>(root: P, skin: &str) -> LoadResult<Catalog> {
    SkinLoader::new(root).load(skin)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}
