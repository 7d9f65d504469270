//! Catalogs built from the bundled skins, for tests.

use idle_core::{Catalog, CatalogDefs};
use std::sync::Arc;

macro_rules! skin_file {
    ($skin:literal, $file:literal) => {
        serde_json::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../assets/skins/",
            $skin,
            "/",
            $file
        )))
        .expect($file)
    };
}

macro_rules! skin {
    ($skin:literal) => {
        Arc::new(
            Catalog::build(CatalogDefs {
                currencies: skin_file!($skin, "currencies.json"),
                generators: skin_file!($skin, "generators.json"),
                upgrades: skin_file!($skin, "upgrades.json"),
                achievements: skin_file!($skin, "achievements.json"),
                theme: skin_file!($skin, "theme.json"),
            })
            .expect($skin),
        )
    };
}

pub(crate) fn classic() -> Arc<Catalog> {
    skin!("Classic")
}

pub(crate) fn neon() -> Arc<Catalog> {
    skin!("Neon")
}

/// A catalog from inline JSON arrays, with no achievements and the default theme.
pub(crate) fn inline(currencies: &str, generators: &str, upgrades: &str) -> Arc<Catalog> {
    Arc::new(
        Catalog::build(CatalogDefs {
            currencies: serde_json::from_str(currencies).expect("currencies"),
            generators: serde_json::from_str(generators).expect("generators"),
            upgrades: serde_json::from_str(upgrades).expect("upgrades"),
            ..CatalogDefs::default()
        })
        .expect("inline catalog"),
    )
}
