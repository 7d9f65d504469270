#![deny(warnings)]

//! Versioned save persistence.
//!
//! A save is a [`SaveModel`] encoded with a [`SaveFormat`], passed through a
//! [`SaveCipher`] and written to a [`SaveStore`]. Loading runs the reverse
//! and then a [`MigrationChain`] up to [`CURRENT_VERSION`]. [`SaveService`]
//! ties this to the economy and prestige engines and handles autosave.

mod cipher;
mod error;
mod format;
mod migrate;
mod model;
mod service;
mod store;

pub use cipher::{PlainCipher, SaveCipher, XorCipher, DEFAULT_CIPHER_KEY};
pub use error::{PersistenceError, Result};
pub use format::SaveFormat;
pub use migrate::MigrationChain;
pub use model::{SaveModel, CURRENT_VERSION};
pub use service::{SaveService, DEFAULT_AUTOSAVE_INTERVAL_SECS};
pub use store::{default_save_dir, FileStore, MemoryStore, SaveStore, SAVE_FILE_NAME};
