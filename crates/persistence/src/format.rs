//! Serialization formats for save models.

use crate::error::Result;
use crate::model::SaveModel;
use serde::{Deserialize, Serialize};

/// Byte encoding of a [`SaveModel`] before the cipher runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    /// Indented UTF-8 JSON.
    #[default]
    Json,
    Bincode,
}

impl SaveFormat {
    pub fn encode(self, model: &SaveModel) -> Result<Vec<u8>> {
        Ok(match self {
            SaveFormat::Json => serde_json::to_vec_pretty(model)?,
            SaveFormat::Bincode => bincode::serialize(model)?,
        })
    }

    pub fn decode(self, bytes: &[u8]) -> Result<SaveModel> {
        Ok(match self {
            SaveFormat::Json => serde_json::from_slice(bytes)?,
            SaveFormat::Bincode => bincode::deserialize(bytes)?,
        })
    }
}
