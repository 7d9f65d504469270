use thiserror::Error;

/// Fatal content problems detected while building a [`crate::Catalog`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Two definitions of the same kind share an id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
    /// A definition points at a currency that does not exist.
    #[error("{owner} references missing currency {currency}")]
    UnknownCurrency { owner: String, currency: String },
    /// A definition points at a generator that does not exist.
    #[error("{owner} references missing generator {generator}")]
    UnknownGenerator { owner: String, generator: String },
    /// Cost curve type is not linear, geometric or polynomial.
    #[error("generator {generator} has unknown cost curve type '{kind}'")]
    UnknownCostCurve { generator: String, kind: String },
    /// Effect type is not multiplier, additive or costReduction.
    #[error("upgrade {upgrade} has unknown effect type '{kind}'")]
    UnknownEffectType { upgrade: String, kind: String },
    /// Numeric field is NaN or infinite.
    #[error("{owner} has a non-finite value in {field}")]
    NonFinite { owner: String, field: &'static str },
}
