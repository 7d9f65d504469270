use thiserror::Error;

/// Why a purchase was refused. Expected during play; the display text is
/// suitable for showing to the player.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("Generator not found")]
    UnknownGenerator,
    #[error("Generator locked")]
    Locked,
    #[error("Max level reached")]
    MaxLevel,
    #[error("Insufficient currency")]
    InsufficientCurrency,
    #[error("Already purchased")]
    AlreadyPurchased,
    #[error("Upgrade not found")]
    UnknownUpgrade,
    #[error("Generator level too low")]
    GeneratorLevelTooLow,
    #[error("Insufficient total currency")]
    InsufficientTotal,
    /// The upgrade names no currency and the catalog declares none.
    #[error("No currency to pay with")]
    NoPaymentCurrency,
}
