//! Stable identifiers used to key catalog content and runtime state.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Unique identifier for a currency, e.g. "soft".
    CurrencyId
}

string_id! {
    /// Unique identifier for a generator, e.g. "gen_oven".
    GeneratorId
}

string_id! {
    /// Unique identifier for an upgrade, e.g. "upg_hotter_ovens".
    UpgradeId
}

/// Keyword that scopes an upgrade effect to every generator.
pub const ALL_TARGET: &str = "all";

/// Scope of an upgrade effect.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    /// Applies to every generator.
    All,
    /// Applies to a single generator.
    Generator(GeneratorId),
}

impl Target {
    /// Normalize a raw content target: missing, empty or "all" (any case) map to [`Target::All`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Target::All,
            Some(s) if s.eq_ignore_ascii_case(ALL_TARGET) => Target::All,
            Some(s) => Target::Generator(GeneratorId::from(s)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::All => f.write_str(ALL_TARGET),
            Target::Generator(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_normalization() {
        assert_eq!(Target::parse(None), Target::All);
        assert_eq!(Target::parse(Some("")), Target::All);
        assert_eq!(Target::parse(Some("ALL")), Target::All);
        assert_eq!(
            Target::parse(Some("gen_oven")),
            Target::Generator(GeneratorId::from("gen_oven"))
        );
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = CurrencyId::from("soft");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"soft\"");
        let back: CurrencyId = serde_json::from_str("\"soft\"").unwrap();
        assert_eq!(back, id);
    }
}
