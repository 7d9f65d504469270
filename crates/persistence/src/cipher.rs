//! Reversible byte transforms applied around serialized saves.
//!
//! These obfuscate, they do not protect.

use crate::error::{PersistenceError, Result};

/// Key used when none is configured.
pub const DEFAULT_CIPHER_KEY: &str = "idle-template";

/// `decode(encode(x)) == x` for every input.
pub trait SaveCipher: Send + Sync {
    fn encode(&self, input: &[u8]) -> Vec<u8>;
    fn decode(&self, input: &[u8]) -> Vec<u8>;
}

/// Repeating-key XOR.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XorCipher {
    key: Vec<u8>,
}

impl XorCipher {
    pub fn new(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(PersistenceError::EmptyCipherKey);
        }
        Ok(Self {
            key: key.as_bytes().to_vec(),
        })
    }

    fn transform(&self, input: &[u8]) -> Vec<u8> {
        input
            .iter()
            .zip(self.key.iter().cycle())
            .map(|(b, k)| b ^ k)
            .collect()
    }
}

impl Default for XorCipher {
    fn default() -> Self {
        Self {
            key: DEFAULT_CIPHER_KEY.as_bytes().to_vec(),
        }
    }
}

impl SaveCipher for XorCipher {
    fn encode(&self, input: &[u8]) -> Vec<u8> {
        self.transform(input)
    }

    fn decode(&self, input: &[u8]) -> Vec<u8> {
        self.transform(input)
    }
}

/// Leaves bytes untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlainCipher;

impl SaveCipher for PlainCipher {
    fn encode(&self, input: &[u8]) -> Vec<u8> {
        input.to_vec()
    }

    fn decode(&self, input: &[u8]) -> Vec<u8> {
        input.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            XorCipher::new(""),
            Err(PersistenceError::EmptyCipherKey)
        ));
    }

    #[test]
    fn xor_changes_bytes() {
        let cipher = XorCipher::default();
        let plain = br#"{"version":1}"#;
        let encoded = cipher.encode(plain);
        assert_eq!(encoded.len(), plain.len());
        assert_ne!(&encoded[..], &plain[..]);
        assert_eq!(cipher.decode(&encoded), plain.to_vec());
    }

    proptest! {
        #[test]
        fn xor_is_reversible(key in "[a-z0-9]{1,16}", data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let cipher = XorCipher::new(&key).unwrap();
            prop_assert_eq!(cipher.decode(&cipher.encode(&data)), data);
        }
    }
}
