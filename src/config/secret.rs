//! Encryption key handling using the secrecy crate
//!
//! Encryption keys travel through configuration files, environment variables
//! and [`RedactionOptions`](crate::redaction::RedactionOptions). They are held
//! in a [`Secret`] so the memory is zeroed on drop and `Debug` output never
//! shows the key.
//!
//! # Example
//!
//! ```rust
//! use phi_redact::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("ab".repeat(32));
//! assert_eq!(key.expose_secret().as_ref().len(), 64);
//! assert!(!format!("{key:?}").contains("abab"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Key material wrapper that implements the traits required by [`Secret`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl SecretValue {
    /// Check if the key material is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the key material in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Keys are hex; surrounding whitespace from env files is never meaningful
        String::deserialize(deserializer).map(|s| SecretValue(s.trim().to_string()))
    }
}

/// A zeroizing secret string (encryption keys)
pub type SecretString = Secret<SecretValue>;

/// Wrap a string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wrap an optional string as an optional [`SecretString`]
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}
