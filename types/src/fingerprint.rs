//! Device key fingerprints in their two representations.
//!
//! A [`Fingerprint`] is the bare hex form carried inside trust messages. A
//! [`VersionedFingerprint`] carries the Axolotl key-type prefix and is the form
//! used for trust-store lookups and for persisted pending-trust entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Hex prefix of the Axolotl (Curve25519) key type.
pub const KEY_VERSION_PREFIX: &str = "05";

/// Length of a public key fingerprint in bytes (64 hex characters).
pub const FINGERPRINT_BYTES: usize = 32;

/// Validate a hex fingerprint of [`FINGERPRINT_BYTES`] and normalize it to lowercase.
fn normalize_hex(raw: &str) -> Result<String, TypesError> {
    let lower = raw.to_ascii_lowercase();
    match hex::decode(&lower) {
        Ok(bytes) if bytes.len() == FINGERPRINT_BYTES => Ok(lower),
        _ => Err(TypesError::InvalidFingerprint(raw.to_string())),
    }
}

/// Bare hex fingerprint of one device's public key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        normalize_hex(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The version-qualified form used by the trust store.
    pub fn with_version(&self) -> VersionedFingerprint {
        VersionedFingerprint(format!("{KEY_VERSION_PREFIX}{}", self.0))
    }
}

/// Fingerprint qualified with the key-type version prefix.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionedFingerprint(String);

impl VersionedFingerprint {
    /// Parse `05` followed by a bare fingerprint.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let invalid = || TypesError::InvalidFingerprint(raw.to_string());
        let bare = raw.strip_prefix(KEY_VERSION_PREFIX).ok_or_else(invalid)?;
        let bare = normalize_hex(bare).map_err(|_| invalid())?;
        Ok(Self(format!("{KEY_VERSION_PREFIX}{bare}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The bare form as carried on the wire.
    pub fn without_version(&self) -> Fingerprint {
        Fingerprint(self.0[KEY_VERSION_PREFIX.len()..].to_string())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for VersionedFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for VersionedFingerprint {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl TryFrom<String> for VersionedFingerprint {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

impl From<VersionedFingerprint> for String {
    fn from(fp: VersionedFingerprint) -> Self {
        fp.0
    }
}
