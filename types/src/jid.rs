//! Bare XMPP addresses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A bare JID (`local@domain` or `domain`).
///
/// Parsing a full JID drops the resource part, so every `Jid` value is bare.
/// Ordering is lexicographic on the string form, which gives trust-message
/// fanout and replay a stable iteration order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Jid(String);

impl Jid {
    /// Parse a bare or full JID.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let bare = match raw.split_once('/') {
            Some((bare, _resource)) => bare,
            None => raw,
        };
        let invalid = || TypesError::InvalidJid(raw.to_string());

        if bare.is_empty() || bare.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid());
        }
        if let Some((local, domain)) = bare.split_once('@') {
            if local.is_empty() || domain.is_empty() || domain.contains('@') {
                return Err(invalid());
            }
        }
        Ok(Self(bare.to_string()))
    }

    /// Return the raw bare JID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The localpart, if this JID has one.
    pub fn local(&self) -> Option<&str> {
        self.0.split_once('@').map(|(local, _)| local)
    }

    /// The domainpart.
    pub fn domain(&self) -> &str {
        match self.0.split_once('@') {
            Some((_, domain)) => domain,
            None => &self.0,
        }
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Jid {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Jid {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Jid> for String {
    fn from(jid: Jid) -> Self {
        jid.0
    }
}
