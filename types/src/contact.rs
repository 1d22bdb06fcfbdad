//! Roster contacts and their known devices.

use serde::{Deserialize, Serialize};

use crate::{Fingerprint, Jid, TrustStatus};

/// One known OMEMO device of a contact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub fingerprint: Fingerprint,
    pub status: TrustStatus,
    /// Whether the device is still announced in the contact's device list.
    pub active: bool,
}

impl Device {
    pub fn new(fingerprint: Fingerprint, status: TrustStatus) -> Self {
        Self {
            fingerprint,
            status,
            active: true,
        }
    }

    /// Mark the device as no longer announced.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// A snapshot of a roster entry of `account`, including the account's own
/// self-contact (`jid == account`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// The local account this roster entry belongs to.
    pub account: Jid,
    pub jid: Jid,
    pub devices: Vec<Device>,
}

impl Contact {
    pub fn new(account: Jid, jid: Jid, devices: Vec<Device>) -> Self {
        Self {
            account,
            jid,
            devices,
        }
    }

    /// The account's own contact entry.
    pub fn self_contact(account: Jid, devices: Vec<Device>) -> Self {
        let jid = account.clone();
        Self::new(account, jid, devices)
    }

    pub fn is_self(&self) -> bool {
        self.jid == self.account
    }

    pub fn has_verified_keys(&self) -> bool {
        self.devices.iter().any(|d| d.status.is_verified())
    }

    pub fn verified_fingerprints(&self) -> Vec<Fingerprint> {
        self.devices
            .iter()
            .filter(|d| d.status.is_verified())
            .map(|d| d.fingerprint.clone())
            .collect()
    }

    pub fn verified_and_active_fingerprints(&self) -> Vec<Fingerprint> {
        self.devices
            .iter()
            .filter(|d| d.status.is_verified() && d.active)
            .map(|d| d.fingerprint.clone())
            .collect()
    }

    pub fn count_verified_fingerprints(&self) -> usize {
        self.devices.iter().filter(|d| d.status.is_verified()).count()
    }

    /// Look up a known device by its bare fingerprint string.
    pub fn resolve_fingerprint(&self, fingerprint: &str) -> Option<Fingerprint> {
        let wanted = Fingerprint::parse(fingerprint).ok()?;
        self.devices
            .iter()
            .find(|d| d.fingerprint == wanted)
            .map(|d| d.fingerprint.clone())
    }
}
