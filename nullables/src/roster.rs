//! Nullable roster: programmable contact directory.

use att_store::Roster;
use att_types::{Contact, Jid};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory roster for any number of local accounts.
///
/// Contacts are returned in JID order. An account without a configured
/// self-contact resolves to one with no devices.
pub struct NullRoster {
    contacts: Mutex<BTreeMap<(Jid, Jid), Contact>>,
}

impl NullRoster {
    pub fn new() -> Self {
        Self {
            contacts: Mutex::new(BTreeMap::new()),
        }
    }

    /// Add or replace a contact (including self-contacts).
    pub fn put_contact(&self, contact: Contact) {
        self.contacts
            .lock()
            .unwrap()
            .insert((contact.account.clone(), contact.jid.clone()), contact);
    }

    /// Build a roster from a list of contacts.
    pub fn with_contacts(contacts: impl IntoIterator<Item = Contact>) -> Self {
        let roster = Self::new();
        for contact in contacts {
            roster.put_contact(contact);
        }
        roster
    }
}

impl Default for NullRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster for NullRoster {
    fn resolve_contact(&self, account: &Jid, jid: &Jid) -> Option<Contact> {
        if account == jid {
            return Some(self.self_contact(account));
        }
        self.contacts
            .lock()
            .unwrap()
            .get(&(account.clone(), jid.clone()))
            .cloned()
    }

    fn contacts(&self, account: &Jid) -> Vec<Contact> {
        self.contacts
            .lock()
            .unwrap()
            .values()
            .filter(|c| &c.account == account)
            .cloned()
            .collect()
    }

    fn self_contact(&self, account: &Jid) -> Contact {
        self.contacts
            .lock()
            .unwrap()
            .get(&(account.clone(), account.clone()))
            .cloned()
            .unwrap_or_else(|| Contact::self_contact(account.clone(), Vec::new()))
    }
}
