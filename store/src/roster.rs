//! Contact directory trait.

use att_types::{Contact, Jid};

/// Read access to the roster of local accounts.
pub trait Roster: Send + Sync {
    /// Resolve a bare JID on `account`'s roster. The account's own JID
    /// resolves to its self-contact.
    fn resolve_contact(&self, account: &Jid, jid: &Jid) -> Option<Contact>;

    /// Every roster contact of `account`. May include the self-contact.
    fn contacts(&self, account: &Jid) -> Vec<Contact>;

    /// The account's own contact entry.
    fn self_contact(&self, account: &Jid) -> Contact;
}
