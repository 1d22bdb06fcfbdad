//! Trust message bodies for Automatic Trust Transfer.
//!
//! A trust message travels as the plain-text body of an OMEMO-encrypted chat
//! message. Its body is an XMPP URI with the `omemo-trust` action, see
//! [`uri`]. Outgoing messages are handed to a [`Transport`].

pub mod transport;
pub mod uri;

pub use transport::{OutgoingTrustMessage, Transport, TransportError};
