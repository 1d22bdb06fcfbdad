//! Automatic Trust Transfer (ATT).
//!
//! Once a user has authenticated some OMEMO device keys, trust decisions
//! travel as trust messages so that other devices and contacts learn them
//! without verifying every device by hand:
//!
//! 1. **Decision**: [`TrustDecisionEngine`] evaluates an incoming trust
//!    message. If the key that carried it is verified, the listed keys are
//!    authenticated or revoked at once; otherwise the decisions are cached.
//! 2. **Replay**: once a sender key becomes verified, [`ReplayCoordinator`]
//!    applies and consumes everything cached for it.
//! 3. **Fanout**: after a local authentication or revocation,
//!    [`FanoutComposer`] decides who has to learn about it and sends the
//!    trust messages.
//!
//! A remote contact may only make assertions about its own keys. The local
//! account's other devices may make assertions about anyone.

pub mod engine;
pub mod error;
pub mod fanout;
pub mod incoming;
pub mod locks;
pub mod outcome;
pub mod replay;

pub use engine::TrustDecisionEngine;
pub use error::TrustError;
pub use fanout::{FanoutComposer, FanoutReport};
pub use incoming::IncomingMessage;
pub use locks::SenderLocks;
pub use outcome::{MessageKind, ProcessingOutcome, TrustEffects, TrustReport};
pub use replay::{ReplayCoordinator, ReplaySummary};
