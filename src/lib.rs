//! Telegram DM Auto-responder Library
//!
//! Connects to Telegram with a user account (MTProto), watches the
//! incoming-message stream, and answers direct messages from one
//! configured sender with a fixed reply text. The rule itself lives in
//! [`responder`] behind small traits so it can be exercised without a
//! live client; the grammers plumbing lives in [`session`] and
//! [`commands`].

pub mod config;
pub mod error;
pub mod responder;
pub mod session;

// Re-export common types
pub use config::Config;
pub use error::{Error, Result};
pub use responder::{eligible, AutoResponder, IncomingMessage, Outcome, SelfIdentity};
pub use session::{check_session_exists, get_client, SessionLock};

// Commands module uses re-exported types, so it must be declared after the re-exports
pub mod commands;
