//! # ReviewWatch
//!
//! Telegram bot that watches the homework review API.
//!
//! Every ten minutes ReviewWatch asks the status endpoint for homeworks whose
//! review status changed since the last poll and sends one chat message per
//! change. Its own failures (unreachable endpoint, unexpected payloads) are
//! reported to the same chat without repeating the same message twice in a
//! row.
//!
//! ## Architecture
//!
//! - **Config**: layered settings plus the credential gate
//! - **Monitor**: fetcher, response validator, status translator, notifier
//!   and the poll loop that ties them together
//!
//! ## Quick Start
//!
//! ```bash
//! export PRACTICUM_TOKEN=... TELEGRAM_TOKEN=... TELEGRAM_CHAT_ID=...
//! reviewwatch watch
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod models;
pub mod monitor;

pub use crate::config::{Config, Credentials, Secrets};
pub use crate::error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::{Config, Credentials, Secrets};
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::monitor::{
        CycleOutcome, Messenger, Notifier, Poller, ReviewApiClient, StatusSource, TelegramMessenger,
    };
}
