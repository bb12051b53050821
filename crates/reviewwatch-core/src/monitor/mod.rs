//! Homework status monitor
//!
//! One cycle fetches the status payload for the current time cursor, checks
//! its shape, turns every changed homework into a chat message and delivers
//! it. Failures of a cycle are reported to the same chat, once per distinct
//! message.

mod fetcher;
mod notifier;
mod poller;
mod translator;
mod validator;

pub use fetcher::{ReviewApiClient, StatusSource};
pub use notifier::{DeliveryError, Messenger, Notifier, TelegramMessenger};
pub use poller::{CycleOutcome, Poller, FAILURE_PREFIX};
pub use translator::{parse_homework, parse_status};
pub use validator::{into_poll_response, validate_response};
