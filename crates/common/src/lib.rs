//! Common building blocks for adb-pair
//!
//! This crate holds what the pairing UI shares with any future pairing
//! client: the submission value and its channel, address composition and
//! field validation, error types, and logging setup.

pub mod address;
pub mod channel;
pub mod error;
pub mod logging;
pub mod submission;

pub use address::{AddressJoin, Field, FieldError, ValidatedForm};
pub use channel::{SubmissionReceiver, SubmissionSender, create_submission_channel};
pub use error::{Error, Result};
pub use logging::setup_logging;
pub use submission::PairingSubmission;
