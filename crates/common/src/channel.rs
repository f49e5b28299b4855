//! Submission channel between the pairing panel and the application shell
//!
//! The panel gets a [`SubmissionSender`] at construction and the shell keeps
//! the matching [`SubmissionReceiver`]. Both ends run on the UI loop, so the
//! sender never waits: a full or closed channel is reported as an error.

use async_channel::{Receiver, Sender, TrySendError, bounded};

use crate::PairingSubmission;

/// Default capacity of the submission channel
pub const SUBMISSION_CHANNEL_CAPACITY: usize = 16;

/// Sending end, owned by the pairing panel
#[derive(Debug, Clone)]
pub struct SubmissionSender {
    tx: Sender<PairingSubmission>,
}

impl SubmissionSender {
    /// Deliver a submission without blocking
    pub fn submit(&self, submission: PairingSubmission) -> crate::Result<()> {
        self.tx.try_send(submission).map_err(|e| match e {
            TrySendError::Full(_) => crate::Error::Channel("submission queue is full".to_string()),
            TrySendError::Closed(_) => {
                crate::Error::Channel("submission receiver was dropped".to_string())
            }
        })
    }
}

/// Receiving end, owned by the application shell
#[derive(Debug)]
pub struct SubmissionReceiver {
    rx: Receiver<PairingSubmission>,
}

impl SubmissionReceiver {
    /// Take the next pending submission, if any
    pub fn try_recv(&self) -> Option<PairingSubmission> {
        self.rx.try_recv().ok()
    }

    /// Drain every pending submission in arrival order
    pub fn drain(&self) -> Vec<PairingSubmission> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

/// Create the submission channel with the default capacity
///
/// Returns (SubmissionSender for the panel, SubmissionReceiver for the shell)
pub fn create_submission_channel() -> (SubmissionSender, SubmissionReceiver) {
    create_submission_channel_with_capacity(SUBMISSION_CHANNEL_CAPACITY)
}

/// Create the submission channel with an explicit capacity
pub fn create_submission_channel_with_capacity(
    capacity: usize,
) -> (SubmissionSender, SubmissionReceiver) {
    let (tx, rx) = bounded(capacity.max(1));
    (SubmissionSender { tx }, SubmissionReceiver { rx })
}
