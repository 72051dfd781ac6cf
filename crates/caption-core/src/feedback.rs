//! Feedback form and the relay seam it submits through.
//!
//! The form never talks to a backend of its own: submissions are handed to a
//! [`RelayClient`] that forwards them (Web3Forms in production).

use crate::flag::timer_runtime;
use crate::{CaptionError, Result, StudioConfig, TimerScope, TransientFlag};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Banner shown after the relay accepts a submission.
pub const SUCCESS_BANNER: &str = "Thank you for your feedback! We'll get back to you soon.";

/// Banner shown after a rejected or failed submission.
pub const ERROR_BANNER: &str = "There was an error submitting your feedback. Please try again.";

/// Payload posted to the relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub access_key: String,
}

/// Relay reply. Only `success` drives the form; the rest is kept for logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelayResponse {
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RelayResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Capability to forward a submission to a form relay.
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Post one submission. No retries.
    async fn submit(&self, submission: &FeedbackSubmission) -> Result<RelayResponse>;
}

#[async_trait]
impl<R: RelayClient + ?Sized> RelayClient for std::sync::Arc<R> {
    async fn submit(&self, submission: &FeedbackSubmission) -> Result<RelayResponse> {
        (**self).submit(submission).await
    }
}

/// Where the form is in its submit lifecycle.
///
/// `Success` and `Error` record the outcome of the last submit. Like `Idle`
/// they accept a new submit; only `Submitting` refuses one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

impl SubmitPhase {
    /// Whether a new submit would be accepted.
    pub fn is_idle(self) -> bool {
        self != SubmitPhase::Submitting
    }
}

/// Outcome of a single submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Relay accepted the submission; fields were cleared.
    Sent,
    /// Relay rejected it or could not be reached; fields were kept.
    Failed,
}

#[derive(Debug, Default)]
struct Fields {
    name: String,
    email: String,
    message: String,
    phase: SubmitPhase,
}

impl Fields {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(CaptionError::MissingField(name));
            }
        }

        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(())
            }
            _ => Err(CaptionError::InvalidEmail(email.to_string())),
        }
    }
}

/// The feedback form: three fields, one submit at a time, self-dismissing
/// success and error banners.
pub struct FeedbackForm<R: RelayClient> {
    relay: R,
    access_key: String,
    banner_dismiss: Duration,
    fields: Mutex<Fields>,
    submitted: TransientFlag,
    error: TransientFlag,
    _timers: TimerScope,
}

impl<R: RelayClient> FeedbackForm<R> {
    pub fn new(relay: R, config: StudioConfig) -> Self {
        let timers = TimerScope::new();
        Self {
            relay,
            access_key: config.access_key,
            banner_dismiss: config.banner_dismiss,
            fields: Mutex::new(Fields::default()),
            submitted: timers.flag("submitted"),
            error: timers.flag("error"),
            _timers: timers,
        }
    }

    fn fields(&self) -> MutexGuard<'_, Fields> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn relay(&self) -> &R {
        &self.relay
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.fields().name = name.into();
    }

    pub fn set_email(&self, email: impl Into<String>) {
        self.fields().email = email.into();
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.fields().message = message.into();
    }

    pub fn name(&self) -> String {
        self.fields().name.clone()
    }

    pub fn email(&self) -> String {
        self.fields().email.clone()
    }

    pub fn message(&self) -> String {
        self.fields().message.clone()
    }

    /// Current phase. After a submit this keeps reporting its outcome until
    /// the next one starts; it does not revert when the banner is dismissed.
    pub fn phase(&self) -> SubmitPhase {
        self.fields().phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase() == SubmitPhase::Submitting
    }

    /// Whether the success banner is showing.
    pub fn is_success_shown(&self) -> bool {
        self.submitted.is_raised()
    }

    /// Whether the error banner is showing.
    pub fn is_error_shown(&self) -> bool {
        self.error.is_raised()
    }

    /// Text of the banner currently showing, if any.
    pub fn banner(&self) -> Option<&'static str> {
        if self.submitted.is_raised() {
            Some(SUCCESS_BANNER)
        } else if self.error.is_raised() {
            Some(ERROR_BANNER)
        } else {
            None
        }
    }

    /// Submit the current fields to the relay.
    ///
    /// All three fields are required and the email must look like one; a
    /// form that fails these checks is refused without a relay call. Beyond
    /// that, one relay call per invocation; identical submissions are not
    /// deduplicated. Transport failures and `success: false` replies are
    /// both reported as [`SubmitOutcome::Failed`].
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let runtime = timer_runtime()?;
        let submission = {
            let mut fields = self.fields();
            if !fields.phase.is_idle() {
                return Err(CaptionError::SubmissionInProgress);
            }
            fields.validate()?;
            fields.phase = SubmitPhase::Submitting;
            FeedbackSubmission {
                name: fields.name.clone(),
                email: fields.email.clone(),
                message: fields.message.clone(),
                access_key: self.access_key.clone(),
            }
        };
        self.submitted.lower();
        self.error.lower();

        let mut pending = Pending {
            fields: &self.fields,
            finished: false,
        };

        let outcome = match self.relay.submit(&submission).await {
            Ok(response) if response.success => {
                info!(?response, "Feedback submitted");
                SubmitOutcome::Sent
            }
            Ok(response) => {
                warn!(?response, "Feedback rejected by relay");
                SubmitOutcome::Failed
            }
            Err(e) => {
                warn!(error = %e, "Feedback submission failed");
                SubmitOutcome::Failed
            }
        };

        {
            let mut fields = self.fields();
            match outcome {
                SubmitOutcome::Sent => {
                    fields.name.clear();
                    fields.email.clear();
                    fields.message.clear();
                    fields.phase = SubmitPhase::Success;
                }
                SubmitOutcome::Failed => fields.phase = SubmitPhase::Error,
            }
        }
        pending.finished = true;

        let banner = match outcome {
            SubmitOutcome::Sent => &self.submitted,
            SubmitOutcome::Failed => &self.error,
        };
        banner.raise_on(&runtime, self.banner_dismiss);

        Ok(outcome)
    }
}

/// Returns the form to `Idle` if a submit future is dropped mid-call.
struct Pending<'a> {
    fields: &'a Mutex<Fields>,
    finished: bool,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.fields
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .phase = SubmitPhase::Idle;
        }
    }
}
