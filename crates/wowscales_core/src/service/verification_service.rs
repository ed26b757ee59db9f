//! Verification use-case service.
//!
//! # Responsibility
//! - `submit`: validate a payload, stamp it, and hand it to the writer.
//! - `list_all` / `get_by_id`: read paths over the same repository.
//!
//! # Invariants
//! - Malformed payloads are rejected before the repository is touched.
//! - A missing id surfaces as `NotFound`, never as a store failure.
//! - All rows of one submission share one server-assigned `created_at`.

use crate::model::record::{VerificationDetail, VerificationId, VerificationSummary};
use crate::model::submission::{SubmissionError, VerificationPayload, VerificationSubmission};
use crate::repo::verification_repo::{RepoError, VerificationRepository};
use chrono::{SecondsFormat, Utc};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, VerificationServiceError>;

/// Service error for verification use-cases.
#[derive(Debug)]
pub enum VerificationServiceError {
    /// Requested verification id was never issued.
    NotFound(VerificationId),
    /// Payload failed decoding or required-section checks.
    MalformedInput(SubmissionError),
    /// Any step of the multi-table write failed.
    WriteFailure(RepoError),
    /// Any list/detail query failed.
    ReadFailure(RepoError),
}

impl Display for VerificationServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "verification not found: {id}"),
            Self::MalformedInput(err) => write!(f, "{err}"),
            Self::WriteFailure(err) => write!(f, "verification write failed: {err}"),
            Self::ReadFailure(err) => write!(f, "verification read failed: {err}"),
        }
    }
}

impl Error for VerificationServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::MalformedInput(err) => Some(err),
            Self::WriteFailure(err) | Self::ReadFailure(err) => Some(err),
        }
    }
}

impl From<SubmissionError> for VerificationServiceError {
    fn from(value: SubmissionError) -> Self {
        Self::MalformedInput(value)
    }
}

/// Verification service facade over repository implementations.
pub struct VerificationService<R: VerificationRepository> {
    repo: R,
}

impl<R: VerificationRepository> VerificationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists one composite submission.
    ///
    /// Returns the generated verification id.
    pub fn submit(&mut self, payload: VerificationPayload) -> ServiceResult<VerificationId> {
        self.submit_at(payload, &current_timestamp())
    }

    /// Same as [`submit`](Self::submit) with a caller-provided creation time.
    pub fn submit_at(
        &mut self,
        payload: VerificationPayload,
        created_at: &str,
    ) -> ServiceResult<VerificationId> {
        let submission = VerificationSubmission::try_from(payload).map_err(|err| {
            warn!("event=verification_validate module=service status=error error={err}");
            err
        })?;

        let accuracy_points = submission.accuracy.len();
        let id = self
            .repo
            .create_verification(&submission, created_at)
            .map_err(VerificationServiceError::WriteFailure)?;

        debug!(
            "event=verification_create module=service status=ok verification_id={} accuracy_points={} variation={} repeatability={}",
            id,
            accuracy_points,
            submission.variation.is_some(),
            submission.repeatability.is_some()
        );
        Ok(id)
    }

    /// Lists all verifications, newest first.
    pub fn list_all(&self) -> ServiceResult<Vec<VerificationSummary>> {
        self.repo
            .list_verifications()
            .map_err(VerificationServiceError::ReadFailure)
    }

    /// Gets the composite view of one verification.
    pub fn get_by_id(&self, id: VerificationId) -> ServiceResult<VerificationDetail> {
        self.repo
            .get_verification(id)
            .map_err(VerificationServiceError::ReadFailure)?
            .ok_or(VerificationServiceError::NotFound(id))
    }
}

/// Server-assigned creation timestamp: RFC 3339 UTC with milliseconds.
///
/// Fixed width, so lexical order matches chronological order.
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
