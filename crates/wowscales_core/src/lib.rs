//! Core domain logic for WOW Scales verification records.
//! This crate owns the store schema, the multi-table write order and the
//! read-side joins; the HTTP crate only adapts it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{
    AccuracyTestRecord, InstrumentRecord, OfficerRecord, RepeatabilityTestRecord,
    VariationTestRecord, VerificationDetail, VerificationId, VerificationRecord,
    VerificationSummary,
};
pub use model::submission::{
    AccuracyPointInput, ClientInput, HeaderInput, InstrumentInput, OfficerInput,
    RepeatabilityInput, StatusInput, SubmissionError, VariationInput, VerificationPayload,
    VerificationSubmission,
};
pub use repo::memory_repo::InMemoryVerificationRepository;
pub use repo::verification_repo::{
    RepoError, RepoResult, SqliteVerificationRepository, VerificationRepository,
};
pub use service::verification_service::{
    current_timestamp, ServiceResult, VerificationService, VerificationServiceError,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
