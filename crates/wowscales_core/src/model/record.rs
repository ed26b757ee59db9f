//! Persisted rows and read-side views.
//!
//! Field names follow the snake_case column names of the store, so the JSON
//! produced by the HTTP layer matches the table layout one to one.

use serde::{Deserialize, Serialize};

/// Generated identifier of a verification row.
pub type VerificationId = i64;

/// One entry of the verification list: the verification columns plus the
/// denormalized client name/address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub id: VerificationId,
    pub certificate_no: Option<String>,
    pub verification_date: Option<String>,
    pub verification_sticker: Option<String>,
    pub client_id: Option<i64>,
    pub status_type: Option<String>,
    pub accuracy_type: Option<String>,
    /// RFC 3339 UTC, millisecond precision.
    pub created_at: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
}

/// Verification row joined with the full client contact block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    #[serde(flatten)]
    pub summary: VerificationSummary,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentRecord {
    pub id: i64,
    pub verification_id: VerificationId,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub accuracy_class: Option<String>,
    pub units: Option<String>,
    pub max_capacity: Option<f64>,
    pub max_test_load_available: Option<f64>,
    pub verification_interval_e: Option<f64>,
    pub min_capacity: Option<f64>,
    pub sa_number: Option<String>,
    pub aa_number: Option<String>,
    pub software_version: Option<String>,
    pub sealing_method: Option<String>,
    pub equipment_notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyTestRecord {
    pub id: i64,
    pub verification_id: VerificationId,
    pub test_load: Option<f64>,
    pub make_up: Option<f64>,
    pub indication: Option<f64>,
    pub run_up_load: Option<f64>,
    pub run_down_load: Option<f64>,
    pub switch_point_load: Option<f64>,
    pub error_value: Option<f64>,
    pub band: Option<String>,
    /// Maximum permissible error at this load.
    pub mpe_value: Option<f64>,
    pub result: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationTestRecord {
    pub id: i64,
    pub verification_id: VerificationId,
    pub applied_load: Option<f64>,
    pub reference_indication: Option<f64>,
    pub end1_indication: Option<f64>,
    pub middle_indication: Option<f64>,
    pub end2_indication: Option<f64>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatabilityTestRecord {
    pub id: i64,
    pub verification_id: VerificationId,
    pub target_test_load: Option<f64>,
    pub run1_indication: Option<f64>,
    pub run2_indication: Option<f64>,
    pub run3_indication: Option<f64>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficerRecord {
    pub id: i64,
    pub verification_id: VerificationId,
    pub officer_name: Option<String>,
    pub officer_id: Option<String>,
    pub sanas_lab_no: Option<String>,
    pub seal_id: Option<String>,
    pub signature: Option<String>,
    pub created_at: String,
}

/// Full certificate reassembled from every table.
///
/// Top-level keys are camelCase (`accuracyTests`, ...) while the nested rows
/// keep their column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDetail {
    pub verification: VerificationRecord,
    pub instrument: Option<InstrumentRecord>,
    pub officer: Option<OfficerRecord>,
    /// Ordered by row id, which is submission order.
    pub accuracy_tests: Vec<AccuracyTestRecord>,
    pub variation_test: Option<VariationTestRecord>,
    pub repeatability_test: Option<RepeatabilityTestRecord>,
}
