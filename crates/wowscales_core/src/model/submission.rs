//! Inbound verification payload and its validated form.
//!
//! # Responsibility
//! - Decode the camelCase JSON submission posted by the capture form.
//! - Name which sections are required and which are optional.
//! - Normalize blank values so absence is always `None`.
//!
//! # Invariants
//! - A `VerificationSubmission` always has client, header, status,
//!   instrument and officer sections.
//! - Blank text never reaches storage as `""`; it becomes `None`.
//! - Numeric zero is preserved; only missing/blank numbers become `None`.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Customer the certificate is issued to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientInput {
    #[serde(deserialize_with = "optional_text")]
    pub client_name: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub address: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub email: Option<String>,
}

/// Certificate header block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderInput {
    #[serde(deserialize_with = "optional_text")]
    pub cert_no: Option<String>,
    /// Verification date as entered (`YYYY-MM-DD`), stored verbatim.
    #[serde(deserialize_with = "optional_text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub ver_sticker: Option<String>,
}

/// Outcome classification of the verification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusInput {
    #[serde(deserialize_with = "optional_text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub acc_type: Option<String>,
}

/// Weighing instrument under test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentInput {
    #[serde(deserialize_with = "optional_text")]
    pub manufacturer: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub model: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub serial: Option<String>,
    #[serde(rename = "class", deserialize_with = "optional_text")]
    pub accuracy_class: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub units: Option<String>,
    #[serde(deserialize_with = "optional_number")]
    pub max: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub max_avail: Option<f64>,
    /// Verification scale interval `e`.
    #[serde(deserialize_with = "optional_number")]
    pub e: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub min: Option<f64>,
    #[serde(deserialize_with = "optional_text")]
    pub sa_nr: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub aa_nr: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub software: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub sealing: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub equip_notes: Option<String>,
}

/// One tested load point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccuracyPointInput {
    #[serde(deserialize_with = "optional_number")]
    pub load: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub make_up: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub indication: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub run_up_load: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub run_down_load: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub switch_point_load: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub error_value: Option<f64>,
    #[serde(deserialize_with = "optional_text")]
    pub band: Option<String>,
    #[serde(deserialize_with = "optional_number")]
    pub mpe_value: Option<f64>,
    #[serde(deserialize_with = "optional_text")]
    pub result: Option<String>,
}

/// Eccentricity test across load-pan positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariationInput {
    #[serde(deserialize_with = "optional_number")]
    pub applied_load: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub reference_indication: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub end1: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub middle: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub end2: Option<f64>,
}

/// Three runs at a single target load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepeatabilityInput {
    #[serde(deserialize_with = "optional_number")]
    pub target_load: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub run1: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub run2: Option<f64>,
    #[serde(deserialize_with = "optional_number")]
    pub run3: Option<f64>,
}

/// Officer signing the certificate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfficerInput {
    #[serde(deserialize_with = "optional_text")]
    pub officer_name: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub officer_id: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub sanas_lab_no: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub seal_id: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub signature: Option<String>,
}

/// Raw submission exactly as decoded from the request body.
///
/// Every section is optional here; `VerificationSubmission::try_from`
/// enforces which ones must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerificationPayload {
    pub client: Option<ClientInput>,
    pub header: Option<HeaderInput>,
    pub status: Option<StatusInput>,
    pub instrument: Option<InstrumentInput>,
    pub accuracy: Option<Vec<AccuracyPointInput>>,
    pub variation: Option<VariationInput>,
    pub repeatability: Option<RepeatabilityInput>,
    pub officer: Option<OfficerInput>,
}

impl VerificationPayload {
    /// Decodes a JSON request body.
    pub fn from_json(body: &[u8]) -> Result<Self, SubmissionError> {
        serde_json::from_slice(body).map_err(|err| SubmissionError::Decode(err.to_string()))
    }
}

/// Validated submission ready for the writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationSubmission {
    pub client: ClientInput,
    pub header: HeaderInput,
    pub status: StatusInput,
    pub instrument: InstrumentInput,
    /// Insertion order is the order given by the caller.
    pub accuracy: Vec<AccuracyPointInput>,
    pub variation: Option<VariationInput>,
    pub repeatability: Option<RepeatabilityInput>,
    pub officer: OfficerInput,
}

/// Rejection reasons for a submission, raised before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Body is not valid JSON or a field has the wrong shape.
    Decode(String),
    /// Required sections that were missing or null, in payload order.
    MissingSections(Vec<&'static str>),
}

impl Display for SubmissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(message) => write!(f, "malformed verification payload: {message}"),
            Self::MissingSections(sections) => write!(
                f,
                "verification payload is missing required sections: {}",
                sections.join(", ")
            ),
        }
    }
}

impl Error for SubmissionError {}

impl TryFrom<VerificationPayload> for VerificationSubmission {
    type Error = SubmissionError;

    fn try_from(payload: VerificationPayload) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        if payload.client.is_none() {
            missing.push("client");
        }
        if payload.header.is_none() {
            missing.push("header");
        }
        if payload.status.is_none() {
            missing.push("status");
        }
        if payload.instrument.is_none() {
            missing.push("instrument");
        }
        if payload.officer.is_none() {
            missing.push("officer");
        }

        match (
            payload.client,
            payload.header,
            payload.status,
            payload.instrument,
            payload.officer,
        ) {
            (Some(client), Some(header), Some(status), Some(instrument), Some(officer)) => {
                Ok(Self {
                    client,
                    header,
                    status,
                    instrument,
                    accuracy: payload.accuracy.unwrap_or_default(),
                    variation: payload.variation,
                    repeatability: payload.repeatability,
                    officer,
                })
            }
            _ => Err(SubmissionError::MissingSections(missing)),
        }
    }
}

/// Scalar shapes accepted from form-driven clients.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => None,
        Some(Scalar::Text(value)) if value.trim().is_empty() => None,
        Some(Scalar::Text(value)) => Some(value),
        Some(Scalar::Integer(value)) => Some(value.to_string()),
        Some(Scalar::Float(value)) => Some(value.to_string()),
        Some(Scalar::Bool(value)) => Some(value.to_string()),
    })
}

fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Integer(value)) => Ok(Some(value as f64)),
        Some(Scalar::Float(value)) => Ok(Some(value)),
        Some(Scalar::Text(value)) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid number `{trimmed}`")))
        }
        Some(Scalar::Bool(value)) => Err(serde::de::Error::custom(format!(
            "expected a number, got boolean `{value}`"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::{SubmissionError, VerificationPayload, VerificationSubmission};

    #[test]
    fn blank_text_and_numbers_decode_as_absent() {
        let payload = VerificationPayload::from_json(
            br#"{"client":{"clientName":"Acme","phone":"  ","email":""},
                 "accuracy":[{"load":"","indication":"10.5","errorValue":0,"band":""}]}"#,
        )
        .expect("payload should decode");

        let client = payload.client.expect("client should decode");
        assert_eq!(client.client_name.as_deref(), Some("Acme"));
        assert_eq!(client.phone, None);
        assert_eq!(client.email, None);
        assert_eq!(client.address, None);

        let point = &payload.accuracy.expect("accuracy should decode")[0];
        assert_eq!(point.load, None);
        assert_eq!(point.indication, Some(10.5));
        assert_eq!(point.error_value, Some(0.0));
        assert_eq!(point.band, None);
    }

    #[test]
    fn numeric_text_fields_are_kept_as_text() {
        let payload =
            VerificationPayload::from_json(br#"{"instrument":{"serial":123,"class":"III"}}"#)
                .expect("payload should decode");
        let instrument = payload.instrument.expect("instrument should decode");
        assert_eq!(instrument.serial.as_deref(), Some("123"));
        assert_eq!(instrument.accuracy_class.as_deref(), Some("III"));
    }

    #[test]
    fn non_numeric_measurement_is_a_decode_error() {
        let error = VerificationPayload::from_json(br#"{"variation":{"end1":"heavy"}}"#)
            .expect_err("non-numeric measurement must be rejected");
        assert!(matches!(error, SubmissionError::Decode(message) if message.contains("heavy")));
    }

    #[test]
    fn missing_sections_are_reported_together() {
        let payload = VerificationPayload::from_json(br#"{"client":{},"status":null}"#)
            .expect("payload should decode");
        let error = VerificationSubmission::try_from(payload).expect_err("must be rejected");
        assert_eq!(
            error,
            SubmissionError::MissingSections(vec!["header", "status", "instrument", "officer"])
        );
    }

    #[test]
    fn missing_accuracy_becomes_empty_sequence() {
        let payload = VerificationPayload::from_json(
            br#"{"client":{},"header":{},"status":{},"instrument":{},"officer":{},"accuracy":null}"#,
        )
        .expect("payload should decode");
        let submission = VerificationSubmission::try_from(payload).expect("should validate");
        assert!(submission.accuracy.is_empty());
        assert!(submission.variation.is_none());
        assert!(submission.repeatability.is_none());
    }
}
