//! In-memory verification repository.
//!
//! # Responsibility
//! - Stand in for the relational store in development mode and tests.
//! - Honor the same ordering and id rules as the SQLite repository.
//!
//! # Invariants
//! - Ids are per-table, start at 1 and increase by one per inserted row.
//! - A submission is staged completely before any table is touched.

use crate::model::record::{
    AccuracyTestRecord, InstrumentRecord, OfficerRecord, RepeatabilityTestRecord,
    VariationTestRecord, VerificationDetail, VerificationId, VerificationRecord,
    VerificationSummary,
};
use crate::model::submission::{ClientInput, HeaderInput, StatusInput, VerificationSubmission};
use crate::repo::verification_repo::{RepoResult, VerificationRepository};

#[derive(Debug, Clone)]
struct ClientRow {
    id: i64,
    client: ClientInput,
}

#[derive(Debug, Clone)]
struct VerificationRow {
    id: VerificationId,
    client_id: i64,
    header: HeaderInput,
    status: StatusInput,
    created_at: String,
}

/// Process-local store keeping one vector per table.
#[derive(Debug, Default)]
pub struct InMemoryVerificationRepository {
    clients: Vec<ClientRow>,
    verifications: Vec<VerificationRow>,
    instruments: Vec<InstrumentRecord>,
    accuracy_tests: Vec<AccuracyTestRecord>,
    variation_tests: Vec<VariationTestRecord>,
    repeatability_tests: Vec<RepeatabilityTestRecord>,
    officers: Vec<OfficerRecord>,
}

impl InMemoryVerificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored verifications.
    pub fn len(&self) -> usize {
        self.verifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verifications.is_empty()
    }

    fn client(&self, id: i64) -> Option<&ClientInput> {
        self.clients
            .iter()
            .find(|row| row.id == id)
            .map(|row| &row.client)
    }

    fn summary(&self, row: &VerificationRow) -> VerificationSummary {
        let client = self.client(row.client_id);
        VerificationSummary {
            id: row.id,
            certificate_no: row.header.cert_no.clone(),
            verification_date: row.header.date.clone(),
            verification_sticker: row.header.ver_sticker.clone(),
            client_id: Some(row.client_id),
            status_type: row.status.status.clone(),
            accuracy_type: row.status.acc_type.clone(),
            created_at: row.created_at.clone(),
            client_name: client.and_then(|c| c.client_name.clone()),
            address: client.and_then(|c| c.address.clone()),
        }
    }
}

impl VerificationRepository for InMemoryVerificationRepository {
    fn create_verification(
        &mut self,
        submission: &VerificationSubmission,
        created_at: &str,
    ) -> RepoResult<VerificationId> {
        let client_id = next_id(self.clients.len());
        let verification_id = next_id(self.verifications.len());
        let stamp = created_at.to_string();

        let instrument = &submission.instrument;
        let instrument = InstrumentRecord {
            id: next_id(self.instruments.len()),
            verification_id,
            manufacturer: instrument.manufacturer.clone(),
            model: instrument.model.clone(),
            serial_number: instrument.serial.clone(),
            accuracy_class: instrument.accuracy_class.clone(),
            units: instrument.units.clone(),
            max_capacity: instrument.max,
            max_test_load_available: instrument.max_avail,
            verification_interval_e: instrument.e,
            min_capacity: instrument.min,
            sa_number: instrument.sa_nr.clone(),
            aa_number: instrument.aa_nr.clone(),
            software_version: instrument.software.clone(),
            sealing_method: instrument.sealing.clone(),
            equipment_notes: instrument.equip_notes.clone(),
            created_at: stamp.clone(),
        };

        let first_accuracy_id = next_id(self.accuracy_tests.len());
        let accuracy_tests: Vec<AccuracyTestRecord> = submission
            .accuracy
            .iter()
            .zip(first_accuracy_id..)
            .map(|(point, id)| AccuracyTestRecord {
                id,
                verification_id,
                test_load: point.load,
                make_up: point.make_up,
                indication: point.indication,
                run_up_load: point.run_up_load,
                run_down_load: point.run_down_load,
                switch_point_load: point.switch_point_load,
                error_value: point.error_value,
                band: point.band.clone(),
                mpe_value: point.mpe_value,
                result: point.result.clone(),
                created_at: stamp.clone(),
            })
            .collect();

        let variation = submission
            .variation
            .as_ref()
            .map(|variation| VariationTestRecord {
                id: next_id(self.variation_tests.len()),
                verification_id,
                applied_load: variation.applied_load,
                reference_indication: variation.reference_indication,
                end1_indication: variation.end1,
                middle_indication: variation.middle,
                end2_indication: variation.end2,
                created_at: stamp.clone(),
            });

        let repeatability =
            submission
                .repeatability
                .as_ref()
                .map(|repeatability| RepeatabilityTestRecord {
                    id: next_id(self.repeatability_tests.len()),
                    verification_id,
                    target_test_load: repeatability.target_load,
                    run1_indication: repeatability.run1,
                    run2_indication: repeatability.run2,
                    run3_indication: repeatability.run3,
                    created_at: stamp.clone(),
                });

        let officer = &submission.officer;
        let officer = OfficerRecord {
            id: next_id(self.officers.len()),
            verification_id,
            officer_name: officer.officer_name.clone(),
            officer_id: officer.officer_id.clone(),
            sanas_lab_no: officer.sanas_lab_no.clone(),
            seal_id: officer.seal_id.clone(),
            signature: officer.signature.clone(),
            created_at: stamp.clone(),
        };

        self.clients.push(ClientRow {
            id: client_id,
            client: submission.client.clone(),
        });
        self.verifications.push(VerificationRow {
            id: verification_id,
            client_id,
            header: submission.header.clone(),
            status: submission.status.clone(),
            created_at: stamp,
        });
        self.instruments.push(instrument);
        self.accuracy_tests.extend(accuracy_tests);
        self.variation_tests.extend(variation);
        self.repeatability_tests.extend(repeatability);
        self.officers.push(officer);

        Ok(verification_id)
    }

    fn list_verifications(&self) -> RepoResult<Vec<VerificationSummary>> {
        let mut summaries: Vec<VerificationSummary> = self
            .verifications
            .iter()
            .map(|row| self.summary(row))
            .collect();
        summaries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(summaries)
    }

    fn get_verification(&self, id: VerificationId) -> RepoResult<Option<VerificationDetail>> {
        let Some(row) = self.verifications.iter().find(|row| row.id == id) else {
            return Ok(None);
        };

        let client = self.client(row.client_id);
        Ok(Some(VerificationDetail {
            verification: VerificationRecord {
                summary: self.summary(row),
                phone: client.and_then(|c| c.phone.clone()),
                email: client.and_then(|c| c.email.clone()),
            },
            instrument: first_for(&self.instruments, id, |r| r.verification_id),
            officer: first_for(&self.officers, id, |r| r.verification_id),
            accuracy_tests: self
                .accuracy_tests
                .iter()
                .filter(|r| r.verification_id == id)
                .cloned()
                .collect(),
            variation_test: first_for(&self.variation_tests, id, |r| r.verification_id),
            repeatability_test: first_for(&self.repeatability_tests, id, |r| r.verification_id),
        }))
    }
}

fn next_id(current_len: usize) -> i64 {
    current_len as i64 + 1
}

fn first_for<T: Clone>(
    rows: &[T],
    verification_id: VerificationId,
    owner: impl Fn(&T) -> VerificationId,
) -> Option<T> {
    rows.iter().find(|row| owner(row) == verification_id).cloned()
}
