//! Verification repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Write one composite submission across the client, verification and
//!   child tables in dependency order.
//! - Rebuild list and detail views by re-querying the same tables.
//!
//! # Invariants
//! - Insert order is Client -> Verification -> Instrument -> AccuracyTest[]
//!   -> VariationTest? -> RepeatabilityTest? -> VerificationOfficer.
//! - The whole write runs in one immediate transaction; a failing step
//!   leaves no rows behind.
//! - Lists are ordered `created_at DESC, id DESC`; accuracy rows `id ASC`.

use crate::db::migrations::{current_version, latest_version, REQUIRED_TABLES};
use crate::db::DbError;
use crate::model::record::{
    AccuracyTestRecord, InstrumentRecord, OfficerRecord, RepeatabilityTestRecord,
    VariationTestRecord, VerificationDetail, VerificationId, VerificationRecord,
    VerificationSummary,
};
use crate::model::submission::{
    AccuracyPointInput, ClientInput, InstrumentInput, OfficerInput, RepeatabilityInput,
    VariationInput, VerificationSubmission,
};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SUMMARY_SELECT_SQL: &str = "SELECT
    v.id,
    v.certificate_no,
    v.verification_date,
    v.verification_sticker,
    v.client_id,
    v.status_type,
    v.accuracy_type,
    v.created_at,
    c.client_name,
    c.address";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for verification persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection schema is not at the migrated version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Shared store cannot be reached (poisoned lock).
    Unavailable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "verification repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "verification repository requires table `{table}`")
            }
            Self::Unavailable(details) => write!(f, "verification store unavailable: {details}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store seam for verification records.
///
/// Implemented by the SQLite repository and by the in-memory repository used
/// for development mode and tests.
pub trait VerificationRepository {
    /// Persists a validated submission and returns the verification id.
    ///
    /// `created_at` is stamped on every row written for this submission.
    fn create_verification(
        &mut self,
        submission: &VerificationSubmission,
        created_at: &str,
    ) -> RepoResult<VerificationId>;
    /// Lists every verification, newest first.
    fn list_verifications(&self) -> RepoResult<Vec<VerificationSummary>>;
    /// Rebuilds the composite view of one verification.
    fn get_verification(&self, id: VerificationId) -> RepoResult<Option<VerificationDetail>>;
}

impl<R: VerificationRepository + ?Sized> VerificationRepository for &mut R {
    fn create_verification(
        &mut self,
        submission: &VerificationSubmission,
        created_at: &str,
    ) -> RepoResult<VerificationId> {
        (**self).create_verification(submission, created_at)
    }

    fn list_verifications(&self) -> RepoResult<Vec<VerificationSummary>> {
        (**self).list_verifications()
    }

    fn get_verification(&self, id: VerificationId) -> RepoResult<Option<VerificationDetail>> {
        (**self).get_verification(id)
    }
}

/// SQLite-backed verification repository.
pub struct SqliteVerificationRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteVerificationRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// Rejects connections whose schema is not fully migrated.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl VerificationRepository for SqliteVerificationRepository<'_> {
    fn create_verification(
        &mut self,
        submission: &VerificationSubmission,
        created_at: &str,
    ) -> RepoResult<VerificationId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let client_id = insert_client(&tx, &submission.client, created_at)?;
        let verification_id = insert_verification(&tx, client_id, submission, created_at)?;
        insert_instrument(&tx, verification_id, &submission.instrument, created_at)?;
        for point in &submission.accuracy {
            insert_accuracy_test(&tx, verification_id, point, created_at)?;
        }
        if let Some(variation) = submission.variation.as_ref() {
            insert_variation_test(&tx, verification_id, variation, created_at)?;
        }
        if let Some(repeatability) = submission.repeatability.as_ref() {
            insert_repeatability_test(&tx, verification_id, repeatability, created_at)?;
        }
        insert_officer(&tx, verification_id, &submission.officer, created_at)?;

        tx.commit()?;
        Ok(verification_id)
    }

    fn list_verifications(&self) -> RepoResult<Vec<VerificationSummary>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUMMARY_SELECT_SQL}
             FROM verifications v
             LEFT JOIN clients c ON c.id = v.client_id
             ORDER BY v.created_at DESC, v.id DESC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            summaries.push(parse_summary_row(row)?);
        }

        Ok(summaries)
    }

    fn get_verification(&self, id: VerificationId) -> RepoResult<Option<VerificationDetail>> {
        let verification = self
            .conn
            .query_row(
                &format!(
                    "{SUMMARY_SELECT_SQL},
                        c.phone,
                        c.email
                     FROM verifications v
                     LEFT JOIN clients c ON c.id = v.client_id
                     WHERE v.id = ?1;"
                ),
                [id],
                |row| {
                    Ok(VerificationRecord {
                        summary: parse_summary_row(row)?,
                        phone: row.get("phone")?,
                        email: row.get("email")?,
                    })
                },
            )
            .optional()?;

        let Some(verification) = verification else {
            return Ok(None);
        };

        Ok(Some(VerificationDetail {
            verification,
            instrument: self.first_child("instruments", id, parse_instrument_row)?,
            officer: self.first_child("verification_officers", id, parse_officer_row)?,
            accuracy_tests: self.accuracy_tests(id)?,
            variation_test: self.first_child("variation_tests", id, parse_variation_row)?,
            repeatability_test: self.first_child(
                "repeatability_tests",
                id,
                parse_repeatability_row,
            )?,
        }))
    }
}

impl SqliteVerificationRepository<'_> {
    fn first_child<T>(
        &self,
        table: &'static str,
        verification_id: VerificationId,
        parse: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> RepoResult<Option<T>> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT * FROM {table}
                     WHERE verification_id = ?1
                     ORDER BY id ASC
                     LIMIT 1;"
                ),
                [verification_id],
                parse,
            )
            .optional()?;
        Ok(record)
    }

    fn accuracy_tests(
        &self,
        verification_id: VerificationId,
    ) -> RepoResult<Vec<AccuracyTestRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM accuracy_tests
             WHERE verification_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([verification_id])?;
        let mut tests = Vec::new();
        while let Some(row) = rows.next()? {
            tests.push(parse_accuracy_row(row)?);
        }
        Ok(tests)
    }
}

fn insert_client(conn: &Connection, client: &ClientInput, created_at: &str) -> RepoResult<i64> {
    conn.execute(
        "INSERT INTO clients (client_name, address, phone, email, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            client.client_name.as_deref(),
            client.address.as_deref(),
            client.phone.as_deref(),
            client.email.as_deref(),
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_verification(
    conn: &Connection,
    client_id: i64,
    submission: &VerificationSubmission,
    created_at: &str,
) -> RepoResult<VerificationId> {
    conn.execute(
        "INSERT INTO verifications (
            certificate_no,
            verification_date,
            verification_sticker,
            client_id,
            status_type,
            accuracy_type,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            submission.header.cert_no.as_deref(),
            submission.header.date.as_deref(),
            submission.header.ver_sticker.as_deref(),
            client_id,
            submission.status.status.as_deref(),
            submission.status.acc_type.as_deref(),
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn insert_instrument(
    conn: &Connection,
    verification_id: VerificationId,
    instrument: &InstrumentInput,
    created_at: &str,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO instruments (
            verification_id,
            manufacturer,
            model,
            serial_number,
            accuracy_class,
            units,
            max_capacity,
            max_test_load_available,
            verification_interval_e,
            min_capacity,
            sa_number,
            aa_number,
            software_version,
            sealing_method,
            equipment_notes,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16);",
        params![
            verification_id,
            instrument.manufacturer.as_deref(),
            instrument.model.as_deref(),
            instrument.serial.as_deref(),
            instrument.accuracy_class.as_deref(),
            instrument.units.as_deref(),
            instrument.max,
            instrument.max_avail,
            instrument.e,
            instrument.min,
            instrument.sa_nr.as_deref(),
            instrument.aa_nr.as_deref(),
            instrument.software.as_deref(),
            instrument.sealing.as_deref(),
            instrument.equip_notes.as_deref(),
            created_at,
        ],
    )?;
    Ok(())
}

fn insert_accuracy_test(
    conn: &Connection,
    verification_id: VerificationId,
    point: &AccuracyPointInput,
    created_at: &str,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO accuracy_tests (
            verification_id,
            test_load,
            make_up,
            indication,
            run_up_load,
            run_down_load,
            switch_point_load,
            error_value,
            band,
            mpe_value,
            result,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
        params![
            verification_id,
            point.load,
            point.make_up,
            point.indication,
            point.run_up_load,
            point.run_down_load,
            point.switch_point_load,
            point.error_value,
            point.band.as_deref(),
            point.mpe_value,
            point.result.as_deref(),
            created_at,
        ],
    )?;
    Ok(())
}

fn insert_variation_test(
    conn: &Connection,
    verification_id: VerificationId,
    variation: &VariationInput,
    created_at: &str,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO variation_tests (
            verification_id,
            applied_load,
            reference_indication,
            end1_indication,
            middle_indication,
            end2_indication,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            verification_id,
            variation.applied_load,
            variation.reference_indication,
            variation.end1,
            variation.middle,
            variation.end2,
            created_at,
        ],
    )?;
    Ok(())
}

fn insert_repeatability_test(
    conn: &Connection,
    verification_id: VerificationId,
    repeatability: &RepeatabilityInput,
    created_at: &str,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO repeatability_tests (
            verification_id,
            target_test_load,
            run1_indication,
            run2_indication,
            run3_indication,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            verification_id,
            repeatability.target_load,
            repeatability.run1,
            repeatability.run2,
            repeatability.run3,
            created_at,
        ],
    )?;
    Ok(())
}

fn insert_officer(
    conn: &Connection,
    verification_id: VerificationId,
    officer: &OfficerInput,
    created_at: &str,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO verification_officers (
            verification_id,
            officer_name,
            officer_id,
            sanas_lab_no,
            seal_id,
            signature,
            created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        params![
            verification_id,
            officer.officer_name.as_deref(),
            officer.officer_id.as_deref(),
            officer.sanas_lab_no.as_deref(),
            officer.seal_id.as_deref(),
            officer.signature.as_deref(),
            created_at,
        ],
    )?;
    Ok(())
}

fn parse_summary_row(row: &Row<'_>) -> rusqlite::Result<VerificationSummary> {
    Ok(VerificationSummary {
        id: row.get("id")?,
        certificate_no: row.get("certificate_no")?,
        verification_date: row.get("verification_date")?,
        verification_sticker: row.get("verification_sticker")?,
        client_id: row.get("client_id")?,
        status_type: row.get("status_type")?,
        accuracy_type: row.get("accuracy_type")?,
        created_at: row.get("created_at")?,
        client_name: row.get("client_name")?,
        address: row.get("address")?,
    })
}

fn parse_instrument_row(row: &Row<'_>) -> rusqlite::Result<InstrumentRecord> {
    Ok(InstrumentRecord {
        id: row.get("id")?,
        verification_id: row.get("verification_id")?,
        manufacturer: row.get("manufacturer")?,
        model: row.get("model")?,
        serial_number: row.get("serial_number")?,
        accuracy_class: row.get("accuracy_class")?,
        units: row.get("units")?,
        max_capacity: row.get("max_capacity")?,
        max_test_load_available: row.get("max_test_load_available")?,
        verification_interval_e: row.get("verification_interval_e")?,
        min_capacity: row.get("min_capacity")?,
        sa_number: row.get("sa_number")?,
        aa_number: row.get("aa_number")?,
        software_version: row.get("software_version")?,
        sealing_method: row.get("sealing_method")?,
        equipment_notes: row.get("equipment_notes")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_accuracy_row(row: &Row<'_>) -> rusqlite::Result<AccuracyTestRecord> {
    Ok(AccuracyTestRecord {
        id: row.get("id")?,
        verification_id: row.get("verification_id")?,
        test_load: row.get("test_load")?,
        make_up: row.get("make_up")?,
        indication: row.get("indication")?,
        run_up_load: row.get("run_up_load")?,
        run_down_load: row.get("run_down_load")?,
        switch_point_load: row.get("switch_point_load")?,
        error_value: row.get("error_value")?,
        band: row.get("band")?,
        mpe_value: row.get("mpe_value")?,
        result: row.get("result")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_variation_row(row: &Row<'_>) -> rusqlite::Result<VariationTestRecord> {
    Ok(VariationTestRecord {
        id: row.get("id")?,
        verification_id: row.get("verification_id")?,
        applied_load: row.get("applied_load")?,
        reference_indication: row.get("reference_indication")?,
        end1_indication: row.get("end1_indication")?,
        middle_indication: row.get("middle_indication")?,
        end2_indication: row.get("end2_indication")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_repeatability_row(row: &Row<'_>) -> rusqlite::Result<RepeatabilityTestRecord> {
    Ok(RepeatabilityTestRecord {
        id: row.get("id")?,
        verification_id: row.get("verification_id")?,
        target_test_load: row.get("target_test_load")?,
        run1_indication: row.get("run1_indication")?,
        run2_indication: row.get("run2_indication")?,
        run3_indication: row.get("run3_indication")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_officer_row(row: &Row<'_>) -> rusqlite::Result<OfficerRecord> {
    Ok(OfficerRecord {
        id: row.get("id")?,
        verification_id: row.get("verification_id")?,
        officer_name: row.get("officer_name")?,
        officer_id: row.get("officer_id")?,
        sanas_lab_no: row.get("sanas_lab_no")?,
        seal_id: row.get("seal_id")?,
        signature: row.get("signature")?,
        created_at: row.get("created_at")?,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES.iter().copied() {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
