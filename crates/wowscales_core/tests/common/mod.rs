#![allow(dead_code)]

use wowscales_core::{
    AccuracyPointInput, ClientInput, HeaderInput, InstrumentInput, OfficerInput,
    RepeatabilityInput, StatusInput, VariationInput, VerificationPayload,
};

/// Payload from the certificate scenario: only the required sections.
pub fn minimal_payload(cert_no: &str, client_name: &str) -> VerificationPayload {
    VerificationPayload {
        client: Some(ClientInput {
            client_name: Some(client_name.to_string()),
            ..ClientInput::default()
        }),
        header: Some(HeaderInput {
            cert_no: Some(cert_no.to_string()),
            date: Some("2024-01-01".to_string()),
            ver_sticker: Some("S1".to_string()),
        }),
        status: Some(StatusInput {
            status: Some("PASS".to_string()),
            acc_type: Some("A".to_string()),
        }),
        instrument: Some(InstrumentInput {
            manufacturer: Some("X".to_string()),
            model: Some("Y".to_string()),
            serial: Some("123".to_string()),
            accuracy_class: Some("III".to_string()),
            units: Some("kg".to_string()),
            max: Some(100.0),
            max_avail: Some(100.0),
            e: Some(0.1),
            min: Some(0.0),
            ..InstrumentInput::default()
        }),
        officer: Some(OfficerInput {
            officer_name: Some("J. Doe".to_string()),
            ..OfficerInput::default()
        }),
        ..VerificationPayload::default()
    }
}

pub fn accuracy_point(load: f64, indication: f64, result: &str) -> AccuracyPointInput {
    AccuracyPointInput {
        load: Some(load),
        indication: Some(indication),
        error_value: Some(indication - load),
        mpe_value: Some(0.1),
        band: Some("0 - 500e".to_string()),
        result: Some(result.to_string()),
        ..AccuracyPointInput::default()
    }
}

/// Payload with every section and every field populated.
pub fn full_payload(cert_no: &str) -> VerificationPayload {
    let mut payload = minimal_payload(cert_no, "Acme Scales (Pty) Ltd");
    payload.client = Some(ClientInput {
        client_name: Some("Acme Scales (Pty) Ltd".to_string()),
        address: Some("1 Main Road".to_string()),
        phone: Some("021 555 0100".to_string()),
        email: Some("lab@acme.example".to_string()),
    });
    payload.instrument = Some(InstrumentInput {
        manufacturer: Some("Avery".to_string()),
        model: Some("B-300".to_string()),
        serial: Some("SN-0042".to_string()),
        accuracy_class: Some("III".to_string()),
        units: Some("kg".to_string()),
        max: Some(300.0),
        max_avail: Some(250.0),
        e: Some(0.1),
        min: Some(2.0),
        sa_nr: Some("SA-1".to_string()),
        aa_nr: Some("AA-9".to_string()),
        software: Some("v2.1".to_string()),
        sealing: Some("wire seal".to_string()),
        equip_notes: Some("pan replaced".to_string()),
    });
    payload.accuracy = Some(vec![
        accuracy_point(10.0, 10.0, "PASS"),
        accuracy_point(100.0, 100.1, "PASS"),
        accuracy_point(250.0, 250.4, "FAIL"),
    ]);
    payload.variation = Some(VariationInput {
        applied_load: Some(100.0),
        reference_indication: Some(100.0),
        end1: Some(100.1),
        middle: Some(100.0),
        end2: Some(99.9),
    });
    payload.repeatability = Some(RepeatabilityInput {
        target_load: Some(150.0),
        run1: Some(150.0),
        run2: Some(150.1),
        run3: Some(150.0),
    });
    payload.officer = Some(OfficerInput {
        officer_name: Some("J. Doe".to_string()),
        officer_id: Some("VO-17".to_string()),
        sanas_lab_no: Some("LAB-0001".to_string()),
        seal_id: Some("SEAL-5".to_string()),
        signature: Some("jdoe".to_string()),
    });
    payload
}
