#![allow(dead_code)]

use drs_payments::application::engine::{EngineOptions, EnginePorts, PaymentEngine};
use drs_payments::domain::participant::{ParticipantSite, ParticipantType};
use drs_payments::domain::payment::{PaymentRecord, PaymentStatus};
use drs_payments::domain::ports::{ParticipantRosterHandle, PaymentRecordStore};
use drs_payments::domain::scheme::Scheme;
use drs_payments::infrastructure::in_memory::{
    InMemoryParticipantRoster, InMemoryPaymentStore, InMemorySchemeRegistry,
    RecordingCallbackDelivery,
};
use rand::Rng;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::Arc;

pub const SETTINGS: &str = "tests/fixtures/settings.json";
pub const PAYMENTS: &str = "tests/fixtures/payments.csv";

pub const PAYMENT_HEADER: [&str; 8] = [
    "record_id",
    "scheme_id",
    "participant_id",
    "participant_type",
    "payment_type",
    "amount",
    "auction_lot",
    "status",
];

/// Writes `rows` random payment records spread over two schemes.
pub fn generate_payments_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(PAYMENT_HEADER)?;

    let mut rng = rand::thread_rng();
    let schemes = ["SCT", "IRL"];
    let participants = [
        ("lrg-1", "LRG_MANUFACTURER"),
        ("sml-1", "SML_SUPPLIER"),
        ("ret-1", "RETAILER"),
        ("hsp-1", "HOSPITALITY"),
    ];
    let payment_types = ["PRODUCER_FEE", "HANDLING_FEE"];

    for i in 1..=rows {
        let scheme = schemes.choose(&mut rng).copied().unwrap_or("SCT");
        let (participant, participant_type) =
            participants.choose(&mut rng).copied().unwrap_or(participants[0]);
        let payment_type = payment_types.choose(&mut rng).copied().unwrap_or("PRODUCER_FEE");
        let cents: i64 = rng.gen_range(1..100_000);
        wtr.write_record([
            format!("r{i}"),
            scheme.to_string(),
            format!("{scheme}-{participant}"),
            participant_type.to_string(),
            payment_type.to_string(),
            Decimal::new(cents, 2).to_string(),
            String::new(),
            "COMPUTED".to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn record(
    record_id: &str,
    scheme_id: &str,
    participant_id: &str,
    participant_type: &str,
    payment_type: &str,
    amount: Decimal,
    status: PaymentStatus,
) -> PaymentRecord {
    PaymentRecord {
        record_id: record_id.into(),
        scheme_id: scheme_id.into(),
        participant_id: participant_id.into(),
        participant_type: participant_type.into(),
        payment_type: payment_type.into(),
        amount,
        auction_lot: None,
        status,
        updated_by: None,
    }
}

pub struct Harness {
    pub engine: PaymentEngine,
    pub store: InMemoryPaymentStore,
    pub delivery: RecordingCallbackDelivery,
}

/// Three schemes with one large manufacturer and one retailer each, and one
/// computed producer fee per participant.
pub async fn harness_with_roster(roster: Option<ParticipantRosterHandle>) -> Harness {
    drs_payments::logging::init_test();
    let schemes = ["SCT", "NIR", "IRL"];
    let registry = InMemorySchemeRegistry::new(
        schemes
            .iter()
            .map(|id| Scheme::new(*id, "Europe/London"))
            .collect(),
    )
    .with_auction_lot("LOT-1", "NIR");

    let default_roster = InMemoryParticipantRoster::new();
    let store = InMemoryPaymentStore::new();
    for (n, scheme) in schemes.iter().enumerate() {
        for (prefix, participant_type, key) in [
            ("lrg", ParticipantType::LrgManufacturer, "LRG_MANUFACTURER"),
            ("ret", ParticipantType::Retailer, "RETAILER"),
        ] {
            let participant = format!("{prefix}-{scheme}");
            default_roster
                .register(scheme, ParticipantSite::new(participant.clone(), participant_type))
                .await;
            store
                .store(record(
                    &format!("{prefix}-{n}"),
                    scheme,
                    &participant,
                    key,
                    "PRODUCER_FEE",
                    Decimal::new(100 * (n as i64 + 1), 0),
                    PaymentStatus::Computed,
                ))
                .await
                .unwrap();
        }
    }

    let delivery = RecordingCallbackDelivery::new();
    let engine = PaymentEngine::new(
        EnginePorts {
            schemes: Arc::new(registry),
            roster: roster.unwrap_or_else(|| Arc::new(default_roster)),
            views: Arc::new(store.clone()),
            records: Arc::new(store.clone()),
            delivery: Arc::new(delivery.clone()),
        },
        EngineOptions {
            known_payment_types: vec!["PRODUCER_FEE".into()],
            ..EngineOptions::default()
        },
    );

    Harness {
        engine,
        store,
        delivery,
    }
}

pub async fn harness() -> Harness {
    harness_with_roster(None).await
}

/// Parses JSON-lines output.
pub fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
