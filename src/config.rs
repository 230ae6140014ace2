//! Reference data and engine settings loaded from a JSON file.

use crate::domain::participant::{ParticipantSite, ParticipantType};
use crate::domain::payment::TransitionTable;
use crate::domain::scheme::Scheme;
use crate::error::{PaymentError, Result};
use crate::infrastructure::in_memory::{InMemoryParticipantRoster, InMemorySchemeRegistry};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Semaphore;

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSettings {
    pub scheme_id: String,
    pub id: String,
    pub participant_type: ParticipantType,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Fan-out order is the order schemes are listed in.
    pub schemes: Vec<Scheme>,
    #[serde(default)]
    pub auction_lots: BTreeMap<String, String>,
    #[serde(default)]
    pub participants: Vec<ParticipantSettings>,
    #[serde(default)]
    pub payment_types: Vec<String>,
    #[serde(default)]
    pub transitions: TransitionTable,
    #[serde(default = "default_max_background_tasks")]
    pub max_background_tasks: usize,
    #[serde(default = "default_callback_timeout_secs")]
    pub callback_timeout_secs: u64,
}

fn default_max_background_tasks() -> usize {
    4
}

fn default_callback_timeout_secs() -> u64 {
    30
}

impl Settings {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        let mut scheme_ids = HashSet::new();
        for scheme in &self.schemes {
            if !scheme_ids.insert(scheme.id.as_str()) {
                return Err(PaymentError::ConfigError(format!(
                    "duplicate scheme {}",
                    scheme.id
                )));
            }
        }
        for (lot, scheme_id) in &self.auction_lots {
            if !scheme_ids.contains(scheme_id.as_str()) {
                return Err(PaymentError::ConfigError(format!(
                    "auction lot {lot} references unknown scheme {scheme_id}"
                )));
            }
        }
        let mut participants = HashSet::new();
        for p in &self.participants {
            if !scheme_ids.contains(p.scheme_id.as_str()) {
                return Err(PaymentError::ConfigError(format!(
                    "participant {} references unknown scheme {}",
                    p.id, p.scheme_id
                )));
            }
            if !participants.insert((p.scheme_id.as_str(), p.id.as_str())) {
                return Err(PaymentError::ConfigError(format!(
                    "participant {} registered twice in scheme {}",
                    p.id, p.scheme_id
                )));
            }
        }
        if self.max_background_tasks == 0 {
            return Err(PaymentError::ConfigError(
                "maxBackgroundTasks must be at least 1".into(),
            ));
        }
        if self.max_background_tasks > Semaphore::MAX_PERMITS {
            return Err(PaymentError::ConfigError(format!(
                "maxBackgroundTasks must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }

    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs)
    }

    pub fn scheme_registry(&self) -> InMemorySchemeRegistry {
        self.auction_lots.iter().fold(
            InMemorySchemeRegistry::new(self.schemes.clone()),
            |registry, (lot, scheme_id)| registry.with_auction_lot(lot.clone(), scheme_id.clone()),
        )
    }

    pub async fn participant_roster(&self) -> InMemoryParticipantRoster {
        let roster = InMemoryParticipantRoster::new();
        for p in &self.participants {
            roster
                .register(&p.scheme_id, ParticipantSite::new(p.id.clone(), p.participant_type))
                .await;
        }
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentStatus;
    use crate::domain::ports::{ParticipantRoster, SchemeRegistry};

    const SETTINGS: &str = r#"{
        "schemes": [
            { "id": "SCT", "timezone": "Europe/London" },
            { "id": "IRL", "timezone": "Europe/Dublin" }
        ],
        "auctionLots": { "LOT-1": "IRL" },
        "participants": [
            { "schemeId": "SCT", "id": "lrg-1", "participantType": "LRG_MANUFACTURER" }
        ],
        "paymentTypes": ["PRODUCER_FEE"]
    }"#;

    #[tokio::test]
    async fn test_settings_defaults_and_adapters() {
        let settings = Settings::from_json(SETTINGS).unwrap();
        assert_eq!(settings.max_background_tasks, 4);
        assert_eq!(settings.callback_timeout(), Duration::from_secs(30));
        assert!(
            settings
                .transitions
                .allows(PaymentStatus::Approved, PaymentStatus::Invoiced)
        );

        let registry = settings.scheme_registry();
        let ids: Vec<_> = registry
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["SCT", "IRL"]);

        let roster = settings.participant_roster().await;
        let sct = roster
            .participants(&Scheme::new("SCT", "Europe/London"))
            .await
            .unwrap();
        assert_eq!(sct.len(), 1);
    }

    #[test]
    fn test_custom_transition_table() {
        let json = r#"{
            "schemes": [{ "id": "SCT", "timezone": "Europe/London" }],
            "transitions": { "PENDING": ["PAID"] }
        }"#;
        let settings = Settings::from_json(json).unwrap();
        assert!(settings.transitions.allows(PaymentStatus::Pending, PaymentStatus::Paid));
        assert!(!settings.transitions.allows(PaymentStatus::Pending, PaymentStatus::Computed));
    }

    #[test]
    fn test_validation_rejects_dangling_references() {
        let dup = r#"{ "schemes": [
            { "id": "SCT", "timezone": "Europe/London" },
            { "id": "SCT", "timezone": "Europe/London" } ] }"#;
        assert!(matches!(Settings::from_json(dup), Err(PaymentError::ConfigError(_))));

        let lot = r#"{ "schemes": [{ "id": "SCT", "timezone": "Europe/London" }],
            "auctionLots": { "LOT-1": "IRL" } }"#;
        assert!(matches!(Settings::from_json(lot), Err(PaymentError::ConfigError(_))));

        let pool = r#"{ "schemes": [], "maxBackgroundTasks": 0 }"#;
        assert!(matches!(Settings::from_json(pool), Err(PaymentError::ConfigError(_))));

        for oversized in [Semaphore::MAX_PERMITS + 1, usize::MAX] {
            let pool = format!(r#"{{ "schemes": [], "maxBackgroundTasks": {oversized} }}"#);
            assert!(matches!(Settings::from_json(&pool), Err(PaymentError::ConfigError(_))));
        }
    }
}
