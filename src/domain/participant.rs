use crate::error::PaymentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantType {
    LrgManufacturer,
    SmlManufacturer,
    Retailer,
    Hospitality,
    Consumer,
    Operator,
}

impl ParticipantType {
    pub const fn name(&self) -> &'static str {
        match self {
            ParticipantType::LrgManufacturer => "LRG_MANUFACTURER",
            ParticipantType::SmlManufacturer => "SML_MANUFACTURER",
            ParticipantType::Retailer => "RETAILER",
            ParticipantType::Hospitality => "HOSPITALITY",
            ParticipantType::Consumer => "CONSUMER",
            ParticipantType::Operator => "OPERATOR",
        }
    }

    /// Key under which payment records classify this participant type.
    ///
    /// Small manufacturers are recorded under their supplier classification
    /// rather than their own name. Types without a key cannot be matched
    /// against payment records at all.
    pub const fn classification_key(&self) -> Option<&'static str> {
        match self {
            ParticipantType::LrgManufacturer => Some("LRG_MANUFACTURER"),
            ParticipantType::SmlManufacturer => Some("SML_SUPPLIER"),
            ParticipantType::Retailer => Some("RETAILER"),
            ParticipantType::Hospitality => Some("HOSPITALITY"),
            ParticipantType::Consumer | ParticipantType::Operator => None,
        }
    }
}

impl fmt::Display for ParticipantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParticipantType {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LRG_MANUFACTURER" => Ok(ParticipantType::LrgManufacturer),
            "SML_MANUFACTURER" => Ok(ParticipantType::SmlManufacturer),
            "RETAILER" => Ok(ParticipantType::Retailer),
            "HOSPITALITY" => Ok(ParticipantType::Hospitality),
            "CONSUMER" => Ok(ParticipantType::Consumer),
            "OPERATOR" => Ok(ParticipantType::Operator),
            other => Err(PaymentError::ValidationError(format!(
                "Unknown participant type: {other}"
            ))),
        }
    }
}

/// A participant registered under a scheme.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantSite {
    pub id: String,
    pub participant_type: ParticipantType,
}

impl ParticipantSite {
    pub fn new(id: impl Into<String>, participant_type: ParticipantType) -> Self {
        Self {
            id: id.into(),
            participant_type,
        }
    }
}
