use super::participant::ParticipantType;
use serde::{Deserialize, Serialize};

/// Sentinel that selects every participant id or every payment type.
pub const ALL: &str = "ALL";

/// Reference to an auction lot, used to derive the scheme for auction payments.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuctionReference {
    pub lot_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auction_type: Option<String>,
}

/// Inbound request shared by computation, invoicing and transition requests.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RequestCriteria {
    pub participant_type: ParticipantType,
    #[serde(default)]
    pub scheme_participant_ids: Option<Vec<String>>,
    #[serde(default)]
    pub include: Option<bool>,
    #[serde(default)]
    pub scheme_id: Option<String>,
    #[serde(default)]
    pub auction: Option<AuctionReference>,
    #[serde(default)]
    pub payment_transaction_types: Option<Vec<String>>,
    #[serde(default)]
    pub callback_url: Option<String>,
}

impl RequestCriteria {
    pub fn new(participant_type: ParticipantType) -> Self {
        Self {
            participant_type,
            scheme_participant_ids: None,
            include: None,
            scheme_id: None,
            auction: None,
            payment_transaction_types: None,
            callback_url: None,
        }
    }

    pub fn with_participant_ids<I, S>(mut self, ids: I, include: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scheme_participant_ids = Some(ids.into_iter().map(Into::into).collect());
        self.include = Some(include);
        self
    }

    pub fn with_payment_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payment_transaction_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_scheme(mut self, scheme_id: impl Into<String>) -> Self {
        self.scheme_id = Some(scheme_id.into());
        self
    }

    pub fn with_auction(mut self, auction: AuctionReference) -> Self {
        self.auction = Some(auction);
        self
    }

    pub fn with_callback(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// `include` defaults to true when the caller left it out.
    pub fn includes(&self) -> bool {
        self.include.unwrap_or(true)
    }

    /// Participant ids, `None` when absent or empty.
    pub fn participant_ids(&self) -> Option<&[String]> {
        non_empty(&self.scheme_participant_ids)
    }

    /// Payment types, `None` when absent or empty.
    pub fn payment_types(&self) -> Option<&[String]> {
        non_empty(&self.payment_transaction_types)
    }

    pub fn selects_all_participants(&self) -> bool {
        self.participant_ids().is_some_and(contains_all)
    }

    pub fn selects_all_payment_types(&self) -> bool {
        self.payment_types().is_some_and(contains_all)
    }

    /// Explicit scheme id, ignoring blanks.
    pub fn explicit_scheme_id(&self) -> Option<&str> {
        self.scheme_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

fn non_empty(values: &Option<Vec<String>>) -> Option<&[String]> {
    values.as_deref().filter(|v| !v.is_empty())
}

fn contains_all(values: &[String]) -> bool {
    values.iter().any(|v| v == ALL)
}
