use crate::domain::callback::CallbackPayload;
use crate::domain::criteria::AuctionReference;
use crate::domain::participant::ParticipantSite;
use crate::domain::payment::{PaymentRecord, PaymentStatus, PaymentView};
use crate::domain::ports::{
    CallbackDelivery, ParticipantRoster, PaymentRecordStore, PaymentViewSource, SchemeRegistry,
};
use crate::domain::scheme::{Scheme, SchemeLookup};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Scheme reference data held in memory.
///
/// `list_all` returns schemes in the order they were supplied.
#[derive(Default, Clone)]
pub struct InMemorySchemeRegistry {
    schemes: Vec<Scheme>,
    auction_lots: HashMap<String, String>,
}

impl InMemorySchemeRegistry {
    pub fn new(schemes: Vec<Scheme>) -> Self {
        Self {
            schemes,
            auction_lots: HashMap::new(),
        }
    }

    pub fn with_auction_lot(
        mut self,
        lot_id: impl Into<String>,
        scheme_id: impl Into<String>,
    ) -> Self {
        self.auction_lots.insert(lot_id.into(), scheme_id.into());
        self
    }

    fn find(&self, scheme_id: &str) -> Option<Scheme> {
        self.schemes.iter().find(|s| s.id == scheme_id).cloned()
    }
}

#[async_trait]
impl SchemeRegistry for InMemorySchemeRegistry {
    async fn resolve_by_id(&self, scheme_id: &str) -> Result<SchemeLookup> {
        Ok(self.find(scheme_id).into())
    }

    async fn resolve_by_auction_lot(&self, auction: &AuctionReference) -> Result<Scheme> {
        self.auction_lots
            .get(&auction.lot_id)
            .and_then(|scheme_id| self.find(scheme_id))
            .ok_or_else(|| PaymentError::AuctionLotNotFound(auction.lot_id.clone()))
    }

    async fn list_all(&self) -> Result<Vec<Scheme>> {
        Ok(self.schemes.clone())
    }
}

/// Participant rosters per scheme, in registration order.
#[derive(Default, Clone)]
pub struct InMemoryParticipantRoster {
    sites: Arc<RwLock<HashMap<String, Vec<ParticipantSite>>>>,
}

impl InMemoryParticipantRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, scheme_id: &str, site: ParticipantSite) {
        let mut sites = self.sites.write().await;
        sites.entry(scheme_id.to_string()).or_default().push(site);
    }
}

#[async_trait]
impl ParticipantRoster for InMemoryParticipantRoster {
    async fn participants(&self, scheme: &Scheme) -> Result<Vec<ParticipantSite>> {
        let sites = self.sites.read().await;
        Ok(sites.get(&scheme.id).cloned().unwrap_or_default())
    }
}

/// A thread-safe in-memory store for payment records.
///
/// Records are kept ordered by record id, which is also the order payment
/// views are handed out in.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    records: Arc<RwLock<BTreeMap<String, PaymentRecord>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRecordStore for InMemoryPaymentStore {
    async fn store(&self, record: PaymentRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.record_id.clone(), record);
        Ok(())
    }

    async fn get(&self, record_id: &str) -> Result<Option<PaymentRecord>> {
        let records = self.records.read().await;
        Ok(records.get(record_id).cloned())
    }

    async fn update_status(
        &self,
        record_id: &str,
        status: PaymentStatus,
        updated_by: &str,
    ) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records.get_mut(record_id).ok_or_else(|| {
            PaymentError::ValidationError(format!("Unknown payment record {record_id}"))
        })?;
        record.status = status;
        record.updated_by = Some(updated_by.to_string());
        Ok(())
    }
}

#[async_trait]
impl PaymentViewSource for InMemoryPaymentStore {
    async fn payment_views(&self, scheme: &Scheme) -> Result<Vec<PaymentView>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.scheme_id == scheme.id)
            .map(PaymentRecord::view)
            .collect())
    }
}

/// Keeps every payload it is handed instead of sending it anywhere.
#[derive(Default, Clone)]
pub struct RecordingCallbackDelivery {
    delivered: Arc<RwLock<Vec<(String, CallbackPayload)>>>,
    attempts: Arc<RwLock<usize>>,
    fail: bool,
}

impl RecordingCallbackDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// A delivery whose every attempt fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn delivered(&self) -> Vec<(String, CallbackPayload)> {
        self.delivered.read().await.clone()
    }

    pub async fn attempts(&self) -> usize {
        *self.attempts.read().await
    }
}

#[async_trait]
impl CallbackDelivery for RecordingCallbackDelivery {
    async fn deliver(&self, url: &str, payload: &CallbackPayload) -> Result<()> {
        *self.attempts.write().await += 1;
        if self.fail {
            return Err(PaymentError::DeliveryError(format!("{url} unreachable")));
        }
        self.delivered
            .write()
            .await
            .push((url.to_string(), payload.clone()));
        Ok(())
    }
}
