use super::callback::CallbackPayload;
use super::criteria::AuctionReference;
use super::participant::ParticipantSite;
use super::payment::{PaymentRecord, PaymentStatus, PaymentView};
use super::scheme::{Scheme, SchemeLookup};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SchemeRegistry: Send + Sync {
    async fn resolve_by_id(&self, scheme_id: &str) -> Result<SchemeLookup>;
    async fn resolve_by_auction_lot(&self, auction: &AuctionReference) -> Result<Scheme>;
    /// Every scheme, in registry order.
    async fn list_all(&self) -> Result<Vec<Scheme>>;
}

#[async_trait]
pub trait ParticipantRoster: Send + Sync {
    async fn participants(&self, scheme: &Scheme) -> Result<Vec<ParticipantSite>>;
}

#[async_trait]
pub trait PaymentViewSource: Send + Sync {
    async fn payment_views(&self, scheme: &Scheme) -> Result<Vec<PaymentView>>;
}

#[async_trait]
pub trait PaymentRecordStore: Send + Sync {
    async fn store(&self, record: PaymentRecord) -> Result<()>;
    async fn get(&self, record_id: &str) -> Result<Option<PaymentRecord>>;
    async fn update_status(
        &self,
        record_id: &str,
        status: PaymentStatus,
        updated_by: &str,
    ) -> Result<()>;
}

#[async_trait]
pub trait CallbackDelivery: Send + Sync {
    async fn deliver(&self, url: &str, payload: &CallbackPayload) -> Result<()>;
}

pub type SchemeRegistryHandle = Arc<dyn SchemeRegistry>;
pub type ParticipantRosterHandle = Arc<dyn ParticipantRoster>;
pub type PaymentViewSourceHandle = Arc<dyn PaymentViewSource>;
pub type PaymentRecordStoreHandle = Arc<dyn PaymentRecordStore>;
pub type CallbackDeliveryHandle = Arc<dyn CallbackDelivery>;
