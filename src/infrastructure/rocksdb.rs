use crate::domain::payment::{PaymentRecord, PaymentStatus, PaymentView};
use crate::domain::ports::{PaymentRecordStore, PaymentViewSource};
use crate::domain::scheme::Scheme;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing payment records.
pub const CF_PAYMENTS: &str = "payments";

/// A persistent payment record store using RocksDB.
///
/// Records are stored as JSON keyed by record id, so iteration (and therefore
/// the order payment views are handed out in) follows record id order.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "payments" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_payments = ColumnFamilyDescriptor::new(CF_PAYMENTS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_payments])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn payments(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_PAYMENTS).ok_or_else(|| {
            PaymentError::InternalError(Box::new(std::io::Error::other(
                "Payments column family not found",
            )))
        })
    }

    fn read(&self, record_id: &str) -> Result<Option<PaymentRecord>> {
        let cf = self.payments()?;
        match self.db.get_cf(cf, record_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, record: &PaymentRecord) -> Result<()> {
        let cf = self.payments()?;
        let value = serde_json::to_vec(record)?;
        self.db.put_cf(cf, record.record_id.as_bytes(), value)?;
        Ok(())
    }
}

#[async_trait]
impl PaymentRecordStore for RocksDBStore {
    async fn store(&self, record: PaymentRecord) -> Result<()> {
        self.write(&record)
    }

    async fn get(&self, record_id: &str) -> Result<Option<PaymentRecord>> {
        self.read(record_id)
    }

    async fn update_status(
        &self,
        record_id: &str,
        status: PaymentStatus,
        updated_by: &str,
    ) -> Result<()> {
        let mut record = self.read(record_id)?.ok_or_else(|| {
            PaymentError::ValidationError(format!("Unknown payment record {record_id}"))
        })?;
        record.status = status;
        record.updated_by = Some(updated_by.to_string());
        self.write(&record)
    }
}

#[async_trait]
impl PaymentViewSource for RocksDBStore {
    async fn payment_views(&self, scheme: &Scheme) -> Result<Vec<PaymentView>> {
        let cf = self.payments()?;
        let mut views = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let record: PaymentRecord = serde_json::from_slice(&value)?;
            if record.scheme_id == scheme.id {
                views.push(record.view());
            }
        }
        Ok(views)
    }
}
