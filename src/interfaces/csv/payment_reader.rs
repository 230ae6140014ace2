use crate::domain::payment::{PaymentRecord, PaymentStatus};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct PaymentRow {
    record_id: String,
    scheme_id: String,
    participant_id: String,
    participant_type: String,
    payment_type: String,
    // Parsed by hand: csv type inference would read "1.50" as a float.
    amount: String,
    auction_lot: Option<String>,
    status: Option<String>,
}

impl TryFrom<PaymentRow> for PaymentRecord {
    type Error = PaymentError;

    fn try_from(row: PaymentRow) -> Result<Self> {
        let amount = Decimal::from_str(&row.amount).map_err(|e| {
            PaymentError::ValidationError(format!(
                "Invalid amount {:?} for record {}: {e}",
                row.amount, row.record_id
            ))
        })?;
        let status = match row.status.as_deref().map(str::trim) {
            None | Some("") => PaymentStatus::default(),
            Some(status) => status.parse()?,
        };
        Ok(PaymentRecord {
            record_id: row.record_id,
            scheme_id: row.scheme_id,
            participant_id: row.participant_id,
            participant_type: row.participant_type,
            payment_type: row.payment_type,
            amount,
            auction_lot: row.auction_lot.filter(|lot| !lot.is_empty()),
            status,
            updated_by: None,
        })
    }
}

/// Reads payment records from a CSV source.
///
/// Expected header: `record_id, scheme_id, participant_id, participant_type,
/// payment_type, amount, auction_lot, status`. A blank status means PENDING.
pub struct PaymentRecordReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentRecordReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily reads records; a malformed row yields an error and reading
    /// continues with the next one.
    pub fn records(self) -> impl Iterator<Item = Result<PaymentRecord>> {
        self.reader
            .into_deserialize::<PaymentRow>()
            .map(|result| PaymentRecord::try_from(result?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str =
        "record_id, scheme_id, participant_id, participant_type, payment_type, amount, auction_lot, status";

    #[test]
    fn test_reader_valid_stream() {
        let data = format!(
            "{HEADER}\nr1, SCT, p1, RETAILER, HANDLING_FEE, 1.25, , \nr2, SCT, p2, SML_SUPPLIER, PRODUCER_FEE, 3, LOT-1, APPROVED"
        );
        let results: Vec<Result<PaymentRecord>> =
            PaymentRecordReader::new(data.as_bytes()).records().collect();

        assert_eq!(results.len(), 2);
        let r1 = results[0].as_ref().unwrap();
        assert_eq!(r1.amount, dec!(1.25));
        assert_eq!(r1.amount.to_string(), "1.25");
        assert_eq!(r1.auction_lot, None);
        assert_eq!(r1.status, PaymentStatus::Pending);

        let r2 = results[1].as_ref().unwrap();
        assert_eq!(r2.amount, dec!(3));
        assert_eq!(r2.auction_lot.as_deref(), Some("LOT-1"));
        assert_eq!(r2.status, PaymentStatus::Approved);
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = format!(
            "{HEADER}\nr1, SCT, p1, RETAILER, HANDLING_FEE, lots, , \nr2, SCT, p1, RETAILER, HANDLING_FEE, 1, , SHIPPED\nr3, SCT, p1, RETAILER, HANDLING_FEE, 1, , "
        );
        let results: Vec<Result<PaymentRecord>> =
            PaymentRecordReader::new(data.as_bytes()).records().collect();

        assert!(results[0].is_err());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_reader_status_is_case_insensitive() {
        let data = format!(
            "{HEADER}\nr1, SCT, p1, RETAILER, HANDLING_FEE, 1, , approved\nr2, SCT, p1, RETAILER, HANDLING_FEE, 1, , Paid\nr3, SCT, p1, RETAILER, HANDLING_FEE, 1, , shipped"
        );
        let results: Vec<Result<PaymentRecord>> =
            PaymentRecordReader::new(data.as_bytes()).records().collect();

        assert_eq!(results[0].as_ref().unwrap().status, PaymentStatus::Approved);
        assert_eq!(results[1].as_ref().unwrap().status, PaymentStatus::Paid);
        assert!(matches!(results[2], Err(PaymentError::ValidationError(_))));
    }
}
