use crate::domain::payment::StatusUpdate;
use crate::error::{PaymentError, Result};
use std::io::Read;

/// Reads `(record_id, status)` pairs from a CSV source, preserving order.
pub struct StatusUpdateReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> StatusUpdateReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    pub fn updates(self) -> impl Iterator<Item = Result<StatusUpdate>> {
        self.reader
            .into_records()
            .map(|row| -> Result<StatusUpdate> {
                let row = row?;
                match (row.get(0), row.get(1)) {
                    (Some(record_id), Some(status)) if !record_id.is_empty() => {
                        Ok(StatusUpdate::new(record_id, status.parse()?))
                    }
                    _ => Err(PaymentError::ValidationError(format!(
                        "Malformed status update row: {row:?}"
                    ))),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::PaymentStatus;

    #[test]
    fn test_updates_in_order() {
        let data = "record_id, status\nr2, approved\nr1, PAID\n, PAID\nr3, LOST";
        let results: Vec<Result<StatusUpdate>> =
            StatusUpdateReader::new(data.as_bytes()).updates().collect();

        assert_eq!(
            results[0].as_ref().unwrap(),
            &StatusUpdate::new("r2", PaymentStatus::Approved)
        );
        assert_eq!(
            results[1].as_ref().unwrap(),
            &StatusUpdate::new("r1", PaymentStatus::Paid)
        );
        assert!(results[2].is_err());
        assert!(results[3].is_err());
    }
}
