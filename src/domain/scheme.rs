use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};

/// A jurisdiction the deposit return scheme operates under.
///
/// Schemes are reference data owned by the registry; the engine only reads them.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: String,
    pub timezone: String,
}

impl Scheme {
    pub fn new(id: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timezone: timezone.into(),
        }
    }
}

/// Outcome of looking a scheme up by id.
#[derive(Debug, PartialEq, Clone)]
pub enum SchemeLookup {
    Found(Scheme),
    NotFound,
}

impl SchemeLookup {
    /// Maps `NotFound` onto the resolution error for `id`.
    pub fn found_or_err(self, id: &str) -> Result<Scheme> {
        match self {
            SchemeLookup::Found(scheme) => Ok(scheme),
            SchemeLookup::NotFound => Err(PaymentError::SchemeNotFound(id.to_string())),
        }
    }
}

impl From<Option<Scheme>> for SchemeLookup {
    fn from(value: Option<Scheme>) -> Self {
        value.map_or(SchemeLookup::NotFound, SchemeLookup::Found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_not_found_maps_to_resolution_error() {
        let err = SchemeLookup::NotFound.found_or_err("NIR").unwrap_err();
        assert!(matches!(err, PaymentError::SchemeNotFound(id) if id == "NIR"));
    }

    #[test]
    fn test_lookup_found() {
        let scheme = Scheme::new("SCT", "Europe/London");
        let lookup = SchemeLookup::from(Some(scheme.clone()));
        assert_eq!(lookup.found_or_err("SCT").unwrap(), scheme);
    }
}
