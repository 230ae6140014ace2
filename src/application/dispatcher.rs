use super::operations::SchemeOperation;
use crate::domain::criteria::{AuctionReference, RequestCriteria};
use crate::domain::identity::SecurityContext;
use crate::domain::ports::SchemeRegistryHandle;
use crate::domain::result::TransactionResult;
use crate::domain::scheme::Scheme;
use crate::error::Result;
use tracing::{info, warn};

/// Which schemes a request addresses. First match wins.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SchemeTarget {
    AuctionLot(AuctionReference),
    Explicit(String),
    All,
}

impl SchemeTarget {
    pub fn for_request(criteria: &RequestCriteria) -> Self {
        if let Some(auction) = &criteria.auction {
            SchemeTarget::AuctionLot(auction.clone())
        } else if let Some(scheme_id) = criteria.explicit_scheme_id() {
            SchemeTarget::Explicit(scheme_id.to_string())
        } else {
            SchemeTarget::All
        }
    }
}

/// Runs a per-scheme operation across the schemes a request addresses.
pub struct SchemeFanoutDispatcher {
    registry: SchemeRegistryHandle,
}

impl SchemeFanoutDispatcher {
    pub fn new(registry: SchemeRegistryHandle) -> Self {
        Self { registry }
    }

    /// Resolves the request's schemes, in registry order when all are addressed.
    ///
    /// Resolution failures are the only errors a dispatch surfaces.
    pub async fn resolve(&self, criteria: &RequestCriteria) -> Result<Vec<Scheme>> {
        match SchemeTarget::for_request(criteria) {
            SchemeTarget::AuctionLot(auction) => {
                Ok(vec![self.registry.resolve_by_auction_lot(&auction).await?])
            }
            SchemeTarget::Explicit(scheme_id) => Ok(vec![
                self.registry
                    .resolve_by_id(&scheme_id)
                    .await?
                    .found_or_err(&scheme_id)?,
            ]),
            SchemeTarget::All => self.registry.list_all().await,
        }
    }

    pub async fn dispatch(
        &self,
        criteria: &RequestCriteria,
        op: &dyn SchemeOperation,
        ctx: &SecurityContext,
    ) -> Result<Vec<TransactionResult>> {
        let schemes = self.resolve(criteria).await?;
        Ok(run_schemes(criteria, &schemes, op, ctx).await)
    }
}

/// Runs `op` once per scheme, one after the other, in the order given.
///
/// An error from one scheme is recorded in that scheme's result and the loop
/// carries on with the next.
pub async fn run_schemes(
    criteria: &RequestCriteria,
    schemes: &[Scheme],
    op: &dyn SchemeOperation,
    ctx: &SecurityContext,
) -> Vec<TransactionResult> {
    info!(
        schemes = schemes.len(),
        kind = ?op.kind(),
        principal = %ctx.principal,
        "dispatch started"
    );
    let mut results = Vec::with_capacity(schemes.len());
    for scheme in schemes {
        let result = match op.execute(criteria, scheme, ctx).await {
            Ok(result) => result,
            Err(e) => {
                warn!(scheme_id = %scheme.id, error = %e, "scheme operation failed");
                TransactionResult::failed(op.kind(), scheme, e.to_string())
            }
        };
        results.push(result);
    }
    let failed = results.iter().filter(|r| r.has_errors()).count();
    info!(schemes = results.len(), with_errors = failed, "dispatch finished");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::participant::ParticipantType;
    use crate::domain::result::{ComputationSummary, OperationKind};
    use crate::error::PaymentError;
    use crate::infrastructure::in_memory::InMemorySchemeRegistry;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Tags each result with its scheme and fails on request.
    struct Tracker {
        fail_on: Option<&'static str>,
        seen: Mutex<Vec<String>>,
    }

    impl Tracker {
        fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                fail_on,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SchemeOperation for Tracker {
        fn kind(&self) -> OperationKind {
            OperationKind::Compute
        }

        async fn execute(
            &self,
            _criteria: &RequestCriteria,
            scheme: &Scheme,
            _ctx: &SecurityContext,
        ) -> Result<TransactionResult> {
            self.seen.lock().unwrap().push(scheme.id.clone());
            if self.fail_on == Some(scheme.id.as_str()) {
                return Err(PaymentError::OperationError("ledger offline".into()));
            }
            Ok(TransactionResult::Computation(ComputationSummary::empty(&scheme.id)))
        }
    }

    fn registry() -> SchemeRegistryHandle {
        Arc::new(
            InMemorySchemeRegistry::new(vec![
                Scheme::new("A", "Europe/London"),
                Scheme::new("B", "Europe/Dublin"),
                Scheme::new("C", "Europe/London"),
            ])
            .with_auction_lot("LOT-9", "C"),
        )
    }

    fn scheme_ids(results: &[TransactionResult]) -> Vec<&str> {
        results.iter().filter_map(|r| r.scheme_id()).collect()
    }

    #[tokio::test]
    async fn test_all_schemes_in_registry_order() {
        let dispatcher = SchemeFanoutDispatcher::new(registry());
        let tracker = Tracker::new(None);
        let results = dispatcher
            .dispatch(
                &RequestCriteria::new(ParticipantType::Retailer),
                &tracker,
                &SecurityContext::new("ops"),
            )
            .await
            .unwrap();
        assert_eq!(scheme_ids(&results), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_failure_in_one_scheme_does_not_stop_the_rest() {
        let dispatcher = SchemeFanoutDispatcher::new(registry());
        let tracker = Tracker::new(Some("B"));
        let results = dispatcher
            .dispatch(
                &RequestCriteria::new(ParticipantType::Retailer),
                &tracker,
                &SecurityContext::new("ops"),
            )
            .await
            .unwrap();

        assert_eq!(scheme_ids(&results), vec!["A", "B", "C"]);
        assert!(!results[0].has_errors());
        assert_eq!(results[1].errors(), vec!["Operation failed: ledger offline"]);
        assert!(!results[2].has_errors());
        assert_eq!(*tracker.seen.lock().unwrap(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_explicit_scheme() {
        let dispatcher = SchemeFanoutDispatcher::new(registry());
        let tracker = Tracker::new(None);
        let criteria = RequestCriteria::new(ParticipantType::Retailer).with_scheme("B");
        let results = dispatcher
            .dispatch(&criteria, &tracker, &SecurityContext::new("ops"))
            .await
            .unwrap();
        assert_eq!(scheme_ids(&results), vec!["B"]);
    }

    #[tokio::test]
    async fn test_unknown_scheme_is_fatal_before_any_work() {
        let dispatcher = SchemeFanoutDispatcher::new(registry());
        let tracker = Tracker::new(None);
        let criteria = RequestCriteria::new(ParticipantType::Retailer).with_scheme("Z");
        let err = dispatcher
            .dispatch(&criteria, &tracker, &SecurityContext::new("ops"))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::SchemeNotFound(id) if id == "Z"));
        assert!(tracker.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_auction_lot_wins_over_explicit_scheme() {
        let dispatcher = SchemeFanoutDispatcher::new(registry());
        let tracker = Tracker::new(None);
        let criteria = RequestCriteria::new(ParticipantType::Retailer)
            .with_scheme("A")
            .with_auction(AuctionReference {
                lot_id: "LOT-9".into(),
                auction_type: Some("AP".into()),
            });
        assert_eq!(
            SchemeTarget::for_request(&criteria),
            SchemeTarget::AuctionLot(criteria.auction.clone().unwrap())
        );
        let results = dispatcher
            .dispatch(&criteria, &tracker, &SecurityContext::new("ops"))
            .await
            .unwrap();
        assert_eq!(scheme_ids(&results), vec!["C"]);
    }

    #[tokio::test]
    async fn test_unknown_auction_lot() {
        let dispatcher = SchemeFanoutDispatcher::new(registry());
        let criteria =
            RequestCriteria::new(ParticipantType::Retailer).with_auction(AuctionReference {
                lot_id: "LOT-404".into(),
                auction_type: None,
            });
        let err = dispatcher.resolve(&criteria).await.unwrap_err();
        assert!(matches!(err, PaymentError::AuctionLotNotFound(_)));
    }
}
