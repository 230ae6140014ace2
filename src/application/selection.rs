use super::filter::FilterPipeline;
use super::partition::partition;
use crate::domain::criteria::RequestCriteria;
use crate::domain::participant::ParticipantSite;
use crate::domain::payment::PaymentView;
use crate::domain::ports::{ParticipantRosterHandle, PaymentViewSourceHandle};
use crate::domain::scheme::Scheme;
use crate::error::Result;
use std::collections::HashSet;
use tracing::debug;

/// Participants and payment views a request works on within one scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingSet {
    pub participants: Vec<ParticipantSite>,
    pub views: Vec<PaymentView>,
}

pub struct WorkingSetSelector {
    roster: ParticipantRosterHandle,
    views: PaymentViewSourceHandle,
    pipeline: FilterPipeline,
    known_payment_types: Vec<String>,
}

impl WorkingSetSelector {
    pub fn new(
        roster: ParticipantRosterHandle,
        views: PaymentViewSourceHandle,
        pipeline: FilterPipeline,
        known_payment_types: Vec<String>,
    ) -> Self {
        Self {
            roster,
            views,
            pipeline,
            known_payment_types,
        }
    }

    /// Partitions the scheme roster, filters the scheme's payment views and
    /// keeps only views whose participant is still in scope.
    pub async fn select(&self, criteria: &RequestCriteria, scheme: &Scheme) -> Result<WorkingSet> {
        let roster = self.roster.participants(scheme).await?;
        // The partitioner matches "ALL" literally, so the sentinel is resolved here.
        let participants = if criteria.selects_all_participants() {
            roster
        } else {
            partition(&roster, criteria.participant_ids(), criteria.include)
        };

        let candidates = self.views.payment_views(scheme).await?;
        let candidate_count = candidates.len();
        let filtered = self
            .pipeline
            .run(criteria, candidates, &self.known_payment_types);

        let in_scope: HashSet<&str> = participants.iter().map(|p| p.id.as_str()).collect();
        let views: Vec<PaymentView> = filtered
            .into_iter()
            .filter(|view| in_scope.contains(view.participant_id.as_str()))
            .collect();

        debug!(
            scheme_id = %scheme.id,
            participants = participants.len(),
            candidates = candidate_count,
            selected = views.len(),
            "working set selected"
        );
        Ok(WorkingSet {
            participants,
            views,
        })
    }
}
