//! Narrowing of payment views by participant type, participant id and
//! payment type.
//!
//! The pipeline is an ordered list of plain stage functions. Stages are
//! wrapped one around the other: the first stage added is the innermost and
//! sees the raw input, each stage wrapped around it narrows the output of the
//! one inside. Some branches deliberately ignore the inner output and restart
//! from the raw input ([`FilterContext::original`]):
//!
//! * participant id `"ALL"` returns the raw input, discarding payment type
//!   filtering;
//! * payment type filtering always works from the raw input, and `"ALL"`
//!   means "every view whose payment type is known".
//!
//! These re-scopes look accidental but existing callers depend on them, so
//! they are kept as they are.

use crate::domain::criteria::RequestCriteria;
use crate::domain::payment::PaymentView;
use tracing::debug;

/// What every stage can see besides the views handed to it.
pub struct FilterContext<'a> {
    pub criteria: &'a RequestCriteria,
    /// The views the pipeline was started with.
    pub original: &'a [PaymentView],
    /// Reference list of payment types the scheme knows about.
    pub known_payment_types: &'a [String],
}

impl<'a> FilterContext<'a> {
    pub fn new(
        criteria: &'a RequestCriteria,
        original: &'a [PaymentView],
        known_payment_types: &'a [String],
    ) -> Self {
        Self {
            criteria,
            original,
            known_payment_types,
        }
    }
}

pub type FilterStage = fn(&FilterContext<'_>, Vec<PaymentView>) -> Vec<PaymentView>;

#[derive(Clone)]
pub struct FilterPipeline {
    /// Innermost first, i.e. in evaluation order.
    stages: Vec<(&'static str, FilterStage)>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Wraps `stage` around the stages added so far.
    pub fn wrap(mut self, name: &'static str, stage: FilterStage) -> Self {
        self.stages.push((name, stage));
        self
    }

    /// Participant type, around participant id, around payment type.
    pub fn standard() -> Self {
        Self::new()
            .wrap("payment_type", by_payment_type)
            .wrap("participant_id", by_participant_id)
            .wrap("participant_type", by_participant_type)
    }

    /// Stage names from outermost to innermost.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().rev().map(|(name, _)| *name).collect()
    }

    pub fn run(
        &self,
        criteria: &RequestCriteria,
        views: Vec<PaymentView>,
        known_payment_types: &[String],
    ) -> Vec<PaymentView> {
        let ctx = FilterContext::new(criteria, &views, known_payment_types);
        let mut current = views.clone();
        for (name, stage) in &self.stages {
            let before = current.len();
            current = stage(&ctx, current);
            debug!(stage = name, before, after = current.len(), "filter stage applied");
        }
        current
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

/// Keeps views recorded under the requested participant type's
/// classification key. Types without a key match nothing.
pub fn by_participant_type(ctx: &FilterContext<'_>, views: Vec<PaymentView>) -> Vec<PaymentView> {
    match ctx.criteria.participant_type.classification_key() {
        Some(key) => views
            .into_iter()
            .filter(|view| view.participant_type == key)
            .collect(),
        None => Vec::new(),
    }
}

pub fn by_participant_id(ctx: &FilterContext<'_>, views: Vec<PaymentView>) -> Vec<PaymentView> {
    let Some(ids) = ctx.criteria.participant_ids() else {
        return views;
    };
    if ctx.criteria.selects_all_participants() {
        return ctx.original.to_vec();
    }

    let include = ctx.criteria.includes();
    views
        .into_iter()
        .filter(|view| ids.contains(&view.participant_id) == include)
        .collect()
}

pub fn by_payment_type(ctx: &FilterContext<'_>, views: Vec<PaymentView>) -> Vec<PaymentView> {
    let Some(types) = ctx.criteria.payment_types() else {
        return views;
    };
    if ctx.criteria.selects_all_payment_types() {
        return ctx
            .original
            .iter()
            .filter(|view| ctx.known_payment_types.contains(&view.payment_type))
            .cloned()
            .collect();
    }

    let include = ctx.criteria.includes();
    ctx.original
        .iter()
        .filter(|view| types.contains(&view.payment_type) == include)
        .cloned()
        .collect()
}
