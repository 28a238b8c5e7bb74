// ABOUTME: Dashboard statistics derived from the deal board
// ABOUTME: Active deal counts, deals closed this month and per-stage totals

use chrono::{DateTime, Datelike, Utc};
use crm_core::DealStage;

use crate::buckets::StageBuckets;

#[derive(Debug, Clone, PartialEq)]
pub struct StageTotals {
    pub stage: DealStage,
    pub count: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub total_deals: usize,
    /// Open and Pending deals
    pub active_deals: usize,
    /// Won or Lost deals last updated in the calendar month of `now`
    pub closed_this_month: usize,
    pub stages: Vec<StageTotals>,
}

impl PipelineSummary {
    pub fn from_buckets(buckets: &StageBuckets, now: DateTime<Utc>) -> Self {
        let stages: Vec<StageTotals> = buckets
            .iter()
            .map(|(stage, deals)| StageTotals {
                stage,
                count: deals.len(),
                value: buckets.value(stage),
            })
            .collect();

        let active_deals = buckets.get(DealStage::Open).len() + buckets.get(DealStage::Pending).len();

        let closed_this_month = buckets
            .iter()
            .filter(|(stage, _)| stage.is_closed())
            .flat_map(|(_, deals)| deals)
            .filter_map(|deal| deal.updated_at)
            .filter(|updated| updated.year() == now.year() && updated.month() == now.month())
            .count();

        Self {
            total_deals: buckets.total(),
            active_deals,
            closed_this_month,
            stages,
        }
    }

    pub fn stage(&self, stage: DealStage) -> Option<&StageTotals> {
        self.stages.iter().find(|totals| totals.stage == stage)
    }

    /// Value of deals still in play (Open and Pending)
    pub fn open_pipeline_value(&self) -> f64 {
        self.stages
            .iter()
            .filter(|totals| !totals.stage.is_closed())
            .map(|totals| totals.value)
            .sum()
    }
}
