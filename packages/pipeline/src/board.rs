// ABOUTME: In-memory deal arena owned by the pipeline controller
// ABOUTME: Deals keyed by id with load order kept for column ordering

use crm_core::{Deal, DealStage};
use crm_storage::RejectedDocument;
use std::collections::HashMap;

/// What the renderer should show for the board as a whole
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
    Failed(String),
}

#[derive(Debug, Default)]
pub(crate) struct DealBoard {
    user_id: Option<String>,
    records: HashMap<String, Deal>,
    order: Vec<String>,
    rejected: Vec<RejectedDocument>,
    state: LoadState,
}

impl DealBoard {
    /// Replace the whole board with a freshly loaded set
    pub(crate) fn replace(
        &mut self,
        user_id: &str,
        deals: Vec<Deal>,
        rejected: Vec<RejectedDocument>,
    ) {
        self.records.clear();
        self.order.clear();
        for deal in deals {
            self.insert(deal);
        }
        self.user_id = Some(user_id.to_string());
        self.rejected = rejected;
        self.state = LoadState::Loaded;
    }

    /// Empty the board after a failed load
    pub(crate) fn fail(&mut self, user_id: &str, reason: String) {
        self.records.clear();
        self.order.clear();
        self.rejected.clear();
        self.user_id = Some(user_id.to_string());
        self.state = LoadState::Failed(reason);
    }

    pub(crate) fn insert(&mut self, deal: Deal) {
        if !self.records.contains_key(&deal.id) {
            self.order.push(deal.id.clone());
        }
        self.records.insert(deal.id.clone(), deal);
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Deal> {
        let removed = self.records.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    /// Set a deal's stage, returning the previous one
    pub(crate) fn set_stage(&mut self, id: &str, stage: DealStage) -> Option<DealStage> {
        self.records
            .get_mut(id)
            .map(|deal| std::mem::replace(&mut deal.stage, stage))
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Deal> {
        self.records.get(id)
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Deals in load order
    pub(crate) fn deals(&self) -> impl Iterator<Item = &Deal> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub(crate) fn rejected(&self) -> &[RejectedDocument] {
        &self.rejected
    }

    pub(crate) fn state(&self) -> &LoadState {
        &self.state
    }
}
