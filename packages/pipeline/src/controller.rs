// ABOUTME: Pipeline view controller
// ABOUTME: Loads a user's deals, applies stage moves optimistically and reconciles with the record store

use chrono::{DateTime, Utc};
use crm_core::{
    collections, filter_records, placeholder_customer_id, validate_deal_input, Deal,
    DealCreateInput, DealStage, ValidationError,
};
use crm_storage::{encode, user_documents, Fields, RecordStore, RejectedDocument};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::board::{DealBoard, LoadState};
use crate::buckets::{group_by_stage, StageBuckets};
use crate::drag::MoveIntent;
use crate::error::{PipelineError, PipelineResult};
use crate::summary::PipelineSummary;

/// Whether the record store accepted a write that was already applied locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAck {
    Confirmed,
    Failed(String),
}

impl RemoteAck {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, RemoteAck::Confirmed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Deal),
    /// Input was incomplete; nothing was sent to the store
    Declined(Vec<ValidationError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The deal was already in the target stage
    Unchanged,
    Moved {
        from: DealStage,
        to: DealStage,
        remote: RemoteAck,
    },
}

/// Owns the deal board for one user session.
///
/// Cloning yields another handle to the same board. The board lock is never
/// held across a record store call, so concurrent transitions finish in any
/// order and the last local write wins.
#[derive(Clone)]
pub struct PipelineController {
    store: Arc<dyn RecordStore>,
    board: Arc<RwLock<DealBoard>>,
}

impl PipelineController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            board: Arc::new(RwLock::new(DealBoard::default())),
        }
    }

    /// Load every deal owned by `user_id`, replacing the current board.
    ///
    /// Customer names are refreshed from the customers collection; if that
    /// lookup fails the deals keep whatever name they were stored with. When
    /// the deal fetch itself fails the board is emptied and marked failed.
    pub async fn load(&self, user_id: &str) -> PipelineResult<Vec<Deal>> {
        let loaded =
            match user_documents::<Deal>(self.store.as_ref(), collections::DEALS, user_id).await {
                Ok(loaded) => loaded,
                Err(e) => {
                    error!("Error fetching deals for user {}: {}", user_id, e);
                    self.board.write().await.fail(user_id, e.to_string());
                    return Err(PipelineError::Load(e));
                }
            };

        let mut deals = loaded.records;
        if deals.iter().any(|deal| deal.customer_ref().is_some()) {
            self.resolve_customer_names(&mut deals).await;
        }

        self.board
            .write()
            .await
            .replace(user_id, deals.clone(), loaded.rejected);

        info!("Loaded {} deals for user {}", deals.len(), user_id);
        Ok(deals)
    }

    async fn resolve_customer_names(&self, deals: &mut [Deal]) {
        let customers = match self.store.list(collections::CUSTOMERS).await {
            Ok(customers) => customers,
            Err(e) => {
                warn!("Error fetching customer data: {}", e);
                return;
            }
        };

        let names: HashMap<&str, &str> = customers
            .iter()
            .filter_map(|doc| {
                doc.fields
                    .get("name")
                    .and_then(Value::as_str)
                    .map(|name| (doc.id.as_str(), name))
            })
            .collect();

        for deal in deals.iter_mut() {
            let resolved = deal
                .customer_ref()
                .and_then(|id| names.get(id))
                .map(|name| name.to_string());
            if let Some(name) = resolved {
                deal.customer_name = Some(name);
            }
        }
    }

    /// Create a deal for the loaded user.
    ///
    /// Incomplete input is declined without touching the store or the board.
    /// A missing customer id is replaced with a placeholder.
    pub async fn create(&self, input: DealCreateInput) -> PipelineResult<CreateOutcome> {
        let user_id = match self.board.read().await.user_id() {
            Some(user_id) if !user_id.is_empty() => user_id.to_string(),
            _ => {
                debug!("Declining deal creation without a user session");
                return Ok(CreateOutcome::Declined(vec![ValidationError::new(
                    "userId",
                    "No user session",
                )]));
            }
        };

        let errors = validate_deal_input(&input);
        if !errors.is_empty() {
            debug!("Declining deal creation: {:?}", errors);
            return Ok(CreateOutcome::Declined(errors));
        }

        let customer_id = input
            .customer_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(placeholder_customer_id);

        let deal = Deal {
            id: String::new(),
            title: input.title,
            value: input.value,
            stage: input.stage.unwrap_or_default(),
            user_id,
            customer_id: Some(customer_id),
            customer_name: input.customer_name.clone(),
            closing_date: input.closing_date,
            created_at: None,
            updated_at: None,
        };

        let document = self
            .store
            .create(collections::DEALS, encode(&deal)?)
            .await
            .map_err(|e| {
                error!("Error adding deal: {}", e);
                PipelineError::Remote(e)
            })?;

        let mut created: Deal = document.decode()?;
        created.customer_name = input.customer_name;

        self.board.write().await.insert(created.clone());
        info!("Created deal '{}' with ID {}", created.title, created.id);
        Ok(CreateOutcome::Created(created))
    }

    /// Delete a deal from the store and the board.
    ///
    /// The local removal happens even when the store rejects the delete, so
    /// the board can show a deal as gone while it still exists remotely.
    pub async fn delete(&self, id: &str) -> PipelineResult<RemoteAck> {
        if !self.board.read().await.contains(id) {
            warn!("Cannot delete unknown deal {}", id);
            return Err(PipelineError::NotFound(id.to_string()));
        }

        let remote = match self.store.delete(collections::DEALS, id).await {
            Ok(()) => RemoteAck::Confirmed,
            Err(e) => {
                error!("Error deleting deal {}: {}", id, e);
                RemoteAck::Failed(e.to_string())
            }
        };

        // Known gap: no rollback when the store rejected the delete
        self.board.write().await.remove(id);
        debug!("Removed deal {} from board", id);
        Ok(remote)
    }

    /// Move a deal to `stage`.
    ///
    /// The stage update is sent to the store and then applied to the board
    /// whatever the store answered. A rejected update leaves the local and
    /// remote stages diverged until the next load.
    pub async fn transition(&self, id: &str, stage: DealStage) -> PipelineResult<TransitionOutcome> {
        let current = self.board.read().await.get(id).map(|deal| deal.stage);
        let from = match current {
            Some(from) => from,
            None => {
                warn!("Could not find deal with ID {}", id);
                return Err(PipelineError::NotFound(id.to_string()));
            }
        };

        if from == stage {
            debug!("Deal {} already in {}", id, stage);
            return Ok(TransitionOutcome::Unchanged);
        }

        let mut fields = Fields::new();
        fields.insert("status".to_string(), Value::from(stage.as_str()));

        let remote = match self.store.update(collections::DEALS, id, fields).await {
            Ok(()) => RemoteAck::Confirmed,
            Err(e) => {
                error!("Error updating deal {} status: {}", id, e);
                RemoteAck::Failed(e.to_string())
            }
        };

        // Known gap: applied even when the store rejected the update
        if self.board.write().await.set_stage(id, stage).is_none() {
            warn!("Deal {} left the board while its move was in flight", id);
            return Err(PipelineError::NotFound(id.to_string()));
        }

        info!("Moved deal {} from {} to {}", id, from, stage);
        Ok(TransitionOutcome::Moved {
            from,
            to: stage,
            remote,
        })
    }

    /// Fulfil a move intent from the drag layer or a stage menu
    pub async fn apply(&self, intent: &MoveIntent) -> PipelineResult<TransitionOutcome> {
        self.transition(&intent.record_id, intent.target).await
    }

    /// Board columns, one per stage
    pub async fn buckets_by_stage(&self) -> StageBuckets {
        let board = self.board.read().await;
        group_by_stage(board.deals())
    }

    /// Board columns restricted to deals matching a free-text query
    pub async fn buckets_matching(&self, query: &str) -> StageBuckets {
        let deals = self.search(query).await;
        group_by_stage(&deals)
    }

    /// Deals matching a free-text query, in load order
    pub async fn search(&self, query: &str) -> Vec<Deal> {
        let deals: Vec<Deal> = self.board.read().await.deals().cloned().collect();
        filter_records(&deals, query).into_iter().cloned().collect()
    }

    pub async fn deal(&self, id: &str) -> Option<Deal> {
        self.board.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.board.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn load_state(&self) -> LoadState {
        self.board.read().await.state().clone()
    }

    /// Stored deals of this user that could not be decoded (e.g. unknown stage)
    pub async fn rejected_records(&self) -> Vec<RejectedDocument> {
        self.board.read().await.rejected().to_vec()
    }

    pub async fn summary(&self, now: DateTime<Utc>) -> PipelineSummary {
        PipelineSummary::from_buckets(&self.buckets_by_stage().await, now)
    }
}
