// ABOUTME: Deal pipeline board for the CRM
// ABOUTME: Groups deals by stage, applies optimistic stage transitions and maps drag gestures to moves

pub mod activity;
mod board;
pub mod buckets;
pub mod controller;
pub mod drag;
pub mod error;
pub mod summary;

pub use activity::{recent_activity, ActivityItem, ActivityKind, RECENT_ACTIVITY_LIMIT};
pub use board::LoadState;
pub use buckets::{group_by_stage, StageBuckets};
pub use controller::{CreateOutcome, PipelineController, RemoteAck, TransitionOutcome};
pub use drag::{DragState, DragTracker, DropZone, MoveIntent, Point};
pub use error::{PipelineError, PipelineResult};
pub use summary::{PipelineSummary, StageTotals};
