// ABOUTME: Drag interaction layer for the deal board
// ABOUTME: Turns pointer and keyboard gestures into discrete move intents

use crm_core::{DealStage, UnknownVariant};
use std::str::FromStr;
use tracing::debug;

/// Pointer position in board coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A board column that accepts drops. Its id is the stage it represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropZone(DealStage);

impl DropZone {
    pub fn new(stage: DealStage) -> Self {
        Self(stage)
    }

    pub fn stage(&self) -> DealStage {
        self.0
    }

    pub fn id(&self) -> &'static str {
        self.0.as_str()
    }

    pub fn all() -> [DropZone; 4] {
        DealStage::ALL.map(DropZone)
    }
}

impl FromStr for DropZone {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(DropZone)
    }
}

/// Request to set a deal's stage, emitted once per completed drag or menu pick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub record_id: String,
    pub target: DealStage,
}

impl MoveIntent {
    pub fn new(record_id: impl Into<String>, target: DealStage) -> Self {
        Self {
            record_id: record_id.into(),
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    /// Pointer is down on a card but has not moved past the activation distance
    Pressed { record_id: String, origin: Point },
    /// `position` is `None` for keyboard drags
    Dragging {
        record_id: String,
        position: Option<Point>,
    },
}

/// Gesture state machine: Idle -> Dragging -> Idle.
///
/// A pointer only starts dragging once it has moved further than the
/// activation distance, so a plain click never emits a move. Dropping on the
/// card's current column still emits an intent; the controller treats it as
/// a no-op.
#[derive(Debug, Clone)]
pub struct DragTracker {
    activation_distance: f64,
    state: DragState,
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ACTIVATION_DISTANCE)
    }
}

impl DragTracker {
    pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 5.0;

    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn activation_distance(&self) -> f64 {
        self.activation_distance
    }

    /// Card currently being dragged, for rendering the drag overlay
    pub fn active_record(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { record_id, .. } => Some(record_id.as_str()),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, record_id: impl Into<String>, at: Point) {
        if self.state == DragState::Idle {
            self.state = DragState::Pressed {
                record_id: record_id.into(),
                origin: at,
            };
        }
    }

    pub fn pointer_move(&mut self, to: Point) {
        match &mut self.state {
            DragState::Pressed { record_id, origin } => {
                if origin.distance_to(&to) > self.activation_distance {
                    debug!("Drag started for deal {}", record_id);
                    self.state = DragState::Dragging {
                        record_id: std::mem::take(record_id),
                        position: Some(to),
                    };
                }
            }
            DragState::Dragging { position, .. } => *position = Some(to),
            DragState::Idle => {}
        }
    }

    /// Release the pointer over `over` (or over nothing)
    pub fn pointer_up(&mut self, over: Option<DropZone>) -> Option<MoveIntent> {
        self.finish(over)
    }

    /// Release over a zone identified by its raw id; unknown ids cancel
    pub fn drop_on(&mut self, zone_id: Option<&str>) -> Option<MoveIntent> {
        let zone = zone_id.and_then(|id| match id.parse::<DropZone>() {
            Ok(zone) => Some(zone),
            Err(e) => {
                debug!("Ignoring drop target: {}", e);
                None
            }
        });
        self.finish(zone)
    }

    /// Keyboard pick-up activates immediately; there is no click to filter out
    pub fn keyboard_pick_up(&mut self, record_id: impl Into<String>) {
        if self.state == DragState::Idle {
            self.state = DragState::Dragging {
                record_id: record_id.into(),
                position: None,
            };
        }
    }

    pub fn keyboard_drop(&mut self, zone: DropZone) -> Option<MoveIntent> {
        self.finish(Some(zone))
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    fn finish(&mut self, over: Option<DropZone>) -> Option<MoveIntent> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { record_id, .. } => match over {
                Some(zone) => {
                    debug!("Moving deal {} to {}", record_id, zone.stage());
                    Some(MoveIntent::new(record_id, zone.stage()))
                }
                None => {
                    debug!("Dropped outside droppable area");
                    None
                }
            },
            _ => None,
        }
    }
}
