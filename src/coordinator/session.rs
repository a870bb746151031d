use serde::Serialize;

use crate::layout_engine::DropSlot;
use crate::model::{CellRect, OccupantId, Span};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Committed,
    Aborted,
}

/// Screen and slot a drop would land on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DropCandidate {
    pub screen: usize,
    pub slot: DropSlot,
}

/// One pick-up-to-release gesture.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    occupant: OccupantId,
    source_screen: usize,
    origin: CellRect,
    last_target: Option<DropCandidate>,
}

impl DragSession {
    pub(crate) fn new(occupant: OccupantId, source_screen: usize, origin: CellRect) -> Self {
        Self {
            occupant,
            source_screen,
            origin,
            last_target: None,
        }
    }

    pub fn occupant(&self) -> OccupantId { self.occupant }

    pub fn source_screen(&self) -> usize { self.source_screen }

    /// Cells the occupant covered when the drag started.
    pub fn origin(&self) -> CellRect { self.origin }

    pub fn span(&self) -> Span { self.origin.span }

    pub fn last_target(&self) -> Option<DropCandidate> { self.last_target }

    pub(crate) fn set_last_target(&mut self, target: Option<DropCandidate>) {
        self.last_target = target;
    }
}
