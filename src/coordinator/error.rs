use thiserror::Error;

use super::DragPhase;
use crate::layout_engine::DropSlot;
use crate::model::GridError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DragError {
    #[error("{operation} is not allowed while the drag is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: DragPhase,
    },
    #[error("slot {slot:?} on screen {screen} cannot take the dragged occupant")]
    Occupied { screen: usize, slot: DropSlot },
    #[error(transparent)]
    Grid(#[from] GridError),
}
