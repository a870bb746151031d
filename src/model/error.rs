use thiserror::Error;

use super::OccupantId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("span {span_x}x{span_y} is invalid; spans must be at least 1x1")]
    InvalidSpan { span_x: usize, span_y: usize },
    #[error("cell ({x}, {y}) is outside the {count_x}x{count_y} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        count_x: usize,
        count_y: usize,
    },
    #[error("screen {index} does not exist ({count} screens)")]
    InvalidScreen { index: usize, count: usize },
    #[error("occupant {0:?} is not known")]
    UnknownOccupant(OccupantId),
    #[error("occupant {occupant:?} is not on screen {screen}")]
    NotOnScreen { occupant: OccupantId, screen: usize },
    #[error("occupancy has {actual} cells, expected {expected}")]
    OccupancyLength { expected: usize, actual: usize },
}
