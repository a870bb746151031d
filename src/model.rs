mod error;
pub mod grid;
pub mod occupant;
pub mod screens;

pub use error::GridError;
pub use grid::{GridModel, Occupancy};
pub use occupant::{
    CellRect, ItemRequest, Occupant, OccupantId, OccupantKind, PixelPoint, PixelRect, Placement,
    Span,
};
pub use screens::{OccupantMap, Screen, ScreenCollection, ScreenStats, ScreenView};
