pub(crate) mod graph;
mod placement;
pub mod systems;
pub mod utils;
pub mod vacant;

pub use graph::{Direction, ScreenOrientation};
pub use placement::PlacementSelector;
pub use systems::{
    CellDropPolicy, DropPolicy, DropPolicyKind, DropRequest, DropSlot, FreeformDropPolicy,
};
pub use vacant::{SpanHint, VacantArea, VacantAreaFinder, VacantAreaSet, VacantCache};
