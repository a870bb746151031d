mod drag;
mod error;
mod provider;
mod session;

pub use drag::{DragDropCoordinator, DropOutcome};
pub use error::DragError;
pub use provider::ItemProvider;
pub use session::{DragPhase, DragSession, DropCandidate};
