use crate::model::{OccupantId, Placement};

/// Owner of occupant content. Told about every position the engine settles
/// on; the engine itself never persists anything.
pub trait ItemProvider {
    fn placement_committed(&mut self, placement: &Placement);

    fn item_added(&mut self, placement: &Placement) { self.placement_committed(placement); }

    fn drag_aborted(&mut self, _occupant: OccupantId) {}
}
