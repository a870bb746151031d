use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::model::{GridError, GridModel, Occupant, OccupantId, PixelPoint, ScreenView, Span};

/// Where a dropped occupant lands on a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropSlot {
    /// Anchor cell on a grid screen.
    Cell { x: usize, y: usize },
    /// Pixel position on a free-form screen.
    Free { x: i32, y: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropRequest {
    pub point: PixelPoint,
    pub span: Span,
    /// Occupant left out of occupancy, normally the one being dragged.
    pub ignore: Option<OccupantId>,
}

/// Placement behaviour of a screen kind.
#[enum_dispatch]
pub trait DropPolicy {
    /// Whether an occupant of the requested span can be dropped on this screen.
    fn accept_span(&self, view: &mut ScreenView<'_>, request: &DropRequest) -> bool;

    /// The slot a drop at the requested point would land on.
    fn resolve_drop_target(
        &self,
        view: &mut ScreenView<'_>,
        request: &DropRequest,
    ) -> Option<DropSlot>;

    /// Checks a slot proposed by the caller. `Ok(false)` means the slot is
    /// inside the screen but cannot take the occupant.
    fn validate_slot(
        &self,
        view: &mut ScreenView<'_>,
        request: &DropRequest,
        slot: DropSlot,
    ) -> Result<bool, GridError>;

    fn commit_placement(&self, grid: &GridModel, occupant: &mut Occupant, slot: DropSlot);
}

/// Snaps occupants to cells and only accepts exact-span vacancies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellDropPolicy;

impl DropPolicy for CellDropPolicy {
    fn accept_span(&self, view: &mut ScreenView<'_>, request: &DropRequest) -> bool {
        self.resolve_drop_target(view, request).is_some()
    }

    fn resolve_drop_target(
        &self,
        view: &mut ScreenView<'_>,
        request: &DropRequest,
    ) -> Option<DropSlot> {
        let (grid, vacant) = view.vacant_areas(request.ignore);
        super::PlacementSelector::nearest_exact_fit(request.point, request.span, vacant, grid)
            .map(|(x, y)| DropSlot::Cell { x, y })
    }

    fn validate_slot(
        &self,
        view: &mut ScreenView<'_>,
        request: &DropRequest,
        slot: DropSlot,
    ) -> Result<bool, GridError> {
        let (x, y) = match slot {
            DropSlot::Cell { x, y } => (x, y),
            DropSlot::Free { x, y } => view.grid().point_to_cell(x, y),
        };
        let rect = crate::model::CellRect::new(x, y, request.span);
        view.grid().check_rect(&rect)?;
        let grid = view.refresh_occupancy(request.ignore);
        Ok(grid.occupancy().is_block_vacant(&rect))
    }

    fn commit_placement(&self, grid: &GridModel, occupant: &mut Occupant, slot: DropSlot) {
        let (x, y) = match slot {
            DropSlot::Cell { x, y } => (x, y),
            DropSlot::Free { x, y } => grid.point_to_cell(x, y),
        };
        occupant.place_at(x, y);
    }
}

/// Places occupants wherever they are dropped and leaves span checks to the
/// screen's own arrangement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FreeformDropPolicy;

impl DropPolicy for FreeformDropPolicy {
    fn accept_span(&self, _view: &mut ScreenView<'_>, _request: &DropRequest) -> bool { true }

    fn resolve_drop_target(
        &self,
        _view: &mut ScreenView<'_>,
        request: &DropRequest,
    ) -> Option<DropSlot> {
        Some(DropSlot::Free {
            x: request.point.x,
            y: request.point.y,
        })
    }

    fn validate_slot(
        &self,
        view: &mut ScreenView<'_>,
        _request: &DropRequest,
        slot: DropSlot,
    ) -> Result<bool, GridError> {
        if let DropSlot::Cell { x, y } = slot {
            view.grid().check_cell(x, y)?;
        }
        Ok(true)
    }

    fn commit_placement(&self, grid: &GridModel, occupant: &mut Occupant, slot: DropSlot) {
        match slot {
            DropSlot::Cell { x, y } => occupant.place_at(x, y),
            DropSlot::Free { x, y } => {
                let (cell_x, cell_y) = grid.point_to_cell(x, y);
                occupant.place_free(cell_x, cell_y, PixelPoint::new(x, y));
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[enum_dispatch(DropPolicy)]
pub enum DropPolicyKind {
    Cell(CellDropPolicy),
    Freeform(FreeformDropPolicy),
}

impl Default for DropPolicyKind {
    fn default() -> Self { DropPolicyKind::Cell(CellDropPolicy) }
}

impl DropPolicyKind {
    pub fn is_freeform(self) -> bool { matches!(self, DropPolicyKind::Freeform(_)) }
}
