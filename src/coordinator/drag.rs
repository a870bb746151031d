use tracing::{debug, info, trace};

use super::{DragError, DragPhase, DragSession, DropCandidate, ItemProvider};
use crate::common::config::{Config, DragSettings};
use crate::layout_engine::{DropPolicy, DropRequest, DropSlot};
use crate::model::{
    CellRect, GridError, GridModel, ItemRequest, OccupantId, PixelPoint, PixelRect, Placement,
    ScreenCollection, Span,
};

/// How a released drag ended.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Committed(Placement),
    Aborted,
}

/// Runs drag sessions over a [`ScreenCollection`]. At most one session is
/// active at a time.
pub struct DragDropCoordinator {
    screens: ScreenCollection,
    drag: DragSettings,
    phase: DragPhase,
    session: Option<DragSession>,
    provider: Option<Box<dyn ItemProvider>>,
}

impl DragDropCoordinator {
    pub fn new(config: &Config) -> Self {
        Self::with_screens(ScreenCollection::new(config), config.drag.clone())
    }

    pub fn with_screens(screens: ScreenCollection, drag: DragSettings) -> Self {
        Self {
            screens,
            drag,
            phase: DragPhase::Idle,
            session: None,
            provider: None,
        }
    }

    pub fn set_item_provider(&mut self, provider: Box<dyn ItemProvider>) {
        self.provider = Some(provider);
    }

    pub fn screens(&self) -> &ScreenCollection { &self.screens }

    pub fn screens_mut(&mut self) -> &mut ScreenCollection { &mut self.screens }

    pub fn phase(&self) -> DragPhase { self.phase }

    pub fn session(&self) -> Option<&DragSession> { self.session.as_ref() }

    fn dragging(&self, operation: &'static str) -> Result<DragSession, DragError> {
        match (&self.session, self.phase) {
            (Some(session), DragPhase::Dragging) => Ok(session.clone()),
            (_, phase) => Err(DragError::InvalidState { operation, phase }),
        }
    }

    fn drop_request(session: &DragSession, x: i32, y: i32) -> DropRequest {
        DropRequest {
            point: PixelPoint::new(x, y),
            span: session.span(),
            ignore: Some(session.occupant()),
        }
    }

    fn resolve(
        &mut self,
        screen: usize,
        request: &DropRequest,
    ) -> Result<Option<DropSlot>, DragError> {
        let mut view = self.screens.view(screen)?;
        let policy = view.policy();
        Ok(policy.resolve_drop_target(&mut view, request))
    }

    /// Picks up `occupant`. Returns `Ok(false)` when its kind refuses to be
    /// dragged, in which case nothing changes.
    pub fn begin_drag(
        &mut self,
        occupant: OccupantId,
        source_screen: usize,
    ) -> Result<bool, DragError> {
        if self.phase != DragPhase::Idle {
            return Err(DragError::InvalidState {
                operation: "begin_drag",
                phase: self.phase,
            });
        }
        self.screens.screen(source_screen)?;
        let item = self.screens.occupant(occupant).ok_or(GridError::UnknownOccupant(occupant))?;
        if item.screen() != source_screen {
            return Err(GridError::NotOnScreen { occupant, screen: source_screen }.into());
        }
        if !self.drag.is_draggable(item.kind()) {
            debug!(?occupant, kind = %item.kind(), "occupant refuses to be dragged");
            return Ok(false);
        }

        let origin = item.rect();
        if let Some(item) = self.screens.occupant_mut(occupant) {
            item.set_dragging(true);
        }
        self.screens.clear_drag_rects();
        self.session = Some(DragSession::new(occupant, source_screen, origin));
        self.phase = DragPhase::Dragging;
        info!(?occupant, source_screen, ?origin, "drag started");
        Ok(true)
    }

    pub fn drag_enter(&mut self, screen: usize) -> Result<(), DragError> {
        self.dragging("drag_enter")?;
        self.screens.invalidate(screen)?;
        trace!(screen, "drag entered screen");
        Ok(())
    }

    pub fn drag_exit(&mut self, screen: usize) -> Result<(), DragError> {
        self.dragging("drag_exit")?;
        self.screens.invalidate(screen)?;
        self.screens.screen_mut(screen)?.set_drag_rect(None);
        if let Some(session) = self.session.as_mut()
            && session.last_target().is_some_and(|target| target.screen == screen)
        {
            session.set_last_target(None);
        }
        trace!(screen, "drag left screen");
        Ok(())
    }

    /// Estimates where the dragged occupant would land if released at
    /// `(x, y)` and records the outline on the target screen.
    pub fn drag_over(&mut self, x: i32, y: i32) -> Result<Option<DropSlot>, DragError> {
        let session = self.dragging("drag_over")?;
        let target = self.screens.drop_target_index();
        let request = Self::drop_request(&session, x, y);
        let slot = self.resolve(target, &request)?;

        let screen = self.screens.screen_mut(target)?;
        let outline = slot.map(|slot| drag_outline(screen.grid(), slot, request.span));
        screen.set_drag_rect(outline);
        if let Some(session) = self.session.as_mut() {
            session.set_last_target(slot.map(|slot| DropCandidate { screen: target, slot }));
        }
        trace!(x, y, target, ?slot, "drag over");
        Ok(slot)
    }

    /// Whether a release at `(x, y)` would be accepted by the screen drops
    /// currently land on.
    pub fn accept_drop(&mut self, x: i32, y: i32) -> Result<bool, DragError> {
        let target = self.screens.drop_target_index();
        self.accept_drop_on(target, x, y)
    }

    pub fn accept_drop_on(&mut self, screen: usize, x: i32, y: i32) -> Result<bool, DragError> {
        let session = self.dragging("accept_drop")?;
        let request = Self::drop_request(&session, x, y);
        let mut view = self.screens.view(screen)?;
        let policy = view.policy();
        let accepted = policy.accept_span(&mut view, &request);
        debug!(screen, x, y, span = ?request.span, accepted, "accept drop");
        Ok(accepted)
    }

    /// Puts the dragged occupant on `slot` of `screen` and ends the session.
    ///
    /// The slot is checked against the screen first; a rejected slot leaves
    /// the session dragging so the caller can pick another one or abort.
    pub fn commit(&mut self, screen: usize, slot: DropSlot) -> Result<Placement, DragError> {
        let session = self.dragging("commit")?;
        let occupant = session.occupant();
        let source = session.source_screen();
        let request = DropRequest {
            point: PixelPoint::default(),
            span: session.span(),
            ignore: Some(occupant),
        };

        let mut view = self.screens.view(screen)?;
        let policy = view.policy();
        if !policy.validate_slot(&mut view, &request, slot)? {
            debug!(screen, ?slot, "commit rejected, slot is taken");
            return Err(DragError::Occupied { screen, slot });
        }

        if screen != source {
            self.screens.move_occupant(occupant, source, screen)?;
        }
        let placement = self.screens.place(occupant, screen, slot)?;
        if let Some(item) = self.screens.occupant_mut(occupant) {
            item.set_dragging(false);
        }
        self.screens.touch_screens(&[source, screen]);
        self.screens.clear_drag_rects();

        self.phase = DragPhase::Committed;
        info!(?occupant, from = source, to = screen, ?slot, "drag committed");
        if let Some(provider) = self.provider.as_mut() {
            provider.placement_committed(&placement);
        }
        self.finish();
        Ok(placement)
    }

    /// Drops the session. The occupant keeps the position it had before the
    /// drag started.
    pub fn abort(&mut self) -> Result<(), DragError> {
        let session = self.dragging("abort")?;
        let occupant = session.occupant();
        if let Some(item) = self.screens.occupant_mut(occupant) {
            item.set_dragging(false);
        }
        self.screens.clear_drag_rects();
        self.screens.touch_screens(&[session.source_screen()]);

        self.phase = DragPhase::Aborted;
        info!(?occupant, "drag aborted");
        if let Some(provider) = self.provider.as_mut() {
            provider.drag_aborted(occupant);
        }
        self.finish();
        Ok(())
    }

    /// Ends the drag at `(x, y)`: commits to the resolved slot when the drop
    /// target accepts it and aborts otherwise.
    ///
    /// A commit that fails for any reason other than misuse also aborts, so
    /// the coordinator is idle again once this returns `Ok`.
    pub fn release(&mut self, x: i32, y: i32) -> Result<DropOutcome, DragError> {
        let session = self.dragging("release")?;
        let target = self.screens.drop_target_index();
        if !self.accept_drop_on(target, x, y)? {
            self.abort()?;
            return Ok(DropOutcome::Aborted);
        }

        let request = Self::drop_request(&session, x, y);
        let Some(slot) = self.resolve(target, &request)? else {
            self.abort()?;
            return Ok(DropOutcome::Aborted);
        };
        match self.commit(target, slot) {
            Ok(placement) => Ok(DropOutcome::Committed(placement)),
            Err(err @ (DragError::Occupied { .. } | DragError::Grid(_))) => {
                debug!(%err, "commit failed on release");
                self.abort()?;
                Ok(DropOutcome::Aborted)
            }
            Err(err) => Err(err),
        }
    }

    /// Creates an item dragged in from outside the workspace at `(x, y)` on
    /// the screen drops currently land on. `Ok(None)` means it does not fit.
    pub fn drop_external(
        &mut self,
        x: i32,
        y: i32,
        request: ItemRequest,
    ) -> Result<Option<OccupantId>, DragError> {
        if self.phase != DragPhase::Idle {
            return Err(DragError::InvalidState {
                operation: "drop_external",
                phase: self.phase,
            });
        }
        let target = self.screens.drop_target_index();
        let drop = DropRequest {
            point: PixelPoint::new(x, y),
            span: request.span,
            ignore: None,
        };
        let Some(slot) = self.resolve(target, &drop)? else {
            debug!(target, kind = %request.kind, span = ?request.span, "external drop does not fit");
            return Ok(None);
        };

        let (id, placement) = self.screens.insert_at(target, request, slot)?;
        info!(?id, target, ?slot, "external item dropped");
        if let Some(provider) = self.provider.as_mut() {
            provider.item_added(&placement);
        }
        Ok(Some(id))
    }

    fn finish(&mut self) {
        trace!(phase = %self.phase, "drag session finished");
        self.session = None;
        self.phase = DragPhase::Idle;
    }
}

fn drag_outline(grid: &GridModel, slot: DropSlot, span: Span) -> PixelRect {
    match slot {
        DropSlot::Cell { x, y } => grid.cell_frame(&CellRect::new(x, y, span)),
        DropSlot::Free { x, y } => {
            let frame = grid.cell_frame(&CellRect::new(0, 0, span));
            PixelRect { x, y, ..frame }
        }
    }
}
