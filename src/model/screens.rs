use std::time::Instant;

use serde::Serialize;
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use super::{
    CellRect, GridError, GridModel, ItemRequest, Occupant, OccupantId, OccupantKind, PixelRect,
    Placement,
};
use crate::common::config::{Config, GridSettings};
use crate::layout_engine::{
    CellDropPolicy, DropPolicy, DropPolicyKind, DropSlot, FreeformDropPolicy, PlacementSelector,
    ScreenOrientation, VacantAreaFinder, VacantAreaSet, VacantCache,
};

pub type OccupantMap = SlotMap<OccupantId, Occupant>;

/// One page of the workspace.
#[derive(Debug)]
pub struct Screen {
    grid: GridModel,
    policy: DropPolicyKind,
    vacant: VacantCache,
    // Occupant the cached set was computed without.
    vacant_ignore: Option<OccupantId>,
    drag_rect: Option<PixelRect>,
}

impl Screen {
    fn new(settings: &GridSettings, policy: DropPolicyKind) -> Self {
        Self {
            grid: GridModel::new(settings),
            policy,
            vacant: VacantCache::new(),
            vacant_ignore: None,
            drag_rect: None,
        }
    }

    pub fn grid(&self) -> &GridModel { &self.grid }

    pub fn policy(&self) -> DropPolicyKind { self.policy }

    pub fn is_freeform(&self) -> bool { self.policy.is_freeform() }

    /// Outline of the occupant being dragged over this screen, if any.
    pub fn drag_rect(&self) -> Option<PixelRect> { self.drag_rect }

    pub(crate) fn set_drag_rect(&mut self, rect: Option<PixelRect>) { self.drag_rect = rect; }

    pub fn is_vacant_cache_valid(&self) -> bool { self.vacant.is_valid() }

    pub fn vacant_rebuilds(&self) -> u64 { self.vacant.rebuild_count() }

    fn invalidate(&mut self) { self.vacant.invalidate(); }
}

/// Mutable access to one screen together with the occupants it needs to
/// rebuild its derived state.
pub struct ScreenView<'a> {
    index: usize,
    screen: &'a mut Screen,
    occupants: &'a OccupantMap,
    exempt: &'a [OccupantKind],
}

impl<'a> ScreenView<'a> {
    pub fn index(&self) -> usize { self.index }

    pub fn grid(&self) -> &GridModel { &self.screen.grid }

    pub fn policy(&self) -> DropPolicyKind { self.screen.policy }

    /// Rebuilds occupancy from the occupants currently on this screen.
    pub fn refresh_occupancy(&mut self, ignore: Option<OccupantId>) -> &GridModel {
        let members = members_of(self.occupants, self.index);
        self.screen.grid.rebuild_occupancy(members, ignore, self.exempt);
        &self.screen.grid
    }

    /// Vacant areas of the screen with `ignore` left out of occupancy,
    /// recomputed only when the cached set is stale.
    pub fn vacant_areas(&mut self, ignore: Option<OccupantId>) -> (&GridModel, &VacantAreaSet) {
        cached_vacant_areas(self.index, self.screen, self.occupants, self.exempt, ignore)
    }
}

fn cached_vacant_areas<'s>(
    index: usize,
    screen: &'s mut Screen,
    occupants: &OccupantMap,
    exempt: &[OccupantKind],
    ignore: Option<OccupantId>,
) -> (&'s GridModel, &'s VacantAreaSet) {
    if screen.vacant_ignore != ignore {
        screen.vacant.invalidate();
        screen.vacant_ignore = ignore;
    }
    let grid = &mut screen.grid;
    let vacant = screen.vacant.get_or_rebuild(|| {
        debug!(screen = index, ?ignore, "rebuilding vacant areas");
        grid.rebuild_occupancy(members_of(occupants, index), ignore, exempt);
        VacantAreaFinder::enumerate_all(grid.occupancy().clone())
    });
    (&screen.grid, vacant)
}

fn members_of(
    occupants: &OccupantMap,
    screen: usize,
) -> impl Iterator<Item = (OccupantId, &Occupant)> + '_ {
    occupants.iter().filter(move |(_, occupant)| occupant.screen() == screen)
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenStats {
    pub total_screens: usize,
    pub total_occupants: usize,
    pub current: usize,
    pub pending: Option<usize>,
    pub occupant_counts: Vec<usize>,
    pub vacant_rebuilds: Vec<u64>,
}

/// The pages of the workspace, the occupants placed on them and the page
/// the user is on or heading to.
#[derive(Debug)]
pub struct ScreenCollection {
    screens: Vec<Screen>,
    occupants: OccupantMap,
    current: usize,
    pending: Option<usize>,
    default_screen: usize,
    exempt: Vec<OccupantKind>,
}

impl ScreenCollection {
    pub fn new(config: &Config) -> Self {
        let count = config.workspace.screen_count.max(1);
        let screens = (0..count)
            .map(|index| {
                let policy = if config.workspace.freeform_screens.contains(&index) {
                    DropPolicyKind::from(FreeformDropPolicy)
                } else {
                    DropPolicyKind::from(CellDropPolicy)
                };
                Screen::new(&config.grid, policy)
            })
            .collect();
        let default_screen = config.workspace.default_screen.min(count - 1);
        Self {
            screens,
            occupants: SlotMap::with_key(),
            current: default_screen,
            pending: None,
            default_screen,
            exempt: config.drag.exempt_kinds.clone(),
        }
    }

    pub fn len(&self) -> usize { self.screens.len() }

    pub fn is_empty(&self) -> bool { self.screens.is_empty() }

    pub fn current_index(&self) -> usize { self.current }

    /// Screen a page transition is heading to, if one is in flight.
    pub fn pending_index(&self) -> Option<usize> { self.pending }

    /// Index a drop lands on: the pending screen while a transition is in
    /// flight, the current one otherwise.
    pub fn drop_target_index(&self) -> usize { self.pending.unwrap_or(self.current) }

    pub fn current_target(&self) -> &GridModel { &self.screens[self.drop_target_index()].grid }

    fn check_screen(&self, index: usize) -> Result<(), GridError> {
        if index < self.screens.len() {
            Ok(())
        } else {
            Err(GridError::InvalidScreen { index, count: self.screens.len() })
        }
    }

    pub fn screen(&self, index: usize) -> Result<&Screen, GridError> {
        self.check_screen(index)?;
        Ok(&self.screens[index])
    }

    pub(crate) fn screen_mut(&mut self, index: usize) -> Result<&mut Screen, GridError> {
        self.check_screen(index)?;
        Ok(&mut self.screens[index])
    }

    pub fn screens(&self) -> impl Iterator<Item = &Screen> + '_ { self.screens.iter() }

    pub fn view(&mut self, index: usize) -> Result<ScreenView<'_>, GridError> {
        self.check_screen(index)?;
        Ok(ScreenView {
            index,
            screen: &mut self.screens[index],
            occupants: &self.occupants,
            exempt: &self.exempt,
        })
    }

    /// Starts a transition towards `index`, clamped to the existing screens.
    /// Returns false when a transition is already in flight.
    pub fn snap_to_screen(&mut self, index: usize) -> bool {
        if self.pending.is_some() {
            trace!(index, pending = ?self.pending, "transition in flight, snap ignored");
            return false;
        }
        let index = index.min(self.screens.len() - 1);
        if index != self.current {
            self.invalidate_all();
        }
        self.pending = Some(index);
        debug!(from = self.current, to = index, "snapping to screen");
        true
    }

    /// Ends the transition in flight. Returns the new current screen.
    pub fn finish_transition(&mut self) -> Option<usize> {
        let next = self.pending.take()?;
        self.current = next;
        Some(next)
    }

    pub fn scroll_left(&mut self) -> bool {
        if self.pending.is_some() || self.current == 0 {
            return false;
        }
        self.snap_to_screen(self.current - 1)
    }

    pub fn scroll_right(&mut self) -> bool {
        if self.pending.is_some() || self.current + 1 >= self.screens.len() {
            return false;
        }
        self.snap_to_screen(self.current + 1)
    }

    /// Jumps straight to `index`, clamped to the existing screens. Any
    /// transition in flight is dropped.
    pub fn set_current_screen(&mut self, index: usize) {
        self.invalidate_all();
        self.pending = None;
        self.current = index.min(self.screens.len() - 1);
        debug!(current = self.current, "current screen set");
    }

    pub fn default_screen(&self) -> usize { self.default_screen }

    pub fn reset_default_screen(&mut self, index: usize) -> Result<(), GridError> {
        if let Err(err) = self.check_screen(index) {
            warn!(index, "cannot reset default screen");
            return Err(err);
        }
        self.default_screen = index;
        Ok(())
    }

    pub fn is_default_screen_showing(&self) -> bool { self.current == self.default_screen }

    pub fn move_to_default_screen(&mut self) -> bool { self.snap_to_screen(self.default_screen) }

    pub fn occupant(&self, id: OccupantId) -> Option<&Occupant> { self.occupants.get(id) }

    pub(crate) fn occupant_mut(&mut self, id: OccupantId) -> Option<&mut Occupant> {
        self.occupants.get_mut(id)
    }

    pub fn occupants(&self) -> impl Iterator<Item = (OccupantId, &Occupant)> + '_ {
        self.occupants.iter()
    }

    pub fn occupants_on(&self, screen: usize) -> impl Iterator<Item = (OccupantId, &Occupant)> + '_ {
        members_of(&self.occupants, screen)
    }

    pub fn find_kind(&self, screen: usize, kind: OccupantKind) -> Option<OccupantId> {
        self.occupants_on(screen).find(|(_, o)| o.kind() == kind).map(|(id, _)| id)
    }

    pub fn exempt_kinds(&self) -> &[OccupantKind] { &self.exempt }

    /// Places a new occupant on `screen`: at its preferred cell when that is
    /// free, otherwise at the first free block. `Ok(None)` means no fit.
    pub fn add_occupant(
        &mut self,
        screen: usize,
        request: ItemRequest,
    ) -> Result<Option<OccupantId>, GridError> {
        let span = request.span;
        let mut view = self.view(screen)?;
        let freeform = view.screen.is_freeform();
        if let Some((x, y)) = request.preferred {
            view.grid().check_rect(&CellRect::new(x, y, span))?;
        }

        let grid = view.refresh_occupancy(None);
        let preferred = request
            .preferred
            .filter(|&(x, y)| freeform || grid.occupancy().is_block_vacant(&CellRect::new(x, y, span)));
        let anchor = match preferred {
            Some(anchor) => Some(anchor),
            None if freeform => Some((0, 0)),
            None => PlacementSelector::first_fit(span, grid),
        };
        let Some((x, y)) = anchor else {
            debug!(screen, kind = %request.kind, ?span, "no room for new occupant");
            return Ok(None);
        };

        let id = self.occupants.insert(Occupant::new(request.kind, screen, CellRect::new(x, y, span)));
        self.touch(screen);
        debug!(screen, ?id, x, y, "occupant added");
        Ok(Some(id))
    }

    /// Creates an occupant at a slot already resolved by the screen's policy.
    pub(crate) fn insert_at(
        &mut self,
        screen: usize,
        request: ItemRequest,
        slot: DropSlot,
    ) -> Result<(OccupantId, Placement), GridError> {
        self.check_screen(screen)?;
        let id = self
            .occupants
            .insert(Occupant::new(request.kind, screen, CellRect::new(0, 0, request.span)));
        let placement = self.place(id, screen, slot)?;
        self.touch(screen);
        Ok((id, placement))
    }

    pub fn remove_occupant(&mut self, id: OccupantId) -> Option<Occupant> {
        let occupant = self.occupants.remove(id)?;
        if occupant.screen() < self.screens.len() {
            self.touch(occupant.screen());
        }
        debug!(?id, screen = occupant.screen(), "occupant removed");
        Some(occupant)
    }

    /// Moves membership of `id` from one screen to another. Position is left
    /// to the caller.
    pub fn move_occupant(&mut self, id: OccupantId, from: usize, to: usize) -> Result<(), GridError> {
        trace_misc("move_occupant", || -> Result<(), GridError> {
            self.check_screen(from)?;
            self.check_screen(to)?;
            let occupant = self.occupants.get_mut(id).ok_or(GridError::UnknownOccupant(id))?;
            if occupant.screen() != from {
                return Err(GridError::NotOnScreen { occupant: id, screen: from });
            }
            occupant.set_screen(to);
            self.touch(from);
            self.touch(to);
            Ok(())
        })
    }

    /// Applies the screen's policy to put `id` on `slot`.
    pub(crate) fn place(
        &mut self,
        id: OccupantId,
        screen: usize,
        slot: DropSlot,
    ) -> Result<Placement, GridError> {
        self.check_screen(screen)?;
        let target = &self.screens[screen];
        let occupant = self.occupants.get_mut(id).ok_or(GridError::UnknownOccupant(id))?;
        if occupant.screen() != screen {
            return Err(GridError::NotOnScreen { occupant: id, screen });
        }
        target.policy.commit_placement(&target.grid, occupant, slot);
        Ok(Placement::of(id, occupant))
    }

    pub fn invalidate(&mut self, screen: usize) -> Result<(), GridError> {
        self.screen_mut(screen)?.invalidate();
        Ok(())
    }

    pub fn invalidate_all(&mut self) {
        for screen in &mut self.screens {
            screen.invalidate();
        }
    }

    /// Rebuilds occupancy of `screen` from its occupants.
    pub fn refresh_occupancy(&mut self, screen: usize) -> Result<&GridModel, GridError> {
        self.check_screen(screen)?;
        let target = &mut self.screens[screen];
        target.grid.rebuild_occupancy(members_of(&self.occupants, screen), None, &self.exempt);
        Ok(&target.grid)
    }

    pub fn vacant_areas(
        &mut self,
        screen: usize,
        ignore: Option<OccupantId>,
    ) -> Result<&VacantAreaSet, GridError> {
        self.check_screen(screen)?;
        let (_, vacant) = cached_vacant_areas(
            screen,
            &mut self.screens[screen],
            &self.occupants,
            &self.exempt,
            ignore,
        );
        Ok(vacant)
    }

    /// Adapts every screen to a new size. Orientation changes reset and
    /// rebuild occupancy.
    pub fn measure(&mut self, width: i32, height: i32) {
        let mut changed = false;
        for screen in &mut self.screens {
            changed |= screen.grid.measure(width, height);
        }
        if changed {
            let orientation = ScreenOrientation::from_size(width, height);
            debug!(?orientation, "screen orientation changed, occupancy reset");
            for index in 0..self.screens.len() {
                self.touch(index);
            }
        }
    }

    /// Invalidates the cached vacant areas of `screen` and brings its
    /// occupancy back in line with its occupants.
    fn touch(&mut self, screen: usize) {
        if let Ok(target) = self.screen_mut(screen) {
            target.invalidate();
        }
        if let Err(err) = self.refresh_occupancy(screen) {
            warn!(screen, %err, "occupancy refresh failed");
        }
    }

    pub(crate) fn touch_screens(&mut self, screens: &[usize]) {
        for &screen in screens {
            self.touch(screen);
        }
    }

    pub(crate) fn clear_drag_rects(&mut self) {
        for screen in &mut self.screens {
            screen.drag_rect = None;
        }
    }

    pub fn stats(&self) -> ScreenStats {
        ScreenStats {
            total_screens: self.screens.len(),
            total_occupants: self.occupants.len(),
            current: self.current,
            pending: self.pending,
            occupant_counts: (0..self.screens.len())
                .map(|index| self.occupants_on(index).count())
                .collect(),
            vacant_rebuilds: self.screens.iter().map(Screen::vacant_rebuilds).collect(),
        }
    }
}

fn trace_misc<T>(desc: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let end = Instant::now();
    trace!(time = ?(end - start), "{desc}");
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::Span;

    fn span(x: usize, y: usize) -> Span { Span::new(x, y).unwrap() }

    fn collection() -> ScreenCollection { ScreenCollection::new(&Config::default()) }

    fn add(screens: &mut ScreenCollection, screen: usize, request: ItemRequest) -> OccupantId {
        screens.add_occupant(screen, request).unwrap().unwrap()
    }

    #[test]
    fn follows_workspace_settings() {
        let mut config = Config::default();
        config.workspace.freeform_screens = vec![4];
        let screens = ScreenCollection::new(&config);

        assert_eq!(screens.len(), 5);
        assert_eq!(screens.current_index(), 2);
        assert!(screens.screen(4).unwrap().is_freeform());
        assert!(!screens.screen(0).unwrap().is_freeform());
        assert_eq!(
            screens.screen(5).err(),
            Some(GridError::InvalidScreen { index: 5, count: 5 })
        );
    }

    #[test]
    fn drop_target_follows_pending_transition() {
        let mut screens = collection();
        assert_eq!(screens.drop_target_index(), 2);

        assert!(screens.scroll_right());
        assert_eq!(screens.current_index(), 2);
        assert_eq!(screens.drop_target_index(), 3);
        assert!(std::ptr::eq(screens.current_target(), screens.screen(3).unwrap().grid()));
        // Only one transition at a time.
        assert!(!screens.scroll_left());
        assert!(!screens.snap_to_screen(0));

        assert_eq!(screens.finish_transition(), Some(3));
        assert_eq!(screens.drop_target_index(), 3);
        assert_eq!(screens.finish_transition(), None);
    }

    #[test]
    fn snap_clamps_and_edges_do_not_scroll() {
        let mut screens = collection();
        assert!(screens.snap_to_screen(99));
        assert_eq!(screens.finish_transition(), Some(4));
        assert!(!screens.scroll_right());

        assert!(screens.snap_to_screen(0));
        screens.finish_transition();
        assert!(!screens.scroll_left());
    }

    #[test]
    fn add_uses_preferred_cell_then_first_fit() {
        let mut screens = collection();
        let a = add(&mut screens, 0, ItemRequest::new(OccupantKind::Widget, span(2, 2)).at(0, 0));
        // Preferred cell is taken, so the first free block is used.
        let b = add(&mut screens, 0, ItemRequest::new(OccupantKind::Widget, span(2, 2)).at(1, 1));
        let c = add(&mut screens, 0, ItemRequest::new(OccupantKind::Widget, span(4, 2)));

        assert_eq!(screens.occupant(a).unwrap().rect(), CellRect::new(0, 0, span(2, 2)));
        assert_eq!(screens.occupant(b).unwrap().rect(), CellRect::new(2, 0, span(2, 2)));
        assert_eq!(screens.occupant(c).unwrap().rect(), CellRect::new(0, 2, span(4, 2)));

        let full = screens.add_occupant(0, ItemRequest::new(OccupantKind::Shortcut, Span::ONE));
        assert_eq!(full, Ok(None));
        assert!(screens.screen(0).unwrap().grid().occupied_cells().iter().all(|c| *c));
    }

    #[test]
    fn add_rejects_bad_targets() {
        let mut screens = collection();
        let request = ItemRequest::new(OccupantKind::Shortcut, span(2, 1)).at(3, 0);
        assert_eq!(
            screens.add_occupant(0, request),
            Err(GridError::OutOfBounds { x: 4, y: 0, count_x: 4, count_y: 4 })
        );
        assert_eq!(
            screens.add_occupant(7, ItemRequest::new(OccupantKind::Shortcut, Span::ONE)),
            Err(GridError::InvalidScreen { index: 7, count: 5 })
        );
        assert_eq!(screens.stats().total_occupants, 0);
    }

    #[test]
    fn exempt_kinds_do_not_block_cells() {
        let mut screens = collection();
        add(&mut screens, 1, ItemRequest::new(OccupantKind::Folder, Span::ONE).at(0, 0));
        let shortcut = add(&mut screens, 1, ItemRequest::new(OccupantKind::Shortcut, Span::ONE).at(0, 0));

        assert_eq!(screens.occupant(shortcut).unwrap().rect().x, 0);
        assert!(screens.find_kind(1, OccupantKind::Folder).is_some());
        assert_eq!(screens.find_kind(0, OccupantKind::Folder), None);
    }

    #[test]
    fn vacant_areas_are_cached_until_invalidated() {
        let mut screens = collection();
        let first = screens.vacant_areas(0, None).unwrap().len();
        screens.vacant_areas(0, None).unwrap();
        assert_eq!(screens.screen(0).unwrap().vacant_rebuilds(), 1);

        add(&mut screens, 0, ItemRequest::new(OccupantKind::Widget, span(2, 2)));
        assert!(!screens.screen(0).unwrap().is_vacant_cache_valid());
        let second = screens.vacant_areas(0, None).unwrap().len();
        assert_eq!(screens.screen(0).unwrap().vacant_rebuilds(), 2);
        assert!(second < first);
    }

    #[test]
    fn ignoring_an_occupant_recomputes_the_set() {
        let mut screens = collection();
        let id = add(&mut screens, 0, ItemRequest::new(OccupantKind::Widget, span(4, 4)));
        assert!(screens.vacant_areas(0, None).unwrap().is_empty());

        let without = screens.vacant_areas(0, Some(id)).unwrap();
        assert!(without.iter().any(|area| area.has_span(span(4, 4))));
        assert_eq!(screens.screen(0).unwrap().vacant_rebuilds(), 2);
    }

    #[test]
    fn default_screen_management() {
        let mut screens = collection();
        assert!(screens.is_default_screen_showing());

        assert_eq!(
            screens.reset_default_screen(5),
            Err(GridError::InvalidScreen { index: 5, count: 5 })
        );
        assert_eq!(screens.default_screen(), 2);
        screens.reset_default_screen(1).unwrap();
        assert!(!screens.is_default_screen_showing());

        assert!(screens.move_to_default_screen());
        assert_eq!(screens.pending_index(), Some(1));
        assert_eq!(screens.finish_transition(), Some(1));
        assert!(screens.is_default_screen_showing());
    }

    #[test]
    fn set_current_screen_jumps_and_clears_caches() {
        let mut screens = collection();
        screens.vacant_areas(0, None).unwrap();
        assert!(screens.snap_to_screen(4));

        screens.set_current_screen(99);
        assert_eq!(screens.current_index(), 4);
        assert_eq!(screens.pending_index(), None);
        assert!(!screens.screen(0).unwrap().is_vacant_cache_valid());
        assert_eq!(screens.current_target().count_x(), 4);
    }

    #[test]
    fn move_rebuilds_occupancy_of_both_screens() {
        let mut screens = collection();
        let id = add(&mut screens, 0, ItemRequest::new(OccupantKind::Shortcut, Span::ONE).at(0, 0));
        assert!(screens.screen(0).unwrap().grid().is_occupied(0, 0));

        screens.move_occupant(id, 0, 1).unwrap();
        assert!(!screens.screen(0).unwrap().grid().is_occupied(0, 0));
        assert!(screens.screen(1).unwrap().grid().is_occupied(0, 0));
    }

    #[test]
    fn move_invalidates_both_screens() {
        let mut screens = collection();
        let id = add(&mut screens, 0, ItemRequest::new(OccupantKind::Shortcut, Span::ONE));
        screens.vacant_areas(0, None).unwrap();
        screens.vacant_areas(1, None).unwrap();

        screens.move_occupant(id, 0, 1).unwrap();
        assert!(!screens.screen(0).unwrap().is_vacant_cache_valid());
        assert!(!screens.screen(1).unwrap().is_vacant_cache_valid());
        assert_eq!(screens.occupant(id).unwrap().screen(), 1);
        assert_eq!(screens.occupants_on(1).count(), 1);

        assert_eq!(
            screens.move_occupant(id, 0, 1),
            Err(GridError::NotOnScreen { occupant: id, screen: 0 })
        );
    }

    #[test]
    fn remove_frees_cells() {
        let mut screens = collection();
        let id = add(&mut screens, 3, ItemRequest::new(OccupantKind::Widget, span(2, 2)));
        assert!(screens.screen(3).unwrap().grid().is_occupied(1, 1));

        assert!(screens.remove_occupant(id).is_some());
        assert!(screens.remove_occupant(id).is_none());
        assert_eq!(screens.screen(3).unwrap().grid().occupied_cells(), vec![false; 16]);
    }

    #[test]
    fn freeform_screens_accept_overlaps() {
        let mut config = Config::default();
        config.workspace.freeform_screens = vec![0];
        let mut screens = ScreenCollection::new(&config);
        add(&mut screens, 0, ItemRequest::new(OccupantKind::Widget, span(4, 4)));
        let second = screens.add_occupant(0, ItemRequest::new(OccupantKind::Widget, span(2, 2)));
        assert!(matches!(second, Ok(Some(_))));
    }

    #[test]
    fn measure_resets_orientation() {
        let mut config = Config::default();
        config.grid.short_axis_cells = 3;
        config.grid.long_axis_cells = 5;
        let mut screens = ScreenCollection::new(&config);
        add(&mut screens, 2, ItemRequest::new(OccupantKind::Shortcut, Span::ONE).at(2, 4));

        screens.measure(800, 400);
        let grid = screens.screen(2).unwrap().grid();
        assert_eq!((grid.count_x(), grid.count_y()), (5, 3));
        // The occupant sits past the new bottom edge and is clipped away.
        assert!(grid.occupancy().is_empty());
    }

    #[test]
    fn stats_count_per_screen() {
        let mut screens = collection();
        add(&mut screens, 0, ItemRequest::new(OccupantKind::Shortcut, Span::ONE));
        add(&mut screens, 0, ItemRequest::new(OccupantKind::Shortcut, Span::ONE));
        add(&mut screens, 4, ItemRequest::new(OccupantKind::Widget, span(2, 1)));
        screens.vacant_areas(4, None).unwrap();

        let stats = screens.stats();
        assert_eq!(stats.total_occupants, 3);
        assert_eq!(stats.occupant_counts, vec![2, 0, 0, 0, 1]);
        assert_eq!(stats.vacant_rebuilds, vec![0, 0, 0, 0, 1]);
        assert_eq!(stats.current, 2);
    }
}
