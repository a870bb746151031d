use serde::Serialize;
use tracing::trace;

use super::{CellRect, GridError, Occupant, OccupantId, OccupantKind, PixelPoint, PixelRect, Span};
use crate::common::config::GridSettings;
use crate::layout_engine::ScreenOrientation;
use crate::layout_engine::utils::compute_cell_gap;

/// Occupancy matrix of one screen, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Occupancy {
    count_x: usize,
    count_y: usize,
    cells: Vec<bool>,
}

impl Occupancy {
    pub fn new(count_x: usize, count_y: usize) -> Self {
        Self {
            count_x,
            count_y,
            cells: vec![false; count_x * count_y],
        }
    }

    /// Builds an occupancy from a row-major flag list (`y * count_x + x`).
    pub fn from_flat(flat: &[bool], count_x: usize, count_y: usize) -> Result<Self, GridError> {
        let expected = count_x * count_y;
        if flat.len() != expected {
            return Err(GridError::OccupancyLength { expected, actual: flat.len() });
        }
        Ok(Self {
            count_x,
            count_y,
            cells: flat.to_vec(),
        })
    }

    pub fn count_x(&self) -> usize { self.count_x }

    pub fn count_y(&self) -> usize { self.count_y }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool { x < self.count_x && y < self.count_y }

    pub fn check(&self, x: usize, y: usize) -> Result<(), GridError> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                x,
                y,
                count_x: self.count_x,
                count_y: self.count_y,
            })
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            self.in_bounds(x, y),
            "cell ({x}, {y}) is outside the {}x{} grid",
            self.count_x,
            self.count_y
        );
        y * self.count_x + x
    }

    /// Panics when the cell is out of bounds.
    pub fn get(&self, x: usize, y: usize) -> bool { self.cells[self.index(x, y)] }

    /// Panics when the cell is out of bounds.
    pub fn set(&mut self, x: usize, y: usize, occupied: bool) {
        let index = self.index(x, y);
        self.cells[index] = occupied;
    }

    pub fn clear(&mut self) { self.cells.fill(false); }

    /// Marks every cell of `rect` that lies inside the grid.
    pub fn mark(&mut self, rect: &CellRect) {
        let right = rect.right().min(self.count_x);
        let bottom = rect.bottom().min(self.count_y);
        for y in rect.y..bottom {
            for x in rect.x..right {
                self.set(x, y, true);
            }
        }
    }

    /// Whether column `x` is free between `top` and `bottom`, inclusive.
    pub fn is_column_vacant(&self, x: usize, top: usize, bottom: usize) -> bool {
        (top..=bottom).all(|y| !self.get(x, y))
    }

    /// Whether row `y` is free between `left` and `right`, inclusive.
    pub fn is_row_vacant(&self, y: usize, left: usize, right: usize) -> bool {
        (left..=right).all(|x| !self.get(x, y))
    }

    /// Whether `rect` lies inside the grid and covers only free cells.
    pub fn is_block_vacant(&self, rect: &CellRect) -> bool {
        rect.right() <= self.count_x
            && rect.bottom() <= self.count_y
            && rect.cells().all(|(x, y)| !self.get(x, y))
    }

    pub fn is_empty(&self) -> bool { self.cells.iter().all(|c| !c) }

    pub fn as_flat(&self) -> &[bool] { &self.cells }
}

/// Cell grid of one screen: axis mapping, pixel geometry and occupancy.
#[derive(Clone, Debug, Serialize)]
pub struct GridModel {
    #[serde(skip)]
    settings: GridSettings,
    orientation: ScreenOrientation,
    width_gap: i32,
    height_gap: i32,
    occupancy: Occupancy,
}

impl GridModel {
    pub fn new(settings: &GridSettings) -> Self {
        let orientation = settings.orientation;
        let (count_x, count_y) =
            orientation.map_axes(settings.short_axis_cells, settings.long_axis_cells);
        Self {
            settings: settings.clone(),
            orientation,
            width_gap: 0,
            height_gap: 0,
            occupancy: Occupancy::new(count_x, count_y),
        }
    }

    pub fn count_x(&self) -> usize { self.occupancy.count_x() }

    pub fn count_y(&self) -> usize { self.occupancy.count_y() }

    pub fn orientation(&self) -> ScreenOrientation { self.orientation }

    pub fn gaps(&self) -> (i32, i32) { (self.width_gap, self.height_gap) }

    pub fn occupancy(&self) -> &Occupancy { &self.occupancy }

    /// Switches orientation. The occupancy matrix is resized and cleared, so
    /// callers must rebuild it. Returns whether anything changed.
    pub fn set_orientation(&mut self, orientation: ScreenOrientation) -> bool {
        if orientation == self.orientation {
            return false;
        }
        self.orientation = orientation;
        let (count_x, count_y) =
            orientation.map_axes(self.settings.short_axis_cells, self.settings.long_axis_cells);
        self.occupancy = Occupancy::new(count_x, count_y);
        trace!(?orientation, count_x, count_y, "grid orientation changed");
        true
    }

    /// Adapts the grid to the screen size: picks the orientation and spreads
    /// the leftover space into the inter-cell gaps. Returns whether the
    /// orientation changed.
    pub fn measure(&mut self, width: i32, height: i32) -> bool {
        let changed = self.set_orientation(ScreenOrientation::from_size(width, height));
        let s = &self.settings;
        let (x_cells, y_cells) = self.orientation.map_axes(s.short_axis_cells, s.long_axis_cells);
        let (x_start, y_start) =
            self.orientation.map_axes(s.short_axis_start_padding, s.long_axis_start_padding);
        let (x_end, y_end) =
            self.orientation.map_axes(s.short_axis_end_padding, s.long_axis_end_padding);

        self.width_gap = compute_cell_gap(width, x_start, x_end, s.cell_width, x_cells);
        self.height_gap = compute_cell_gap(height, y_start, y_end, s.cell_height, y_cells);
        changed
    }

    /// Recomputes occupancy from scratch. `ignore` and exempt kinds do not
    /// reserve cells; spans sticking out of the grid are clipped.
    pub fn rebuild_occupancy<'a>(
        &mut self,
        occupants: impl IntoIterator<Item = (OccupantId, &'a Occupant)>,
        ignore: Option<OccupantId>,
        exempt: &[OccupantKind],
    ) {
        self.occupancy.clear();
        for (id, occupant) in occupants {
            if Some(id) == ignore || exempt.contains(&occupant.kind()) {
                continue;
            }
            self.occupancy.mark(&occupant.rect());
        }
    }

    /// Panics when `(x, y)` is outside the grid.
    pub fn is_occupied(&self, x: usize, y: usize) -> bool { self.occupancy.get(x, y) }

    pub fn check_cell(&self, x: usize, y: usize) -> Result<(), GridError> {
        self.occupancy.check(x, y)
    }

    /// Checks that `rect` lies entirely inside the grid.
    pub fn check_rect(&self, rect: &CellRect) -> Result<(), GridError> {
        self.check_cell(rect.x, rect.y)?;
        self.check_cell(rect.right() - 1, rect.bottom() - 1)
    }

    fn leading_padding(&self) -> (i32, i32) {
        let s = &self.settings;
        self.orientation.map_axes(s.short_axis_start_padding, s.long_axis_start_padding)
    }

    fn pitch(&self) -> (i32, i32) {
        (
            self.settings.cell_width.saturating_add(self.width_gap).max(1),
            self.settings.cell_height.saturating_add(self.height_gap).max(1),
        )
    }

    /// Maps a pixel offset to the enclosing cell, clamped into the grid.
    pub fn point_to_cell(&self, px: i32, py: i32) -> (usize, usize) {
        let (start_x, start_y) = self.leading_padding();
        let (pitch_x, pitch_y) = self.pitch();
        let clamp = |value: i32, count: usize| -> usize {
            usize::try_from(value).unwrap_or(0).min(count.saturating_sub(1))
        };
        (
            clamp(px.saturating_sub(start_x) / pitch_x, self.count_x()),
            clamp(py.saturating_sub(start_y) / pitch_y, self.count_y()),
        )
    }

    /// Top-left pixel of a cell.
    pub fn cell_to_point(&self, x: usize, y: usize) -> PixelPoint {
        let (start_x, start_y) = self.leading_padding();
        let (pitch_x, pitch_y) = self.pitch();
        PixelPoint::new(
            start_x.saturating_add(to_i32(x).saturating_mul(pitch_x)),
            start_y.saturating_add(to_i32(y).saturating_mul(pitch_y)),
        )
    }

    /// Pixel frame covered by a cell rectangle, gaps between its cells included.
    pub fn cell_frame(&self, rect: &CellRect) -> PixelRect {
        let origin = self.cell_to_point(rect.x, rect.y);
        let span_x = to_i32(rect.span.x());
        let span_y = to_i32(rect.span.y());
        PixelRect {
            x: origin.x,
            y: origin.y,
            width: span_x * self.settings.cell_width + (span_x - 1) * self.width_gap,
            height: span_y * self.settings.cell_height + (span_y - 1) * self.height_gap,
        }
    }

    /// Smallest span that always fits a `width` x `height` pixel box,
    /// whichever way the cells are oriented.
    pub fn rect_to_span(&self, width: i32, height: i32) -> Span {
        let smaller = self.settings.cell_width.min(self.settings.cell_height).max(1);
        let span = |size: i32| {
            usize::try_from(size.max(0).saturating_add(smaller) / smaller).unwrap_or(1)
        };
        Span::new(span(width), span(height)).unwrap_or(Span::ONE)
    }

    /// Row-major copy of the occupancy flags.
    pub fn occupied_cells(&self) -> Vec<bool> { self.occupancy.as_flat().to_vec() }
}

fn to_i32(value: usize) -> i32 { i32::try_from(value).unwrap_or(i32::MAX) }

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use slotmap::SlotMap;

    use super::*;

    fn span(x: usize, y: usize) -> Span { Span::new(x, y).unwrap() }

    fn settings(short: usize, long: usize) -> GridSettings {
        GridSettings {
            short_axis_cells: short,
            long_axis_cells: long,
            ..GridSettings::default()
        }
    }

    fn occupants(
        items: &[(OccupantKind, usize, usize, Span)],
    ) -> SlotMap<OccupantId, Occupant> {
        let mut map = SlotMap::with_key();
        for &(kind, x, y, span) in items {
            map.insert(Occupant::new(kind, 0, CellRect::new(x, y, span)));
        }
        map
    }

    #[test]
    fn counts_follow_orientation() {
        let mut grid = GridModel::new(&settings(4, 5));
        assert_eq!((grid.count_x(), grid.count_y()), (4, 5));

        assert!(grid.set_orientation(ScreenOrientation::Landscape));
        assert_eq!((grid.count_x(), grid.count_y()), (5, 4));
        assert!(!grid.set_orientation(ScreenOrientation::Landscape));
    }

    #[test]
    fn rebuild_marks_spans_and_skips_exempt() {
        let mut grid = GridModel::new(&settings(4, 4));
        let map = occupants(&[
            (OccupantKind::Widget, 0, 0, span(2, 2)),
            (OccupantKind::Folder, 3, 3, span(1, 1)),
            (OccupantKind::Shortcut, 3, 0, span(1, 1)),
        ]);
        grid.rebuild_occupancy(map.iter(), None, &[OccupantKind::Folder]);

        assert!(grid.is_occupied(0, 0));
        assert!(grid.is_occupied(1, 1));
        assert!(!grid.is_occupied(2, 0));
        assert!(grid.is_occupied(3, 0));
        assert!(!grid.is_occupied(3, 3));
    }

    #[test]
    fn rebuild_skips_ignored_occupant() {
        let mut grid = GridModel::new(&settings(4, 4));
        let map = occupants(&[(OccupantKind::Shortcut, 1, 1, span(1, 1))]);
        let id = map.keys().next().unwrap();

        grid.rebuild_occupancy(map.iter(), Some(id), &[]);
        assert!(grid.occupancy().is_empty());
    }

    #[test]
    fn rebuild_clips_to_grid() {
        let mut grid = GridModel::new(&settings(4, 4));
        let map = occupants(&[(OccupantKind::Widget, 3, 3, span(3, 3))]);
        grid.rebuild_occupancy(map.iter(), None, &[]);

        assert!(grid.is_occupied(3, 3));
        assert_eq!(grid.occupied_cells().iter().filter(|c| **c).count(), 1);
    }

    #[test]
    fn add_then_remove_leaves_grid_empty() {
        let mut grid = GridModel::new(&settings(4, 4));
        let mut map = occupants(&[]);
        let id = map.insert(Occupant::new(
            OccupantKind::Widget,
            0,
            CellRect::new(1, 1, span(2, 2)),
        ));

        grid.rebuild_occupancy(map.iter(), None, &[]);
        assert!(!grid.occupancy().is_empty());

        map.remove(id);
        grid.rebuild_occupancy(map.iter(), None, &[]);
        assert_eq!(grid.occupied_cells(), vec![false; 16]);
    }

    #[test]
    #[should_panic(expected = "outside the 4x4 grid")]
    fn out_of_range_query_panics() {
        let grid = GridModel::new(&settings(4, 4));
        grid.is_occupied(4, 0);
    }

    #[test]
    fn check_cell_reports_bounds() {
        let grid = GridModel::new(&settings(4, 4));
        assert_eq!(grid.check_cell(3, 3), Ok(()));
        assert_eq!(
            grid.check_cell(0, 4),
            Err(GridError::OutOfBounds { x: 0, y: 4, count_x: 4, count_y: 4 })
        );
        assert!(grid.check_rect(&CellRect::new(3, 0, span(2, 1))).is_err());
    }

    #[test]
    fn measure_computes_gaps_and_orientation() {
        let mut grid = GridModel::new(&settings(4, 4));
        // Portrait: 400 wide, 500 tall. x: 400 - 20 - 320 = 60 / 3 = 20.
        // y: 500 - 20 - 400 = 80 / 3 = 26.
        assert!(!grid.measure(400, 500));
        assert_eq!(grid.gaps(), (20, 26));

        assert!(grid.measure(500, 400));
        assert_eq!(grid.orientation(), ScreenOrientation::Landscape);
    }

    #[test]
    fn point_to_cell_clamps() {
        let mut grid = GridModel::new(&settings(4, 4));
        grid.measure(400, 500);

        assert_eq!(grid.point_to_cell(0, 0), (0, 0));
        assert_eq!(grid.point_to_cell(-50, -50), (0, 0));
        assert_eq!(grid.point_to_cell(10 + 100 + 5, 10 + 126 * 2 + 1), (1, 2));
        assert_eq!(grid.point_to_cell(10_000, 10_000), (3, 3));
        assert_eq!(grid.point_to_cell(i32::MIN, i32::MAX), (0, 3));
    }

    #[test]
    fn cell_to_point_inverts_point_to_cell() {
        let mut grid = GridModel::new(&settings(4, 4));
        grid.measure(400, 500);

        for y in 0..grid.count_y() {
            for x in 0..grid.count_x() {
                let origin = grid.cell_to_point(x, y);
                assert_eq!(grid.point_to_cell(origin.x, origin.y), (x, y));
            }
        }
    }

    #[test]
    fn cell_frame_includes_inner_gaps() {
        let mut grid = GridModel::new(&settings(4, 4));
        grid.measure(400, 500);

        let frame = grid.cell_frame(&CellRect::new(1, 0, span(2, 1)));
        assert_eq!(frame, PixelRect { x: 110, y: 10, width: 180, height: 100 });
    }

    #[test]
    fn rect_to_span_rounds_up() {
        let grid = GridModel::new(&settings(4, 4));
        assert_eq!(grid.rect_to_span(0, 0), span(1, 1));
        assert_eq!(grid.rect_to_span(79, 80), span(1, 2));
        assert_eq!(grid.rect_to_span(200, 10), span(3, 1));
        assert_eq!(grid.rect_to_span(i32::MAX, -5).y(), 1);
    }

    #[test]
    fn flat_occupancy_round_trips() {
        let mut grid = GridModel::new(&settings(2, 3));
        let map = occupants(&[(OccupantKind::Shortcut, 1, 2, span(1, 1))]);
        grid.rebuild_occupancy(map.iter(), None, &[]);

        let flat = grid.occupied_cells();
        assert_eq!(flat, vec![false, false, false, false, false, true]);
        assert_eq!(&Occupancy::from_flat(&flat, 2, 3).unwrap(), grid.occupancy());
        assert_eq!(
            Occupancy::from_flat(&flat, 3, 3),
            Err(GridError::OccupancyLength { expected: 9, actual: 6 })
        );
    }
}
