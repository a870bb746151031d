use tracing::trace;

use super::VacantAreaSet;
use crate::model::{CellRect, GridModel, PixelPoint, Span};

pub struct PlacementSelector;

impl PlacementSelector {
    /// Picks the vacant area of exactly `span` whose anchor lies closest to
    /// `target` (in pixels). The first of several equally close areas wins.
    ///
    /// Areas of a different span are never substituted, so `None` means the
    /// span does not fit anywhere in the set.
    pub fn nearest_exact_fit(
        target: PixelPoint,
        span: Span,
        vacant: &VacantAreaSet,
        grid: &GridModel,
    ) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), f64)> = None;
        for area in vacant.iter().filter(|area| area.has_span(span)) {
            let distance = grid.cell_to_point(area.cell_x, area.cell_y).distance_to(target);
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((area.anchor(), distance));
            }
        }
        trace!(?target, ?span, ?best, "nearest exact fit");
        best.map(|(anchor, _)| anchor)
    }

    /// First anchor, scanning row-major, whose `span` block lies inside the
    /// grid on free cells only.
    pub fn first_fit(span: Span, grid: &GridModel) -> Option<(usize, usize)> {
        let occupancy = grid.occupancy();
        (0..grid.count_y())
            .flat_map(|y| (0..grid.count_x()).map(move |x| (x, y)))
            .find(|&(x, y)| occupancy.is_block_vacant(&CellRect::new(x, y, span)))
    }
}
