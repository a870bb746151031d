use std::time::Instant;

use serde::Serialize;
use tracing::trace;

use super::Direction;
use crate::common::collections::HashSet;
use crate::model::{GridError, Occupancy, Span};

/// A vacant rectangle of cells, anchored at its top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct VacantArea {
    pub cell_x: usize,
    pub cell_y: usize,
    pub span_x: usize,
    pub span_y: usize,
}

impl VacantArea {
    pub fn anchor(&self) -> (usize, usize) { (self.cell_x, self.cell_y) }

    pub fn has_span(&self, span: Span) -> bool {
        self.span_x == span.x() && self.span_y == span.y()
    }
}

/// The span of the widest (or tallest) area seen, paired with its other side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SpanHint {
    pub span_x: usize,
    pub span_y: usize,
}

/// Every rectangle visited by a vacant-area search, in visiting order.
///
/// The same rectangle can show up several times when it is reachable along
/// different growth paths; entries are not deduplicated.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VacantAreaSet {
    areas: Vec<VacantArea>,
    max_span_x: Option<SpanHint>,
    max_span_y: Option<SpanHint>,
}

impl VacantAreaSet {
    pub fn new() -> Self { Self::default() }

    fn record(&mut self, area: VacantArea) {
        let hint = SpanHint {
            span_x: area.span_x,
            span_y: area.span_y,
        };
        if self.max_span_x.is_none_or(|max| area.span_x > max.span_x) {
            self.max_span_x = Some(hint);
        }
        if self.max_span_y.is_none_or(|max| area.span_y > max.span_y) {
            self.max_span_y = Some(hint);
        }
        self.areas.push(area);
    }

    pub fn iter(&self) -> impl Iterator<Item = &VacantArea> + '_ { self.areas.iter() }

    pub fn len(&self) -> usize { self.areas.len() }

    pub fn is_empty(&self) -> bool { self.areas.is_empty() }

    pub fn contains(&self, area: &VacantArea) -> bool { self.areas.contains(area) }

    /// Areas in visiting order with repeats dropped.
    pub fn distinct(&self) -> Vec<VacantArea> {
        let mut seen = HashSet::default();
        self.areas.iter().copied().filter(|area| seen.insert(*area)).collect()
    }

    /// Widest area seen, first one wins on ties.
    pub fn max_span_x(&self) -> Option<SpanHint> { self.max_span_x }

    /// Tallest area seen, first one wins on ties.
    pub fn max_span_y(&self) -> Option<SpanHint> { self.max_span_y }
}

/// Inclusive cell bounds of the rectangle being grown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Bounds {
    left: usize,
    top: usize,
    right: usize,
    bottom: usize,
}

impl Bounds {
    fn cell(x: usize, y: usize) -> Self {
        Self {
            left: x,
            top: y,
            right: x,
            bottom: y,
        }
    }

    fn area(&self) -> VacantArea {
        VacantArea {
            cell_x: self.left,
            cell_y: self.top,
            span_x: self.right - self.left + 1,
            span_y: self.bottom - self.top + 1,
        }
    }

    /// The rectangle grown by one strip, if that strip is inside the grid and free.
    fn grow(self, direction: Direction, occupancy: &Occupancy) -> Option<Bounds> {
        let mut next = self;
        match direction {
            Direction::Left => {
                if self.left == 0
                    || !occupancy.is_column_vacant(self.left - 1, self.top, self.bottom)
                {
                    return None;
                }
                next.left -= 1;
            }
            Direction::Right => {
                if self.right + 1 >= occupancy.count_x()
                    || !occupancy.is_column_vacant(self.right + 1, self.top, self.bottom)
                {
                    return None;
                }
                next.right += 1;
            }
            Direction::Up => {
                if self.top == 0 || !occupancy.is_row_vacant(self.top - 1, self.left, self.right)
                {
                    return None;
                }
                next.top -= 1;
            }
            Direction::Down => {
                if self.bottom + 1 >= occupancy.count_y()
                    || !occupancy.is_row_vacant(self.bottom + 1, self.left, self.right)
                {
                    return None;
                }
                next.bottom += 1;
            }
        }
        Some(next)
    }
}

pub struct VacantAreaFinder;

impl VacantAreaFinder {
    /// Records every rectangle reachable by growing the 1x1 rectangle at the
    /// anchor one free strip at a time, trying left, right, up and down in
    /// that order and backtracking after each branch.
    ///
    /// An occupied anchor yields an empty set.
    pub fn expand_from(
        occupancy: &Occupancy,
        anchor_x: usize,
        anchor_y: usize,
    ) -> Result<VacantAreaSet, GridError> {
        occupancy.check(anchor_x, anchor_y)?;
        let mut out = VacantAreaSet::new();
        if !occupancy.get(anchor_x, anchor_y) {
            Self::search(occupancy, Bounds::cell(anchor_x, anchor_y), &mut out);
        }
        Ok(out)
    }

    /// Searches from every free cell in row-major order. Each anchor is
    /// consumed (treated as occupied) once searched, so later anchors never
    /// grow back over it. Areas reachable only through a consumed anchor are
    /// therefore not reported.
    pub fn enumerate_all(mut occupancy: Occupancy) -> VacantAreaSet {
        trace_misc("enumerate_all", || {
            let mut out = VacantAreaSet::new();
            for y in 0..occupancy.count_y() {
                for x in 0..occupancy.count_x() {
                    if occupancy.get(x, y) {
                        continue;
                    }
                    Self::search(&occupancy, Bounds::cell(x, y), &mut out);
                    occupancy.set(x, y, true);
                }
            }
            trace!(areas = out.len(), "vacant areas enumerated");
            out
        })
    }

    /// Like [`Self::enumerate_all`], for an occupancy supplied as row-major flags.
    pub fn enumerate_from_flat(
        flat: &[bool],
        count_x: usize,
        count_y: usize,
    ) -> Result<VacantAreaSet, GridError> {
        Ok(Self::enumerate_all(Occupancy::from_flat(flat, count_x, count_y)?))
    }

    fn search(occupancy: &Occupancy, start: Bounds, out: &mut VacantAreaSet) {
        // Children go on the stack in reverse so they pop in expansion order,
        // which visits rectangles in the same order as the recursive search.
        let mut stack = vec![start];
        while let Some(bounds) = stack.pop() {
            out.record(bounds.area());
            for direction in Direction::EXPANSION_ORDER.iter().rev() {
                if let Some(grown) = bounds.grow(*direction, occupancy) {
                    stack.push(grown);
                }
            }
        }
    }
}

/// Lazily rebuilt vacant areas of one screen.
///
/// The data is only reachable through [`VacantCache::get_or_rebuild`], so a
/// stale set can never be read.
#[derive(Debug, Default)]
pub struct VacantCache {
    valid: bool,
    data: VacantAreaSet,
    rebuilds: u64,
}

impl VacantCache {
    pub fn new() -> Self { Self::default() }

    pub fn is_valid(&self) -> bool { self.valid }

    pub fn invalidate(&mut self) {
        if self.valid {
            trace!(areas = self.data.len(), "vacant cache invalidated");
        }
        self.valid = false;
        self.data = VacantAreaSet::default();
    }

    pub fn get_or_rebuild(&mut self, rebuild: impl FnOnce() -> VacantAreaSet) -> &VacantAreaSet {
        if !self.valid {
            self.data = rebuild();
            self.valid = true;
            self.rebuilds += 1;
        }
        &self.data
    }

    /// How many times the set has been recomputed.
    pub fn rebuild_count(&self) -> u64 { self.rebuilds }
}

fn trace_misc<T>(desc: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let end = Instant::now();
    trace!(time = ?(end - start), "{desc}");
    out
}
