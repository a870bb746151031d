use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use super::GridError;

new_key_type! {
    pub struct OccupantId;
}

/// What an occupant is. Only the placement policy attached to a kind matters
/// here; the content behind it belongs to the item provider.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OccupantKind {
    Shortcut,
    Widget,
    Folder,
    SearchWidget,
}

/// Width and height in cells. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    x: usize,
    y: usize,
}

impl Span {
    pub const ONE: Span = Span { x: 1, y: 1 };

    pub fn new(x: usize, y: usize) -> Result<Self, GridError> {
        if x == 0 || y == 0 {
            return Err(GridError::InvalidSpan { span_x: x, span_y: y });
        }
        Ok(Self { x, y })
    }

    pub fn x(self) -> usize { self.x }

    pub fn y(self) -> usize { self.y }
}

/// A rectangle of cells anchored at its top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CellRect {
    pub x: usize,
    pub y: usize,
    pub span: Span,
}

impl CellRect {
    pub fn new(x: usize, y: usize, span: Span) -> Self { Self { x, y, span } }

    /// Exclusive right edge.
    pub fn right(&self) -> usize { self.x + self.span.x }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> usize { self.y + self.span.y }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &CellRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.y..self.bottom()).flat_map(move |y| (self.x..self.right()).map(move |x| (x, y)))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self { Self { x, y } }

    pub fn distance_to(self, other: PixelPoint) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// What the item provider hands over when it creates an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemRequest {
    pub kind: OccupantKind,
    pub span: Span,
    pub preferred: Option<(usize, usize)>,
}

impl ItemRequest {
    pub fn new(kind: OccupantKind, span: Span) -> Self {
        Self { kind, span, preferred: None }
    }

    pub fn at(mut self, x: usize, y: usize) -> Self {
        self.preferred = Some((x, y));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occupant {
    kind: OccupantKind,
    screen: usize,
    rect: CellRect,
    free_position: Option<PixelPoint>,
    dragging: bool,
}

impl Occupant {
    pub fn new(kind: OccupantKind, screen: usize, rect: CellRect) -> Self {
        Self {
            kind,
            screen,
            rect,
            free_position: None,
            dragging: false,
        }
    }

    pub fn kind(&self) -> OccupantKind { self.kind }

    pub fn screen(&self) -> usize { self.screen }

    pub fn rect(&self) -> CellRect { self.rect }

    pub fn span(&self) -> Span { self.rect.span }

    /// Pixel position on a free-form screen, if it was last placed on one.
    pub fn free_position(&self) -> Option<PixelPoint> { self.free_position }

    pub fn is_dragging(&self) -> bool { self.dragging }

    pub(crate) fn set_dragging(&mut self, dragging: bool) { self.dragging = dragging; }

    pub(crate) fn set_screen(&mut self, screen: usize) { self.screen = screen; }

    pub(crate) fn place_at(&mut self, x: usize, y: usize) {
        self.rect.x = x;
        self.rect.y = y;
        self.free_position = None;
    }

    pub(crate) fn place_free(&mut self, x: usize, y: usize, position: PixelPoint) {
        self.rect.x = x;
        self.rect.y = y;
        self.free_position = Some(position);
    }
}

/// Final position of an occupant, reported to the item provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub occupant: OccupantId,
    pub screen: usize,
    pub cell_x: usize,
    pub cell_y: usize,
    pub free_position: Option<PixelPoint>,
}

impl Placement {
    pub fn of(id: OccupantId, occupant: &Occupant) -> Self {
        Self {
            occupant: id,
            screen: occupant.screen,
            cell_x: occupant.rect.x,
            cell_y: occupant.rect.y,
            free_position: occupant.free_position,
        }
    }
}
