use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Order in which a vacant rectangle tries to grow.
    pub const EXPANSION_ORDER: [Direction; 4] =
        [Direction::Left, Direction::Right, Direction::Up, Direction::Down];
}

/// Physical orientation of a screen. Decides which configured axis maps to x.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenOrientation {
    #[default]
    Portrait,
    Landscape,
}

impl ScreenOrientation {
    pub fn from_size(width: i32, height: i32) -> Self {
        if height > width {
            ScreenOrientation::Portrait
        } else {
            ScreenOrientation::Landscape
        }
    }

    pub fn is_portrait(self) -> bool { self == ScreenOrientation::Portrait }

    /// Maps `(short, long)` axis values onto `(x, y)`.
    pub fn map_axes<T>(self, short: T, long: T) -> (T, T) {
        match self {
            ScreenOrientation::Portrait => (short, long),
            ScreenOrientation::Landscape => (long, short),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_follows_aspect() {
        assert_eq!(ScreenOrientation::from_size(320, 480), ScreenOrientation::Portrait);
        assert_eq!(ScreenOrientation::from_size(480, 320), ScreenOrientation::Landscape);
        assert_eq!(ScreenOrientation::from_size(400, 400), ScreenOrientation::Landscape);
    }

    #[test]
    fn axes_swap_in_landscape() {
        assert_eq!(ScreenOrientation::Portrait.map_axes(4, 5), (4, 5));
        assert_eq!(ScreenOrientation::Landscape.map_axes(4, 5), (5, 4));
    }
}
