use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    /// Parses the lowercase names `up`, `down`, `left` and `right`.
    pub fn from_name(name: &str) -> Option<Direction> {
        match name {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Rows move horizontally, columns vertically.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// True when tiles travel toward index 0 of the line.
    pub fn toward_origin(&self) -> bool {
        matches!(self, Direction::Left | Direction::Up)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        for direction in Direction::all() {
            assert_eq!(Direction::from_name(direction.name()), Some(direction));
        }
        assert_eq!(Direction::from_name("diagonal"), None);
        assert_eq!(Direction::from_name("Left"), None);
    }

    #[test]
    fn test_axis_and_polarity() {
        assert!(Direction::Left.is_horizontal() && Direction::Left.toward_origin());
        assert!(Direction::Right.is_horizontal() && !Direction::Right.toward_origin());
        assert!(!Direction::Up.is_horizontal() && Direction::Up.toward_origin());
        assert!(!Direction::Down.is_horizontal() && !Direction::Down.toward_origin());
    }
}
