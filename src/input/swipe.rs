use crate::model::{Direction, Point};

/// Minimum travel in pixels before a drag counts as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 30.0;

/// Classifies a drag from `start` to `end` along its dominant axis.
///
/// Horizontal wins only when strictly longer than the vertical travel; the
/// winning axis must exceed `threshold` or the gesture is not a move.
pub fn classify_swipe(start: Point, end: Point, threshold: f32) -> Option<Direction> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dx.abs() > dy.abs() {
        if dx > threshold {
            Some(Direction::Right)
        } else if dx < -threshold {
            Some(Direction::Left)
        } else {
            None
        }
    } else if dy > threshold {
        Some(Direction::Down)
    } else if dy < -threshold {
        Some(Direction::Up)
    } else {
        None
    }
}
