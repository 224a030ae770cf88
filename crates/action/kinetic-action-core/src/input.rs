//! Pointer/touch input tracking.

use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::keys;

/// A 2D input coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate on a named axis (`"x"` or `"y"`).
    pub fn axis(&self, name: &str) -> Option<f64> {
        match name {
            keys::X => Some(self.x),
            keys::Y => Some(self.y),
            _ => None,
        }
    }
}

/// Shared handle over the latest input coordinate.
///
/// The host keeps a clone and calls [`update`](Self::update) as the pointer
/// moves; the tracking action reads the same cell every frame.
#[derive(Clone, Debug, Default)]
pub struct InputTracker {
    current: Rc<Cell<Point>>,
}

impl InputTracker {
    pub fn new(point: Point) -> Self {
        Self {
            current: Rc::new(Cell::new(point)),
        }
    }

    pub fn update(&self, point: Point) {
        self.current.set(point);
    }

    #[inline]
    pub fn current(&self) -> Point {
        self.current.get()
    }

    /// Coordinate snapshot, detached from later updates.
    pub fn get(&self) -> Point {
        self.current.get()
    }
}

impl From<Point> for InputTracker {
    fn from(point: Point) -> Self {
        Self::new(point)
    }
}

impl From<(f64, f64)> for InputTracker {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_cell() {
        let host = InputTracker::from((1.0, 2.0));
        let tracked = host.clone();
        let snapshot = tracked.get();
        host.update(Point::new(5.0, -1.0));

        assert_eq!(tracked.current(), Point::new(5.0, -1.0));
        assert_eq!(snapshot, Point::new(1.0, 2.0));
        assert_eq!(tracked.current().axis("y"), Some(-1.0));
        assert_eq!(tracked.current().axis("z"), None);
    }
}
