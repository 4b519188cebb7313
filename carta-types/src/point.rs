use serde::{Deserialize, Serialize};

/// Point in a 2d cartesian space, used for projected (screen space) positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2d<Num = f64> {
    x: Num,
    y: Num,
}

impl<Num: num_traits::Num + Copy> Point2d<Num> {
    /// Creates a new point.
    pub const fn new(x: Num, y: Num) -> Self {
        Self { x, y }
    }

    /// X coordinate.
    pub fn x(&self) -> Num {
        self.x
    }

    /// Y coordinate.
    pub fn y(&self) -> Num {
        self.y
    }
}

