//! Map coordinates.
//!
//! Distances use the Chebyshev metric: diagonal steps cost the same as
//! orthogonal ones, so "radius r" means the (2r+1)x(2r+1) square.

use serde::{Deserialize, Serialize};

/// A cell position on the map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Create a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance to another coordinate.
    #[must_use]
    pub fn distance(self, other: Coord) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Check if `other` is one of the eight neighbours.
    #[must_use]
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.distance(other) == 1
    }

    /// Offset by a delta.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The eight neighbouring cells, row by row.
    pub fn neighbours(self) -> impl Iterator<Item = Coord> {
        self.ring(1)
    }

    /// Cells at exactly distance `radius`, row by row.
    ///
    /// A radius of zero yields the cell itself.
    ///
    /// ```
    /// use deferred_effects::core::Coord;
    ///
    /// assert_eq!(Coord::new(0, 0).ring(0).count(), 1);
    /// assert_eq!(Coord::new(0, 0).ring(1).count(), 8);
    /// assert_eq!(Coord::new(0, 0).ring(2).count(), 16);
    /// ```
    pub fn ring(self, radius: i32) -> impl Iterator<Item = Coord> {
        let radius = radius.max(0);
        (-radius..=radius).flat_map(move |dy| {
            (-radius..=radius).filter_map(move |dx| {
                if dx.abs().max(dy.abs()) == radius {
                    Some(self.offset(dx, dy))
                } else {
                    None
                }
            })
        })
    }

    /// All cells within distance `radius`, row by row.
    pub fn within(self, radius: i32) -> impl Iterator<Item = Coord> {
        let radius = radius.max(0);
        (-radius..=radius)
            .flat_map(move |dy| (-radius..=radius).map(move |dx| self.offset(dx, dy)))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
