//! Map cells and their decorations.
//!
//! The map only tracks what deferred effects touch: passability,
//! sanctuary (which suppresses explosions) and blood.

use serde::{Deserialize, Serialize};

use super::actor::SpeciesId;
use super::coord::Coord;

/// A single map cell.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub passable: bool,
    pub sanctuary: bool,
    /// Accumulated blood on this cell.
    pub blood: u32,
    /// Species whose blood was spilled here most recently.
    pub blood_species: Option<SpeciesId>,
}

impl Cell {
    /// An open floor cell.
    #[must_use]
    pub fn floor() -> Self {
        Self {
            passable: true,
            ..Self::default()
        }
    }
}

/// Rectangular grid of cells, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Map {
    /// Create an all-floor map.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![Cell::floor(); (width * height) as usize],
        }
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check if a coordinate lies on the map.
    #[must_use]
    pub fn in_bounds(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Coord) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// Get a cell.
    #[must_use]
    pub fn cell(&self, pos: Coord) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    /// Get a mutable cell.
    pub fn cell_mut(&mut self, pos: Coord) -> Option<&mut Cell> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    /// Check if actors can stand on a cell.
    #[must_use]
    pub fn is_passable(&self, pos: Coord) -> bool {
        self.cell(pos).is_some_and(|c| c.passable)
    }

    /// Check if a cell is protected by sanctuary.
    #[must_use]
    pub fn is_sanctuary(&self, pos: Coord) -> bool {
        self.cell(pos).is_some_and(|c| c.sanctuary)
    }

    /// Turn a cell into a wall.
    pub fn set_wall(&mut self, pos: Coord) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.passable = false;
        }
    }

    /// Mark a cell as sanctuary.
    pub fn set_sanctuary(&mut self, pos: Coord, sanctuary: bool) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.sanctuary = sanctuary;
        }
    }

    /// Blood amount on a cell (0 off-map).
    #[must_use]
    pub fn blood_at(&self, pos: Coord) -> u32 {
        self.cell(pos).map_or(0, |c| c.blood)
    }

    /// Iterate over every on-map coordinate.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }
}
