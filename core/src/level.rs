//! Level geometry and the passable/blocked map.
//!
//! A level is a diamond-shaped patch of the hex lattice. Row `y` spans
//! columns `min_x(y)..max_x(y)`; the interior is the same construction
//! with the outer ring removed. Cleanup passes only ever touch interior
//! cells, so the border always stays wall.

use crate::error::{SimError, SimResult};
use crate::hex::Pos;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Smallest width or height that leaves room for a non-trivial cave.
pub const MIN_DIMENSION: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub width: i32,
    pub height: i32,
}

impl Shape {
    pub fn new(width: i32, height: i32) -> SimResult<Self> {
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(SimError::GenerationDegenerate {
                width,
                height,
                reason: format!("both dimensions must be at least {MIN_DIMENSION}"),
            });
        }
        let shape = Self { width, height };
        if let Some(y) = (0..height).find(|&y| shape.max_x(y) - shape.min_x(y) < 3) {
            return Err(SimError::GenerationDegenerate {
                width,
                height,
                reason: format!("row {y} is too narrow to hold an interior cell"),
            });
        }
        Ok(shape)
    }

    /// First column of row `y`, inclusive.
    pub fn min_x(&self, y: i32) -> i32 {
        (self.height - y).div_euclid(2)
    }

    /// Last column of row `y`, exclusive.
    pub fn max_x(&self, y: i32) -> i32 {
        self.width - y.div_euclid(2)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.y >= 0 && pos.y < self.height && pos.x >= self.min_x(pos.y) && pos.x < self.max_x(pos.y)
    }

    pub fn contains_inner(&self, pos: Pos) -> bool {
        pos.y > 0
            && pos.y < self.height - 1
            && pos.x > self.min_x(pos.y)
            && pos.x < self.max_x(pos.y) - 1
    }

    /// Every cell, row-major.
    pub fn positions(&self) -> Vec<Pos> {
        (0..self.height)
            .flat_map(|y| (self.min_x(y)..self.max_x(y)).map(move |x| Pos::new(x, y)))
            .collect()
    }

    /// Interior cells, row-major.
    pub fn inner_positions(&self) -> Vec<Pos> {
        (1..self.height - 1)
            .flat_map(|y| (self.min_x(y) + 1..self.max_x(y) - 1).map(move |x| Pos::new(x, y)))
            .collect()
    }

    /// Centre cell; always interior for a valid shape.
    pub fn center(&self) -> Pos {
        let y = self.height / 2;
        Pos::new((self.min_x(y) + self.max_x(y)) / 2, y)
    }
}

/// A generated dungeon floor. Immutable once the generator hands it over.
#[derive(Debug, Clone)]
pub struct Level {
    shape: Shape,
    positions: Vec<Pos>,
    inner_positions: Vec<Pos>,
    start: Pos,
    passable: HashMap<Pos, bool>,
}

impl Level {
    /// All-wall level with only `start` open. This is the generator's
    /// starting state.
    pub(crate) fn sealed(shape: Shape, start: Pos) -> SimResult<Self> {
        if !shape.contains_inner(start) {
            return Err(SimError::StartOutsideInterior { x: start.x, y: start.y });
        }
        let positions = shape.positions();
        let passable = positions.iter().map(|&p| (p, p == start)).collect();
        Ok(Self {
            shape,
            inner_positions: shape.inner_positions(),
            positions,
            start,
            passable,
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn positions(&self) -> &[Pos] {
        &self.positions
    }

    pub fn inner_positions(&self) -> &[Pos] {
        &self.inner_positions
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    /// Off-map lookups are blocked, never an error.
    pub fn is_passable(&self, pos: Pos) -> bool {
        self.passable.get(&pos).copied().unwrap_or(false)
    }

    /// In-map and blocked.
    pub fn is_wall(&self, pos: Pos) -> bool {
        matches!(self.passable.get(&pos), Some(false))
    }

    pub fn floor_count(&self) -> usize {
        self.passable.values().filter(|&&open| open).count()
    }

    /// Passable cells in row-major order.
    pub fn floor_positions(&self) -> Vec<Pos> {
        self.positions.iter().copied().filter(|&p| self.is_passable(p)).collect()
    }

    pub(crate) fn set_passable(&mut self, pos: Pos, open: bool) {
        if let Some(flag) = self.passable.get_mut(&pos) {
            *flag = open;
        }
    }

    pub(crate) fn set_start(&mut self, pos: Pos) {
        self.start = pos;
    }

    /// Text form used by the runner and handy when debugging a seed:
    /// `#` wall, `.` floor, `@` start, rows indented to show the skew.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for y in 0..self.shape.height {
            out.push_str(&" ".repeat(y as usize));
            for x in 0..self.shape.max_x(y) {
                let pos = Pos::new(x, y);
                let glyph = if !self.shape.contains(pos) {
                    ' '
                } else if pos == self.start {
                    '@'
                } else if self.is_passable(pos) {
                    '.'
                } else {
                    '#'
                };
                out.push(glyph);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}
