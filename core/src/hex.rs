//! Axial hex lattice arithmetic.
//!
//! Directions are named after clock positions. Every routine that walks
//! the six neighbours does so in `DIRECTIONS` order, clockwise from one
//! o'clock. Cave carving and visibility both depend on that order, so it
//! must never change.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::{Add, Mul};

/// One cell of the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The six adjacent cells, clockwise from one o'clock.
    pub fn neighbors(self) -> Neighbors {
        Neighbors { center: self, index: 0 }
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, other: Pos) -> Pos {
        Pos::new(self.x + other.x, self.y + other.y)
    }
}

impl Mul<i32> for Pos {
    type Output = Pos;

    fn mul(self, k: i32) -> Pos {
        Pos::new(self.x * k, self.y * k)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

pub const DIR1: Pos = Pos::new(1, -1);
pub const DIR3: Pos = Pos::new(1, 0);
pub const DIR5: Pos = Pos::new(0, 1);
pub const DIR7: Pos = Pos::new(-1, 1);
pub const DIR9: Pos = Pos::new(-1, 0);
pub const DIR11: Pos = Pos::new(0, -1);

pub const DIRECTIONS: [Pos; 6] = [DIR1, DIR3, DIR5, DIR7, DIR9, DIR11];

/// A unit step named by its clock position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    One,
    Three,
    Five,
    Seven,
    Nine,
    Eleven,
}

impl Direction {
    /// Parse a clock label ("1", "3", ... "11").
    pub fn from_clock(label: &str) -> Option<Self> {
        match label {
            "1" => Some(Self::One),
            "3" => Some(Self::Three),
            "5" => Some(Self::Five),
            "7" => Some(Self::Seven),
            "9" => Some(Self::Nine),
            "11" => Some(Self::Eleven),
            _ => None,
        }
    }

    pub fn offset(self) -> Pos {
        match self {
            Self::One => DIR1,
            Self::Three => DIR3,
            Self::Five => DIR5,
            Self::Seven => DIR7,
            Self::Nine => DIR9,
            Self::Eleven => DIR11,
        }
    }
}

/// Lazy iterator over the neighbours of a cell. Cheap to copy, so a
/// caller can restart the walk at any point.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors {
    center: Pos,
    index: usize,
}

impl Iterator for Neighbors {
    type Item = Pos;

    fn next(&mut self) -> Option<Pos> {
        let dir = DIRECTIONS.get(self.index)?;
        self.index += 1;
        Some(self.center + *dir)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = DIRECTIONS.len() - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Neighbors {}

/// Component-wise sum.
pub fn add(a: Pos, b: Pos) -> Pos {
    a + b
}

/// Number of contiguous runs of in-group neighbours around `pos`.
///
/// Counts rising edges around the ring. With no edges the ring is
/// uniform, and the answer is 1 if the last neighbour examined is in
/// the group, otherwise 0.
pub fn count_groups(pos: Pos, in_group: impl Fn(Pos) -> bool) -> usize {
    let ring = DIRECTIONS.map(|dir| in_group(pos + dir));
    let groups = (0..ring.len())
        .filter(|&i| ring[i] && !ring[(i + ring.len() - 1) % ring.len()])
        .count();
    if groups == 0 {
        usize::from(ring[ring.len() - 1])
    } else {
        groups
    }
}

/// True iff every neighbour satisfies `predicate`.
pub fn surrounded(pos: Pos, predicate: impl Fn(Pos) -> bool) -> bool {
    pos.neighbors().all(predicate)
}

/// Add `start` and everything reachable from it through `passable`
/// cells to `visited`. Cells already in `visited` act as barriers, so
/// repeated fills over one set partition a region into components.
pub fn flood_fill(start: Pos, passable: impl Fn(Pos) -> bool, visited: &mut HashSet<Pos>) {
    if visited.contains(&start) || !passable(start) {
        return;
    }
    visited.insert(start);
    let mut stack = vec![start];
    while let Some(pos) = stack.pop() {
        for neighbor in pos.neighbors() {
            if !visited.contains(&neighbor) && passable(neighbor) {
                visited.insert(neighbor);
                stack.push(neighbor);
            }
        }
    }
}
