//! Procedural cave generation.
//!
//! PASS ORDER (fixed; each pass sees the previous pass's output):
//!   1. Seal:        every cell wall except the start.
//!   2. Carve:       visit interior cells in shuffled order, opening any
//!                   cell whose floor neighbours do not form exactly one run.
//!   3. Small walls: wall components under SMALL_WALL_LIMIT cells become floor.
//!   4. Other caves: interior floor unreachable from the start becomes wall.
//!   5. Dead ends:   repeatedly wall up dead-end cells until none remain.
//!   6. Pockets:     wall up runs of 2..=SMALL_CAVE_MAX cave cells hanging
//!                   off the main cave, refilling dead ends behind them.
//!
//! The main cave is measured after pass 4; if it comes out too small the
//! whole level is rebuilt from the same random stream. Passes 5 and 6
//! only trim its edges.

use crate::{
    error::SimResult,
    hex::{count_groups, flood_fill, surrounded, Pos},
    level::{Level, Shape},
    rng::GameRng,
};
use std::collections::HashSet;

/// Wall components smaller than this are opened up.
pub const SMALL_WALL_LIMIT: usize = 6;

/// Largest pocket of cave cells that gets walled up.
pub const SMALL_CAVE_MAX: usize = 3;

pub const DEFAULT_MIN_CAVE_FRACTION: f64 = 0.25;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

pub struct CaveGenerator {
    shape: Shape,
    min_cave_fraction: f64,
    max_attempts: u32,
}

impl CaveGenerator {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            min_cave_fraction: DEFAULT_MIN_CAVE_FRACTION,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_min_cave_fraction(mut self, fraction: f64) -> Self {
        self.min_cave_fraction = fraction;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Build a level whose only cave contains `start`. Never fails for a
    /// valid shape and interior start; an undersized cave is kept once
    /// the attempt budget runs out.
    pub fn generate(&self, rng: &mut GameRng, start: Pos) -> SimResult<Level> {
        let total = self.shape.positions().len();
        let threshold = (total as f64 * self.min_cave_fraction).ceil() as usize;

        let mut attempt = 1;
        loop {
            let mut level = Level::sealed(self.shape, start)?;
            carve_caves(&mut level, rng);
            remove_small_walls(&mut level);
            let cave_size = remove_other_caves(&mut level);

            if cave_size >= threshold || attempt >= self.max_attempts {
                if cave_size < threshold {
                    log::warn!(
                        "cave: keeping undersized cave ({cave_size}/{threshold} cells) after {attempt} attempts"
                    );
                }
                let filled = fill_dead_ends(&mut level);
                let pockets = fill_small_caves(&mut level);
                log::info!(
                    "cave: {}x{} level ready, attempt={attempt} cave={cave_size} dead_ends_filled={filled} pocket_cells_filled={pockets} floor={}",
                    self.shape.width,
                    self.shape.height,
                    level.floor_count()
                );
                return Ok(level);
            }

            log::warn!(
                "cave: attempt {attempt} produced {cave_size} cells, need {threshold}; regenerating"
            );
            attempt += 1;
        }
    }
}

/// Single-pass stochastic automaton over the shuffled interior.
pub fn carve_caves(level: &mut Level, rng: &mut GameRng) {
    let mut order = level.inner_positions().to_vec();
    rng.shuffle(&mut order);
    for pos in order {
        if count_groups(pos, |n| level.is_passable(n)) != 1 {
            level.set_passable(pos, true);
        }
    }
}

/// Open every wall component with fewer than SMALL_WALL_LIMIT cells.
pub fn remove_small_walls(level: &mut Level) {
    let mut visited: HashSet<Pos> = HashSet::new();
    let positions = level.positions().to_vec();
    for pos in positions {
        if visited.contains(&pos) || !level.is_wall(pos) {
            continue;
        }
        let mut group = HashSet::new();
        flood_fill(pos, |p| level.is_wall(p), &mut group);
        if group.len() < SMALL_WALL_LIMIT {
            for &member in &group {
                level.set_passable(member, true);
            }
        }
        visited.extend(group);
    }
}

/// Wall up interior floor not connected to the start. Returns the size
/// of the surviving cave.
pub fn remove_other_caves(level: &mut Level) -> usize {
    let mut main_cave = HashSet::new();
    flood_fill(level.start(), |p| level.is_passable(p), &mut main_cave);

    let inner = level.inner_positions().to_vec();
    for pos in inner {
        if level.is_passable(pos) && !main_cave.contains(&pos) {
            level.set_passable(pos, false);
        }
    }
    main_cave.len()
}

/// Floor whose neighbouring floor forms exactly one run.
pub fn is_cave(level: &Level, pos: Pos) -> bool {
    level.is_passable(pos) && count_groups(pos, |n| level.is_passable(n)) == 1
}

/// A cave cell none of whose neighbours are cave cells. Walling it up
/// cannot split the cave.
pub fn is_dead_end(level: &Level, pos: Pos) -> bool {
    is_cave(level, pos) && surrounded(pos, |n| !is_cave(level, n))
}

/// Fill dead ends across the interior until the map is stable. Returns
/// the number of cells filled; a second call on the result returns 0.
pub fn fill_dead_ends(level: &mut Level) -> usize {
    let inner = level.inner_positions().to_vec();
    inner.into_iter().map(|pos| fill_dead_end(level, pos)).sum()
}

/// Wall up small pockets of cave cells attached to the main cave.
///
/// Walling a pocket cell can turn cells elsewhere into new pockets or
/// dead ends, so the interior is swept until a sweep changes nothing.
/// Returns the number of cells filled; a second call returns 0.
pub fn fill_small_caves(level: &mut Level) -> usize {
    let inner = level.inner_positions().to_vec();
    let mut total = 0;
    loop {
        let mut filled = 0;
        for &pos in &inner {
            filled += fill_dead_end(level, pos);

            let mut pocket = HashSet::new();
            flood_fill(pos, |p| is_cave(level, p), &mut pocket);
            if !(2..=SMALL_CAVE_MAX).contains(&pocket.len()) {
                continue;
            }
            let mut members: Vec<Pos> = pocket.into_iter().collect();
            members.sort_by_key(|p| (p.y, p.x));

            // Prefer the origin; skip a member with no wall beside it so
            // no lone wall cell is left floating in open floor.
            let touches_wall = |p: Pos| p.neighbors().any(|n| level.is_wall(n));
            let target = if touches_wall(pos) {
                Some(pos)
            } else {
                members.iter().copied().find(|&p| touches_wall(p))
            };
            let Some(target) = target else {
                continue;
            };

            log::debug!("cave: pocket of {} at {target} walled up", members.len());
            wall_up(level, target);
            filled += 1;
            for member in members {
                filled += fill_dead_end(level, member);
            }
        }
        total += filled;
        if filled == 0 {
            return total;
        }
    }
}

/// Turn `pos` into wall, moving the start off it if needed.
fn wall_up(level: &mut Level, pos: Pos) {
    level.set_passable(pos, false);
    if pos == level.start() {
        if let Some(next) = pos.neighbors().find(|&n| level.is_passable(n)) {
            log::debug!("cave: start {pos} was filled, moved to {next}");
            level.set_start(next);
        }
    }
}

/// Fill `origin` if it is a dead end, then chase the corridor.
///
/// Walling a cell changes the run count of its neighbours, which in turn
/// changes whether *their* neighbours see a cave cell, so everything
/// within two steps is re-tested. Neighbours are popped first.
fn fill_dead_end(level: &mut Level, origin: Pos) -> usize {
    let mut filled = 0;
    let mut stack = vec![origin];
    while let Some(pos) = stack.pop() {
        if !level.shape().contains_inner(pos) || !is_dead_end(level, pos) {
            continue;
        }
        wall_up(level, pos);
        filled += 1;

        let neighbors: Vec<Pos> = pos.neighbors().collect();
        for &neighbor in neighbors.iter().rev() {
            stack.extend(neighbor.neighbors().filter(|&p| p != pos));
        }
        stack.extend(neighbors.iter().rev());
    }
    filled
}
