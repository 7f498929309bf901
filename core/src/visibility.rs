//! Field of view by recursive shadowcasting on the hex lattice.
//!
//! The view around a centre splits into six sextants. Each sextant is
//! scanned row by row outward, where row `r` holds the `r + 1` cells
//! `center + arc * tangent + r * normal` for `arc` in `0..=r`. A window
//! `[start, end)` of slopes (fractions of a row) tracks what is still
//! unobstructed; opaque cells narrow it and split it.

use crate::hex::{Pos, DIR1, DIR11, DIR3, DIR5, DIR7, DIR9};
use std::collections::HashSet;

/// Row direction of each sextant.
const NORMALS: [Pos; 6] = [DIR1, DIR3, DIR5, DIR7, DIR9, DIR11];
/// Arc direction of each sextant, two steps clockwise from its normal.
const TANGENTS: [Pos; 6] = [DIR5, DIR7, DIR9, DIR11, DIR1, DIR3];

/// Round to nearest, halves go down.
fn round_tie_down(n: f64) -> i32 {
    (n - 0.5).ceil() as i32
}

/// Round to nearest, halves go up.
fn round_tie_up(n: f64) -> i32 {
    (n + 0.5).floor() as i32
}

/// Everything visible from `center`. The centre itself is always
/// included; cells for which `transparent` is false block sight but are
/// themselves visible when their face is lit.
pub fn field_of_view(center: Pos, transparent: impl Fn(Pos) -> bool) -> HashSet<Pos> {
    let mut visible = HashSet::new();
    visible.insert(center);
    for (normal, tangent) in NORMALS.into_iter().zip(TANGENTS) {
        let mut sextant = Sextant {
            center,
            normal,
            tangent,
            transparent: &transparent,
            visible: &mut visible,
        };
        sextant.scan(1, 0.0, 1.0);
    }
    visible
}

struct Sextant<'a, F> {
    center: Pos,
    normal: Pos,
    tangent: Pos,
    transparent: &'a F,
    visible: &'a mut HashSet<Pos>,
}

impl<F: Fn(Pos) -> bool> Sextant<'_, F> {
    fn world(&self, arc: i32, r: i32) -> Pos {
        self.center + self.tangent * arc + self.normal * r
    }

    fn is_clear(&self, arc: i32, r: i32) -> bool {
        (self.transparent)(self.world(arc, r))
    }

    fn reveal(&mut self, arc: i32, r: i32) {
        let pos = self.world(arc, r);
        self.visible.insert(pos);
    }

    /// Scan row `r` over the slope window `[start, end)`.
    fn scan(&mut self, r: i32, mut start: f64, end: f64) {
        if start >= end {
            return;
        }
        let rf = f64::from(r);
        let min_arc = round_tie_down(rf * start);
        let max_arc = round_tie_up(rf * end);

        // Whether the current run of the window has any lit floor. An
        // opaque cell only splits the window if something lies before it.
        let mut run_open = false;

        for arc in min_arc..=max_arc {
            let af = f64::from(arc);
            if self.is_clear(arc, r) {
                if af >= rf * start && af <= rf * end {
                    self.reveal(arc, r);
                    run_open = true;
                    // Wall faces directly ahead of lit floor.
                    if !self.is_clear(arc, r + 1) {
                        self.reveal(arc, r + 1);
                    }
                    if !self.is_clear(arc + 1, r + 1) {
                        self.reveal(arc + 1, r + 1);
                    }
                }
            } else {
                if run_open {
                    self.scan(r + 1, start, (af - 0.5) / rf);
                }
                self.reveal(arc, r);
                run_open = false;
                start = (af + 0.5) / rf;
                if start >= end {
                    return;
                }
            }
        }

        if run_open {
            self.scan(r + 1, start, end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_breaks_ties_in_the_named_direction() {
        assert_eq!(round_tie_down(1.5), 1);
        assert_eq!(round_tie_up(1.5), 2);
        assert_eq!(round_tie_down(-0.5), -1);
        assert_eq!(round_tie_up(0.49), 0);
        assert_eq!(round_tie_down(0.51), 1);
    }

    #[test]
    fn row_one_of_each_sextant_spans_two_neighbours() {
        for (normal, tangent) in NORMALS.into_iter().zip(TANGENTS) {
            let first = normal;
            let last = normal + tangent;
            let i = NORMALS.iter().position(|&d| d == normal).unwrap_or(0);
            assert_eq!(last, NORMALS[(i + 1) % 6], "sextant rows must close on the next direction");
            assert_ne!(first, last);
        }
    }

    #[test]
    fn opaque_centre_surroundings_show_only_the_ring() {
        let center = Pos::new(0, 0);
        let visible = field_of_view(center, |p| p == center);
        let mut expected: HashSet<Pos> = center.neighbors().collect();
        expected.insert(center);
        assert_eq!(visible, expected);
    }
}
