//! Shortest conductor route between two terminals.
//!
//! A* over the 8-connected network mask with unit orthogonal cost, √2
//! diagonal cost, and the octile-distance heuristic. Ties in the open set
//! are broken on heuristic then flat index so routes are reproducible.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use pt_core::{GridCoord, Raster, Step};

use crate::error::{CurrentError, CurrentResult};

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    h: f64,
    index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    // Reversed on every key: BinaryHeap pops the maximum.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.index.cmp(&self.index))
    }
}

fn octile(a: GridCoord, b: GridCoord) -> f64 {
    let dr = a.row.abs_diff(b.row) as f64;
    let dc = a.col.abs_diff(b.col) as f64;
    let (lo, hi) = if dr < dc { (dr, dc) } else { (dc, dr) };
    (hi - lo) + std::f64::consts::SQRT_2 * lo
}

fn step_cost(step: Step) -> f64 {
    if step.is_diagonal() {
        std::f64::consts::SQRT_2
    } else {
        1.0
    }
}

/// Find the cheapest route from `start` to `end` through cells where `mask`
/// is `true`. The returned path includes both terminals.
pub fn find_route(mask: &Raster<bool>, start: GridCoord, end: GridCoord) -> CurrentResult<Vec<GridCoord>> {
    for at in [start, end] {
        if !mask.contains(at) {
            return Err(CurrentError::TerminalOutOfBounds {
                at,
                rows: mask.rows(),
                cols: mask.cols(),
            });
        }
        if !mask[at] {
            return Err(CurrentError::TerminalNotConductor { at });
        }
    }
    if start == end {
        return Ok(vec![start]);
    }

    let n = mask.len();
    let mut g = vec![f64::INFINITY; n];
    let mut came_from = vec![usize::MAX; n];
    let mut closed = vec![false; n];
    let mut open = BinaryHeap::new();

    let start_idx = mask.index_of(start);
    let end_idx = mask.index_of(end);
    g[start_idx] = 0.0;
    let h0 = octile(start, end);
    open.push(OpenEntry {
        f: h0,
        h: h0,
        index: start_idx,
    });

    while let Some(OpenEntry { index, .. }) = open.pop() {
        if closed[index] {
            continue;
        }
        if index == end_idx {
            return Ok(reconstruct(mask, &came_from, start_idx, end_idx));
        }
        closed[index] = true;

        let here = mask.coord_of(index);
        for step in Step::NEIGHBORS_8 {
            let Some(next) = here.offset(step) else {
                continue;
            };
            if !mask.get(next).copied().unwrap_or(false) {
                continue;
            }
            let next_idx = mask.index_of(next);
            if closed[next_idx] {
                continue;
            }
            let tentative = g[index] + step_cost(step);
            if tentative < g[next_idx] {
                g[next_idx] = tentative;
                came_from[next_idx] = index;
                let h = octile(next, end);
                open.push(OpenEntry {
                    f: tentative + h,
                    h,
                    index: next_idx,
                });
            }
        }
    }

    Err(CurrentError::NoRoute { start, end })
}

fn reconstruct(mask: &Raster<bool>, came_from: &[usize], start: usize, end: usize) -> Vec<GridCoord> {
    let mut path = vec![mask.coord_of(end)];
    let mut cursor = end;
    while cursor != start {
        cursor = came_from[cursor];
        path.push(mask.coord_of(cursor));
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_mask(rows: usize, cols: usize) -> Raster<bool> {
        Raster::new(rows, cols, true)
    }

    #[test]
    fn straight_route_on_open_trace() {
        let mask = open_mask(5, 20);
        let path = find_route(&mask, GridCoord::new(2, 0), GridCoord::new(2, 19)).unwrap();
        assert_eq!(path.len(), 20);
        assert!(path.iter().all(|c| c.row == 2));
    }

    #[test]
    fn diagonal_route_length_is_chebyshev() {
        let mask = open_mask(30, 30);
        let (a, b) = (GridCoord::new(1, 2), GridCoord::new(21, 9));
        let path = find_route(&mask, a, b).unwrap();
        assert_eq!(path.len() - 1, a.chebyshev(b));
        assert_eq!(path.first(), Some(&a));
        assert_eq!(path.last(), Some(&b));
        for pair in path.windows(2) {
            assert_eq!(pair[0].chebyshev(pair[1]), 1);
        }
    }

    #[test]
    fn route_goes_around_a_wall() {
        let mut mask = open_mask(5, 5);
        for row in 0..4 {
            mask[GridCoord::new(row, 2)] = false;
        }
        let path = find_route(&mask, GridCoord::new(0, 0), GridCoord::new(0, 4)).unwrap();
        assert!(path.iter().all(|c| mask[*c]));
        assert!(path.contains(&GridCoord::new(4, 2)));
    }

    #[test]
    fn unreachable_end_is_reported() {
        let mut mask = open_mask(3, 3);
        for row in 0..3 {
            mask[GridCoord::new(row, 1)] = false;
        }
        let err = find_route(&mask, GridCoord::new(0, 0), GridCoord::new(0, 2)).unwrap_err();
        assert!(matches!(err, CurrentError::NoRoute { .. }));
    }

    #[test]
    fn terminals_are_checked() {
        let mut mask = open_mask(3, 3);
        mask[GridCoord::new(1, 1)] = false;
        assert!(matches!(
            find_route(&mask, GridCoord::new(1, 1), GridCoord::new(0, 0)),
            Err(CurrentError::TerminalNotConductor { .. })
        ));
        assert!(matches!(
            find_route(&mask, GridCoord::new(0, 0), GridCoord::new(0, 9)),
            Err(CurrentError::TerminalOutOfBounds { .. })
        ));
    }
}
