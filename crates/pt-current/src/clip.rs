//! Terminal clipping.
//!
//! Copper beyond a terminal (the rest of a pad, a stub continuing past the
//! load point) carries no load current. Starting one step past each terminal
//! and walking away from the route, whole cross-sections are zeroed until the
//! walk leaves the trace.

use pt_core::{GridCoord, Raster, Step};
use tracing::debug;

use crate::error::CurrentResult;
use crate::width::paint_across;

/// Rounded mean of `steps`, or `Step::ZERO` for an empty slice.
fn mean_direction(steps: &[Step]) -> Step {
    if steps.is_empty() {
        return Step::ZERO;
    }
    let n = steps.len() as f64;
    let dr: f64 = steps.iter().map(|s| s.dr as f64).sum::<f64>() / n;
    let dc: f64 = steps.iter().map(|s| s.dc as f64).sum::<f64>() / n;
    Step::new(dr.round() as i64, dc.round() as i64)
}

fn on_trace(mask: &Raster<bool>, at: Option<GridCoord>) -> Option<GridCoord> {
    at.filter(|c| mask.get(*c).copied().unwrap_or(false))
}

/// Zero cross-sections from `terminal + outward` onward along `outward`.
///
/// Diagonal walks are split into a row half-step and a column half-step so
/// no cross-section is skipped.
fn clip_beyond(
    mask: &Raster<bool>,
    resistance: &mut Raster<f64>,
    terminal: GridCoord,
    outward: Step,
) -> CurrentResult<usize> {
    if outward.is_zero() {
        return Ok(0);
    }
    let across = outward.orthogonal();
    let mut cleared = 0;
    let mut cursor = on_trace(mask, terminal.offset(outward));
    while let Some(at) = cursor {
        paint_across(mask, resistance, at, across, 0.0)?;
        cleared += 1;
        if outward.is_diagonal() {
            let half = at.offset(Step::new(outward.dr, 0));
            if let Some(mid) = on_trace(mask, half) {
                paint_across(mask, resistance, mid, across, 0.0)?;
                cleared += 1;
            }
            cursor = on_trace(mask, half.and_then(|m| m.offset(Step::new(0, outward.dc))));
        } else {
            cursor = on_trace(mask, at.offset(outward));
        }
    }
    Ok(cleared)
}

/// Zero resistance beyond the `start` and `end` terminals of a route
/// walked with `steps`.
///
/// The approach direction at each end is the rounded mean of up to `window`
/// steps next to (but not including) the terminal step.
pub fn clip_terminals(
    mask: &Raster<bool>,
    resistance: &mut Raster<f64>,
    start: GridCoord,
    end: GridCoord,
    steps: &[Step],
    window: usize,
) -> CurrentResult<()> {
    let n = steps.len();
    if n == 0 {
        return Ok(());
    }

    let head = &steps[1.min(n)..(1 + window).min(n)];
    let start_dir = if head.is_empty() {
        steps[0]
    } else {
        mean_direction(head)
    };
    let tail = &steps[(n - 1).saturating_sub(window)..n - 1];
    let end_dir = if tail.is_empty() {
        steps[n - 1]
    } else {
        mean_direction(tail)
    };

    let cleared_start = clip_beyond(mask, resistance, start, -start_dir)?;
    let cleared_end = clip_beyond(mask, resistance, end, end_dir)?;
    debug!(?start_dir, ?end_dir, cleared_start, cleared_end, "clipped terminals");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centerline::path_steps;

    fn clip_path(mask: &Raster<bool>, res: &mut Raster<f64>, path: &[GridCoord]) {
        let steps = path_steps(path);
        clip_terminals(mask, res, path[0], path[path.len() - 1], &steps, 4).unwrap();
    }

    #[test]
    fn mean_direction_rounds() {
        let steps = [Step::new(0, 1), Step::new(1, 1), Step::new(0, 1), Step::new(0, 1)];
        assert_eq!(mean_direction(&steps), Step::new(0, 1));
        let steps = [Step::new(1, 1), Step::new(1, 1), Step::new(0, 1)];
        assert_eq!(mean_direction(&steps), Step::new(1, 1));
    }

    #[test]
    fn pad_beyond_terminals_is_zeroed() {
        // Trace on row 2 from col 3 to col 8, copper continues to both edges.
        let mask = Raster::from_fn(5, 12, |c| c.row >= 1 && c.row <= 3);
        let mut res = Raster::from_fn(5, 12, |c| if mask[c] { 1.0 } else { 0.0 });
        let path: Vec<_> = (3..=8).map(|col| GridCoord::new(2, col)).collect();

        clip_path(&mask, &mut res, &path);

        for row in 1..=3 {
            for col in 0..12 {
                let expect = if (3..=8).contains(&col) { 1.0 } else { 0.0 };
                assert_eq!(res[GridCoord::new(row, col)], expect, "({row}, {col})");
            }
        }
    }

    #[test]
    fn diagonal_clip_uses_half_steps() {
        let mask = Raster::new(8, 8, true);
        let mut res = Raster::new(8, 8, 1.0);
        let path: Vec<_> = (2..=5).map(|i| GridCoord::new(i, i)).collect();

        clip_path(&mask, &mut res, &path);

        // Everything on the path survives; the far corners are cleared.
        for c in &path {
            assert_eq!(res[*c], 1.0);
        }
        assert_eq!(res[GridCoord::new(0, 0)], 0.0);
        assert_eq!(res[GridCoord::new(7, 7)], 0.0);
    }

    #[test]
    fn single_cell_path_is_untouched() {
        let mask = Raster::new(3, 3, true);
        let mut res = Raster::new(3, 3, 1.0);
        clip_path(&mask, &mut res, &[GridCoord::new(1, 1)]);
        assert_eq!(res.sum(), 9.0);
    }
}
