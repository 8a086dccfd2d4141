//! Centerline correction of a jagged shortest route.
//!
//! The shortest route hugs trace edges. Each step's cross-section center
//! becomes a waypoint; waypoints are reconnected with straight runs. A run
//! with any step more than the drift tolerance away from the incoming
//! direction is dropped, so the next run starts further back. The corrected
//! path ends on the last waypoint reached by an accepted run.

use pt_core::{GridCoord, Raster, Step};
use tracing::debug;

use crate::error::CurrentResult;
use crate::width::center_of_width;

/// Cells visited walking from `from` to `to`, one king move per cell,
/// stepping along each axis by the sign of the remaining offset.
pub fn straight_path(from: GridCoord, to: GridCoord) -> Vec<GridCoord> {
    let mut path = vec![from];
    let mut cursor = from;
    while cursor != to {
        let step = Step::between(cursor, to).signum();
        let Some(next) = cursor.offset(step) else {
            break;
        };
        cursor = next;
        path.push(cursor);
    }
    path
}

/// Steps between consecutive path cells.
pub fn path_steps(path: &[GridCoord]) -> Vec<Step> {
    path.windows(2).map(|w| Step::between(w[0], w[1])).collect()
}

/// Re-route `short_path` through the center of the trace.
///
/// The result starts on the first step's center cell and ends on the last
/// accepted waypoint, which is the last cell of `short_path` only when the
/// closing run stays within `drift_tolerance`. A path with fewer than two
/// cells is returned as is.
pub fn middle_path(
    mask: &Raster<bool>,
    short_path: &[GridCoord],
    drift_tolerance: f64,
) -> CurrentResult<Vec<GridCoord>> {
    let Some(&last) = short_path.last() else {
        return Ok(Vec::new());
    };
    if short_path.len() < 2 {
        return Ok(short_path.to_vec());
    }

    let mut waypoints = Vec::with_capacity(short_path.len());
    for (cell, step) in short_path.iter().zip(path_steps(short_path)) {
        waypoints.push(center_of_width(mask, *cell, step)?);
    }
    waypoints.push(last);

    let mut joined: Vec<GridCoord> = Vec::new();
    let mut prev_step: Option<Step> = None;
    let mut anchor = 0;
    let mut dropped = 0usize;

    for i in 1..waypoints.len() {
        let run = straight_path(waypoints[anchor], waypoints[i]);
        if run.len() < 2 {
            continue;
        }
        let steps = path_steps(&run);
        let incoming = prev_step.unwrap_or(steps[0]);
        if steps.iter().any(|s| (incoming - *s).length() > drift_tolerance) {
            dropped += 1;
            continue;
        }
        prev_step = steps.last().copied();
        joined.extend_from_slice(&run[..run.len() - 1]);
        anchor = i;
    }
    joined.push(waypoints[anchor]);

    debug!(
        short_len = short_path.len(),
        middle_len = joined.len(),
        dropped,
        "centerline corrected"
    );
    Ok(joined)
}

/// Choose between the centerline and the raw shortest route.
///
/// The centerline is kept unless its end drifts from the route's end by more
/// than `fallback_factor` times the offset between their starts, or it leaves
/// the trace.
pub fn select_path<'a>(
    mask: &Raster<bool>,
    short_path: &'a [GridCoord],
    middle: &'a [GridCoord],
    fallback_factor: f64,
) -> &'a [GridCoord] {
    let (Some(s0), Some(s1), Some(m0), Some(m1)) = (
        short_path.first(),
        short_path.last(),
        middle.first(),
        middle.last(),
    ) else {
        return short_path;
    };
    let acceptable_gap = s0.distance(*m0) * fallback_factor;
    let stays_on_trace = middle.iter().all(|c| mask.get(*c).copied().unwrap_or(false));
    if s1.distance(*m1) <= acceptable_gap && stays_on_trace {
        middle
    } else {
        debug!("centerline rejected, using shortest route");
        short_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::find_route;

    #[test]
    fn straight_path_goes_diagonal_then_straight() {
        let p = straight_path(GridCoord::new(0, 0), GridCoord::new(2, 5));
        assert_eq!(p.len(), 6);
        assert_eq!(p[1], GridCoord::new(1, 1));
        assert_eq!(p[2], GridCoord::new(2, 2));
        assert_eq!(p[5], GridCoord::new(2, 5));
        assert_eq!(straight_path(GridCoord::new(3, 3), GridCoord::new(3, 3)).len(), 1);
    }

    #[test]
    fn edge_hugging_route_is_recentered() {
        // 7-wide band on rows 4..=10; route along the top edge.
        let mask = Raster::from_fn(15, 40, |c| (4..=10).contains(&c.row));
        let short = find_route(&mask, GridCoord::new(4, 0), GridCoord::new(4, 39)).unwrap();
        let middle = middle_path(&mask, &short, 1.0).unwrap();

        assert_eq!(middle.first(), Some(&GridCoord::new(7, 0)));
        // The closing run to the edge terminal turns sideways and is dropped.
        assert_eq!(middle.last(), Some(&GridCoord::new(7, 38)));
        assert!(middle.iter().all(|c| c.row == 7));
        for pair in middle.windows(2) {
            assert_eq!(pair[0].chebyshev(pair[1]), 1);
        }
        assert_eq!(select_path(&mask, &short, &middle, 5.0), middle.as_slice());
    }

    #[test]
    fn turn_inside_a_run_is_rejected() {
        // Route along the top edge of a band on rows 0..=6. The closing run
        // from the center row back up to the terminal starts diagonal and
        // then turns vertical, which is beyond a one-cell tolerance.
        let mask = Raster::from_fn(10, 9, |c| c.row <= 6);
        let short: Vec<GridCoord> = (0..9).map(|c| GridCoord::new(0, c)).collect();
        let closing = path_steps(&straight_path(GridCoord::new(3, 7), GridCoord::new(0, 8)));
        assert!((Step::new(0, 1) - closing[0]).length() <= 1.0);

        let middle = middle_path(&mask, &short, 1.0).unwrap();
        assert_eq!(middle.first(), Some(&GridCoord::new(3, 0)));
        assert_eq!(middle.last(), Some(&GridCoord::new(3, 7)));
        assert!(path_steps(&middle).iter().all(|s| *s == Step::new(0, 1)));

        // A looser tolerance lets the turn through and reaches the terminal.
        let loose = middle_path(&mask, &short, 2.0).unwrap();
        assert_eq!(loose.last(), Some(&GridCoord::new(0, 8)));
    }

    #[test]
    fn selection_prefers_centerline_when_ends_agree() {
        let mask = Raster::new(10, 10, true);
        let short = vec![GridCoord::new(5, 0), GridCoord::new(5, 1), GridCoord::new(5, 2)];
        let middle = vec![GridCoord::new(4, 0), GridCoord::new(4, 1), GridCoord::new(5, 2)];
        assert_eq!(select_path(&mask, &short, &middle, 5.0), middle.as_slice());

        let far = vec![GridCoord::new(4, 0), GridCoord::new(4, 1), GridCoord::new(0, 9)];
        assert_eq!(select_path(&mask, &short, &far, 5.0), short.as_slice());
    }

    #[test]
    fn centerline_off_trace_falls_back() {
        let mut mask = Raster::new(3, 3, true);
        mask[GridCoord::new(0, 1)] = false;
        let short = vec![GridCoord::new(1, 0), GridCoord::new(1, 1)];
        let middle = vec![GridCoord::new(0, 0), GridCoord::new(0, 1), GridCoord::new(1, 1)];
        assert_eq!(select_path(&mask, &short, &middle, 5.0), short.as_slice());
    }
}
