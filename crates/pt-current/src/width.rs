//! Cross-section walks orthogonal to the direction of travel.
//!
//! For a path step `s` the cross-section direction is `s.orthogonal()`.
//! Cells off the raster count as outside the trace.

use pt_core::{GridCoord, Raster, Step};

use crate::error::{CurrentError, CurrentResult};

fn in_mask(mask: &Raster<bool>, at: Option<GridCoord>) -> Option<GridCoord> {
    at.filter(|c| mask.get(*c).copied().unwrap_or(false))
}

/// Last trace cell reached by walking from `at` along `across`.
pub fn edge_of_width(mask: &Raster<bool>, at: GridCoord, across: Step) -> CurrentResult<GridCoord> {
    if across.is_zero() {
        return Err(CurrentError::Geometry {
            at,
            step: across,
            what: "zero-length step",
        });
    }
    let mut cursor = in_mask(mask, Some(at)).ok_or(CurrentError::Geometry {
        at,
        step: across,
        what: "path cell is not part of the trace",
    })?;
    while let Some(next) = in_mask(mask, cursor.offset(across)) {
        cursor = next;
    }
    Ok(cursor)
}

/// Trace cells on the cross-section through `at`, starting from the edge
/// in the `+across` direction.
pub fn cross_section(mask: &Raster<bool>, at: GridCoord, across: Step) -> CurrentResult<Vec<GridCoord>> {
    let edge = edge_of_width(mask, at, across)?;
    let back = -across;
    let mut cells = vec![edge];
    let mut cursor = edge;
    while let Some(next) = in_mask(mask, cursor.offset(back)) {
        cells.push(next);
        cursor = next;
    }
    Ok(cells)
}

/// Local trace width at `at` for travel along `step`, in cells.
///
/// Cells counted along a diagonal cross-section are √2 long.
pub fn trace_width(mask: &Raster<bool>, at: GridCoord, step: Step) -> CurrentResult<f64> {
    let across = step.orthogonal();
    let cells = cross_section(mask, at, across)?.len() as f64;
    Ok(cells * across.length())
}

/// Cell nearest the middle of the cross-section through `at`.
pub fn center_of_width(mask: &Raster<bool>, at: GridCoord, step: Step) -> CurrentResult<GridCoord> {
    let across = step.orthogonal();
    let width = trace_width(mask, at, step)?;
    let stride = step.length();

    let mut cursor = edge_of_width(mask, at, across)?;
    let mut progress = stride;
    while progress <= width / 2.0 {
        cursor = cursor.offset(-across).ok_or(CurrentError::Geometry {
            at,
            step,
            what: "width center walks off the raster",
        })?;
        progress += stride;
    }
    Ok(cursor)
}

/// Write `value` into every trace cell on the cross-section through `at`.
pub fn paint_across(
    mask: &Raster<bool>,
    target: &mut Raster<f64>,
    at: GridCoord,
    across: Step,
    value: f64,
) -> CurrentResult<()> {
    for cell in cross_section(mask, at, across)? {
        target[cell] = value;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Horizontal band occupying rows `top..top + width`.
    fn band(rows: usize, cols: usize, top: usize, width: usize) -> Raster<bool> {
        Raster::from_fn(rows, cols, |c| c.row >= top && c.row < top + width)
    }

    #[test]
    fn straight_width_counts_cells() {
        let mask = band(20, 10, 4, 7);
        let w = trace_width(&mask, GridCoord::new(5, 3), Step::new(0, 1)).unwrap();
        assert_eq!(w, 7.0);
        // Direction of travel does not matter.
        let w = trace_width(&mask, GridCoord::new(9, 3), Step::new(0, -1)).unwrap();
        assert_eq!(w, 7.0);
    }

    #[test]
    fn band_touching_raster_edge() {
        let mask = band(6, 6, 0, 3);
        let w = trace_width(&mask, GridCoord::new(0, 2), Step::new(0, 1)).unwrap();
        assert_eq!(w, 3.0);
    }

    #[test]
    fn diagonal_width_uses_root_two() {
        // Anti-diagonal band: cells with 10 <= row + col <= 14.
        let mask = Raster::from_fn(30, 30, |c| (10..=14).contains(&(c.row + c.col)));
        let step = Step::new(1, -1);
        let w = trace_width(&mask, GridCoord::new(6, 6), step).unwrap();
        // Cross-section runs along (-1, -1) through the sums 10, 12 and 14.
        assert!((w - 3.0 * std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn center_of_odd_band_is_middle_row() {
        let mask = band(20, 10, 4, 7);
        let c = center_of_width(&mask, GridCoord::new(4, 5), Step::new(0, 1)).unwrap();
        assert_eq!(c, GridCoord::new(7, 5));
    }

    #[test]
    fn center_of_even_band_is_below_midline() {
        let mask = band(120, 10, 10, 50);
        let c = center_of_width(&mask, GridCoord::new(30, 5), Step::new(0, 1)).unwrap();
        assert_eq!(c, GridCoord::new(34, 5));
    }

    #[test]
    fn off_trace_cell_is_a_geometry_error() {
        let mask = band(10, 10, 2, 3);
        assert!(matches!(
            trace_width(&mask, GridCoord::new(8, 0), Step::new(0, 1)),
            Err(CurrentError::Geometry { .. })
        ));
        assert!(matches!(
            trace_width(&mask, GridCoord::new(3, 0), Step::ZERO),
            Err(CurrentError::Geometry { .. })
        ));
    }

    #[test]
    fn paint_covers_whole_cross_section() {
        let mask = band(10, 4, 2, 3);
        let mut r = Raster::zeros(10, 4);
        paint_across(&mask, &mut r, GridCoord::new(3, 1), Step::new(1, 0), 2.0).unwrap();
        assert_eq!(r.sum(), 6.0);
        assert_eq!(r[GridCoord::new(2, 1)], 2.0);
        assert_eq!(r[GridCoord::new(4, 1)], 2.0);
    }
}
