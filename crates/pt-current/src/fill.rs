//! Gap fill and smoothing of a resistance raster.

use pt_core::{GridCoord, Raster, Step};

/// Nearest cell of `values` holding a positive value, by Euclidean distance.
///
/// Ties go to the cell first in raster order. Searches square rings of
/// growing Chebyshev radius and stops once no closer cell can exist.
pub fn nearest_positive(values: &Raster<f64>, at: GridCoord) -> Option<GridCoord> {
    let max_radius = values.rows().max(values.cols());
    let mut best: Option<(usize, GridCoord)> = None;

    for radius in 1..=max_radius {
        if best.is_some_and(|(d2, _)| radius * radius > d2) {
            break;
        }
        let r = radius as i64;
        for dr in -r..=r {
            let on_edge_row = dr.abs() == r;
            let cols: Vec<i64> = if on_edge_row {
                (-r..=r).collect()
            } else {
                vec![-r, r]
            };
            for dc in cols {
                let Some(c) = at.offset(Step::new(dr, dc)) else {
                    continue;
                };
                if !values.get(c).is_some_and(|v| *v > 0.0) {
                    continue;
                }
                let d2 = (dr * dr + dc * dc) as usize;
                let better = match best {
                    None => true,
                    Some((bd2, bc)) => d2 < bd2 || (d2 == bd2 && c < bc),
                };
                if better {
                    best = Some((d2, c));
                }
            }
        }
    }
    best.map(|(_, c)| c)
}

/// Give every masked cell without a value the value of its nearest valued
/// cell. Values filled in this pass are not used as sources.
///
/// Returns the number of cells filled.
pub fn gap_fill(mask: &Raster<bool>, values: &mut Raster<f64>) -> usize {
    let source = values.clone();
    if !source.iter().any(|v| *v > 0.0) {
        return 0;
    }
    let mut filled = 0;
    for (coord, &inside) in mask.iter_coords() {
        if !inside || source[coord] > 0.0 {
            continue;
        }
        if let Some(nearest) = nearest_positive(&source, coord) {
            values[coord] = source[nearest];
            filled += 1;
        }
    }
    filled
}

/// Summed-area table over `(rows + 1) x (cols + 1)` with a zero border.
struct Integral {
    cols: usize,
    sum: Vec<f64>,
    count: Vec<u32>,
}

impl Integral {
    fn of_positive(values: &Raster<f64>) -> Self {
        let (rows, cols) = values.shape();
        let w = cols + 1;
        let mut sum = vec![0.0; (rows + 1) * w];
        let mut count = vec![0u32; (rows + 1) * w];
        for r in 0..rows {
            for c in 0..cols {
                let v = values[GridCoord::new(r, c)];
                let (dv, dn) = if v > 0.0 { (v, 1) } else { (0.0, 0) };
                let i = (r + 1) * w + (c + 1);
                sum[i] = dv + sum[i - 1] + sum[i - w] - sum[i - w - 1];
                count[i] = dn + count[i - 1] + count[i - w] - count[i - w - 1];
            }
        }
        Self { cols: w, sum, count }
    }

    /// Sum and count over rows `r0..r1`, cols `c0..c1` (half-open).
    fn window(&self, r0: usize, r1: usize, c0: usize, c1: usize) -> (f64, u32) {
        let at = |r: usize, c: usize| r * self.cols + c;
        let s = self.sum[at(r1, c1)] - self.sum[at(r0, c1)] - self.sum[at(r1, c0)]
            + self.sum[at(r0, c0)];
        let n = self.count[at(r1, c1)] + self.count[at(r0, c0)]
            - self.count[at(r0, c1)]
            - self.count[at(r1, c0)];
        (s, n)
    }
}

/// Replace each positive cell by the mean of the positive cells within a
/// square window of `radius` cells around it. Other cells stay zero.
pub fn smooth_positive(values: &Raster<f64>, radius: usize) -> Raster<f64> {
    let (rows, cols) = values.shape();
    let integral = Integral::of_positive(values);
    Raster::from_fn(rows, cols, |c| {
        if values[c] <= 0.0 {
            return 0.0;
        }
        let r0 = c.row.saturating_sub(radius);
        let r1 = (c.row + radius + 1).min(rows);
        let c0 = c.col.saturating_sub(radius);
        let c1 = (c.col + radius + 1).min(cols);
        let (sum, n) = integral.window(r0, r1, c0, c1);
        if n == 0 { values[c] } else { sum / f64::from(n) }
    })
}
