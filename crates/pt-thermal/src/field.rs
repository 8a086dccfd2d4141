//! Per-cell temperatures over the board volume.

use pt_core::{GridCoord, PtError, PtResult, Raster};

/// Location of one cell in the volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub layer: usize,
    pub row: usize,
    pub col: usize,
}

/// Temperatures (C), layer-major then row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureField {
    layers: usize,
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl TemperatureField {
    pub fn uniform(layers: usize, rows: usize, cols: usize, temp_c: f64) -> Self {
        Self {
            layers,
            rows,
            cols,
            values: vec![temp_c; layers * rows * cols],
        }
    }

    pub fn from_vec(layers: usize, rows: usize, cols: usize, values: Vec<f64>) -> PtResult<Self> {
        if values.len() != layers * rows * cols {
            return Err(PtError::IndexOob {
                what: "temperature field length",
                index: values.len(),
                len: layers * rows * cols,
            });
        }
        Ok(Self {
            layers,
            rows,
            cols,
            values,
        })
    }

    pub fn layer_count(&self) -> usize {
        self.layers
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    fn flat(&self, layer: usize, row: usize, col: usize) -> usize {
        (layer * self.rows + row) * self.cols + col
    }

    pub fn get(&self, layer: usize, coord: GridCoord) -> Option<f64> {
        if layer >= self.layers || coord.row >= self.rows || coord.col >= self.cols {
            return None;
        }
        Some(self.values[self.flat(layer, coord.row, coord.col)])
    }

    /// Copy of one layer as a raster.
    pub fn layer(&self, layer: usize) -> Option<Raster<f64>> {
        if layer >= self.layers {
            return None;
        }
        let plane = self.rows * self.cols;
        let start = layer * plane;
        Raster::from_vec(self.rows, self.cols, self.values[start..start + plane].to_vec()).ok()
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Mean over the cells selected by `mask` on `layer`.
    pub fn mean_where(&self, layer: usize, mask: &Raster<bool>) -> Option<f64> {
        let plane = self.layer(layer)?;
        let mut sum = 0.0;
        let mut n = 0usize;
        for (t, &m) in plane.iter().zip(mask.iter()) {
            if m {
                sum += t;
                n += 1;
            }
        }
        (n > 0).then(|| sum / n as f64)
    }

    /// Hottest cell; the first in flat order on ties.
    pub fn hottest(&self) -> Option<(CellIndex, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &t) in self.values.iter().enumerate() {
            if best.is_none_or(|(_, b)| t > b) {
                best = Some((i, t));
            }
        }
        best.map(|(i, t)| {
            let plane = self.rows * self.cols;
            let cell = CellIndex {
                layer: i / plane,
                row: (i % plane) / self.cols,
                col: i % self.cols,
            };
            (cell, t)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hottest_and_stats() {
        let mut v = vec![20.0; 2 * 2 * 3];
        v[7] = 55.0;
        let f = TemperatureField::from_vec(2, 2, 3, v).unwrap();
        let (cell, t) = f.hottest().unwrap();
        assert_eq!(cell, CellIndex { layer: 1, row: 0, col: 1 });
        assert_eq!(t, 55.0);
        assert_eq!(f.min(), 20.0);
        assert_eq!(f.max(), 55.0);
        assert_eq!(f.get(1, GridCoord::new(0, 1)), Some(55.0));
        assert_eq!(f.get(2, GridCoord::new(0, 0)), None);
    }

    #[test]
    fn layer_and_masked_mean() {
        let f = TemperatureField::from_vec(2, 1, 2, vec![1.0, 2.0, 3.0, 5.0]).unwrap();
        assert_eq!(f.layer(1).unwrap().as_slice(), &[3.0, 5.0]);
        let mask = Raster::from_vec(1, 2, vec![false, true]).unwrap();
        assert_eq!(f.mean_where(1, &mask), Some(5.0));
        assert_eq!(f.mean_where(0, &Raster::new(1, 2, false)), None);
        assert!(TemperatureField::from_vec(1, 1, 1, vec![]).is_err());
    }
}
