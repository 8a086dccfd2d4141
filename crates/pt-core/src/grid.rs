//! Raster primitives shared by every stage of the pipeline.
//!
//! A [`Raster`] is a dense row-major 2-D array addressed by [`GridCoord`].
//! Movement between cells is expressed as a [`Step`], one of the eight
//! king-move offsets (or any integer offset when walking across a trace).

use core::fmt;
use core::ops::{Add, Index, IndexMut, Neg, Sub};

use crate::{PtError, PtResult};

/// Material state of one raster cell as produced by rasterization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    /// Board substrate (dielectric, solder mask) with no copper.
    #[default]
    Insulator,
    /// Drilled void; no board material at all.
    Air,
    /// Copper (or plating) belonging to some electrical network.
    Conductor,
}

impl CellState {
    pub fn is_conductor(self) -> bool {
        matches!(self, CellState::Conductor)
    }
}

/// Zero-based (row, col) address of a raster cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply a signed offset; `None` if either index would go negative.
    pub fn offset(self, step: Step) -> Option<GridCoord> {
        let row = self.row as i64 + step.dr;
        let col = self.col as i64 + step.dc;
        if row < 0 || col < 0 {
            return None;
        }
        Some(GridCoord::new(row as usize, col as usize))
    }

    /// Euclidean distance in cells.
    pub fn distance(self, other: GridCoord) -> f64 {
        Step::between(other, self).length()
    }

    /// Chebyshev (king-move) distance in cells.
    pub fn chebyshev(self, other: GridCoord) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl fmt::Debug for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Signed integer offset between two cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Step {
    pub dr: i64,
    pub dc: i64,
}

impl Step {
    pub const ZERO: Step = Step { dr: 0, dc: 0 };

    /// The eight king-move offsets in raster order.
    pub const NEIGHBORS_8: [Step; 8] = [
        Step { dr: -1, dc: -1 },
        Step { dr: -1, dc: 0 },
        Step { dr: -1, dc: 1 },
        Step { dr: 0, dc: -1 },
        Step { dr: 0, dc: 1 },
        Step { dr: 1, dc: -1 },
        Step { dr: 1, dc: 0 },
        Step { dr: 1, dc: 1 },
    ];

    pub const fn new(dr: i64, dc: i64) -> Self {
        Self { dr, dc }
    }

    /// Offset that moves `from` onto `to`.
    pub fn between(from: GridCoord, to: GridCoord) -> Self {
        Self {
            dr: to.row as i64 - from.row as i64,
            dc: to.col as i64 - from.col as i64,
        }
    }

    pub fn is_zero(self) -> bool {
        self.dr == 0 && self.dc == 0
    }

    pub fn is_diagonal(self) -> bool {
        self.dr != 0 && self.dc != 0
    }

    pub fn length(self) -> f64 {
        ((self.dr * self.dr + self.dc * self.dc) as f64).sqrt()
    }

    /// Unit king-move in the direction of this offset (component-wise sign).
    pub fn signum(self) -> Self {
        Self {
            dr: self.dr.signum(),
            dc: self.dc.signum(),
        }
    }

    /// Rotate a quarter turn: `(dr, dc) -> (dc, -dr)`.
    pub fn orthogonal(self) -> Self {
        Self {
            dr: self.dc,
            dc: -self.dr,
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step({}, {})", self.dr, self.dc)
    }
}

impl Add for Step {
    type Output = Step;
    fn add(self, rhs: Step) -> Step {
        Step::new(self.dr + rhs.dr, self.dc + rhs.dc)
    }
}

impl Sub for Step {
    type Output = Step;
    fn sub(self, rhs: Step) -> Step {
        Step::new(self.dr - rhs.dr, self.dc - rhs.dc)
    }
}

impl Neg for Step {
    type Output = Step;
    fn neg(self) -> Step {
        Step::new(-self.dr, -self.dc)
    }
}

/// Dense row-major 2-D array.
#[derive(Clone, PartialEq)]
pub struct Raster<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: fmt::Debug> fmt::Debug for Raster<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("len", &self.data.len())
            .finish()
    }
}

impl<T: Clone> Raster<T> {
    /// Raster filled with `value`.
    pub fn new(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|v| *v = value.clone());
    }
}

impl<T> Raster<T> {
    /// Wrap row-major data; fails if the length does not match the shape.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> PtResult<Self> {
        if data.len() != rows * cols {
            return Err(PtError::IndexOob {
                what: "raster data length",
                index: data.len(),
                len: rows * cols,
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(GridCoord) -> T) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(GridCoord::new(row, col)));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Row-major flat index of a coordinate (unchecked against bounds).
    pub fn index_of(&self, coord: GridCoord) -> usize {
        coord.row * self.cols + coord.col
    }

    /// Coordinate of a row-major flat index.
    pub fn coord_of(&self, index: usize) -> GridCoord {
        GridCoord::new(index / self.cols, index % self.cols)
    }

    pub fn get(&self, coord: GridCoord) -> Option<&T> {
        if self.contains(coord) {
            Some(&self.data[self.index_of(coord)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut T> {
        if self.contains(coord) {
            let idx = self.index_of(coord);
            Some(&mut self.data[idx])
        } else {
            None
        }
    }

    /// Look up `coord + step`, `None` when that lands off the raster.
    pub fn get_offset(&self, coord: GridCoord, step: Step) -> Option<&T> {
        coord.offset(step).and_then(|c| self.get(c))
    }

    /// Store `value` at `coord`; fails when the coordinate is off the raster.
    pub fn set(&mut self, coord: GridCoord, value: T) -> PtResult<()> {
        let len = self.data.len();
        let idx = self.index_of(coord);
        match self.get_mut(coord) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(PtError::IndexOob {
                what: "raster coordinate",
                index: idx,
                len,
            }),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Row-major iteration with coordinates.
    pub fn iter_coords(&self) -> impl Iterator<Item = (GridCoord, &T)> + '_ {
        let cols = self.cols.max(1);
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (GridCoord::new(i / cols, i % cols), v))
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Raster<U> {
        Raster {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// In-bounds 8-connected neighbours of `coord`, in raster order.
    pub fn neighbors8(&self, coord: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        Step::NEIGHBORS_8
            .iter()
            .filter_map(move |&s| coord.offset(s))
            .filter(move |c| self.contains(*c))
    }

    pub fn ensure_same_shape<U>(&self, other: &Raster<U>) -> PtResult<()> {
        if self.shape() != other.shape() {
            return Err(PtError::ShapeMismatch {
                expected: self.shape(),
                actual: other.shape(),
            });
        }
        Ok(())
    }
}

impl<T> Index<GridCoord> for Raster<T> {
    type Output = T;
    fn index(&self, coord: GridCoord) -> &T {
        assert!(self.contains(coord), "coordinate {coord} outside raster");
        &self.data[coord.row * self.cols + coord.col]
    }
}

impl<T> IndexMut<GridCoord> for Raster<T> {
    fn index_mut(&mut self, coord: GridCoord) -> &mut T {
        assert!(self.contains(coord), "coordinate {coord} outside raster");
        let cols = self.cols;
        &mut self.data[coord.row * cols + coord.col]
    }
}

impl Raster<f64> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::new(rows, cols, 0.0)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Element-wise `self += scale * other`.
    pub fn add_scaled(&mut self, other: &Raster<f64>, scale: f64) -> PtResult<()> {
        self.ensure_same_shape(other)?;
        for (a, b) in self.data.iter_mut().zip(other.data.iter()) {
            *a += scale * b;
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn offset_by_between_lands_on_target(
            r0 in 0usize..200, c0 in 0usize..200,
            r1 in 0usize..200, c1 in 0usize..200,
        ) {
            let (a, b) = (GridCoord::new(r0, c0), GridCoord::new(r1, c1));
            let step = Step::between(a, b);
            prop_assert_eq!(a.offset(step), Some(b));
            prop_assert_eq!(b.offset(-step), Some(a));
            prop_assert!((a.distance(b) - step.length()).abs() < 1e-9);
            prop_assert!(a.chebyshev(b) as f64 <= a.distance(b) + 1e-9);
        }

        #[test]
        fn neighbors_stay_inside_raster(
            rows in 1usize..12, cols in 1usize..12,
            r in 0usize..12, c in 0usize..12,
        ) {
            prop_assume!(r < rows && c < cols);
            let raster = Raster::new(rows, cols, 0u8);
            let at = GridCoord::new(r, c);
            for n in raster.neighbors8(at) {
                prop_assert_eq!(at.chebyshev(n), 1);
                prop_assert!(n.row < rows && n.col < cols);
            }
        }
    }
}
