//! Compressed sparse row storage for the conductance matrix.

use nalgebra::DVector;

/// Accumulates `(row, col, value)` entries; duplicates are summed on build.
#[derive(Clone, Debug, Default)]
pub struct TripletBuilder {
    n: usize,
    entries: Vec<(usize, usize, f64)>,
}

impl TripletBuilder {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(n: usize, capacity: usize) -> Self {
        Self {
            n,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.n && col < self.n);
        self.entries.push((row, col, value));
    }

    pub fn build(mut self) -> CsrMatrix {
        self.entries.sort_unstable_by_key(|&(r, c, _)| (r, c));

        let mut row_ptr = vec![0usize; self.n + 1];
        let mut col_idx = Vec::with_capacity(self.entries.len());
        let mut values: Vec<f64> = Vec::with_capacity(self.entries.len());
        let mut last: Option<(usize, usize)> = None;

        for (r, c, v) in self.entries {
            if last == Some((r, c)) {
                if let Some(tail) = values.last_mut() {
                    *tail += v;
                }
                continue;
            }
            col_idx.push(c);
            values.push(v);
            row_ptr[r + 1] += 1;
            last = Some((r, c));
        }
        for i in 0..self.n {
            row_ptr[i + 1] += row_ptr[i];
        }

        CsrMatrix {
            n: self.n,
            row_ptr,
            col_idx,
            values,
        }
    }
}

/// Square sparse matrix in CSR layout.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    n: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored `(col, value)` pairs of one row, columns ascending.
    pub fn row(&self, r: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let span = self.row_ptr[r]..self.row_ptr[r + 1];
        self.col_idx[span.clone()]
            .iter()
            .copied()
            .zip(self.values[span].iter().copied())
    }

    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.row(r).find(|&(col, _)| col == c).map_or(0.0, |(_, v)| v)
    }

    pub fn diagonal(&self) -> DVector<f64> {
        DVector::from_fn(self.n, |i, _| self.get(i, i))
    }

    pub fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut y = DVector::zeros(self.n);
        self.mul_vec_into(x, &mut y);
        y
    }

    pub fn mul_vec_into(&self, x: &DVector<f64>, y: &mut DVector<f64>) {
        for r in 0..self.n {
            y[r] = self.row(r).map(|(c, v)| v * x[c]).sum();
        }
    }

    /// Sum of each row; zero rows mean no coupling to ambient.
    pub fn row_sums(&self) -> DVector<f64> {
        DVector::from_fn(self.n, |i, _| self.row(i).map(|(_, v)| v).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_summed() {
        let mut b = TripletBuilder::new(3);
        b.add(0, 0, 1.0);
        b.add(2, 1, -1.0);
        b.add(0, 0, 2.0);
        b.add(1, 1, 4.0);
        b.add(2, 2, 5.0);
        let m = b.build();
        assert_eq!(m.nnz(), 4);
        assert_eq!(m.get(0, 0), 3.0);
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.diagonal().as_slice(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn mul_vec_matches_dense() {
        let mut b = TripletBuilder::new(2);
        b.add(0, 0, 2.0);
        b.add(0, 1, -1.0);
        b.add(1, 0, -1.0);
        b.add(1, 1, 3.0);
        let m = b.build();
        let y = m.mul_vec(&DVector::from_vec(vec![1.0, 2.0]));
        assert_eq!(y.as_slice(), &[0.0, 5.0]);
        assert_eq!(m.row_sums().as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn empty_rows_are_allowed() {
        let mut b = TripletBuilder::new(3);
        b.add(2, 2, 1.0);
        let m = b.build();
        assert_eq!(m.row(0).count(), 0);
        assert_eq!(m.row(1).count(), 0);
        assert_eq!(m.get(2, 2), 1.0);
    }
}
