use crate::PtError;

/// Scalar type of rasters and solver vectors.
pub type Real = f64;

/// Absolute and relative closeness thresholds.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Snap window for cell counts that unit conversion leaves a hair off a
/// whole number.
pub const GRID_SNAP: Tolerances = Tolerances { abs: 1e-9, rel: 1e-12 };

/// `v.ceil()`, except values within [`GRID_SNAP`] of an integer round to it.
pub fn ceil_snapped(v: Real) -> Real {
    let nearest = v.round();
    if nearly_equal(v, nearest, GRID_SNAP) { nearest } else { v.ceil() }
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, PtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PtError::NonFinite { what, value: v })
    }
}

/// Two conductances in series: `1 / (1/a + 1/b)`.
///
/// A zero on either side yields zero rather than a division by zero.
pub fn series(a: Real, b: Real) -> Real {
    if a <= 0.0 || b <= 0.0 {
        return 0.0;
    }
    a * b / (a + b)
}

/// Piecewise-linear lookup over a sorted table, clamped at both ends.
///
/// Returns the interpolated value and whether clamping happened.
pub fn interp_clamped(xs: &[Real], ys: &[Real], x: Real) -> (Real, bool) {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 0 {
        return (Real::NAN, true);
    }
    if x <= xs[0] {
        return (ys[0], x < xs[0]);
    }
    if x >= xs[n - 1] {
        return (ys[n - 1], x > xs[n - 1]);
    }
    let hi = xs.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    (ys[lo] + t * (ys[hi] - ys[lo]), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ceil_snapped_absorbs_roundoff() {
        assert_eq!(ceil_snapped(3.000_000_000_01), 3.0);
        assert_eq!(ceil_snapped(2.999_999_999_99), 3.0);
        assert_eq!(ceil_snapped(3.2), 4.0);
        assert_eq!(ceil_snapped(0.25), 1.0);
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn series_of_equal_halves() {
        assert!((series(4.0, 4.0) - 2.0).abs() < 1e-12);
        assert_eq!(series(0.0, 3.0), 0.0);
    }

    #[test]
    fn interp_inside_and_clamped() {
        let xs = [0.0, 10.0, 20.0];
        let ys = [1.0, 3.0, 7.0];
        assert_eq!(interp_clamped(&xs, &ys, 5.0), (2.0, false));
        assert_eq!(interp_clamped(&xs, &ys, 15.0), (5.0, false));
        assert_eq!(interp_clamped(&xs, &ys, 20.0), (7.0, false));
        assert_eq!(interp_clamped(&xs, &ys, -1.0), (1.0, true));
        assert_eq!(interp_clamped(&xs, &ys, 99.0), (7.0, true));
    }
}
