//! Jacobi-preconditioned conjugate gradient.

use nalgebra::DVector;
use tracing::debug;

use crate::error::{ThermalError, ThermalResult};
use crate::sparse::CsrMatrix;

/// PCG configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct PcgConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Relative tolerance on the residual norm, against the right-hand side
    pub rel_tol: f64,
    /// Absolute tolerance on the residual norm
    pub abs_tol: f64,
}

impl Default for PcgConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20_000,
            rel_tol: 1e-10,
            abs_tol: 1e-12,
        }
    }
}

/// PCG result.
#[derive(Clone, Debug)]
pub struct PcgResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    pub iterations: usize,
}

/// Solve `a x = b` for symmetric positive definite `a`, starting from `x0`.
///
/// Every diagonal entry must be positive and finite.
pub fn pcg_solve(
    a: &CsrMatrix,
    b: &DVector<f64>,
    x0: DVector<f64>,
    config: &PcgConfig,
) -> ThermalResult<PcgResult> {
    let diag = a.diagonal();
    if let Some((index, &diagonal)) = diag
        .iter()
        .enumerate()
        .find(|&(_, d)| !(d.is_finite() && *d > 0.0))
    {
        return Err(ThermalError::Singular { index, diagonal });
    }
    let inv_diag = diag.map(|d| 1.0 / d);

    let mut x = x0;
    let mut r = b - a.mul_vec(&x);
    let b_norm = b.norm();
    let target = config.abs_tol.max(config.rel_tol * b_norm);
    let mut r_norm = r.norm();
    if r_norm <= target {
        return Ok(PcgResult {
            x,
            residual_norm: r_norm,
            iterations: 0,
        });
    }

    let mut z = r.component_mul(&inv_diag);
    let mut p = z.clone();
    let mut rz = r.dot(&z);
    let mut ap = DVector::zeros(a.dim());

    for iter in 1..=config.max_iterations {
        a.mul_vec_into(&p, &mut ap);
        let pap = p.dot(&ap);
        if !(pap.is_finite() && pap > 0.0) {
            return Err(ThermalError::LinearNotConverged {
                iterations: iter,
                residual: r_norm,
            });
        }
        let alpha = rz / pap;
        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);
        r_norm = r.norm();

        if r_norm <= target {
            debug!(iterations = iter, residual = r_norm, "pcg converged");
            return Ok(PcgResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        z = r.component_mul(&inv_diag);
        let rz_next = r.dot(&z);
        let beta = rz_next / rz;
        rz = rz_next;
        p.axpy(1.0, &z, beta);
    }

    Err(ThermalError::LinearNotConverged {
        iterations: config.max_iterations,
        residual: r_norm,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::TripletBuilder;

    /// 1-D rod: chain of unit conductances, grounded at both ends.
    fn rod(n: usize) -> CsrMatrix {
        let mut b = TripletBuilder::new(n);
        for i in 0..n {
            b.add(i, i, 2.0);
            if i + 1 < n {
                b.add(i, i + 1, -1.0);
                b.add(i + 1, i, -1.0);
            }
        }
        b.build()
    }

    #[test]
    fn solves_rod_with_point_source() {
        let a = rod(5);
        let mut rhs = DVector::zeros(5);
        rhs[2] = 2.0;
        let out = pcg_solve(&a, &rhs, DVector::zeros(5), &PcgConfig::default()).unwrap();
        let expected = [1.0, 2.0, 3.0, 2.0, 1.0];
        for (got, want) in out.x.iter().zip(expected) {
            assert!((got - want).abs() < 1e-8, "{got} vs {want}");
        }
        assert!(out.iterations <= 10);
    }

    #[test]
    fn exact_start_needs_no_iterations() {
        let a = rod(3);
        let x = DVector::from_vec(vec![1.0, 1.0, 1.0]);
        let rhs = a.mul_vec(&x);
        let out = pcg_solve(&a, &rhs, x, &PcgConfig::default()).unwrap();
        assert_eq!(out.iterations, 0);
    }

    #[test]
    fn zero_diagonal_is_singular() {
        let mut b = TripletBuilder::new(2);
        b.add(0, 0, 1.0);
        let a = b.build();
        let err = pcg_solve(&a, &DVector::zeros(2), DVector::zeros(2), &PcgConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ThermalError::Singular {
                index: 1,
                diagonal: 0.0
            }
        );
    }

    #[test]
    fn iteration_cap_is_reported() {
        let a = rod(50);
        let rhs = DVector::from_element(50, 1.0);
        let cfg = PcgConfig {
            max_iterations: 2,
            ..PcgConfig::default()
        };
        let err = pcg_solve(&a, &rhs, DVector::zeros(50), &cfg).unwrap_err();
        assert!(matches!(err, ThermalError::LinearNotConverged { iterations: 2, .. }));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::sparse::TripletBuilder;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn grounded_chain_converges(
            links in prop::collection::vec(0.01_f64..10.0, 1..40),
            leak in 0.001_f64..1.0,
            load in prop::collection::vec(-5.0_f64..5.0, 41),
        ) {
            let n = links.len() + 1;
            let mut b = TripletBuilder::new(n);
            for (i, &g) in links.iter().enumerate() {
                b.add(i, i, g);
                b.add(i + 1, i + 1, g);
                b.add(i, i + 1, -g);
                b.add(i + 1, i, -g);
            }
            for i in 0..n {
                b.add(i, i, leak);
            }
            let a = b.build();
            let rhs = DVector::from_column_slice(&load[..n]);
            let out = pcg_solve(&a, &rhs, DVector::zeros(n), &PcgConfig::default()).unwrap();
            let residual = (&rhs - a.mul_vec(&out.x)).norm();
            prop_assert!(residual <= 1e-9 * rhs.norm().max(1.0));
        }
    }
}
