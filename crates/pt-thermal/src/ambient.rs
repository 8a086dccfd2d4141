//! Mean board temperature by fixed-point iteration.
//!
//! Guesses the board's rise `dt` over ambient, computes free-convection and
//! radiation outflow for a plate of the board's dimensions, and corrects
//! `dt` until outflow matches the dissipated power. The converged face
//! coefficients are reused when linearizing every exposed cell.

use pt_core::units::constants::{C_TO_K, SIGMA_W_PER_IN2_K4};
use tracing::{debug, info};

use crate::air::{EMISSIVITY, PRANDTL, air_properties};
use crate::board::BoardDims;
use crate::error::{ThermalError, ThermalResult};
use crate::settings::{AmbientConfig, Corrections};

const RA_TURBULENT_TOP: f64 = 8e6;
const RA_TURBULENT_SIDE: f64 = 1e9;

/// Free-convection coefficients per face type, W / (in² K).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceCoefficients {
    pub top: f64,
    pub side: f64,
    pub bottom: f64,
}

/// Result of the ambient fixed point.
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientEstimate {
    pub ambient_c: f64,
    /// Board rise over ambient (C)
    pub delta_c: f64,
    pub coefficients: FaceCoefficients,
    pub iterations: usize,
}

impl AmbientEstimate {
    /// Uniform board temperature seeding the field.
    pub fn board_c(&self) -> f64 {
        self.ambient_c + self.delta_c
    }
}

#[derive(Clone, Copy, Debug)]
struct Outflow {
    watts: f64,
    coefficients: FaceCoefficients,
}

/// Convection and radiation from the whole board at rise `dt`.
fn board_outflow(dt: f64, ambient_c: f64, dims: BoardDims, corr: &Corrections) -> Outflow {
    let BoardDims { l, w, h } = dims;
    let surface_c = ambient_c + dt;
    let film_c = (surface_c + ambient_c) / 2.0;
    let air = air_properties(film_c);
    let beta = 1.0 / (ambient_c + C_TO_K);

    let ra_per_p3 = air.g_over_nu2 * beta * dt * PRANDTL;
    let p_top_btm = w * l / (2.0 * (w + l));
    let p_side = h;
    let ra_top_btm = ra_per_p3 * p_top_btm.powi(3);
    let ra_side = ra_per_p3 * p_side.powi(3);

    let (c_top, n_top) = if ra_top_btm < RA_TURBULENT_TOP {
        (0.54, 0.25)
    } else {
        (0.15, 1.0 / 3.0)
    };
    let (c_side, n_side) = if ra_side < RA_TURBULENT_SIDE {
        (0.59, 0.25)
    } else {
        (0.13, 1.0 / 3.0)
    };
    let (c_btm, n_btm) = (0.27, 0.25);

    let k = air.conductivity;
    let coefficients = FaceCoefficients {
        top: c_top * k * ra_top_btm.powf(n_top) / p_top_btm / corr.convection,
        side: c_side * k * ra_side.powf(n_side) / p_side / corr.convection,
        bottom: c_btm * k * ra_top_btm.powf(n_btm) / p_top_btm / corr.convection,
    };

    let q_conv = coefficients.top * l * w * dt
        + coefficients.side * (2.0 * w * h + 2.0 * l * h) * dt
        + coefficients.bottom * l * w * dt;

    let tsk = surface_c + C_TO_K;
    let tak = ambient_c + C_TO_K;
    let cr = 2.0 * EMISSIVITY * SIGMA_W_PER_IN2_K4 * (w * l + h * l + h * w) / corr.radiation_divisor(dt);
    let q_rad = cr * (tsk.powi(4) - tak.powi(4));

    Outflow {
        watts: q_conv + q_rad,
        coefficients,
    }
}

/// Solve for the board's mean rise over `ambient_c` at `total_power_w`.
///
/// Zero (or negative) dissipation converges immediately to `dt = 0`.
pub fn estimate_ambient(
    total_power_w: f64,
    ambient_c: f64,
    dims: BoardDims,
    corrections: &Corrections,
    config: &AmbientConfig,
) -> ThermalResult<AmbientEstimate> {
    if total_power_w <= 0.0 {
        let out = board_outflow(0.0, ambient_c, dims, corrections);
        info!(ambient_c, "no dissipation, board at ambient");
        return Ok(AmbientEstimate {
            ambient_c,
            delta_c: 0.0,
            coefficients: out.coefficients,
            iterations: 0,
        });
    }

    let mut dt = config.initial_delta_c;
    for iteration in 1..=config.max_iterations {
        let out = board_outflow(dt, ambient_c, dims, corrections);
        let error = total_power_w - out.watts;
        let delta = if error > 0.0 {
            error / total_power_w
        } else {
            -config.overshoot_shrink * dt
        };
        dt += delta;
        debug!(iteration, dt, q_out = out.watts, "ambient fixed point");

        if !dt.is_finite() {
            return Err(ThermalError::AmbientNotConverged {
                iterations: iteration,
                delta_c: dt,
            });
        }
        if delta.abs() <= config.tolerance_c {
            info!(dt, iterations = iteration, "ambient estimate converged");
            return Ok(AmbientEstimate {
                ambient_c,
                delta_c: dt,
                coefficients: out.coefficients,
                iterations: iteration,
            });
        }
    }

    Err(ThermalError::AmbientNotConverged {
        iterations: config.max_iterations,
        delta_c: dt,
    })
}
