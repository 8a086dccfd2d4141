//! Error types for thermal assembly and solving.

use pt_core::PtError;
use thiserror::Error;

/// Errors raised while estimating, assembling, or solving the thermal network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermalError {
    #[error("Board setup error: {what}")]
    Setup { what: String },

    #[error("Ambient temperature estimate did not converge after {iterations} iterations (dt = {delta_c} C)")]
    AmbientNotConverged { iterations: usize, delta_c: f64 },

    #[error("Linear solve did not converge after {iterations} iterations (residual {residual:e})")]
    LinearNotConverged { iterations: usize, residual: f64 },

    #[error("Conductance system is singular at cell {index}: diagonal {diagonal}")]
    Singular { index: usize, diagonal: f64 },

    #[error("Component '{component}' covers no exposed conductor cells")]
    NoExposedCells { component: String },

    #[error("Invalid solver state: {what}")]
    InvalidState { what: String },

    #[error("Core error: {0}")]
    Core(#[from] PtError),
}

pub type ThermalResult<T> = Result<T, ThermalError>;
