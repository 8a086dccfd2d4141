//! Error types for the pt-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI one error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Drilling failed: {0}")]
    Network(String),

    #[error("Load '{load}' on layer '{layer}' failed: {message}")]
    Load {
        load: String,
        layer: String,
        message: String,
    },

    #[error("Thermal solve did not converge: {0}")]
    Convergence(String),

    #[error("Thermal system is singular: {0}")]
    SingularSystem(String),

    #[error("Component '{component}' has no copper to heat: {message}")]
    Coverage { component: String, message: String },

    #[error("Thermal solve failed: {0}")]
    Thermal(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pt-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<pt_project::ProjectError> for AppError {
    fn from(err: pt_project::ProjectError) -> Self {
        match err {
            pt_project::ProjectError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<pt_project::ValidationError> for AppError {
    fn from(err: pt_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<pt_network::NetworkError> for AppError {
    fn from(err: pt_network::NetworkError) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<pt_thermal::ThermalError> for AppError {
    fn from(err: pt_thermal::ThermalError) -> Self {
        use pt_thermal::ThermalError;
        let message = err.to_string();
        match err {
            ThermalError::AmbientNotConverged { .. } | ThermalError::LinearNotConverged { .. } => {
                AppError::Convergence(message)
            }
            ThermalError::Singular { .. } => AppError::SingularSystem(message),
            ThermalError::NoExposedCells { component } => AppError::Coverage { component, message },
            _ => AppError::Thermal(message),
        }
    }
}


impl From<pt_core::PtError> for AppError {
    fn from(err: pt_core::PtError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
