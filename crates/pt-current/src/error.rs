//! Error types for current-path resistance mapping.

use pt_core::{GridCoord, Material, NetworkId, PtError, Step};
use pt_network::NetworkError;
use thiserror::Error;

/// Failures while mapping a load onto its conductor network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurrentError {
    #[error("Terminal {at} lies outside the {rows}x{cols} layer")]
    TerminalOutOfBounds {
        at: GridCoord,
        rows: usize,
        cols: usize,
    },

    #[error("Terminal {at} is not on a conductor")]
    TerminalNotConductor { at: GridCoord },

    #[error("Terminals lie in different networks ({start} and {end})")]
    TerminalsInDifferentNetworks { start: NetworkId, end: NetworkId },

    #[error("No conductor route from {start} to {end}")]
    NoRoute { start: GridCoord, end: GridCoord },

    #[error("Trace geometry error at {at} (step {step:?}): {what}")]
    Geometry {
        at: GridCoord,
        step: Step,
        what: &'static str,
    },

    #[error("Material {material} has no electrical resistivity")]
    MissingResistivity { material: Material },

    #[error("Invalid load '{name}': {what}")]
    InvalidLoad { name: String, what: &'static str },

    #[error("Load '{name}': {source}")]
    LoadFailed {
        name: String,
        #[source]
        source: Box<CurrentError>,
    },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Core error: {0}")]
    Core(#[from] PtError),
}

impl CurrentError {
    /// `true` for errors caused by where the terminals sit relative to the copper.
    pub fn is_topology(&self) -> bool {
        match self {
            CurrentError::LoadFailed { source, .. } => source.is_topology(),
            other => matches!(
                other,
                CurrentError::TerminalOutOfBounds { .. }
                    | CurrentError::TerminalNotConductor { .. }
                    | CurrentError::TerminalsInDifferentNetworks { .. }
                    | CurrentError::NoRoute { .. }
            ),
        }
    }

    /// Name of the load a failure was raised for, if known.
    pub fn load_name(&self) -> Option<&str> {
        match self {
            CurrentError::LoadFailed { name, .. } | CurrentError::InvalidLoad { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Innermost failure, without the load context.
    pub fn root(&self) -> &CurrentError {
        match self {
            CurrentError::LoadFailed { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type CurrentResult<T> = Result<T, CurrentError>;
