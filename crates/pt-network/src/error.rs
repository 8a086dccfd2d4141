//! Network-specific error types.

use pt_core::NetworkId;

/// Segmentation and drilling errors.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// A network ID was requested that this layer does not contain.
    UnknownNetwork { id: NetworkId },

    /// A raster handed in does not match the layer's extents.
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
}

pub type NetworkResult<T> = Result<T, NetworkError>;

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::UnknownNetwork { id } => {
                write!(f, "Network {} does not exist on this layer", id)
            }
            NetworkError::ShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "Raster is {}x{} but the layer is {}x{}",
                    actual.0, actual.1, expected.0, expected.1
                )
            }
        }
    }
}

impl std::error::Error for NetworkError {}
