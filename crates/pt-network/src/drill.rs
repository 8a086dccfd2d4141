//! Via drilling applied to layer rasters.
//!
//! A drill pattern is shared by every layer of the board: plated barrel cells
//! connect copper through the stack and void cells remove material.

use pt_core::{CellState, Raster};
use tracing::debug;

use crate::error::{NetworkError, NetworkResult};

/// What a drill hole leaves behind in one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrillCell {
    #[default]
    None,
    /// Plated barrel wall; conducts on every layer.
    Plated,
    /// Open hole; no material at all.
    Void,
}

/// Apply `pattern` to one layer in place.
///
/// Void cells become [`CellState::Air`]. Plated cells become conductor where
/// the layer had insulator or air, so a barrel joins the pads it pierces
/// once the layer is segmented.
pub fn apply_drill(layer: &mut Raster<CellState>, pattern: &Raster<DrillCell>) -> NetworkResult<()> {
    if layer.shape() != pattern.shape() {
        return Err(NetworkError::ShapeMismatch {
            expected: layer.shape(),
            actual: pattern.shape(),
        });
    }

    let mut voided = 0usize;
    let mut plated = 0usize;
    for (cell, drill) in layer.as_mut_slice().iter_mut().zip(pattern.iter()) {
        match drill {
            DrillCell::None => {}
            DrillCell::Void => {
                *cell = CellState::Air;
                voided += 1;
            }
            DrillCell::Plated => {
                if !cell.is_conductor() {
                    *cell = CellState::Conductor;
                    plated += 1;
                }
            }
        }
    }

    debug!(voided, plated, "applied drill pattern");
    Ok(())
}
