//! Per-cell resistance along a current path.

use pt_core::{GridCoord, Material, NetworkId, PtError, Raster, ensure_finite};
use pt_network::NetworkMap;
use tracing::{debug, warn};

use crate::centerline::{middle_path, path_steps, select_path};
use crate::clip::clip_terminals;
use crate::error::{CurrentError, CurrentResult};
use crate::fill::{gap_fill, smooth_positive};
use crate::route::find_route;
use crate::width::{paint_across, trace_width};

/// Resistance mapper configuration.
#[derive(Debug, Clone)]
pub struct MapperConfig {
    /// Half-size of the square smoothing window, in cells
    pub smoothing_radius: usize,
    /// Centerline is dropped when its end drifts more than this many times
    /// its start offset from the shortest route
    pub centerline_fallback_factor: f64,
    /// Largest direction change (cells) accepted between centerline runs
    pub drift_tolerance: f64,
    /// Steps averaged to find the approach direction at each terminal
    pub clip_window: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            smoothing_radius: 10,
            centerline_fallback_factor: 5.0,
            drift_tolerance: 1.0,
            clip_window: 4,
        }
    }
}

/// Resistance raster for one load.
#[derive(Debug, Clone)]
pub struct ResistanceMap {
    /// Ohms per cell at the given cell depth; zero off the current path's network
    pub resistance: Raster<f64>,
    /// Route the resistance was assigned along
    pub path: Vec<GridCoord>,
    /// Whether the centerline correction was kept
    pub used_centerline: bool,
}

impl ResistanceMap {
    fn empty(rows: usize, cols: usize) -> Self {
        Self {
            resistance: Raster::zeros(rows, cols),
            path: Vec::new(),
            used_centerline: false,
        }
    }
}

fn check_terminal(networks: &NetworkMap, at: GridCoord) -> CurrentResult<NetworkId> {
    let (rows, cols) = networks.shape();
    if at.row >= rows || at.col >= cols {
        return Err(CurrentError::TerminalOutOfBounds { at, rows, cols });
    }
    networks
        .network_at(at)
        .ok_or(CurrentError::TerminalNotConductor { at })
}

/// Map the resistance of the current path from `start` to `end`.
///
/// `cell_depth` is the copper thickness in the raster's length unit and
/// `material` supplies the resistivity. The result is zero outside the
/// network holding both terminals.
pub fn map_resistance(
    networks: &NetworkMap,
    start: GridCoord,
    end: GridCoord,
    cell_depth: f64,
    material: Material,
    config: &MapperConfig,
) -> CurrentResult<ResistanceMap> {
    let (rows, cols) = networks.shape();
    let start_net = check_terminal(networks, start)?;
    let end_net = check_terminal(networks, end)?;
    if start_net != end_net {
        return Err(CurrentError::TerminalsInDifferentNetworks {
            start: start_net,
            end: end_net,
        });
    }
    let rho = material
        .resistivity()
        .ok_or(CurrentError::MissingResistivity { material })?;
    let depth = ensure_finite(cell_depth, "cell depth")?;
    if depth <= 0.0 {
        return Err(PtError::InvalidArg {
            what: "cell depth must be positive",
        }
        .into());
    }

    if start == end {
        warn!(%start, "current path starts and ends on the same cell");
        return Ok(ResistanceMap::empty(rows, cols));
    }

    let mask = networks.mask(start_net)?;
    let short = find_route(&mask, start, end)?;
    let middle = middle_path(&mask, &short, config.drift_tolerance)?;
    let chosen = select_path(&mask, &short, &middle, config.centerline_fallback_factor);
    let used_centerline = std::ptr::eq(chosen, middle.as_slice());

    let steps = path_steps(chosen);
    let mut resistance = Raster::zeros(rows, cols);
    for (cell, step) in chosen.iter().zip(&steps) {
        let width = trace_width(&mask, *cell, *step)?;
        let r = rho / (width * width * depth);
        paint_across(&mask, &mut resistance, *cell, step.orthogonal(), r)?;
    }

    let filled = gap_fill(&mask, &mut resistance);
    let route_steps = path_steps(&short);
    clip_terminals(&mask, &mut resistance, start, end, &route_steps, config.clip_window)?;
    let resistance = smooth_positive(&resistance, config.smoothing_radius);

    debug!(
        network = %start_net,
        path_len = chosen.len(),
        used_centerline,
        filled,
        "mapped resistance"
    );

    Ok(ResistanceMap {
        resistance,
        path: chosen.to_vec(),
        used_centerline,
    })
}
