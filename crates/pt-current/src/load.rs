//! Electric loads and the joule-loss raster they produce.

use pt_core::units::{Current, to_amps};
use pt_core::{GridCoord, Material, Raster};
use pt_network::NetworkMap;
use tracing::{debug, info};

use crate::error::{CurrentError, CurrentResult};
use crate::mapper::{MapperConfig, map_resistance};

/// A named current drawn between two terminals on one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectricLoad {
    pub name: String,
    pub current: Current,
    pub start: GridCoord,
    pub end: GridCoord,
}

impl ElectricLoad {
    pub fn new(name: impl Into<String>, current: Current, start: GridCoord, end: GridCoord) -> Self {
        Self {
            name: name.into(),
            current,
            start,
            end,
        }
    }

    pub fn current_amps(&self) -> f64 {
        to_amps(self.current)
    }
}

/// Cumulative joule loss per cell of one layer, in watts.
#[derive(Debug, Clone)]
pub struct LossMap {
    watts: Raster<f64>,
}

impl LossMap {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            watts: Raster::zeros(rows, cols),
        }
    }

    /// Add `current² · resistance` to every cell.
    pub fn add(&mut self, resistance: &Raster<f64>, current_amps: f64) -> CurrentResult<()> {
        self.watts.add_scaled(resistance, current_amps * current_amps)?;
        Ok(())
    }

    pub fn raster(&self) -> &Raster<f64> {
        &self.watts
    }

    pub fn into_raster(self) -> Raster<f64> {
        self.watts
    }

    pub fn total_watts(&self) -> f64 {
        self.watts.sum()
    }
}

/// Map every load on a layer and sum their losses.
///
/// A layer without loads yields an all-zero map. The first failing load
/// aborts the layer.
pub fn accumulate_losses(
    networks: &NetworkMap,
    loads: &[ElectricLoad],
    cell_depth: f64,
    material: Material,
    config: &MapperConfig,
) -> CurrentResult<LossMap> {
    let (rows, cols) = networks.shape();
    let mut losses = LossMap::new(rows, cols);

    for load in loads {
        let amps = load.current_amps();
        if !amps.is_finite() {
            return Err(CurrentError::InvalidLoad {
                name: load.name.clone(),
                what: "current is not finite",
            });
        }
        let in_load = |source: CurrentError| CurrentError::LoadFailed {
            name: load.name.clone(),
            source: Box::new(source),
        };
        let map = map_resistance(networks, load.start, load.end, cell_depth, material, config)
            .map_err(&in_load)?;
        losses.add(&map.resistance, amps).map_err(&in_load)?;
        debug!(
            load = %load.name,
            amps,
            path_len = map.path.len(),
            "load mapped"
        );
    }

    info!(
        loads = loads.len(),
        total_w = losses.total_watts(),
        "layer losses accumulated"
    );
    Ok(losses)
}
