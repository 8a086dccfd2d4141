//! Query and export helpers for finished runs.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use pt_core::{GridCoord, Raster};
use pt_thermal::LayerKind;

use crate::error::{AppError, AppResult};
use crate::run_service::RunResponse;

/// Temperature and loss summary of one layer.
#[derive(Debug, Clone)]
pub struct LayerStats {
    pub name: String,
    pub kind: LayerKind,
    pub min_c: f64,
    pub mean_c: f64,
    pub max_c: f64,
    pub loss_w: f64,
    pub network_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub layer: String,
    pub coord: GridCoord,
    pub temperature_c: f64,
}

/// Per-cell quantity available for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Temperature,
    Loss,
    /// Network label, 0 off copper
    Network,
}

impl Quantity {
    pub fn name(self) -> &'static str {
        match self {
            Quantity::Temperature => "temperature",
            Quantity::Loss => "loss",
            Quantity::Network => "network",
        }
    }
}

impl FromStr for Quantity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "temperature" | "temp" => Ok(Quantity::Temperature),
            "loss" => Ok(Quantity::Loss),
            "network" | "networks" => Ok(Quantity::Network),
            other => Err(AppError::InvalidInput(format!(
                "Unknown quantity '{other}' (expected temperature, loss or network)"
            ))),
        }
    }
}

pub fn layer_stats(response: &RunResponse) -> Vec<LayerStats> {
    let field = &response.solution.field;
    response
        .layers
        .iter()
        .enumerate()
        .filter_map(|(k, layer)| {
            let plane = field.layer(k)?;
            let values = plane.as_slice();
            let min_c = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max_c = plane.max_value();
            let mean_c = plane.sum() / values.len().max(1) as f64;
            Some(LayerStats {
                name: layer.name.clone(),
                kind: layer.kind,
                min_c,
                mean_c,
                max_c,
                loss_w: layer.total_loss_w,
                network_count: layer.network_count(),
            })
        })
        .collect()
}

pub fn hottest(response: &RunResponse) -> Option<Hotspot> {
    let (cell, temperature_c) = response.solution.field.hottest()?;
    let layer = response.layers.get(cell.layer)?;
    Some(Hotspot {
        layer: layer.name.clone(),
        coord: GridCoord::new(cell.row, cell.col),
        temperature_c,
    })
}

/// One quantity of one layer as a raster.
pub fn layer_raster(response: &RunResponse, layer: &str, quantity: Quantity) -> AppResult<Raster<f64>> {
    let k = response
        .layer_index(layer)
        .ok_or_else(|| AppError::LayerNotFound(layer.to_string()))?;
    let result = &response.layers[k];
    match quantity {
        Quantity::Temperature => response
            .solution
            .field
            .layer(k)
            .ok_or_else(|| AppError::LayerNotFound(layer.to_string())),
        Quantity::Loss => Ok(result.loss.clone()),
        Quantity::Network => match &result.networks {
            Some(networks) => Ok(networks.to_raw().map(|&id| f64::from(id))),
            None => Err(AppError::InvalidInput(format!(
                "Layer '{layer}' is not a conductor layer and has no networks"
            ))),
        },
    }
}

/// One line per raster row, comma separated.
pub fn raster_to_csv(raster: &Raster<f64>) -> String {
    let mut out = String::new();
    for row in 0..raster.rows() {
        let line = raster
            .row(row)
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{line}");
    }
    out
}

fn write_file(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}

pub fn export_layer_csv(response: &RunResponse, layer: &str, quantity: Quantity, path: &Path) -> AppResult<()> {
    let raster = layer_raster(response, layer, quantity)?;
    write_file(path, &raster_to_csv(&raster))
}

/// Export temperature for every layer, plus loss and network labels for
/// conductor layers, as `<layer>_<quantity>.csv` under `dir`.
pub fn export_all(response: &RunResponse, dir: &Path) -> AppResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for layer in &response.layers {
        let quantities: &[Quantity] = if layer.kind == LayerKind::Conductor {
            &[Quantity::Temperature, Quantity::Loss, Quantity::Network]
        } else {
            &[Quantity::Temperature]
        };
        for &quantity in quantities {
            let path = dir.join(format!("{}_{}.csv", layer.name, quantity.name()));
            export_layer_csv(response, &layer.name, quantity, &path)?;
            written.push(path);
        }
    }
    Ok(written)
}
