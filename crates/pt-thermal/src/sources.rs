//! Component dissipation spread over the copper under each footprint.

use std::ops::Range;

use pt_core::units::to_mil;
use pt_core::{GridCoord, Raster, ceil_snapped};
use tracing::{debug, warn};

use crate::ambient::AmbientEstimate;
use crate::board::{BoardSide, BoardVolume, Component};
use crate::error::{ThermalError, ThermalResult};
use crate::field::TemperatureField;
use crate::htc::{BoundaryDir, face_for, surface_htc};
use crate::settings::ThermalSettings;

fn span(center: f64, extent: f64, res: f64, limit: usize) -> Range<usize> {
    let to_cell = |v: f64| {
        let cells = v / res;
        (ceil_snapped(cells).max(0.0) as usize).min(limit)
    };
    to_cell(center - extent / 2.0)..to_cell(center + extent / 2.0)
}

/// Row and column ranges covered by a component, clipped to the raster.
pub fn footprint(component: &Component, resolution_mil: f64, rows: usize, cols: usize) -> (Range<usize>, Range<usize>) {
    (
        span(to_mil(component.x), to_mil(component.width), resolution_mil, rows),
        span(to_mil(component.y), to_mil(component.length), resolution_mil, cols),
    )
}

/// Heat injected per cell for every layer, W.
///
/// Each component loses part of its heat from its own body at the mean
/// temperature of the copper under it; the remainder is split evenly over
/// those copper cells on the mounting layer.
pub fn component_heat(
    board: &BoardVolume,
    field: &TemperatureField,
    ambient: &AmbientEstimate,
    settings: &ThermalSettings,
) -> ThermalResult<Vec<Raster<f64>>> {
    let (rows, cols) = (board.rows(), board.cols());
    let mut heat: Vec<Raster<f64>> = (0..board.layer_count()).map(|_| Raster::zeros(rows, cols)).collect();
    let res = board.resolution_mil();

    for component in board.components() {
        let Some(k) = board.mounting_layer(component.side) else {
            return Err(ThermalError::Setup {
                what: format!("no conductor layer to mount '{}'", component.name),
            });
        };
        let layer = &board.layers()[k];
        let (row_span, col_span) = footprint(component, res, rows, cols);

        let mut cells = Vec::new();
        for row in row_span {
            for col in col_span.clone() {
                let at = GridCoord::new(row, col);
                if layer.cells[at].is_conductor() {
                    cells.push(at);
                }
            }
        }
        if cells.is_empty() {
            return Err(ThermalError::NoExposedCells {
                component: component.name.clone(),
            });
        }

        let mean_c = cells.iter().filter_map(|&at| field.get(k, at)).sum::<f64>() / cells.len() as f64;
        let dir = match component.side {
            BoardSide::Top => BoundaryDir::LayerAbove,
            BoardSide::Bottom => BoundaryDir::LayerBelow,
        };
        let face = face_for(settings.orientation, dir);
        let htc = surface_htc(
            face,
            &ambient.coefficients,
            mean_c,
            settings.ambient_c,
            &settings.corrections,
        );
        let body_area = to_mil(component.width) * to_mil(component.length);
        let body_loss = htc * settings.corrections.component_htc * body_area * (mean_c - settings.ambient_c);

        let mut remainder = component.heat_w() - body_loss;
        if remainder < 0.0 {
            warn!(
                component = %component.name,
                heat_w = component.heat_w(),
                body_loss,
                "component body sheds more than its heat, injecting none"
            );
            remainder = 0.0;
        }
        let per_cell = remainder / cells.len() as f64;
        debug!(
            component = %component.name,
            layer = k,
            cells = cells.len(),
            injected_w = remainder,
            "component heat"
        );
        for at in cells {
            heat[k][at] += per_cell;
        }
    }
    Ok(heat)
}
