//! Linear conductance system `G T = q` over every cell of the board.
//!
//! Each cell is a node. Neighbouring cells couple through the series
//! conductance of their two half-cells; faces on the volume boundary couple
//! to ambient through the half-cell in series with the linearized surface
//! coefficient at the cell's current temperature.

use nalgebra::DVector;
use pt_core::{CellState, Conductivity, GridCoord, Raster, series};
use tracing::debug;

use crate::ambient::AmbientEstimate;
use crate::board::BoardVolume;
use crate::error::{ThermalError, ThermalResult};
use crate::field::TemperatureField;
use crate::htc::{BoundaryDir, face_for, surface_htc};
use crate::settings::ThermalSettings;
use crate::sparse::{CsrMatrix, TripletBuilder};

/// Assembled conductance matrix (W / K) and source vector (W).
#[derive(Clone, Debug)]
pub struct ConductanceSystem {
    pub matrix: CsrMatrix,
    pub rhs: DVector<f64>,
}

impl ConductanceSystem {
    pub fn dim(&self) -> usize {
        self.matrix.dim()
    }
}

/// Corrected conductivity of a cell, W / (mil K).
fn effective_conductivity(board: &BoardVolume, layer: usize, state: CellState, settings: &ThermalSettings) -> Conductivity {
    let bulk = board.cell_conductivity(layer, state, settings.void_fill);
    let c = &settings.corrections;
    let corrected = match state {
        CellState::Conductor => Conductivity {
            through_plane: bulk.through_plane / c.cond_thru_plane,
            in_plane: bulk.in_plane / c.cond_in_plane,
        },
        CellState::Insulator => Conductivity {
            through_plane: bulk.through_plane / c.diel_thru_plane,
            in_plane: bulk.in_plane / c.diel_in_plane,
        },
        CellState::Air => bulk,
    };
    corrected.per_mil()
}

/// Conductance from a cell's centre to one of its faces, W / K.
fn half_cell(k: Conductivity, res: f64, thickness: f64, through_plane: bool) -> f64 {
    if through_plane {
        k.through_plane * res * res / (thickness / 2.0)
    } else {
        k.in_plane * res * thickness / (res / 2.0)
    }
}

/// Build `G T = q` linearized at `field`.
///
/// `extra_heat` holds per-layer injected watts (component dissipation) on
/// top of each layer's joule loss.
pub fn assemble(
    board: &BoardVolume,
    field: &TemperatureField,
    ambient: &AmbientEstimate,
    settings: &ThermalSettings,
    extra_heat: &[Raster<f64>],
) -> ThermalResult<ConductanceSystem> {
    if extra_heat.len() != board.layer_count() {
        return Err(ThermalError::Setup {
            what: format!(
                "{} heat layers for a {}-layer board",
                extra_heat.len(),
                board.layer_count()
            ),
        });
    }
    let (layers, rows, cols) = (board.layer_count(), board.rows(), board.cols());
    let n = board.cell_count();
    let res = board.resolution_mil();
    let ta = settings.ambient_c;

    let conductivity: Vec<Conductivity> = board
        .layers()
        .iter()
        .enumerate()
        .flat_map(|(k, layer)| {
            layer
                .cells
                .iter()
                .map(move |&state| effective_conductivity(board, k, state, settings))
        })
        .collect();
    let thickness: Vec<f64> = board.layers().iter().map(|l| l.thickness_mil()).collect();

    let mut triplets = TripletBuilder::with_capacity(n, n * 7);
    let mut diagonal = vec![0.0; n];
    let mut rhs = DVector::zeros(n);

    for k in 0..layers {
        let layer = &board.layers()[k];
        for row in 0..rows {
            for col in 0..cols {
                let i = board.flat_index(k, row, col);
                let at = GridCoord::new(row, col);
                rhs[i] += layer.loss[at] + extra_heat[k][at];

                for dir in BoundaryDir::ALL {
                    let through = dir.is_through_plane();
                    let g_self = half_cell(conductivity[i], res, thickness[k], through);
                    let (dk, dr, dc) = dir.offset();
                    let nk = k as isize + dk;
                    let nr = row as isize + dr;
                    let nc = col as isize + dc;
                    let inside = (0..layers as isize).contains(&nk)
                        && (0..rows as isize).contains(&nr)
                        && (0..cols as isize).contains(&nc);

                    if inside {
                        // Each interior pair is stamped once, from its lower index.
                        let (nk, nr, nc) = (nk as usize, nr as usize, nc as usize);
                        let j = board.flat_index(nk, nr, nc);
                        if j < i {
                            continue;
                        }
                        let g_nb = half_cell(conductivity[j], res, thickness[nk], through);
                        let g = series(g_self, g_nb);
                        diagonal[i] += g;
                        diagonal[j] += g;
                        triplets.add(i, j, -g);
                        triplets.add(j, i, -g);
                    } else {
                        let area = if through { res * res } else { res * thickness[k] };
                        let surface_c = field.get(k, at).unwrap_or(ta);
                        let htc = surface_htc(
                            face_for(settings.orientation, dir),
                            &ambient.coefficients,
                            surface_c,
                            ta,
                            &settings.corrections,
                        );
                        let g = series(g_self, htc * area);
                        diagonal[i] += g;
                        rhs[i] += g * ta;
                    }
                }
            }
        }
    }

    for (i, &d) in diagonal.iter().enumerate() {
        if !(d.is_finite() && d > 0.0) {
            return Err(ThermalError::Singular { index: i, diagonal: d });
        }
        triplets.add(i, i, d);
    }
    let matrix = triplets.build();
    debug!(cells = n, nnz = matrix.nnz(), "assembled conductance system");
    Ok(ConductanceSystem { matrix, rhs })
}
