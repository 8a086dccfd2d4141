//! The 3-D board volume: an ordered layer stack plus mounted components.

use pt_core::units::{Length, Power, to_mil, to_watts};
use pt_core::{CellState, Conductivity, Material, Raster};

use crate::error::{ThermalError, ThermalResult};
use crate::settings::BoardOrientation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Conductor,
    Dielectric,
    SolderMask,
}

/// One layer of the stack.
#[derive(Clone, Debug)]
pub struct BoardLayer {
    pub name: String,
    pub kind: LayerKind,
    pub thickness: Length,
    pub cells: Raster<CellState>,
    /// Joule loss per cell, W
    pub loss: Raster<f64>,
}

impl BoardLayer {
    /// Layer with no joule loss.
    pub fn new(name: impl Into<String>, kind: LayerKind, thickness: Length, cells: Raster<CellState>) -> Self {
        let (rows, cols) = cells.shape();
        Self {
            name: name.into(),
            kind,
            thickness,
            cells,
            loss: Raster::zeros(rows, cols),
        }
    }

    pub fn with_loss(mut self, loss: Raster<f64>) -> Self {
        self.loss = loss;
        self
    }

    pub fn thickness_mil(&self) -> f64 {
        to_mil(self.thickness)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardSide {
    Top,
    Bottom,
}

/// A heat-dissipating part with a rectangular footprint.
///
/// `x` runs along raster rows and `y` along raster columns; `width` spans
/// `x` and `length` spans `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    pub name: String,
    pub width: Length,
    pub length: Length,
    pub x: Length,
    pub y: Length,
    pub heat: Power,
    pub side: BoardSide,
}

impl Component {
    pub fn heat_w(&self) -> f64 {
        to_watts(self.heat)
    }
}

/// Bulk materials of the stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardMaterials {
    /// Copper traces, pours and plating
    pub conductor: Material,
    /// Laminate between conductor layers
    pub dielectric: Material,
    pub solder_mask: Material,
    /// Exposed conductor on solder-mask layers
    pub plating: Material,
}

impl Default for BoardMaterials {
    fn default() -> Self {
        Self {
            conductor: Material::Copper,
            dielectric: Material::Fr4,
            solder_mask: Material::Epoxy,
            plating: Material::Copper,
        }
    }
}

/// Characteristic board dimensions for the convection correlations, in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardDims {
    pub l: f64,
    pub w: f64,
    pub h: f64,
}

/// Ordered layer stack, top first, sharing one raster shape.
#[derive(Clone, Debug)]
pub struct BoardVolume {
    layers: Vec<BoardLayer>,
    components: Vec<Component>,
    resolution: Length,
    materials: BoardMaterials,
    rows: usize,
    cols: usize,
}

impl BoardVolume {
    pub fn new(
        layers: Vec<BoardLayer>,
        components: Vec<Component>,
        resolution: Length,
        materials: BoardMaterials,
    ) -> ThermalResult<Self> {
        let Some(first) = layers.first() else {
            return Err(ThermalError::Setup {
                what: "board has no layers".into(),
            });
        };
        let (rows, cols) = first.cells.shape();
        if rows == 0 || cols == 0 {
            return Err(ThermalError::Setup {
                what: "board raster is empty".into(),
            });
        }
        let res = to_mil(resolution);
        if !(res.is_finite() && res > 0.0) {
            return Err(ThermalError::Setup {
                what: format!("resolution must be positive, got {res} mil"),
            });
        }
        for layer in &layers {
            first.cells.ensure_same_shape(&layer.cells)?;
            first.cells.ensure_same_shape(&layer.loss)?;
            let t = layer.thickness_mil();
            if !(t.is_finite() && t > 0.0) {
                return Err(ThermalError::Setup {
                    what: format!("layer '{}' has thickness {t} mil", layer.name),
                });
            }
        }
        Ok(Self {
            layers,
            components,
            resolution,
            materials,
            rows,
            cols,
        })
    }

    pub fn layers(&self) -> &[BoardLayer] {
        &self.layers
    }

    pub fn layer(&self, k: usize) -> Option<&BoardLayer> {
        self.layers.get(k)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn materials(&self) -> BoardMaterials {
        self.materials
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of 3-D cells.
    pub fn cell_count(&self) -> usize {
        self.layers.len() * self.rows * self.cols
    }

    pub fn resolution_mil(&self) -> f64 {
        to_mil(self.resolution)
    }

    /// Flat index of `(layer, row, col)`: layer-major, then row-major.
    pub fn flat_index(&self, layer: usize, row: usize, col: usize) -> usize {
        (layer * self.rows + row) * self.cols + col
    }

    /// Index of the layer that receives a component's heat: the outermost
    /// conductor layer on that side.
    pub fn mounting_layer(&self, side: BoardSide) -> Option<usize> {
        let is_conductor = |l: &BoardLayer| l.kind == LayerKind::Conductor;
        match side {
            BoardSide::Top => self.layers.iter().position(is_conductor),
            BoardSide::Bottom => self.layers.iter().rposition(is_conductor),
        }
    }

    /// Material of a cell in `layer` with the given state.
    pub fn cell_material(&self, layer: usize, state: CellState, void_fill: Material) -> Material {
        match state {
            CellState::Conductor => match self.layers[layer].kind {
                LayerKind::SolderMask => self.materials.plating,
                LayerKind::Conductor | LayerKind::Dielectric => self.materials.conductor,
            },
            CellState::Air => void_fill,
            CellState::Insulator => match self.layers[layer].kind {
                LayerKind::SolderMask => self.materials.solder_mask,
                LayerKind::Conductor | LayerKind::Dielectric => self.materials.dielectric,
            },
        }
    }

    /// Bulk conductivity of a cell in W / (in K), before corrections.
    pub fn cell_conductivity(&self, layer: usize, state: CellState, void_fill: Material) -> Conductivity {
        self.cell_material(layer, state, void_fill).conductivity()
    }

    pub fn total_loss_w(&self) -> f64 {
        self.layers.iter().map(|l| l.loss.sum()).sum()
    }

    pub fn total_component_heat_w(&self) -> f64 {
        self.components.iter().map(Component::heat_w).sum()
    }

    /// Joule loss plus component dissipation, W.
    pub fn total_power_w(&self) -> f64 {
        self.total_loss_w() + self.total_component_heat_w()
    }

    /// Characteristic `L`, `W`, `H` in inches for the given orientation.
    pub fn dims_in(&self, orientation: BoardOrientation) -> BoardDims {
        let res = self.resolution_mil();
        let along_cols = self.cols as f64 * res / 1000.0;
        let along_rows = self.rows as f64 * res / 1000.0;
        let thick = self.layers.iter().map(BoardLayer::thickness_mil).sum::<f64>() / 1000.0;
        match orientation {
            BoardOrientation::Horizontal => BoardDims {
                l: along_cols,
                w: along_rows,
                h: thick,
            },
            BoardOrientation::ColsUp | BoardOrientation::ColsDown => BoardDims {
                l: thick,
                w: along_rows,
                h: along_cols,
            },
            BoardOrientation::RowsUp | BoardOrientation::RowsDown => BoardDims {
                l: along_cols,
                w: thick,
                h: along_rows,
            },
        }
    }
}
