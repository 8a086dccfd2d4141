//! Compile a project into the rasters, networks and settings a run needs.

use pt_core::units::{Length, amps, mil, watts};
use pt_core::{CellState, Raster};
use pt_current::{ElectricLoad, MapperConfig};
use pt_network::{NetworkMap, apply_drill, segment};
use pt_project::{
    BoardGrid, LayerKindDef, MapperDef, OrientationDef, Project, SideDef, SimulationDef,
    rasterize_drills, rasterize_layer,
};
use pt_thermal::{
    BoardMaterials, BoardOrientation, BoardSide, Component, Corrections, LayerKind,
    ThermalSettings,
};
use tracing::{debug, info};

use crate::error::AppResult;

/// One layer ready for load mapping and the thermal solve.
#[derive(Debug, Clone)]
pub struct LayerRuntime {
    pub name: String,
    pub kind: LayerKind,
    pub thickness: Length,
    /// Cell states after drilling
    pub cells: Raster<CellState>,
    /// Electrical networks; `None` for dielectric and solder-mask layers
    pub networks: Option<NetworkMap>,
    pub loads: Vec<ElectricLoad>,
}

/// Compiled runtime representation of a project.
#[derive(Debug, Clone)]
pub struct BoardRuntime {
    pub grid: BoardGrid,
    pub layers: Vec<LayerRuntime>,
    pub components: Vec<Component>,
    pub materials: BoardMaterials,
    pub settings: ThermalSettings,
    pub mapper: MapperConfig,
}

impl BoardRuntime {
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }
}

pub fn layer_kind(kind: LayerKindDef) -> LayerKind {
    match kind {
        LayerKindDef::Conductor => LayerKind::Conductor,
        LayerKindDef::Dielectric => LayerKind::Dielectric,
        LayerKindDef::SolderMask => LayerKind::SolderMask,
    }
}

fn orientation(def: OrientationDef) -> BoardOrientation {
    match def {
        OrientationDef::Horizontal => BoardOrientation::Horizontal,
        OrientationDef::ColsUp => BoardOrientation::ColsUp,
        OrientationDef::ColsDown => BoardOrientation::ColsDown,
        OrientationDef::RowsUp => BoardOrientation::RowsUp,
        OrientationDef::RowsDown => BoardOrientation::RowsDown,
    }
}

pub fn thermal_settings(sim: &SimulationDef) -> ThermalSettings {
    let t = &sim.tuning;
    ThermalSettings {
        ambient_c: sim.ambient_c,
        orientation: orientation(sim.orientation),
        corrections: Corrections {
            cond_in_plane: t.cond_k_inplane,
            cond_thru_plane: t.cond_k_thruplane,
            diel_in_plane: t.diel_k_inplane,
            diel_thru_plane: t.diel_k_thruplane,
            convection: t.conv_coef,
            radiation_coef: t.rad_coef,
            radiation_pow: t.rad_pow,
            component_htc: t.component_htc,
        },
        void_fill: sim.void_fill,
        linearization_passes: sim.linearization_passes,
        ..ThermalSettings::default()
    }
}

pub fn mapper_config(def: &MapperDef) -> MapperConfig {
    MapperConfig {
        smoothing_radius: def.smoothing_radius,
        centerline_fallback_factor: def.centerline_fallback_factor,
        drift_tolerance: def.drift_tolerance,
        clip_window: def.clip_window,
    }
}

/// Rasterize, drill and segment every layer, and place loads and components
/// on the grid.
///
/// The project is expected to be validated; load terminals are snapped to
/// the cell containing them.
pub fn compile_board(project: &Project) -> AppResult<BoardRuntime> {
    let board = &project.board;
    let sim = &project.simulation;
    let grid = BoardGrid::for_project(project)?;
    let drills = rasterize_drills(board, &grid);

    let mut layers = Vec::with_capacity(board.layers.len());
    for def in &board.layers {
        let mut cells = rasterize_layer(def, &grid);
        apply_drill(&mut cells, &drills)?;
        let kind = layer_kind(def.kind);
        let networks = (kind == LayerKind::Conductor).then(|| segment(&cells));
        let loads: Vec<ElectricLoad> = sim
            .loads
            .iter()
            .filter(|l| l.layer == def.name)
            .map(|l| {
                ElectricLoad::new(
                    l.name.clone(),
                    amps(l.current_a),
                    grid.cell_at(l.x_start, l.y_start),
                    grid.cell_at(l.x_end, l.y_end),
                )
            })
            .collect();
        debug!(
            layer = %def.name,
            networks = networks.as_ref().map_or(0, NetworkMap::network_count),
            loads = loads.len(),
            "compiled layer"
        );
        layers.push(LayerRuntime {
            name: def.name.clone(),
            kind,
            thickness: def.thickness.to_length(),
            cells,
            networks,
            loads,
        });
    }

    let components = board
        .components
        .iter()
        .map(|c| Component {
            name: c.name.clone(),
            width: mil(c.width),
            length: mil(c.length),
            x: mil(c.x),
            y: mil(c.y),
            heat: watts(project.component_heat_w(&c.name)),
            side: match c.side {
                SideDef::Top => BoardSide::Top,
                SideDef::Bottom => BoardSide::Bottom,
            },
        })
        .collect();

    info!(
        rows = grid.rows,
        cols = grid.cols,
        layers = layers.len(),
        "board compiled"
    );

    Ok(BoardRuntime {
        grid,
        layers,
        components,
        materials: BoardMaterials {
            conductor: board.conductor_material,
            dielectric: board.dielectric_material,
            solder_mask: board.solder_mask_material,
            plating: board.plating_material,
        },
        settings: thermal_settings(sim),
        mapper: mapper_config(&sim.mapper),
    })
}
