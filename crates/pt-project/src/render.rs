//! Turn a project's geometry into per-layer cell rasters.

use pt_core::units::to_mil;
use pt_core::{CellState, GridCoord, Raster, ceil_snapped};
use pt_network::DrillCell;
use tracing::debug;

use crate::schema::{BoardDef, LayerDef, LayerKindDef, Project};
use crate::shapes::{Feature, paint};
use crate::validate::ValidationError;

/// Raster dimensions of a board at one resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGrid {
    pub rows: usize,
    pub cols: usize,
    pub resolution_mil: f64,
}

fn cells_spanning(extent: f64, res: f64) -> usize {
    ceil_snapped(extent / res) as usize
}

impl BoardGrid {
    pub fn new(width_mil: f64, length_mil: f64, resolution_mil: f64) -> Result<Self, ValidationError> {
        if !(resolution_mil.is_finite() && resolution_mil > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "simulation.resolution_mil".into(),
                value: resolution_mil.to_string(),
                reason: "must be positive".into(),
            });
        }
        let rows = cells_spanning(width_mil, resolution_mil);
        let cols = cells_spanning(length_mil, resolution_mil);
        if rows == 0 || cols == 0 {
            return Err(ValidationError::InvalidValue {
                field: "board".into(),
                value: format!("{width_mil} x {length_mil} mil"),
                reason: "board must span at least one cell".into(),
            });
        }
        Ok(Self {
            rows,
            cols,
            resolution_mil,
        })
    }

    pub fn for_project(project: &Project) -> Result<Self, ValidationError> {
        Self::new(
            project.board.width_mil,
            project.board.length_mil,
            project.simulation.resolution_mil,
        )
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Cell containing the board point `(x, y)`, clamped to the raster.
    pub fn cell_at(&self, x: f64, y: f64) -> GridCoord {
        let to_index = |v: f64, limit: usize| ((v / self.resolution_mil).floor().max(0.0) as usize).min(limit - 1);
        GridCoord::new(to_index(x, self.rows), to_index(y, self.cols))
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let (w, l) = (
            self.rows as f64 * self.resolution_mil,
            self.cols as f64 * self.resolution_mil,
        );
        (0.0..=w).contains(&x) && (0.0..=l).contains(&y)
    }
}

/// Cell states of one layer before drilling.
///
/// Conductor and solder-mask layers start as insulator with their features
/// painted as conductor; dielectric layers are insulator throughout.
pub fn rasterize_layer(layer: &LayerDef, grid: &BoardGrid) -> Raster<CellState> {
    let mut cells = Raster::new(grid.rows, grid.cols, CellState::Insulator);
    if layer.kind == LayerKindDef::Dielectric {
        return cells;
    }
    let mut painted = 0;
    for feature in &layer.features {
        painted += paint(&mut cells, grid.resolution_mil, feature, CellState::Conductor);
    }
    debug!(layer = %layer.name, features = layer.features.len(), painted, "rasterized layer");
    cells
}

/// Drill pattern shared by every layer.
///
/// A plated hole is a conductor ring of the plating thickness around a void
/// core; an unplated hole is void throughout.
pub fn rasterize_drills(board: &BoardDef, grid: &BoardGrid) -> Raster<DrillCell> {
    let mut pattern = Raster::new(grid.rows, grid.cols, DrillCell::None);
    let plating = to_mil(board.plating_thickness.to_length());
    for drill in &board.drills {
        let outer = Feature::Circle {
            x: drill.x,
            y: drill.y,
            diameter: drill.diameter,
        };
        let core_diameter = if drill.plated {
            drill.diameter - 2.0 * plating
        } else {
            drill.diameter
        };
        if drill.plated {
            paint(&mut pattern, grid.resolution_mil, &outer, DrillCell::Plated);
        }
        if core_diameter > 0.0 {
            let core = Feature::Circle {
                x: drill.x,
                y: drill.y,
                diameter: core_diameter,
            };
            paint(&mut pattern, grid.resolution_mil, &core, DrillCell::Void);
        }
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DrillDef, LengthDef};

    fn board(drills: Vec<DrillDef>) -> BoardDef {
        BoardDef {
            width_mil: 100.0,
            length_mil: 100.0,
            conductor_material: pt_core::Material::Copper,
            dielectric_material: pt_core::Material::Fr4,
            solder_mask_material: pt_core::Material::Epoxy,
            plating_material: pt_core::Material::Copper,
            plating_thickness: LengthDef::mil(10.0),
            layers: vec![],
            drills,
            components: vec![],
        }
    }

    #[test]
    fn grid_rounds_up_partial_cells() {
        let g = BoardGrid::new(95.0, 100.0, 10.0).unwrap();
        assert_eq!(g.shape(), (10, 10));
        assert_eq!(g.cell_at(99.0, 0.0), GridCoord::new(9, 0));
        assert_eq!(g.cell_at(-3.0, 1000.0), GridCoord::new(0, 9));
        assert!(BoardGrid::new(100.0, 100.0, 0.0).is_err());
        assert!(BoardGrid::new(0.0, 100.0, 10.0).is_err());
    }

    #[test]
    fn dielectric_ignores_features() {
        let grid = BoardGrid::new(50.0, 50.0, 10.0).unwrap();
        let layer = LayerDef {
            name: "core".into(),
            kind: LayerKindDef::Dielectric,
            thickness: LengthDef::mil(20.0),
            features: vec![Feature::Rectangle {
                x: 25.0,
                y: 25.0,
                width: 50.0,
                length: 50.0,
            }],
        };
        let cells = rasterize_layer(&layer, &grid);
        assert!(cells.iter().all(|&c| c == CellState::Insulator));
    }

    #[test]
    fn plated_drill_is_ring_around_void() {
        let b = board(vec![DrillDef {
            x: 50.0,
            y: 50.0,
            diameter: 60.0,
            plated: true,
        }]);
        let grid = BoardGrid::new(100.0, 100.0, 10.0).unwrap();
        let p = rasterize_drills(&b, &grid);
        // Cell (5, 5) has its centre 7.07 mil from the hole axis.
        assert_eq!(p[GridCoord::new(5, 5)], DrillCell::Void);
        assert_eq!(p[GridCoord::new(5, 7)], DrillCell::Plated);
        assert_eq!(p[GridCoord::new(0, 0)], DrillCell::None);
    }

    #[test]
    fn unplated_drill_is_all_void() {
        let b = board(vec![DrillDef {
            x: 50.0,
            y: 50.0,
            diameter: 60.0,
            plated: false,
        }]);
        let grid = BoardGrid::new(100.0, 100.0, 10.0).unwrap();
        let p = rasterize_drills(&b, &grid);
        assert_eq!(p[GridCoord::new(5, 7)], DrillCell::Void);
        assert!(p.iter().all(|&c| c != DrillCell::Plated));
    }
}
