//! Project schema definitions.
//!
//! Positions and sizes are in mil from the board origin unless a field says
//! otherwise; `x` runs along raster rows and `y` along raster columns.

use pt_core::Material;
use pt_core::units::{Length, inch, mil, mm, oz_copper};
use serde::{Deserialize, Serialize};

use crate::shapes::Feature;

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub board: BoardDef,
    pub simulation: SimulationDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoardDef {
    /// Extent along x
    pub width_mil: f64,
    /// Extent along y
    pub length_mil: f64,
    #[serde(default = "default_conductor")]
    pub conductor_material: Material,
    #[serde(default = "default_dielectric")]
    pub dielectric_material: Material,
    #[serde(default = "default_solder_mask")]
    pub solder_mask_material: Material,
    /// Finish on copper left exposed through solder-mask layers
    #[serde(default = "default_conductor")]
    pub plating_material: Material,
    #[serde(default = "default_plating")]
    pub plating_thickness: LengthDef,
    /// Top to bottom
    pub layers: Vec<LayerDef>,
    #[serde(default)]
    pub drills: Vec<DrillDef>,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerDef {
    pub name: String,
    pub kind: LayerKindDef,
    pub thickness: LengthDef,
    /// Copper shapes; on solder-mask layers these are pad openings.
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LayerKindDef {
    Conductor,
    Dielectric,
    SolderMask,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LengthDef {
    pub value: f64,
    #[serde(default)]
    pub unit: LengthUnit,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Mil,
    Mm,
    In,
    /// Copper weight, oz per square foot
    Oz,
}

impl LengthDef {
    pub fn mil(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Mil,
        }
    }

    pub fn oz(value: f64) -> Self {
        Self {
            value,
            unit: LengthUnit::Oz,
        }
    }

    pub fn to_length(self) -> Length {
        match self.unit {
            LengthUnit::Mil => mil(self.value),
            LengthUnit::Mm => mm(self.value),
            LengthUnit::In => inch(self.value),
            LengthUnit::Oz => oz_copper(self.value),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrillDef {
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
    #[serde(default = "default_true")]
    pub plated: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SideDef {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub name: String,
    pub side: SideDef,
    /// Footprint extent along x
    pub width: f64,
    /// Footprint extent along y
    pub length: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    pub resolution_mil: f64,
    #[serde(default = "default_ambient_c")]
    pub ambient_c: f64,
    #[serde(default)]
    pub orientation: OrientationDef,
    #[serde(default)]
    pub tuning: TuningDef,
    #[serde(default)]
    pub mapper: MapperDef,
    #[serde(default)]
    pub loads: Vec<LoadDef>,
    #[serde(default)]
    pub component_heats: Vec<ComponentHeatDef>,
    #[serde(default = "default_passes")]
    pub linearization_passes: usize,
    /// Material filling unplated drill cores
    #[serde(default = "default_void_fill")]
    pub void_fill: Material,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrientationDef {
    #[default]
    Horizontal,
    ColsUp,
    ColsDown,
    RowsUp,
    RowsDown,
}

/// Correction coefficients; every value but `rad_pow` divides its term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TuningDef {
    pub cond_k_inplane: f64,
    pub cond_k_thruplane: f64,
    pub diel_k_inplane: f64,
    pub diel_k_thruplane: f64,
    pub conv_coef: f64,
    pub rad_coef: f64,
    pub rad_pow: f64,
    pub component_htc: f64,
}

impl Default for TuningDef {
    fn default() -> Self {
        Self {
            cond_k_inplane: 1.0,
            cond_k_thruplane: 1.0,
            diel_k_inplane: 1.0,
            diel_k_thruplane: 1.0,
            conv_coef: 1.0,
            rad_coef: 1.0,
            rad_pow: 0.0,
            component_htc: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapperDef {
    /// Smoothing window radius, cells
    pub smoothing_radius: usize,
    pub centerline_fallback_factor: f64,
    pub drift_tolerance: f64,
    /// Steps averaged for the terminal approach direction
    pub clip_window: usize,
}

impl Default for MapperDef {
    fn default() -> Self {
        Self {
            smoothing_radius: 10,
            centerline_fallback_factor: 5.0,
            drift_tolerance: 1.0,
            clip_window: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadDef {
    pub name: String,
    pub layer: String,
    pub current_a: f64,
    pub x_start: f64,
    pub y_start: f64,
    pub x_end: f64,
    pub y_end: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentHeatDef {
    pub component: String,
    pub heat_w: f64,
}

fn default_conductor() -> Material {
    Material::Copper
}

fn default_dielectric() -> Material {
    Material::Fr4
}

fn default_solder_mask() -> Material {
    Material::Epoxy
}

fn default_void_fill() -> Material {
    Material::Solder
}

fn default_plating() -> LengthDef {
    LengthDef::oz(1.0)
}

fn default_true() -> bool {
    true
}

fn default_ambient_c() -> f64 {
    25.0
}

fn default_passes() -> usize {
    1
}

impl Project {
    pub fn layer(&self, name: &str) -> Option<(usize, &LayerDef)> {
        self.board.layers.iter().enumerate().find(|(_, l)| l.name == name)
    }

    /// Dissipation assigned to a component, W; zero if none is listed.
    pub fn component_heat_w(&self, component: &str) -> f64 {
        self.simulation
            .component_heats
            .iter()
            .filter(|h| h.component == component)
            .map(|h| h.heat_w)
            .sum()
    }
}
