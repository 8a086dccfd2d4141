//! Thermal solver settings.

use pt_core::Material;

use crate::error::{ThermalError, ThermalResult};
use crate::pcg::PcgConfig;

/// How the board hangs in still air.
///
/// Decides which exposed faces see "horizontal top", "horizontal bottom" or
/// "vertical" free convection, and how the characteristic board dimensions
/// are formed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoardOrientation {
    /// Layer 0 faces up.
    #[default]
    Horizontal,
    /// Standing on edge, the last column up.
    ColsUp,
    /// Standing on edge, column 0 up.
    ColsDown,
    /// Standing on edge, row 0 up.
    RowsUp,
    /// Standing on edge, the last row up.
    RowsDown,
}

/// Tunable correction coefficients.
///
/// Conductivities are divided by their coefficient; `convection` divides the
/// free-convection coefficients; the radiation term is divided by
/// `radiation_coef * dt^radiation_pow`; `component_htc` scales the surface
/// loss from a component's own body.
#[derive(Clone, Debug, PartialEq)]
pub struct Corrections {
    pub cond_in_plane: f64,
    pub cond_thru_plane: f64,
    pub diel_in_plane: f64,
    pub diel_thru_plane: f64,
    pub convection: f64,
    pub radiation_coef: f64,
    pub radiation_pow: f64,
    pub component_htc: f64,
}

impl Default for Corrections {
    fn default() -> Self {
        Self {
            cond_in_plane: 1.0,
            cond_thru_plane: 1.0,
            diel_in_plane: 1.0,
            diel_thru_plane: 1.0,
            convection: 1.0,
            radiation_coef: 1.0,
            radiation_pow: 0.0,
            component_htc: 1.0,
        }
    }
}

impl Corrections {
    /// Radiation divisor for a surface `dt` above ambient.
    pub fn radiation_divisor(&self, dt: f64) -> f64 {
        self.radiation_coef * dt.max(1e-6).powf(self.radiation_pow)
    }
}

/// Fixed-point controls for the mean board temperature estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientConfig {
    /// First guess of board rise over ambient (C)
    pub initial_delta_c: f64,
    /// Stop once an update moves dt by no more than this (C)
    pub tolerance_c: f64,
    pub max_iterations: usize,
    /// Fraction of dt removed when the guess overshoots
    pub overshoot_shrink: f64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            initial_delta_c: 20.0,
            tolerance_c: 0.1,
            max_iterations: 10_000,
            overshoot_shrink: 0.8,
        }
    }
}

/// Everything the thermal solver needs besides the board itself.
#[derive(Clone, Debug)]
pub struct ThermalSettings {
    /// Still-air temperature (C)
    pub ambient_c: f64,
    pub orientation: BoardOrientation,
    pub corrections: Corrections,
    pub ambient: AmbientConfig,
    pub linear: PcgConfig,
    /// Material filling drilled voids
    pub void_fill: Material,
    /// Assemble-and-solve passes; later passes re-linearize radiation at the
    /// previous pass's temperatures
    pub linearization_passes: usize,
}

impl Default for ThermalSettings {
    fn default() -> Self {
        Self {
            ambient_c: 25.0,
            orientation: BoardOrientation::default(),
            corrections: Corrections::default(),
            ambient: AmbientConfig::default(),
            linear: PcgConfig::default(),
            void_fill: Material::Solder,
            linearization_passes: 1,
        }
    }
}

impl ThermalSettings {
    pub fn validate(&self) -> ThermalResult<()> {
        let c = &self.corrections;
        let divisors = [
            ("cond_in_plane", c.cond_in_plane),
            ("cond_thru_plane", c.cond_thru_plane),
            ("diel_in_plane", c.diel_in_plane),
            ("diel_thru_plane", c.diel_thru_plane),
            ("convection", c.convection),
            ("radiation_coef", c.radiation_coef),
        ];
        for (name, value) in divisors {
            if !(value.is_finite() && value > 0.0) {
                return Err(ThermalError::Setup {
                    what: format!("correction {name} must be positive, got {value}"),
                });
            }
        }
        if !c.radiation_pow.is_finite() || !(c.component_htc.is_finite() && c.component_htc >= 0.0) {
            return Err(ThermalError::Setup {
                what: "radiation_pow and component_htc must be finite".into(),
            });
        }
        if !self.ambient_c.is_finite() {
            return Err(ThermalError::Setup {
                what: format!("ambient temperature {} is not finite", self.ambient_c),
            });
        }
        if self.linearization_passes == 0 {
            return Err(ThermalError::Setup {
                what: "at least one linearization pass is required".into(),
            });
        }
        Ok(())
    }
}
