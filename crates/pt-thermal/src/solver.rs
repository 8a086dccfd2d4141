//! Staged steady-state thermal solve.
//!
//! The solver moves through `Uninitialized -> InitialTemperatureEstimated ->
//! Assembled -> Solved`. Re-assembling from `Solved` re-linearizes the
//! boundary and component terms at the latest temperatures.

use nalgebra::DVector;
use pt_core::ensure_finite;
use tracing::{info, info_span};

use crate::ambient::{AmbientEstimate, estimate_ambient};
use crate::assembly::{ConductanceSystem, assemble};
use crate::board::BoardVolume;
use crate::error::{ThermalError, ThermalResult};
use crate::field::TemperatureField;
use crate::pcg::pcg_solve;
use crate::settings::ThermalSettings;
use crate::sources::component_heat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolverState {
    Uninitialized,
    InitialTemperatureEstimated,
    Assembled,
    Solved,
}

/// Convergence record of one linear solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearStats {
    pub iterations: usize,
    pub residual_norm: f64,
}

/// Final output of [`ThermalSolver::run`].
#[derive(Clone, Debug)]
pub struct ThermalSolution {
    pub field: TemperatureField,
    pub ambient: AmbientEstimate,
    /// One entry per assemble-and-solve pass
    pub passes: Vec<LinearStats>,
}

pub struct ThermalSolver {
    board: BoardVolume,
    settings: ThermalSettings,
    state: SolverState,
    ambient: Option<AmbientEstimate>,
    field: Option<TemperatureField>,
    system: Option<ConductanceSystem>,
    passes: Vec<LinearStats>,
}

impl ThermalSolver {
    pub fn new(board: BoardVolume, settings: ThermalSettings) -> ThermalResult<Self> {
        settings.validate()?;
        Ok(Self {
            board,
            settings,
            state: SolverState::Uninitialized,
            ambient: None,
            field: None,
            system: None,
            passes: Vec::new(),
        })
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn board(&self) -> &BoardVolume {
        &self.board
    }

    pub fn field(&self) -> Option<&TemperatureField> {
        self.field.as_ref()
    }

    fn expect_state(&self, allowed: &[SolverState], action: &str) -> ThermalResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(ThermalError::InvalidState {
                what: format!("cannot {action} from {:?}", self.state),
            })
        }
    }

    /// Estimate the mean board temperature and seed the field with it.
    pub fn estimate_ambient(&mut self) -> ThermalResult<&AmbientEstimate> {
        self.expect_state(&[SolverState::Uninitialized], "estimate ambient")?;
        let dims = self.board.dims_in(self.settings.orientation);
        let estimate = estimate_ambient(
            self.board.total_power_w(),
            self.settings.ambient_c,
            dims,
            &self.settings.corrections,
            &self.settings.ambient,
        )?;
        self.field = Some(TemperatureField::uniform(
            self.board.layer_count(),
            self.board.rows(),
            self.board.cols(),
            estimate.board_c(),
        ));
        self.state = SolverState::InitialTemperatureEstimated;
        Ok(self.ambient.insert(estimate))
    }

    /// Build the conductance system at the current temperatures.
    pub fn assemble(&mut self) -> ThermalResult<()> {
        self.expect_state(
            &[SolverState::InitialTemperatureEstimated, SolverState::Solved],
            "assemble",
        )?;
        let (Some(ambient), Some(field)) = (&self.ambient, &self.field) else {
            return Err(ThermalError::InvalidState {
                what: "no temperature estimate to linearize at".into(),
            });
        };
        let heat = component_heat(&self.board, field, ambient, &self.settings)?;
        self.system = Some(assemble(&self.board, field, ambient, &self.settings, &heat)?);
        self.state = SolverState::Assembled;
        Ok(())
    }

    /// Solve the assembled system, replacing the temperature field.
    pub fn solve(&mut self) -> ThermalResult<&TemperatureField> {
        self.expect_state(&[SolverState::Assembled], "solve")?;
        let (Some(system), Some(field)) = (self.system.take(), &self.field) else {
            return Err(ThermalError::InvalidState {
                what: "no assembled system".into(),
            });
        };
        let x0 = DVector::from_column_slice(field.as_slice());
        let out = pcg_solve(&system.matrix, &system.rhs, x0, &self.settings.linear)?;
        for &t in out.x.iter() {
            ensure_finite(t, "cell temperature")?;
        }
        self.passes.push(LinearStats {
            iterations: out.iterations,
            residual_norm: out.residual_norm,
        });
        let solved = TemperatureField::from_vec(
            self.board.layer_count(),
            self.board.rows(),
            self.board.cols(),
            out.x.as_slice().to_vec(),
        )?;
        self.state = SolverState::Solved;
        Ok(self.field.insert(solved))
    }

    /// Estimate, then assemble and solve once per linearization pass.
    pub fn run(mut self) -> ThermalResult<ThermalSolution> {
        let _span = info_span!("thermal_solve", cells = self.board.cell_count()).entered();
        self.estimate_ambient()?;
        for _ in 0..self.settings.linearization_passes {
            self.assemble()?;
            self.solve()?;
        }
        self.finish()
    }

    /// Hand over the solved field.
    pub fn finish(self) -> ThermalResult<ThermalSolution> {
        self.expect_state(&[SolverState::Solved], "finish")?;
        let (Some(field), Some(ambient)) = (self.field, self.ambient) else {
            return Err(ThermalError::InvalidState {
                what: "solved without a field".into(),
            });
        };
        info!(
            max_c = field.max(),
            mean_c = field.mean(),
            passes = self.passes.len(),
            "thermal solve complete"
        );
        Ok(ThermalSolution {
            field,
            ambient,
            passes: self.passes,
        })
    }

    pub fn settings(&self) -> &ThermalSettings {
        &self.settings
    }
}
