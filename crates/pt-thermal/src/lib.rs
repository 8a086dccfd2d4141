//! pt-thermal: steady-state conduction through a layered board.
//!
//! The board is a stack of equally shaped layers; every cell is a node in a
//! linear conductance network cooled by free convection and radiation at
//! its exposed faces. Solving proceeds in stages:
//! - estimate the board's mean rise over ambient ([`estimate_ambient`])
//! - assemble `G T = q` linearized at the current temperatures
//! - solve with Jacobi-preconditioned conjugate gradient
//!
//! [`ThermalSolver`] drives the stages and enforces their order.

pub mod air;
pub mod ambient;
pub mod assembly;
pub mod board;
pub mod error;
pub mod field;
pub mod htc;
pub mod pcg;
pub mod settings;
pub mod solver;
pub mod sources;
pub mod sparse;

pub use ambient::{AmbientEstimate, FaceCoefficients, estimate_ambient};
pub use assembly::{ConductanceSystem, assemble};
pub use board::{BoardDims, BoardLayer, BoardMaterials, BoardSide, BoardVolume, Component, LayerKind};
pub use error::{ThermalError, ThermalResult};
pub use field::{CellIndex, TemperatureField};
pub use htc::{BoundaryDir, Face};
pub use pcg::{PcgConfig, PcgResult, pcg_solve};
pub use settings::{AmbientConfig, BoardOrientation, Corrections, ThermalSettings};
pub use solver::{LinearStats, SolverState, ThermalSolution, ThermalSolver};
