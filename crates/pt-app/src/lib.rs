//! Shared application service layer for pcbtherm.
//!
//! Ties the backend crates together for the CLI: project loading and
//! validation, compiling a project into layer rasters and loads, running
//! the loss mapping and thermal solve with progress reporting, and querying
//! or exporting the results.

pub mod error;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod runtime_compile;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use project_service::{LayerSummary, list_layers, load_project, save_project, validate_project};
pub use query::{Hotspot, LayerStats, Quantity, export_all, export_layer_csv, hottest, layer_raster, layer_stats};
pub use run_service::{
    LayerResult, RunResponse, RunTimingSummary, compute_losses, run_project, run_project_with_progress,
};
pub use runtime_compile::{BoardRuntime, LayerRuntime, compile_board};
