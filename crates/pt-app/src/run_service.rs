//! Run execution service.

use std::time::Instant;

use pt_core::Raster;
use pt_current::{CurrentError, accumulate_losses};
use pt_network::NetworkMap;
use pt_project::Project;
use pt_thermal::{BoardLayer, BoardVolume, LayerKind, ThermalSolution, ThermalSolver};
use tracing::{info, info_span};

use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage};
use crate::runtime_compile::{self, BoardRuntime};

/// Per-layer electrical outcome of a run.
#[derive(Debug, Clone)]
pub struct LayerResult {
    pub name: String,
    pub kind: LayerKind,
    pub networks: Option<NetworkMap>,
    /// Joule loss per cell, W
    pub loss: Raster<f64>,
    pub total_loss_w: f64,
}

impl LayerResult {
    pub fn network_count(&self) -> usize {
        self.networks.as_ref().map_or(0, NetworkMap::network_count)
    }
}

/// Concise timing summary for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub loss_time_s: f64,
    pub solve_time_s: f64,
    pub total_time_s: f64,
    pub linear_iterations: usize,
    pub final_residual_norm: f64,
}

/// Response from running a project.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub project_name: String,
    pub layers: Vec<LayerResult>,
    pub solution: ThermalSolution,
    pub timing: RunTimingSummary,
}

impl RunResponse {
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    pub fn total_loss_w(&self) -> f64 {
        self.layers.iter().map(|l| l.total_loss_w).sum()
    }
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
        });
    }
}

/// Map every load of every conductor layer into a per-layer loss raster.
///
/// Errors name the failing load and its layer.
pub fn compute_losses(runtime: &BoardRuntime) -> AppResult<Vec<Raster<f64>>> {
    let (rows, cols) = runtime.grid.shape();
    let conductor = runtime.materials.conductor;
    let mut out = Vec::with_capacity(runtime.layers.len());
    for layer in &runtime.layers {
        let Some(networks) = &layer.networks else {
            out.push(Raster::zeros(rows, cols));
            continue;
        };
        let depth = pt_core::units::to_mil(layer.thickness);
        let losses = accumulate_losses(networks, &layer.loads, depth, conductor, &runtime.mapper)
            .map_err(|e| load_error(&layer.name, e))?;
        out.push(losses.into_raster());
    }
    Ok(out)
}

fn load_error(layer: &str, err: CurrentError) -> AppError {
    match err.load_name() {
        Some(load) => AppError::Load {
            load: load.to_string(),
            layer: layer.to_string(),
            message: err.root().to_string(),
        },
        None => AppError::InvalidInput(format!("layer '{layer}': {err}")),
    }
}

pub fn run_project(project: &Project) -> AppResult<RunResponse> {
    run_project_with_progress(project, None)
}

/// Compile the board, map loads, then solve the thermal field.
pub fn run_project_with_progress(
    project: &Project,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let _span = info_span!("run_project", project = %project.name).entered();
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(&mut progress_cb, RunStage::CompilingBoard, started, None);
    let t = Instant::now();
    let runtime = runtime_compile::compile_board(project)?;
    timing.compile_time_s = t.elapsed().as_secs_f64();

    let load_count: usize = runtime.layers.iter().map(|l| l.loads.len()).sum();
    emit_progress(
        &mut progress_cb,
        RunStage::MappingLoads,
        started,
        Some(format!("{load_count} loads")),
    );
    let t = Instant::now();
    let losses = compute_losses(&runtime)?;
    timing.loss_time_s = t.elapsed().as_secs_f64();

    let BoardRuntime {
        grid,
        layers: layer_runtimes,
        components,
        materials,
        settings,
        ..
    } = runtime;

    let mut board_layers = Vec::with_capacity(layer_runtimes.len());
    let mut layers = Vec::with_capacity(layer_runtimes.len());
    for (layer, loss) in layer_runtimes.into_iter().zip(losses) {
        let total_loss_w = loss.sum();
        board_layers.push(
            BoardLayer::new(layer.name.clone(), layer.kind, layer.thickness, layer.cells).with_loss(loss.clone()),
        );
        layers.push(LayerResult {
            name: layer.name,
            kind: layer.kind,
            networks: layer.networks,
            loss,
            total_loss_w,
        });
    }

    let t = Instant::now();
    let volume = BoardVolume::new(board_layers, components, pt_core::units::mil(grid.resolution_mil), materials)?;
    let mut solver = ThermalSolver::new(volume, settings)?;

    emit_progress(&mut progress_cb, RunStage::EstimatingAmbient, started, None);
    let estimate = solver.estimate_ambient()?;
    let message = format!("board ~{:.2} C after {} iterations", estimate.board_c(), estimate.iterations);
    emit_progress(&mut progress_cb, RunStage::EstimatingAmbient, started, Some(message));

    let passes = solver.settings().linearization_passes;
    for pass in 1..=passes {
        emit_progress(
            &mut progress_cb,
            RunStage::Assembling,
            started,
            Some(format!("pass {pass}/{passes}")),
        );
        solver.assemble()?;
        emit_progress(
            &mut progress_cb,
            RunStage::Solving,
            started,
            Some(format!("pass {pass}/{passes}")),
        );
        solver.solve()?;
    }
    let solution = solver.finish()?;
    timing.solve_time_s = t.elapsed().as_secs_f64();
    timing.linear_iterations = solution.passes.iter().map(|p| p.iterations).sum();
    timing.final_residual_norm = solution.passes.last().map_or(0.0, |p| p.residual_norm);
    timing.total_time_s = started.elapsed().as_secs_f64();

    let response = RunResponse {
        project_name: project.name.clone(),
        layers,
        solution,
        timing,
    };
    info!(
        total_loss_w = response.total_loss_w(),
        max_c = response.solution.field.max(),
        total_s = response.timing.total_time_s,
        "run complete"
    );
    emit_progress(&mut progress_cb, RunStage::Completed, started, None);
    Ok(response)
}
