//! Project loading, saving, validation, and introspection.

use std::path::Path;

use pt_core::units::to_mil;
use pt_project::{LayerKindDef, Project};

use crate::error::AppResult;

/// Summary of a layer for listing.
#[derive(Debug, Clone)]
pub struct LayerSummary {
    pub name: String,
    pub kind: LayerKindDef,
    pub thickness_mil: f64,
    pub feature_count: usize,
    pub load_count: usize,
}

/// Load a project from YAML or JSON; the result is already validated.
pub fn load_project(path: &Path) -> AppResult<Project> {
    Ok(pt_project::load(path)?)
}

/// Save a project as YAML, or as JSON for a `.json` path.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => pt_project::save_json(path, project)?,
        _ => pt_project::save_yaml(path, project)?,
    }
    Ok(())
}

pub fn validate_project(project: &Project) -> AppResult<()> {
    pt_project::validate_project(project)?;
    Ok(())
}

/// List the layer stack, top first.
pub fn list_layers(project: &Project) -> Vec<LayerSummary> {
    project
        .board
        .layers
        .iter()
        .map(|layer| LayerSummary {
            name: layer.name.clone(),
            kind: layer.kind,
            thickness_mil: to_mil(layer.thickness.to_length()),
            feature_count: layer.features.len(),
            load_count: project
                .simulation
                .loads
                .iter()
                .filter(|l| l.layer == layer.name)
                .count(),
        })
        .collect()
}
