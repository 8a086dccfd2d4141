//! Project validation logic.

use std::collections::HashSet;

use pt_core::units::to_mil;

use crate::render::BoardGrid;
use crate::schema::{LATEST_VERSION, LayerKindDef, Project, TuningDef};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn require_positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be positive"))
    }
}

fn require_unique<'a>(names: impl IntoIterator<Item = &'a String>, context: &str) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateId {
                id: name.clone(),
                context: context.to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let board = &project.board;
    require_positive("board.width_mil", board.width_mil)?;
    require_positive("board.length_mil", board.length_mil)?;
    let grid = BoardGrid::for_project(project)?;

    if board.layers.is_empty() {
        return Err(invalid("board.layers", "[]", "at least one layer is required"));
    }
    require_unique(board.layers.iter().map(|l| &l.name), "board layers")?;
    for layer in &board.layers {
        require_positive(
            &format!("layer '{}' thickness", layer.name),
            to_mil(layer.thickness.to_length()),
        )?;
        if layer.kind == LayerKindDef::Dielectric && !layer.features.is_empty() {
            return Err(ValidationError::Unsupported {
                feature: format!("features on dielectric layer '{}'", layer.name),
                reason: "dielectric layers carry no copper".into(),
            });
        }
        for (i, feature) in layer.features.iter().enumerate() {
            feature.check().map_err(|reason| ValidationError::InvalidValue {
                field: format!("layer '{}' feature {i} ({})", layer.name, feature.kind()),
                value: format!("{feature:?}"),
                reason,
            })?;
        }
    }
    require_positive("board.plating_thickness", to_mil(board.plating_thickness.to_length()))?;

    for (i, drill) in board.drills.iter().enumerate() {
        require_positive(&format!("drill {i} diameter"), drill.diameter)?;
        if !grid.contains_point(drill.x, drill.y) {
            return Err(invalid(format!("drill {i}"), format!("({}, {})", drill.x, drill.y), "off the board"));
        }
    }

    require_unique(board.components.iter().map(|c| &c.name), "board components")?;
    for c in &board.components {
        require_positive(&format!("component '{}' width", c.name), c.width)?;
        require_positive(&format!("component '{}' length", c.name), c.length)?;
        if !grid.contains_point(c.x, c.y) {
            return Err(invalid(
                format!("component '{}'", c.name),
                format!("({}, {})", c.x, c.y),
                "centre is off the board",
            ));
        }
    }

    validate_simulation(project, &grid)
}

fn validate_simulation(project: &Project, grid: &BoardGrid) -> Result<(), ValidationError> {
    let sim = &project.simulation;
    if !sim.ambient_c.is_finite() {
        return Err(invalid("simulation.ambient_c", sim.ambient_c, "must be finite"));
    }
    if sim.linearization_passes == 0 {
        return Err(invalid("simulation.linearization_passes", 0, "at least one pass is required"));
    }
    validate_tuning(&sim.tuning)?;
    require_positive("simulation.mapper.centerline_fallback_factor", sim.mapper.centerline_fallback_factor)?;
    if !(sim.mapper.drift_tolerance.is_finite() && sim.mapper.drift_tolerance >= 0.0) {
        return Err(invalid(
            "simulation.mapper.drift_tolerance",
            sim.mapper.drift_tolerance,
            "must be non-negative",
        ));
    }

    require_unique(sim.loads.iter().map(|l| &l.name), "simulation loads")?;
    for load in &sim.loads {
        let Some((_, layer)) = project.layer(&load.layer) else {
            return Err(ValidationError::MissingReference {
                id: load.layer.clone(),
                context: format!("load '{}' layer", load.name),
            });
        };
        if layer.kind != LayerKindDef::Conductor {
            return Err(ValidationError::Unsupported {
                feature: format!("load '{}' on {:?} layer '{}'", load.name, layer.kind, layer.name),
                reason: "loads must sit on a conductor layer".into(),
            });
        }
        if !load.current_a.is_finite() {
            return Err(invalid(format!("load '{}' current_a", load.name), load.current_a, "must be finite"));
        }
        for (x, y) in [(load.x_start, load.y_start), (load.x_end, load.y_end)] {
            if !grid.contains_point(x, y) {
                return Err(invalid(
                    format!("load '{}' terminal", load.name),
                    format!("({x}, {y})"),
                    "off the board",
                ));
            }
        }
    }

    for heat in &sim.component_heats {
        if !project.board.components.iter().any(|c| c.name == heat.component) {
            return Err(ValidationError::MissingReference {
                id: heat.component.clone(),
                context: "simulation component_heats".into(),
            });
        }
        if !(heat.heat_w.is_finite() && heat.heat_w >= 0.0) {
            return Err(invalid(
                format!("component '{}' heat_w", heat.component),
                heat.heat_w,
                "must be non-negative",
            ));
        }
    }
    Ok(())
}

fn validate_tuning(t: &TuningDef) -> Result<(), ValidationError> {
    let divisors = [
        ("cond_k_inplane", t.cond_k_inplane),
        ("cond_k_thruplane", t.cond_k_thruplane),
        ("diel_k_inplane", t.diel_k_inplane),
        ("diel_k_thruplane", t.diel_k_thruplane),
        ("conv_coef", t.conv_coef),
        ("rad_coef", t.rad_coef),
    ];
    for (name, v) in divisors {
        require_positive(&format!("simulation.tuning.{name}"), v)?;
    }
    if !t.rad_pow.is_finite() {
        return Err(invalid("simulation.tuning.rad_pow", t.rad_pow, "must be finite"));
    }
    if !(t.component_htc.is_finite() && t.component_htc >= 0.0) {
        return Err(invalid(
            "simulation.tuning.component_htc",
            t.component_htc,
            "must be non-negative",
        ));
    }
    Ok(())
}
