//! Integration tests for pt-project.

use std::path::PathBuf;

use pt_core::{CellState, GridCoord, Material};
use pt_project::*;

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/straight_trace.yaml")
}

fn minimal() -> Project {
    Project {
        version: 1,
        name: "Minimal".to_string(),
        board: BoardDef {
            width_mil: 100.0,
            length_mil: 200.0,
            conductor_material: Material::Copper,
            dielectric_material: Material::Fr4,
            solder_mask_material: Material::Epoxy,
            plating_material: Material::Gold,
            plating_thickness: LengthDef::oz(1.0),
            layers: vec![LayerDef {
                name: "top".to_string(),
                kind: LayerKindDef::Conductor,
                thickness: LengthDef::oz(2.0),
                features: vec![Feature::Line {
                    points: vec![[50.0, 10.0], [50.0, 190.0]],
                    width: 20.0,
                }],
            }],
            drills: vec![],
            components: vec![],
        },
        simulation: SimulationDef {
            resolution_mil: 10.0,
            ambient_c: 30.0,
            orientation: OrientationDef::RowsUp,
            tuning: TuningDef::default(),
            mapper: MapperDef::default(),
            loads: vec![LoadDef {
                name: "l1".to_string(),
                layer: "top".to_string(),
                current_a: 1.0,
                x_start: 50.0,
                y_start: 15.0,
                x_end: 50.0,
                y_end: 185.0,
            }],
            component_heats: vec![],
            linearization_passes: 1,
            void_fill: Material::Solder,
        },
    }
}

#[test]
fn roundtrip_yaml() {
    let project = minimal();
    let path = std::env::temp_dir().join("pt_project_roundtrip.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json() {
    let project = minimal();
    let path = std::env::temp_dir().join("pt_project_roundtrip.json");
    save_json(&path, &project).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn demo_project_loads_with_defaults() {
    let project = load_yaml(&demo_path()).unwrap();
    assert_eq!(project.board.layers.len(), 3);
    assert_eq!(project.board.solder_mask_material, Material::Epoxy);
    assert_eq!(project.board.plating_material, Material::Copper);
    assert_eq!(project.simulation.tuning, TuningDef::default());
    assert_eq!(project.simulation.mapper.smoothing_radius, 10);
    assert_eq!(project.simulation.void_fill, Material::Solder);
    assert!(project.board.drills[0].plated);
    assert_eq!(project.component_heat_w("U1"), 0.25);
    assert_eq!(project.component_heat_w("nope"), 0.0);
}

#[test]
fn line_feature_rasterizes_as_a_band() {
    let project = minimal();
    let grid = BoardGrid::for_project(&project).unwrap();
    assert_eq!(grid.shape(), (10, 20));
    let cells = rasterize_layer(&project.board.layers[0], &grid);
    // Centres 45 and 55 mil lie within 10 mil of the line at x = 50.
    for col in 1..19 {
        assert_eq!(cells[GridCoord::new(4, col)], CellState::Conductor);
        assert_eq!(cells[GridCoord::new(5, col)], CellState::Conductor);
        assert_eq!(cells[GridCoord::new(3, col)], CellState::Insulator);
    }
}

#[test]
fn dangling_references_are_rejected() {
    let mut p = minimal();
    p.simulation.loads[0].layer = "inner".to_string();
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::MissingReference { .. })
    ));

    let mut p = minimal();
    p.simulation.component_heats.push(ComponentHeatDef {
        component: "U9".to_string(),
        heat_w: 1.0,
    });
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::MissingReference { .. })
    ));
}

#[test]
fn bad_values_are_rejected() {
    let mut p = minimal();
    p.version = 7;
    assert_eq!(
        validate_project(&p),
        Err(ValidationError::UnsupportedVersion { version: 7 })
    );

    let mut p = minimal();
    p.simulation.loads[0].x_end = 500.0;
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::InvalidValue { .. })
    ));

    let mut p = minimal();
    p.board.layers.push(p.board.layers[0].clone());
    assert!(matches!(validate_project(&p), Err(ValidationError::DuplicateId { .. })));

    let mut p = minimal();
    p.simulation.tuning.conv_coef = 0.0;
    assert!(validate_project(&p).is_err());

    let mut p = minimal();
    p.board.layers[0].kind = LayerKindDef::Dielectric;
    assert!(matches!(validate_project(&p), Err(ValidationError::Unsupported { .. })));
}
