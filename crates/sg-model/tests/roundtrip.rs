use sg_chem::SolveLevel;
use sg_model::*;

fn two_depth_model() -> Model {
    Model {
        version: LATEST_VERSION,
        name: "Roundtrip".to_string(),
        solve_level: SolveLevel::MajorOnly,
        composition: CompositionDef::LogEpsilon {
            abundances: vec![
                ("H".to_string(), 12.0),
                ("He".to_string(), 10.93),
                ("Fe".to_string(), 7.5),
            ],
        },
        depths: vec![
            DepthDef {
                temperature_k: 4500.0,
                pressure_dyn_cm2: 1e4,
            },
            DepthDef {
                temperature_k: 7000.0,
                pressure_dyn_cm2: 1e5,
            },
        ],
        estimator: Some(EstimatorDef {
            max_rounds: Some(20),
            rel_tol: None,
        }),
        catalog: None,
    }
}

#[test]
fn roundtrip_yaml() {
    let model = two_depth_model();

    let path = std::env::temp_dir().join("sg_model_roundtrip.yaml");
    save_yaml(&path, &model).expect("Failed to save YAML");
    let loaded = load_yaml(&path).expect("Failed to load YAML");
    assert_eq!(model, loaded);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn roundtrip_json() {
    let model = two_depth_model();

    let path = std::env::temp_dir().join("sg_model_roundtrip.json");
    save_json(&path, &model).expect("Failed to save JSON");
    let loaded = load(&path).expect("Failed to load JSON");
    assert_eq!(model, loaded);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn invalid_model_is_not_saved() {
    let mut model = two_depth_model();
    model.depths[1].pressure_dyn_cm2 = f64::NAN;

    let path = std::env::temp_dir().join("sg_model_invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &model),
        Err(ModelError::Validation(_))
    ));
}

#[test]
fn grid_and_config_follow_model() {
    let model = two_depth_model();
    let grid = to_grid(&model).unwrap();
    assert_eq!(grid.len(), 2);
    assert_eq!(grid.temperatures(), &[4500.0, 7000.0]);
    assert!((grid.composition().log_eps(sg_species::Element::Fe).unwrap() - 7.5).abs() < 1e-10);

    let config = estimator_config(&model);
    assert_eq!(config.max_rounds, 20);
    assert_eq!(config.rel_tol, sg_chem::EstimatorConfig::default().rel_tol);
}

#[test]
fn solve_level_defaults_when_omitted() {
    let yaml = "version: 1\nname: minimal\ncomposition:\n  type: Solar\ndepths:\n  - { temperature_k: 5000.0, pressure_dyn_cm2: 1.0e4 }\n";
    let path = std::env::temp_dir().join("sg_model_minimal.yaml");
    std::fs::write(&path, yaml).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded.version, LATEST_VERSION);
    assert_eq!(loaded.solve_level, SolveLevel::MajorAndMinor);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn unversioned_and_future_files_are_rejected() {
    for version in [0, LATEST_VERSION + 1] {
        let yaml = format!(
            "version: {version}\nname: draft\ncomposition:\n  type: Solar\ndepths:\n  - {{ temperature_k: 5000.0, pressure_dyn_cm2: 1.0e4 }}\n"
        );
        let path = std::env::temp_dir().join(format!("sg_model_version_{version}.yaml"));
        std::fs::write(&path, yaml).unwrap();
        assert!(matches!(
            load_yaml(&path),
            Err(ModelError::Validation(ValidationError::UnsupportedVersion { .. }))
        ));
        let _ = std::fs::remove_file(&path);
    }
}

#[test]
fn unknown_extension_rejected() {
    let path = std::path::Path::new("model.toml");
    assert!(matches!(load(path), Err(ModelError::UnknownFormat { .. })));
}
