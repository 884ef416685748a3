//! Catalog loading integration tests.

use sg_species::{Catalog, Element, SpeciesError, SpeciesKey, SpeciesKind, builtin};
use std::io::Write;

const SMALL_CATALOG: &str = r#"
species:
  - name: H
    key: { element: H }
    kind: { type: Inert }
    priority: Major
  - name: H+
    key: { element: H, charge: 1 }
    kind: { type: IonLadder, ionization_potential_ev: 13.598, log_stat_weight: 0.0 }
    priority: Major
  - name: H-
    key: { element: H, charge: -1 }
    kind: { type: IonLadder, ionization_potential_ev: 0.754, log_stat_weight: 0.602 }
    priority: Major
  - name: H2
    key: { element: H, partners: [H] }
    kind: { type: PolynomialFit, coefficients: [12.739, -5.1172, 0.12572, -0.014149, 0.00063021] }
    priority: Major
partition_functions:
  - key: { element: H }
    log10_u: [0.301, 0.301, 0.301, 0.301, 0.301]
diatomics:
  - name: H2
    parent: H
    partner: H
    dissociation_ev: 4.478
"#;

#[test]
fn load_small_yaml_catalog() {
    let cat = Catalog::from_yaml_str(SMALL_CATALOG).unwrap();
    assert_eq!(cat.registry().len(), 4);
    let h2 = cat.registry().lookup("H2").unwrap();
    let def = cat.registry().get(h2).unwrap();
    assert!(matches!(def.kind, SpeciesKind::PolynomialFit { .. }));
    assert_eq!(def.neutral_parent, cat.registry().lookup("H").ok());
    assert_eq!(cat.partition(&SpeciesKey::atom(Element::H)).log10_at(6000.0), 0.301);
    assert_eq!(cat.ionization_potentials(Element::H), vec![13.598]);
}

#[test]
fn out_of_order_ladder_in_file_is_rejected() {
    let broken = SMALL_CATALOG.replacen("charge: 1 }", "charge: 2 }", 1);
    assert!(matches!(
        Catalog::from_yaml_str(&broken),
        Err(SpeciesError::LadderOrder { .. })
    ));
}

#[test]
fn builtin_survives_json_file_roundtrip() {
    let json = serde_json::to_string_pretty(&builtin().to_def()).unwrap();
    let path = std::env::temp_dir().join(format!("sg-species-catalog-{}.json", std::process::id()));
    std::fs::File::create(&path)
        .unwrap()
        .write_all(json.as_bytes())
        .unwrap();

    let loaded = Catalog::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.registry().len(), builtin().registry().len());
    let co = loaded.registry().lookup("CO").unwrap();
    assert_eq!(loaded.registry().get(co).unwrap().parent(), Element::C);
}
