//! Built-in species catalog and table loading.
//!
//! The catalog bundles the species registry, the partition-function table and
//! the diatomic constants needed by the population solvers. The built-in
//! catalog covers H..Zr (neutral atoms, first ions, second ions of the
//! abundant elements, H⁻) and the molecules that dominate cool-star
//! atmospheres. Alternative tables can be loaded from YAML or JSON.

use crate::element::Element;
use crate::error::{SpeciesError, SpeciesResult};
use crate::partition::{PartitionFunction, PartitionTable};
use crate::registry::{SpeciesRegistry, SpeciesRegistryBuilder};
use crate::species::{Priority, SpeciesKey, SpeciesKind};
use serde::{Deserialize, Serialize};
use sg_core::Real;
use std::path::Path;
use std::sync::OnceLock;

/// Dissociation data of a diatomic molecule A-B, A being the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiatomicDef {
    pub name: String,
    pub parent: Element,
    pub partner: Element,
    pub dissociation_ev: Real,
}

impl DiatomicDef {
    /// Reduced mass of the pair [amu].
    pub fn reduced_mass_amu(&self) -> Real {
        let ma = self.parent.atomic_mass();
        let mb = self.partner.atomic_mass();
        ma * mb / (ma + mb)
    }

    pub fn key(&self) -> SpeciesKey {
        SpeciesKey::molecule(self.parent, vec![self.partner])
    }

    /// Whether `element` is one of the two atoms.
    pub fn involves(&self, element: Element) -> bool {
        self.parent == element || self.partner == element
    }

    /// The atom bound to `element` in this molecule.
    pub fn other(&self, element: Element) -> Element {
        if element == self.parent {
            self.partner
        } else {
            self.parent
        }
    }
}

/// Registry + partition functions + diatomic constants.
#[derive(Debug, Clone)]
pub struct Catalog {
    registry: SpeciesRegistry,
    partitions: PartitionTable,
    diatomics: Vec<DiatomicDef>,
}

impl Catalog {
    pub fn new(registry: SpeciesRegistry, partitions: PartitionTable, diatomics: Vec<DiatomicDef>) -> Self {
        Self {
            registry,
            partitions,
            diatomics,
        }
    }

    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }

    pub fn partitions(&self) -> &PartitionTable {
        &self.partitions
    }

    pub fn diatomics(&self) -> &[DiatomicDef] {
        &self.diatomics
    }

    /// Diatomic molecules containing `element`, as parent or as partner.
    pub fn diatomics_of(&self, element: Element) -> impl Iterator<Item = &DiatomicDef> {
        self.diatomics.iter().filter(move |d| d.involves(element))
    }

    pub fn partition(&self, key: &SpeciesKey) -> PartitionFunction {
        self.partitions.get(key)
    }

    /// Ionization potentials [eV] of the positive ladder of `element`, stage 0 upwards.
    pub fn ionization_potentials(&self, element: Element) -> Vec<Real> {
        self.registry
            .positive_ladder(element)
            .filter_map(|d| match d.kind {
                SpeciesKind::IonLadder {
                    ionization_potential_ev,
                    ..
                } => Some(ionization_potential_ev),
                _ => None,
            })
            .collect()
    }

    pub fn from_def(def: CatalogDef) -> SpeciesResult<Self> {
        let mut builder = SpeciesRegistryBuilder::new();
        for row in def.species {
            builder.add(row.name, row.key, row.kind, row.priority);
        }
        let registry = builder.build()?;

        let mut partitions = PartitionTable::new();
        for row in def.partition_functions {
            partitions.insert(row.key, row.log10_u);
        }

        for d in &def.diatomics {
            if registry.id(&d.key()).is_none() {
                return Err(SpeciesError::Unknown {
                    what: "diatomic molecule",
                    name: d.name.clone(),
                });
            }
        }

        Ok(Self::new(registry, partitions, def.diatomics))
    }

    pub fn to_def(&self) -> CatalogDef {
        let species = self
            .registry
            .defs()
            .iter()
            .map(|d| SpeciesRowDef {
                name: d.name.clone(),
                key: d.key.clone(),
                kind: d.kind.clone(),
                priority: d.priority,
            })
            .collect();
        let mut partition_functions: Vec<PartitionRowDef> = self
            .partitions
            .iter()
            .map(|(key, pf)| PartitionRowDef {
                key: key.clone(),
                log10_u: *pf,
            })
            .collect();
        partition_functions.sort_by(|a, b| a.key.cmp(&b.key));
        CatalogDef {
            species,
            partition_functions,
            diatomics: self.diatomics.clone(),
        }
    }

    pub fn from_yaml_str(content: &str) -> SpeciesResult<Self> {
        let def: CatalogDef = serde_yaml::from_str(content)?;
        Self::from_def(def)
    }

    pub fn from_json_str(content: &str) -> SpeciesResult<Self> {
        let def: CatalogDef = serde_json::from_str(content)?;
        Self::from_def(def)
    }

    /// Load a catalog file; `.json` is read as JSON, everything else as YAML.
    pub fn load(path: &Path) -> SpeciesResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }
}

/// Serialized form of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDef {
    pub species: Vec<SpeciesRowDef>,
    #[serde(default)]
    pub partition_functions: Vec<PartitionRowDef>,
    #[serde(default)]
    pub diatomics: Vec<DiatomicDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRowDef {
    pub name: String,
    pub key: SpeciesKey,
    pub kind: SpeciesKind,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionRowDef {
    pub key: SpeciesKey,
    pub log10_u: PartitionFunction,
}

/// The built-in catalog, built on first use.
pub fn builtin() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| build_builtin().expect("built-in species catalog is valid"))
}

/// Per-element ladder data: first and second ionization potentials [eV]
/// (0 when the second ion is not tracked) and ground-term weights of the
/// neutral, first and second ion.
struct AtomRow {
    element: Element,
    ip1: Real,
    ip2: Real,
    weights: [Real; 3],
}

const fn atom(element: Element, ip1: Real, ip2: Real, weights: [Real; 3]) -> AtomRow {
    AtomRow {
        element,
        ip1,
        ip2,
        weights,
    }
}

const ATOMS: [AtomRow; 40] = [
    atom(Element::H, 13.598, 0.0, [2.0, 1.0, 1.0]),
    atom(Element::He, 24.587, 54.418, [1.0, 2.0, 1.0]),
    atom(Element::Li, 5.392, 0.0, [2.0, 1.0, 1.0]),
    atom(Element::Be, 9.323, 0.0, [1.0, 2.0, 1.0]),
    atom(Element::B, 8.298, 0.0, [6.0, 1.0, 2.0]),
    atom(Element::C, 11.260, 24.383, [9.0, 6.0, 1.0]),
    atom(Element::N, 14.534, 29.601, [4.0, 9.0, 6.0]),
    atom(Element::O, 13.618, 35.121, [9.0, 4.0, 9.0]),
    atom(Element::F, 17.423, 0.0, [6.0, 9.0, 4.0]),
    atom(Element::Ne, 21.565, 0.0, [1.0, 6.0, 9.0]),
    atom(Element::Na, 5.139, 47.286, [2.0, 1.0, 6.0]),
    atom(Element::Mg, 7.646, 15.035, [1.0, 2.0, 1.0]),
    atom(Element::Al, 5.986, 18.829, [6.0, 1.0, 2.0]),
    atom(Element::Si, 8.152, 16.346, [9.0, 6.0, 1.0]),
    atom(Element::P, 10.487, 0.0, [4.0, 9.0, 6.0]),
    atom(Element::S, 10.360, 23.338, [9.0, 4.0, 9.0]),
    atom(Element::Cl, 12.968, 0.0, [6.0, 9.0, 4.0]),
    atom(Element::Ar, 15.760, 0.0, [1.0, 6.0, 9.0]),
    atom(Element::K, 4.341, 31.625, [2.0, 1.0, 6.0]),
    atom(Element::Ca, 6.113, 11.872, [1.0, 2.0, 1.0]),
    atom(Element::Sc, 6.561, 12.800, [10.0, 15.0, 10.0]),
    atom(Element::Ti, 6.828, 13.576, [21.0, 28.0, 21.0]),
    atom(Element::V, 6.746, 14.618, [28.0, 25.0, 28.0]),
    atom(Element::Cr, 6.767, 16.486, [7.0, 6.0, 25.0]),
    atom(Element::Mn, 7.434, 15.640, [6.0, 7.0, 6.0]),
    atom(Element::Fe, 7.902, 16.199, [25.0, 30.0, 25.0]),
    atom(Element::Co, 7.881, 0.0, [28.0, 21.0, 28.0]),
    atom(Element::Ni, 7.640, 18.169, [21.0, 10.0, 21.0]),
    atom(Element::Cu, 7.726, 0.0, [2.0, 1.0, 10.0]),
    atom(Element::Zn, 9.394, 0.0, [1.0, 2.0, 1.0]),
    atom(Element::Ga, 5.999, 0.0, [6.0, 1.0, 2.0]),
    atom(Element::Ge, 7.899, 0.0, [9.0, 6.0, 1.0]),
    atom(Element::As, 9.789, 0.0, [4.0, 9.0, 6.0]),
    atom(Element::Se, 9.752, 0.0, [9.0, 4.0, 9.0]),
    atom(Element::Br, 11.814, 0.0, [6.0, 9.0, 4.0]),
    atom(Element::Kr, 14.000, 0.0, [1.0, 6.0, 9.0]),
    atom(Element::Rb, 4.177, 0.0, [2.0, 1.0, 6.0]),
    atom(Element::Sr, 5.695, 11.030, [1.0, 2.0, 1.0]),
    atom(Element::Y, 6.217, 12.224, [10.0, 15.0, 10.0]),
    atom(Element::Zr, 6.634, 13.130, [21.0, 28.0, 21.0]),
];

/// Electron affinity of hydrogen [eV].
const H_MINUS_AFFINITY: Real = 0.754;

/// (name, parent, partners, log₁₀K coefficients, priority)
type PolyRow = (&'static str, Element, &'static [Element], [Real; 5], Priority);

const POLYNOMIAL_MOLECULES: [PolyRow; 17] = [
    ("H2", Element::H, &[Element::H], [12.739, -5.1172, 0.12572, -0.014149, 6.3021e-4], Priority::Major),
    ("CO", Element::C, &[Element::O], [13.590, -11.795, 0.17217, -0.022888, 1.2829e-3], Priority::Major),
    ("CH", Element::C, &[Element::H], [12.135, -4.0760, 0.12768, -0.015473, 7.1000e-4], Priority::Major),
    ("N2", Element::N, &[Element::N], [13.865, -10.397, 0.08490, -0.010900, 5.7000e-4], Priority::Major),
    ("NH", Element::N, &[Element::H], [12.133, -4.0116, 0.14226, -0.015887, 7.2000e-4], Priority::Major),
    ("OH", Element::O, &[Element::H], [12.371, -5.0578, 0.13822, -0.016547, 7.7224e-4], Priority::Major),
    ("H2O", Element::O, &[Element::H, Element::H], [25.420, -10.522, 0.16939, -0.018368, 8.1703e-4], Priority::Major),
    ("SiO", Element::Si, &[Element::O], [13.413, -8.8710, 0.13850, -0.013900, 6.3000e-4], Priority::Major),
    ("SiS", Element::Si, &[Element::S], [13.040, -6.4000, 0.12000, -0.013000, 6.0000e-4], Priority::Major),
    ("HS", Element::S, &[Element::H], [12.030, -3.9000, 0.12000, -0.014000, 6.5000e-4], Priority::Major),
    ("H2S", Element::S, &[Element::H, Element::H], [24.460, -7.6000, 0.17000, -0.019000, 8.5000e-4], Priority::Major),
    ("HCl", Element::Cl, &[Element::H], [12.500, -4.5000, 0.12000, -0.014000, 6.3000e-4], Priority::Minor),
    ("ScO", Element::Sc, &[Element::O], [13.400, -6.9000, 0.13000, -0.015000, 6.8000e-4], Priority::Minor),
    ("TiO", Element::Ti, &[Element::O], [13.398, -6.8000, 0.13000, -0.015000, 6.8000e-4], Priority::Minor),
    ("VO", Element::V, &[Element::O], [13.300, -6.4000, 0.13000, -0.015000, 6.8000e-4], Priority::Minor),
    ("YO", Element::Y, &[Element::O], [13.300, -7.3000, 0.13000, -0.015000, 6.8000e-4], Priority::Minor),
    ("ZrO", Element::Zr, &[Element::O], [13.300, -7.8000, 0.13000, -0.015000, 6.8000e-4], Priority::Minor),
];

/// (name, parent, partner, D₀ [eV], log₁₀(U_A·U_B/U_AB))
const DISSOCIATION_MOLECULES: [(&str, Element, Element, Real, Real); 5] = [
    ("C2", Element::C, Element::C, 6.21, -1.1),
    ("CN", Element::C, Element::N, 7.72, -1.9),
    ("MgH", Element::Mg, Element::H, 1.34, -2.2),
    ("CaH", Element::Ca, Element::H, 1.70, -2.4),
    ("SiH", Element::Si, Element::H, 3.06, -1.6),
];

/// Dissociation energies [eV] of the polynomial-fit diatomics.
const POLYNOMIAL_DISSOCIATION: [(&str, Real); 15] = [
    ("H2", 4.478),
    ("CO", 11.092),
    ("CH", 3.465),
    ("N2", 9.759),
    ("NH", 3.47),
    ("OH", 4.392),
    ("SiO", 8.26),
    ("SiS", 6.42),
    ("HS", 3.62),
    ("HCl", 4.434),
    ("ScO", 6.96),
    ("TiO", 6.87),
    ("VO", 6.44),
    ("YO", 7.29),
    ("ZrO", 7.85),
];

/// log₁₀ U at the breakpoints for species whose partition function departs
/// from the bare ground-term weight.
const PARTITION_NODES: [(&str, [Real; 5]); 49] = [
    ("H", [0.301, 0.301, 0.301, 0.301, 0.301]),
    ("He+", [0.301, 0.301, 0.301, 0.301, 0.301]),
    ("C", [0.95, 0.95, 0.96, 1.00, 1.04]),
    ("C+", [0.60, 0.75, 0.78, 0.78, 0.78]),
    ("N", [0.60, 0.60, 0.60, 0.62, 0.65]),
    ("N+", [0.90, 0.95, 0.95, 0.96, 0.97]),
    ("O", [0.70, 0.88, 0.94, 0.95, 0.97]),
    ("O+", [0.60, 0.60, 0.60, 0.60, 0.61]),
    ("Na", [0.301, 0.301, 0.301, 0.45, 0.60]),
    ("Mg", [0.0, 0.0, 0.0, 0.08, 0.30]),
    ("Mg+", [0.301, 0.301, 0.301, 0.301, 0.31]),
    ("Al", [0.50, 0.72, 0.77, 0.80, 0.82]),
    ("Al+", [0.0, 0.0, 0.0, 0.0, 0.01]),
    ("Si", [0.80, 0.95, 0.98, 1.04, 1.08]),
    ("Si+", [0.60, 0.74, 0.76, 0.78, 0.79]),
    ("S", [0.70, 0.85, 0.92, 0.95, 0.98]),
    ("S+", [0.60, 0.60, 0.60, 0.63, 0.66]),
    ("K", [0.301, 0.301, 0.301, 0.65, 1.00]),
    ("Ca", [0.0, 0.0, 0.01, 0.25, 0.60]),
    ("Ca+", [0.301, 0.301, 0.32, 0.40, 0.45]),
    ("Ti", [1.15, 1.30, 1.45, 1.80, 1.95]),
    ("Ti+", [1.60, 1.65, 1.70, 1.80, 1.85]),
    ("Fe", [1.30, 1.35, 1.40, 1.80, 2.00]),
    ("Fe+", [1.50, 1.55, 1.60, 1.75, 1.80]),
    ("Fe++", [1.40, 1.40, 1.40, 1.45, 1.50]),
    ("H2", [0.00, 0.50, 1.35, 2.05, 2.25]),
    ("CO", [1.70, 2.30, 3.15, 3.85, 4.05]),
    ("CH", [1.20, 1.65, 2.45, 3.15, 3.35]),
    ("N2", [1.35, 1.95, 2.85, 3.55, 3.75]),
    ("NH", [0.95, 1.40, 2.15, 2.80, 3.00]),
    ("OH", [1.10, 1.55, 2.30, 2.95, 3.15]),
    ("H2O", [1.20, 2.00, 3.30, 4.20, 4.40]),
    ("SiO", [2.20, 2.80, 3.75, 4.45, 4.65]),
    ("SiS", [2.60, 3.20, 4.15, 4.85, 5.05]),
    ("HS", [1.35, 1.80, 2.55, 3.20, 3.40]),
    ("H2S", [1.50, 2.30, 3.60, 4.50, 4.70]),
    ("HCl", [0.75, 1.20, 1.95, 2.55, 2.75]),
    ("ScO", [2.40, 3.00, 4.00, 4.75, 4.95]),
    ("TiO", [2.80, 3.40, 4.45, 5.20, 5.40]),
    ("VO", [2.80, 3.40, 4.40, 5.15, 5.35]),
    ("YO", [2.50, 3.10, 4.10, 4.85, 5.05]),
    ("ZrO", [2.50, 3.10, 4.15, 4.90, 5.10]),
    ("C2", [1.40, 2.00, 3.00, 3.80, 4.00]),
    ("CN", [1.90, 2.50, 3.45, 4.20, 4.40]),
    ("MgH", [1.40, 1.90, 2.70, 3.40, 3.60]),
    ("CaH", [1.60, 2.10, 2.90, 3.60, 3.80]),
    ("SiH", [1.80, 2.25, 3.00, 3.65, 3.85]),
    ("Sc+", [1.20, 1.25, 1.40, 1.55, 1.60]),
    ("Zr", [1.40, 1.50, 1.60, 1.90, 2.05]),
];

fn build_builtin() -> SpeciesResult<Catalog> {
    let mut builder = SpeciesRegistryBuilder::new();
    let mut partitions = PartitionTable::new();

    for row in &ATOMS {
        let e = row.element;
        let [g0, g1, g2] = row.weights;
        let ion_priority = if e.is_major() {
            Priority::Major
        } else {
            Priority::Minor
        };

        builder.add(e.symbol(), SpeciesKey::atom(e), SpeciesKind::Inert, Priority::Major);
        partitions.insert(SpeciesKey::atom(e), PartitionFunction::constant(g0));

        let plus = SpeciesKey::ion(e, 1);
        builder.add(
            plus.ion_label(),
            plus.clone(),
            SpeciesKind::IonLadder {
                ionization_potential_ev: row.ip1,
                log_stat_weight: (2.0 * g1 / g0).log10(),
            },
            ion_priority,
        );
        partitions.insert(plus, PartitionFunction::constant(g1));

        if row.ip2 > 0.0 {
            let plus2 = SpeciesKey::ion(e, 2);
            builder.add(
                plus2.ion_label(),
                plus2.clone(),
                SpeciesKind::IonLadder {
                    ionization_potential_ev: row.ip2,
                    log_stat_weight: (2.0 * g2 / g1).log10(),
                },
                if e.is_major() {
                    Priority::Minor
                } else {
                    Priority::Trace
                },
            );
            partitions.insert(plus2, PartitionFunction::constant(g2));
        }

        if e == Element::H {
            // H- -> H + e: weight ratio 2·U(H)/U(H-) with U(H-) = 1.
            builder.add(
                "H-",
                SpeciesKey::ion(e, -1),
                SpeciesKind::IonLadder {
                    ionization_potential_ev: H_MINUS_AFFINITY,
                    log_stat_weight: (2.0 * g0).log10(),
                },
                Priority::Major,
            );
        }
    }

    let mut diatomics = Vec::new();
    for (name, parent, partners, coefficients, priority) in POLYNOMIAL_MOLECULES {
        let key = SpeciesKey::molecule(parent, partners.to_vec());
        builder.add(name, key, SpeciesKind::PolynomialFit { coefficients }, priority);
        if let Some((_, d0)) = POLYNOMIAL_DISSOCIATION.iter().find(|(n, _)| *n == name) {
            diatomics.push(DiatomicDef {
                name: name.to_string(),
                parent,
                partner: partners[0],
                dissociation_ev: *d0,
            });
        }
    }

    for (name, parent, partner, d0, log_weight_ratio) in DISSOCIATION_MOLECULES {
        let diatomic = DiatomicDef {
            name: name.to_string(),
            parent,
            partner,
            dissociation_ev: d0,
        };
        builder.add(
            name,
            diatomic.key(),
            SpeciesKind::Molecule {
                dissociation_ev: d0,
                reduced_mass_amu: diatomic.reduced_mass_amu(),
                log_weight_ratio,
            },
            Priority::Minor,
        );
        diatomics.push(diatomic);
    }

    let registry = builder.build()?;

    for (name, nodes) in PARTITION_NODES {
        let id = registry.lookup(name)?;
        if let Some(def) = registry.get(id) {
            partitions.insert(def.key.clone(), PartitionFunction::new(nodes));
        }
    }

    Ok(Catalog::new(registry, partitions, diatomics))
}
