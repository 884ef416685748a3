//! Species keys and per-species definitions.

use crate::element::Element;
use serde::{Deserialize, Serialize};
use sg_core::{Real, SpeciesId};

/// Structured lookup key: parent element, net charge, bonded partners.
///
/// Partners are kept sorted by atomic number so that equal molecules
/// produce equal keys regardless of how they were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesKey {
    pub element: Element,
    #[serde(default)]
    pub charge: i8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partners: Vec<Element>,
}

impl SpeciesKey {
    pub fn atom(element: Element) -> Self {
        Self {
            element,
            charge: 0,
            partners: Vec::new(),
        }
    }

    pub fn ion(element: Element, charge: i8) -> Self {
        Self {
            element,
            charge,
            partners: Vec::new(),
        }
    }

    pub fn molecule(element: Element, mut partners: Vec<Element>) -> Self {
        partners.sort();
        Self {
            element,
            charge: 0,
            partners,
        }
    }

    pub fn is_atomic(&self) -> bool {
        self.partners.is_empty()
    }

    /// Spectroscopic-style label for atoms and ions: `Fe`, `Fe+`, `Fe++`, `H-`.
    pub fn ion_label(&self) -> String {
        let sign = if self.charge >= 0 { '+' } else { '-' };
        let mut label = self.element.symbol().to_string();
        for _ in 0..self.charge.unsigned_abs() {
            label.push(sign);
        }
        label
    }
}

impl std::str::FromStr for SpeciesKey {
    type Err = &'static str;

    /// Parses atom and ion labels: `Fe`, `Fe+`, `Fe++`, `Fe+2`, `H-`.
    /// Molecules are looked up by name through the registry instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.find(|c: char| c == '+' || c == '-').unwrap_or(s.len());
        let (symbol, tail) = s.split_at(split);
        let element: Element = symbol.parse()?;
        if tail.is_empty() {
            return Ok(SpeciesKey::atom(element));
        }

        let sign: i8 = if tail.starts_with('+') { 1 } else { -1 };
        let signs = tail.chars().take_while(|c| *c == '+' || *c == '-').count();
        let rest = &tail[signs..];
        let first = if sign > 0 { '+' } else { '-' };
        if tail[..signs].chars().any(|c| c != first) {
            return Err("mixed charge signs");
        }
        let magnitude: i8 = if rest.is_empty() {
            i8::try_from(signs).map_err(|_| "charge out of range")?
        } else if signs == 1 {
            rest.parse().map_err(|_| "invalid charge")?
        } else {
            return Err("invalid charge");
        };
        Ok(SpeciesKey::ion(element, sign * magnitude))
    }
}

/// How a species' equilibrium constant is obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpeciesKind {
    /// One step of an element's ionization ladder.
    ///
    /// `ionization_potential_ev` is the energy of the step from the previous
    /// charge towards zero (for negative ions, the electron affinity).
    /// `log_stat_weight` is log₁₀(2·U_upper/U_lower).
    IonLadder {
        ionization_potential_ev: Real,
        log_stat_weight: Real,
    },
    /// log₁₀ K as a quartic polynomial in θ (coefficients c0..c4).
    PolynomialFit { coefficients: [Real; 5] },
    /// Dissociation-energy form of the molecular equilibrium constant.
    ///
    /// `log_weight_ratio` is log₁₀(U_A·U_B/U_AB), frozen at a representative temperature.
    Molecule {
        dissociation_ev: Real,
        reduced_mass_amu: Real,
        log_weight_ratio: Real,
    },
    /// Reference species (neutral atom): K = 1.
    Inert,
}

impl SpeciesKind {
    pub fn label(&self) -> &'static str {
        match self {
            SpeciesKind::IonLadder { .. } => "ion ladder",
            SpeciesKind::PolynomialFit { .. } => "polynomial fit",
            SpeciesKind::Molecule { .. } => "molecule",
            SpeciesKind::Inert => "inert",
        }
    }
}

/// Evaluation priority. Only `Major` and `Minor` species get equilibrium constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Major = 1,
    Minor = 2,
    Trace = 3,
}

impl Priority {
    pub fn is_evaluated(self) -> bool {
        self <= Priority::Minor
    }
}

/// One immutable row of the species table.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesDef {
    pub name: String,
    pub key: SpeciesKey,
    pub kind: SpeciesKind,
    pub priority: Priority,
    /// Neutral atom of the parent element (set by the registry builder).
    pub neutral_parent: Option<SpeciesId>,
}

impl SpeciesDef {
    pub fn parent(&self) -> Element {
        self.key.element
    }

    pub fn charge(&self) -> i8 {
        self.key.charge
    }
}
