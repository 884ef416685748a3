//! Per-depth gas state.

use serde::{Deserialize, Serialize};
use sg_core::Real;
use sg_core::constants::K_BOLTZMANN;
use sg_species::{ELEMENT_COUNT, Element};

/// How the electron-pressure fixed point stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeConvergence {
    /// Relative correction dropped below the tolerance.
    Converged { rounds: usize },
    /// Electron pressure hit the floor `Pt·1e-20`.
    Floored { rounds: usize },
    /// Round cap reached without meeting either criterion.
    RoundCapReached,
}

impl PeConvergence {
    pub fn is_converged(self) -> bool {
        !matches!(self, PeConvergence::RoundCapReached)
    }
}

impl std::fmt::Display for PeConvergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeConvergence::Converged { rounds } => write!(f, "converged after {rounds} rounds"),
            PeConvergence::Floored { rounds } => write!(f, "floored after {rounds} rounds"),
            PeConvergence::RoundCapReached => f.write_str("round cap reached"),
        }
    }
}

/// Working state of one depth point. Created fresh for every evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct GasState {
    /// Temperature [K]
    pub temperature: Real,
    /// Total gas pressure [dyn/cm²]
    pub total_pressure: Real,
    /// Electron pressure [dyn/cm²]
    pub electron_pressure: Real,
    /// Neutral-atom partial pressure per element, slot Z-1 [dyn/cm²]
    pub partial_pressures: [Real; ELEMENT_COUNT],
    pub rounds: usize,
    pub convergence: PeConvergence,
}

impl GasState {
    pub fn new(temperature: Real, total_pressure: Real) -> Self {
        Self {
            temperature,
            total_pressure,
            electron_pressure: 0.0,
            partial_pressures: [0.0; ELEMENT_COUNT],
            rounds: 0,
            convergence: PeConvergence::RoundCapReached,
        }
    }

    pub fn partial_pressure(&self, element: Element) -> Real {
        self.partial_pressures[element.slot()]
    }

    /// Electron number density Ne = Pe/(kT) [cm⁻³].
    pub fn electron_density(&self) -> Real {
        self.electron_pressure / (K_BOLTZMANN * self.temperature)
    }

    /// Neutral-atom number density of `element` [cm⁻³].
    pub fn atom_density(&self, element: Element) -> Real {
        self.partial_pressure(element) / (K_BOLTZMANN * self.temperature)
    }
}
