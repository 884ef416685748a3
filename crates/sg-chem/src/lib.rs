//! LTE chemical equilibrium engine for stellar atmospheres.
//!
//! Given temperature, total pressure and elemental composition at a depth,
//! this crate provides:
//! - equilibrium constants for every tracked species ([`equilibrium`])
//! - a closed-form initial guess for electron and partial pressures ([`estimate`])
//! - ionization-stage and molecule populations in log space ([`stages`], [`molecules`])
//! - Boltzmann level populations and the raw Saha ratio ([`levels`], [`saha`])
//! - a depth-grid driver running the above across depths in parallel ([`grid`])
//!
//! All quantities are CGS: pressures in dyn/cm², densities in cm⁻³, energies in eV.

pub mod equilibrium;
pub mod error;
pub mod estimate;
pub mod gas_state;
pub mod grid;
pub mod levels;
pub mod molecules;
pub mod saha;
pub mod stages;

pub use equilibrium::{EquilibriumConstants, evaluate_equilibrium_constants, theta};
pub use error::{ChemError, ChemResult};
pub use estimate::{
    EstimatorConfig, InitialGuess, PeSeed, SolveLevel, estimate_at, estimate_initial_guess,
};
pub use gas_state::{GasState, PeConvergence};
pub use grid::{AtmosphereDepthGrid, element_populations, estimate_grid};
pub use levels::{EnergyLevel, level_population};
pub use molecules::{molecule_fraction, molecule_population};
pub use saha::saha_rhs;
pub use stages::{ElementStages, MoleculeData, StagePopulations, stage_populations};
