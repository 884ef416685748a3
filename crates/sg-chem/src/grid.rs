//! Depth-grid driver.
//!
//! Depths are independent: each one gets its own [`GasState`](crate::GasState)
//! and the estimator runs across depths on the rayon pool.

use crate::error::{ChemResult, check_len, check_positive};
use crate::estimate::{EstimatorConfig, InitialGuess, SolveLevel, estimate_initial_guess};
use crate::stages::{ElementStages, MoleculeData, StagePopulations, stage_populations};
use rayon::prelude::*;
use sg_core::constants::K_BOLTZMANN;
use sg_core::numeric::{FLOOR_VANISHING, Real, floored};
use sg_species::{Catalog, Composition, Element, SpeciesRegistry};
use tracing::debug;

/// Temperature and total pressure per depth, with one composition.
#[derive(Debug, Clone, PartialEq)]
pub struct AtmosphereDepthGrid {
    temperatures: Vec<Real>,
    pressures: Vec<Real>,
    composition: Composition,
}

impl AtmosphereDepthGrid {
    /// `temperatures` in K, `pressures` (total gas pressure) in dyn/cm².
    pub fn new(temperatures: Vec<Real>, pressures: Vec<Real>, composition: Composition) -> ChemResult<Self> {
        check_len("pressures", temperatures.len(), pressures.len())?;
        for &t in &temperatures {
            check_positive("temperature", t)?;
        }
        for &p in &pressures {
            check_positive("total pressure", p)?;
        }
        Ok(Self {
            temperatures,
            pressures,
            composition,
        })
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    pub fn temperatures(&self) -> &[Real] {
        &self.temperatures
    }

    pub fn pressures(&self) -> &[Real] {
        &self.pressures
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }
}

/// Run the initial-guess estimator at every depth.
pub fn estimate_grid(
    grid: &AtmosphereDepthGrid,
    level: SolveLevel,
    registry: &SpeciesRegistry,
    config: &EstimatorConfig,
) -> ChemResult<Vec<InitialGuess>> {
    let guesses = grid
        .temperatures
        .par_iter()
        .zip(grid.pressures.par_iter())
        .map(|(&t, &pt)| estimate_initial_guess(t, pt, level, &grid.composition, registry, config))
        .collect::<ChemResult<Vec<_>>>()?;

    let unconverged = guesses
        .iter()
        .filter(|g| !g.convergence().is_converged())
        .count();
    debug!(depths = guesses.len(), unconverged, level = level.as_str(), "depth grid estimate");
    Ok(guesses)
}

/// Stage populations of `element` across the grid.
///
/// Ne = Pe/(kT) and the element's nuclei density Pd·x/(kT) come from the
/// per-depth estimates; every diatomic containing the element is included,
/// with the other atom at its estimated neutral density.
pub fn element_populations(
    grid: &AtmosphereDepthGrid,
    guesses: &[InitialGuess],
    element: Element,
    catalog: &Catalog,
) -> ChemResult<StagePopulations> {
    check_len("guesses", grid.len(), guesses.len())?;
    let stages = ElementStages::from_catalog(catalog, element)?;
    let x = grid.composition.fraction(element);

    let per_depth = |value: &dyn Fn(&InitialGuess) -> Real| -> Vec<Real> {
        guesses
            .iter()
            .zip(&grid.temperatures)
            .map(|(g, &t)| floored(value(g) / (K_BOLTZMANN * t), FLOOR_VANISHING).ln())
            .collect()
    };
    let ln_ne = per_depth(&|g: &InitialGuess| g.pe());
    let ln_total = per_depth(&|g: &InitialGuess| g.pd * x);
    let molecules: Vec<MoleculeData> = catalog
        .diatomics_of(element)
        .map(|d| {
            let partner = d.other(element);
            MoleculeData::bound_to(catalog, d, element, per_depth(&|g: &InitialGuess| g.partial_pressure(partner)))
        })
        .collect();

    stage_populations(&stages, &molecules, &grid.temperatures, &ln_ne, &ln_total)
}
