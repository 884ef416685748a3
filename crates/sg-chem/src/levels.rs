//! Boltzmann distribution of a stage population into one energy level.

use crate::error::{ChemResult, check_len, check_positive};
use serde::{Deserialize, Serialize};
use sg_core::constants::EV_TO_K;
use sg_core::numeric::{FLOOR_TINY, Real, floored};
use sg_species::PartitionFunction;

/// An excited level of an ionization stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyLevel {
    /// Excitation energy above the stage ground level [eV]
    pub excitation_ev: Real,
    /// Statistical weight g
    pub statistical_weight: Real,
}

/// ln N_level = ln N_stage - χ/(kT) + ln g - ln U_stage(T), per depth.
///
/// Non-positive excitation energies are raised to 1e-49 eV.
pub fn level_population(
    ln_stage: &[Real],
    level: &EnergyLevel,
    stage_partition: &PartitionFunction,
    temperatures: &[Real],
) -> ChemResult<Vec<Real>> {
    check_len("ln_stage", temperatures.len(), ln_stage.len())?;
    let ln_g = check_positive("statistical weight", level.statistical_weight)?.ln();
    let chi = floored(level.excitation_ev, FLOOR_TINY);

    Ok(ln_stage
        .iter()
        .zip(temperatures)
        .map(|(ln_n, &t)| ln_n - chi * EV_TO_K / t + ln_g - stage_partition.ln_at(t))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_level_of_constant_partition() {
        // U = g for a single-level stage: the level holds the whole stage.
        let pf = PartitionFunction::constant(2.0);
        let level = EnergyLevel {
            excitation_ev: 0.0,
            statistical_weight: 2.0,
        };
        let pops = level_population(&[20.0, 25.0], &level, &pf, &[4000.0, 9000.0]).unwrap();
        assert!((pops[0] - 20.0).abs() < 1e-12);
        assert!((pops[1] - 25.0).abs() < 1e-12);
    }

    #[test]
    fn zero_excitation_matches_tiny_excitation() {
        let pf = PartitionFunction::new([0.3, 0.4, 0.5, 0.7, 0.9]);
        let zero = EnergyLevel {
            excitation_ev: 0.0,
            statistical_weight: 3.0,
        };
        let tiny = EnergyLevel {
            excitation_ev: 1e-49,
            ..zero
        };
        let negative = EnergyLevel {
            excitation_ev: -2.0,
            ..zero
        };
        let t = [3000.0, 5500.0];
        let a = level_population(&[10.0, 12.0], &zero, &pf, &t).unwrap();
        let b = level_population(&[10.0, 12.0], &tiny, &pf, &t).unwrap();
        let c = level_population(&[10.0, 12.0], &negative, &pf, &t).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(a.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn boltzmann_factor() {
        let pf = PartitionFunction::unity();
        let level = EnergyLevel {
            excitation_ev: 2.0,
            statistical_weight: 1.0,
        };
        let pops = level_population(&[0.0], &level, &pf, &[5000.0]).unwrap();
        assert!((pops[0] + 2.0 * EV_TO_K / 5000.0).abs() < 1e-12);
    }

    #[test]
    fn bad_inputs_rejected() {
        let pf = PartitionFunction::unity();
        let level = EnergyLevel {
            excitation_ev: 1.0,
            statistical_weight: 0.0,
        };
        assert!(level_population(&[0.0], &level, &pf, &[5000.0]).is_err());
        let level = EnergyLevel {
            statistical_weight: 1.0,
            ..level
        };
        assert!(level_population(&[0.0, 1.0], &level, &pf, &[5000.0]).is_err());
    }
}
