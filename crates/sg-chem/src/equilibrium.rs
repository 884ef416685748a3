//! Equilibrium constants at one temperature.
//!
//! Every evaluated species gets a linear equilibrium constant K and an
//! ionization factor (its net charge for ion-ladder rows, 1 for the neutral
//! reference atoms, 0 for molecules). Ion-ladder constants are cumulative
//! along the charge sequence of each parent, so K of `Fe++` relates it to the
//! neutral `Fe` directly. Negative ions enter with the opposite sign, which
//! makes their K an association constant: `K(H-) = P(H-) / (P(H)·Pe)`.
//!
//! Units are CGS pressures (dyn/cm²).

use sg_core::constants::{AMU, FROZEN_CHEMISTRY_T, H_PLANCK, K_BOLTZMANN, THETA_SCALE};
use sg_core::{Real, SpeciesId};
use sg_species::{Element, SpeciesKind, SpeciesRegistry};
use std::f64::consts::{LN_10, PI};

/// Saha constant in log₁₀ pressure form: log₁₀[(2π mₑ)^1.5 k^2.5 / h³].
const SAHA_LOG10_OFFSET: Real = -0.48;

/// θ = 5039.77 / T.
pub fn theta(t: Real) -> Real {
    THETA_SCALE / t
}

/// log₁₀[k^2.5 (2π·amu/h²)^1.5], the constant term of the dissociation form.
pub fn molecular_log10_constant() -> Real {
    2.5 * K_BOLTZMANN.log10() + 1.5 * (2.0 * PI * AMU / (H_PLANCK * H_PLANCK)).log10()
}

/// Linear equilibrium constants and ionization factors, one slot per species
/// plus a trailing sentinel slot fixed at 1.
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumConstants {
    temperature: Real,
    constants: Vec<Real>,
    factors: Vec<Real>,
}

impl EquilibriumConstants {
    /// Temperature the constants were evaluated at, after clamping.
    pub fn temperature(&self) -> Real {
        self.temperature
    }

    pub fn constant(&self, id: SpeciesId) -> Real {
        self.constants[id.index()]
    }

    pub fn factor(&self, id: SpeciesId) -> Real {
        self.factors[id.index()]
    }

    pub fn constants(&self) -> &[Real] {
        &self.constants
    }

    pub fn factors(&self) -> &[Real] {
        &self.factors
    }

    /// Number of species slots, excluding the sentinel.
    pub fn len(&self) -> usize {
        self.constants.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Evaluate K for every species of `registry` at temperature `t`.
///
/// `t` is clamped from below at 1200 K: colder gas is treated as frozen
/// chemistry with the constants of 1200 K.
pub fn evaluate_equilibrium_constants(registry: &SpeciesRegistry, t: Real) -> EquilibriumConstants {
    let t = t.max(FROZEN_CHEMISTRY_T);
    let th = theta(t);
    let log_t = t.log10();
    let mol_const = molecular_log10_constant();

    let n = registry.len();
    let mut constants = vec![0.0; n + 1];
    let mut factors = vec![0.0; n + 1];

    // Running log₁₀ K along the current charge ladder.
    let mut ladder: Option<(Element, i8)> = None;
    let mut acc: Real = 0.0;

    for (i, def) in registry.defs().iter().enumerate() {
        let log_k = match &def.kind {
            SpeciesKind::IonLadder {
                ionization_potential_ev,
                log_stat_weight,
            } => {
                let q = def.charge();
                let sign = Real::from(q.signum());
                let continues = ladder == Some((def.parent(), q - q.signum()));
                if !continues {
                    acc = 0.0;
                }
                acc += sign * (-th * ionization_potential_ev + 2.5 * log_t + log_stat_weight + SAHA_LOG10_OFFSET);
                ladder = Some((def.parent(), q));
                factors[i] = Real::from(q);
                Some(acc)
            }
            SpeciesKind::PolynomialFit { coefficients: c } => {
                ladder = None;
                Some(c[0] + th * (c[1] + th * (c[2] + th * (c[3] + th * c[4]))))
            }
            SpeciesKind::Molecule {
                dissociation_ev,
                reduced_mass_amu,
                log_weight_ratio,
            } => {
                ladder = None;
                Some(
                    -th * dissociation_ev
                        + 2.5 * log_t
                        + 1.5 * reduced_mass_amu.log10()
                        + log_weight_ratio
                        + mol_const,
                )
            }
            SpeciesKind::Inert => {
                ladder = None;
                factors[i] = 1.0;
                constants[i] = 1.0;
                None
            }
        };

        if let Some(log_k) = log_k {
            constants[i] = (LN_10 * log_k).exp();
        }
        if !def.priority.is_evaluated() {
            constants[i] = 0.0;
            factors[i] = 0.0;
        }
    }

    constants[n] = 1.0;
    factors[n] = 1.0;

    EquilibriumConstants {
        temperature: t,
        constants,
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_species::{Priority, SpeciesKey, SpeciesRegistryBuilder, builtin};

    fn k_of(eq: &EquilibriumConstants, reg: &SpeciesRegistry, name: &str) -> Real {
        eq.constant(reg.lookup(name).unwrap())
    }

    #[test]
    fn molecular_constant_value() {
        assert!((molecular_log10_constant() - 4.414).abs() < 2e-3);
    }

    #[test]
    fn sentinel_and_sizes() {
        let reg = builtin().registry();
        let eq = evaluate_equilibrium_constants(reg, 5000.0);
        assert_eq!(eq.constants().len(), reg.len() + 1);
        assert_eq!(eq.factors().len(), reg.len() + 1);
        assert_eq!(eq.constants()[reg.len()], 1.0);
        assert_eq!(eq.factors()[reg.len()], 1.0);
        assert_eq!(eq.len(), reg.len());
    }

    #[test]
    fn hydrogen_ionization_matches_saha() {
        let reg = builtin().registry();
        let t = 6000.0;
        let eq = evaluate_equilibrium_constants(reg, t);
        let expected = -theta(t) * 13.598 + 2.5 * t.log10() + (2.0_f64 * 1.0 / 2.0).log10() - 0.48;
        let k = k_of(&eq, reg, "H+");
        assert!((k.log10() - expected).abs() < 1e-10);
        assert_eq!(eq.factor(reg.lookup("H+").unwrap()), 1.0);
        assert_eq!(eq.factor(reg.lookup("H").unwrap()), 1.0);
        assert_eq!(k_of(&eq, reg, "H"), 1.0);
    }

    #[test]
    fn ladder_accumulates_and_negative_ion_resets() {
        let reg = builtin().registry();
        let t = 8000.0;
        let eq = evaluate_equilibrium_constants(reg, t);
        let th = theta(t);
        let step = |ip: Real, g: Real| -th * ip + 2.5 * t.log10() + g - 0.48;

        let fe1 = k_of(&eq, reg, "Fe+").log10();
        let fe2 = k_of(&eq, reg, "Fe++").log10();
        assert!((fe1 - step(7.902, (60.0_f64 / 25.0).log10())).abs() < 1e-10);
        assert!((fe2 - fe1 - step(16.199, (50.0_f64 / 30.0).log10())).abs() < 1e-10);
        assert_eq!(eq.factor(reg.lookup("Fe++").unwrap()), 2.0);

        // H- follows H+ but starts a new sequence from charge 0.
        let hm = k_of(&eq, reg, "H-").log10();
        assert!((hm + step(0.754, 4.0_f64.log10())).abs() < 1e-10);
        assert_eq!(eq.factor(reg.lookup("H-").unwrap()), -1.0);
    }

    #[test]
    fn polynomial_and_molecule_forms() {
        let reg = builtin().registry();
        let t = 5000.0;
        let eq = evaluate_equilibrium_constants(reg, t);
        let th = theta(t);

        let c = [13.590, -11.795, 0.17217, -0.022888, 1.2829e-3];
        let expected = c[0] + c[1] * th + c[2] * th.powi(2) + c[3] * th.powi(3) + c[4] * th.powi(4);
        assert!((k_of(&eq, reg, "CO").log10() - expected).abs() < 1e-10);
        assert_eq!(eq.factor(reg.lookup("CO").unwrap()), 0.0);

        let cn = reg.get(reg.lookup("CN").unwrap()).unwrap();
        let SpeciesKind::Molecule {
            reduced_mass_amu, ..
        } = cn.kind
        else {
            panic!("CN should use the dissociation form");
        };
        let expected = -th * 7.72 + 2.5 * t.log10() + 1.5 * reduced_mass_amu.log10() - 1.9 + molecular_log10_constant();
        assert!((k_of(&eq, reg, "CN").log10() - expected).abs() < 1e-10);
    }

    #[test]
    fn trace_species_are_not_evaluated() {
        let reg = builtin().registry();
        let eq = evaluate_equilibrium_constants(reg, 5000.0);
        let ti2 = reg.lookup("Ti++").unwrap();
        assert_eq!(reg.get(ti2).unwrap().priority, Priority::Trace);
        assert_eq!(eq.constant(ti2), 0.0);
        assert_eq!(eq.factor(ti2), 0.0);
    }

    #[test]
    fn cold_temperatures_are_clamped() {
        let reg = builtin().registry();
        let cold = evaluate_equilibrium_constants(reg, 800.0);
        let floor = evaluate_equilibrium_constants(reg, 1200.0);
        assert_eq!(cold, floor);
        assert_eq!(cold.temperature(), 1200.0);
    }

    #[test]
    fn repeated_evaluation_is_bit_identical() {
        let reg = builtin().registry();
        let a = evaluate_equilibrium_constants(reg, 4321.0);
        let b = evaluate_equilibrium_constants(reg, 4321.0);
        assert_eq!(a, b);
    }

    #[test]
    fn ladder_after_molecule_restarts() {
        let mut b = SpeciesRegistryBuilder::new();
        b.add("Na", SpeciesKey::atom(Element::Na), SpeciesKind::Inert, Priority::Major);
        b.add(
            "Na+",
            SpeciesKey::ion(Element::Na, 1),
            SpeciesKind::IonLadder {
                ionization_potential_ev: 5.139,
                log_stat_weight: 0.0,
            },
            Priority::Major,
        );
        let reg = b.build().unwrap();
        let eq = evaluate_equilibrium_constants(&reg, 5000.0);
        let expected = -theta(5000.0) * 5.139 + 2.5 * 5000.0_f64.log10() - 0.48;
        assert!((k_of(&eq, &reg, "Na+").log10() - expected).abs() < 1e-10);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use sg_species::builtin;

    proptest! {
        #[test]
        fn constants_finite_and_non_negative(t in 1200.0_f64..20_000.0) {
            let eq = evaluate_equilibrium_constants(builtin().registry(), t);
            prop_assert!(eq.constants().iter().all(|k| k.is_finite() && *k >= 0.0));
        }

        #[test]
        fn ionization_grows_with_temperature(t in 1200.0_f64..15_000.0) {
            let reg = builtin().registry();
            let id = reg.lookup("Ca+").unwrap();
            let lo = evaluate_equilibrium_constants(reg, t).constant(id);
            let hi = evaluate_equilibrium_constants(reg, t + 500.0).constant(id);
            prop_assert!(hi > lo);
        }
    }
}
