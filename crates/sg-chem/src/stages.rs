//! Ionization-stage populations of one element, net of molecule formation.
//!
//! For every depth the element's nuclei are shared between its ionization
//! stages (linked by the Saha equation at the given electron density) and the
//! diatomic molecules it forms with partners of known density. Everything is
//! evaluated in natural-log space and summed with log-sum-exp, so no
//! individual Saha factor can overflow.

use crate::error::{ChemError, ChemResult, check_len};
use sg_core::constants::{AMU, EV_TO_K, H_PLANCK, K_BOLTZMANN, M_ELECTRON};
use sg_core::numeric::{FLOOR_VANISHING, Real, log_sum_exp};
use sg_species::{Catalog, DiatomicDef, Element, PartitionFunction, SpeciesKey};
use std::f64::consts::{LN_2, PI};

/// 1.5·ln(2π·m·k/h²) for a particle of mass `mass_g`.
fn ln_translational(mass_g: Real) -> Real {
    1.5 * ((2.0 * PI).ln() + mass_g.ln() + K_BOLTZMANN.ln() - 2.0 * H_PLANCK.ln())
}

/// ln S_{i+1,i} = ln(N_{i+1}/N_i) at one depth.
pub(crate) fn ln_saha_step(chi_ev: Real, ln_u_upper: Real, ln_u_lower: Real, t: Real, ln_ne: Real) -> Real {
    LN_2 + ln_translational(M_ELECTRON) - ln_ne - chi_ev * EV_TO_K / t + 1.5 * t.ln() + ln_u_upper - ln_u_lower
}

/// Ionization ladder data of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStages {
    ionization_potentials_ev: Vec<Real>,
    partitions: Vec<PartitionFunction>,
}

impl ElementStages {
    /// `partitions` covers stages 0..=N for N ionization potentials.
    pub fn new(ionization_potentials_ev: Vec<Real>, partitions: Vec<PartitionFunction>) -> ChemResult<Self> {
        check_len(
            "stage partition functions",
            ionization_potentials_ev.len() + 1,
            partitions.len(),
        )?;
        Ok(Self {
            ionization_potentials_ev,
            partitions,
        })
    }

    /// Stages of `element` as tracked by `catalog` (neutral + positive ladder).
    pub fn from_catalog(catalog: &Catalog, element: Element) -> ChemResult<Self> {
        let ips = catalog.ionization_potentials(element);
        let partitions = (0..=ips.len())
            .map(|q| -> ChemResult<PartitionFunction> {
                let q = i8::try_from(q).map_err(|_| ChemError::InvalidInput {
                    what: format!("too many ionization stages for {element}"),
                })?;
                Ok(catalog.partition(&SpeciesKey::ion(element, q)))
            })
            .collect::<ChemResult<Vec<_>>>()?;
        Self::new(ips, partitions)
    }

    pub fn stage_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn ionization_potentials_ev(&self) -> &[Real] {
        &self.ionization_potentials_ev
    }

    pub fn partition(&self, stage: usize) -> &PartitionFunction {
        &self.partitions[stage]
    }
}

/// One diatomic molecule A-B of the element A being solved for.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeData {
    pub dissociation_ev: Real,
    pub reduced_mass_amu: Real,
    /// ln number density of the partner B per depth [cm⁻³]
    pub ln_partner_density: Vec<Real>,
    pub partner_partition: PartitionFunction,
    pub partition: PartitionFunction,
}

impl MoleculeData {
    /// Stand-in for an element that forms no molecules.
    ///
    /// The partner is absent (density 1e-99 cm⁻³) and D₀ = 0, in place of an
    /// unbounded dissociation energy, so the term stays finite while
    /// contributing nothing measurable next to the atomic ladder.
    pub fn phantom(depths: usize) -> Self {
        Self {
            dissociation_ev: 0.0,
            reduced_mass_amu: 1.0,
            ln_partner_density: vec![FLOOR_VANISHING.ln(); depths],
            partner_partition: PartitionFunction::unity(),
            partition: PartitionFunction::unity(),
        }
    }

    /// The molecule as seen from its parent element.
    pub fn from_diatomic(catalog: &Catalog, diatomic: &DiatomicDef, ln_partner_density: Vec<Real>) -> Self {
        Self::bound_to(catalog, diatomic, diatomic.parent, ln_partner_density)
    }

    /// The molecule as seen from `element`: the other atom is the partner,
    /// so an oxygen solve counts CO with carbon at `ln_partner_density`.
    pub fn bound_to(
        catalog: &Catalog,
        diatomic: &DiatomicDef,
        element: Element,
        ln_partner_density: Vec<Real>,
    ) -> Self {
        Self {
            dissociation_ev: diatomic.dissociation_ev,
            reduced_mass_amu: diatomic.reduced_mass_amu(),
            ln_partner_density,
            partner_partition: catalog.partition(&SpeciesKey::atom(diatomic.other(element))),
            partition: catalog.partition(&diatomic.key()),
        }
    }

    /// ln(N_AB / N_A0) at one depth, given ln U of the neutral parent.
    pub fn ln_inverse_saha(&self, ln_u_parent: Real, t: Real, depth: usize) -> Real {
        self.ln_partner_density[depth] - ln_translational(self.reduced_mass_amu * AMU) - 1.5 * t.ln()
            + self.dissociation_ev * EV_TO_K / t
            + self.partition.ln_at(t)
            - ln_u_parent
            - self.partner_partition.ln_at(t)
    }
}

/// Substitute the phantom molecule for an empty list.
pub(crate) fn with_phantom(molecules: &[MoleculeData], depths: usize) -> std::borrow::Cow<'_, [MoleculeData]> {
    if molecules.is_empty() {
        std::borrow::Cow::Owned(vec![MoleculeData::phantom(depths)])
    } else {
        std::borrow::Cow::Borrowed(molecules)
    }
}

/// Per-stage populations of one element across depths.
#[derive(Debug, Clone, PartialEq)]
pub struct StagePopulations {
    /// ln N per [stage][depth]
    ln_populations: Vec<Vec<Real>>,
    /// ln(N_stage / N_total) per [stage][depth]
    ln_fractions: Vec<Vec<Real>>,
    /// ln(N_AB / N_A0) per [molecule][depth]
    ln_molecular_terms: Vec<Vec<Real>>,
    /// ln Σ(atomic stages)/N_A0 per depth
    ln_atomic: Vec<Real>,
    /// ln(denominator) per depth
    ln_denominator: Vec<Real>,
}

impl StagePopulations {
    pub fn stage_count(&self) -> usize {
        self.ln_populations.len()
    }

    pub fn depth_count(&self) -> usize {
        self.ln_denominator.len()
    }

    pub fn ln_population(&self, stage: usize) -> &[Real] {
        &self.ln_populations[stage]
    }

    pub fn ln_fraction(&self, stage: usize) -> &[Real] {
        &self.ln_fractions[stage]
    }

    pub fn ln_molecular_terms(&self) -> &[Vec<Real>] {
        &self.ln_molecular_terms
    }

    pub fn ln_denominator(&self) -> &[Real] {
        &self.ln_denominator
    }

    /// ln of all atomic stages over the ground stage, per depth.
    pub fn ln_ground_ratio(&self) -> &[Real] {
        &self.ln_atomic
    }

    /// All atomic stages over the ground stage, per depth.
    pub fn ground_ratio(&self) -> Vec<Real> {
        self.ln_atomic.iter().map(|v| v.exp()).collect()
    }
}

/// Solve the ionization/dissociation balance of one element at every depth.
///
/// `ln_ne` is ln of the electron density and `ln_total` ln of the element's
/// total nuclei density, both in cm⁻³. An empty `molecules` list solves the
/// pure ionization ladder.
pub fn stage_populations(
    element: &ElementStages,
    molecules: &[MoleculeData],
    temperatures: &[Real],
    ln_ne: &[Real],
    ln_total: &[Real],
) -> ChemResult<StagePopulations> {
    let depths = temperatures.len();
    check_len("ln_ne", depths, ln_ne.len())?;
    check_len("ln_total", depths, ln_total.len())?;
    for m in molecules {
        check_len("ln_partner_density", depths, m.ln_partner_density.len())?;
    }
    let molecules = with_phantom(molecules, depths);

    let stages = element.stage_count();
    let ln_floor = FLOOR_VANISHING.ln();
    let mut ln_populations = vec![vec![0.0; depths]; stages];
    let mut ln_fractions = vec![vec![0.0; depths]; stages];
    let mut ln_molecular_terms = vec![vec![0.0; depths]; molecules.len()];
    let mut ln_atomic = vec![0.0; depths];
    let mut ln_denominator = vec![0.0; depths];

    let mut ladder = vec![0.0; stages];
    let mut terms = Vec::with_capacity(stages + molecules.len());

    for d in 0..depths {
        let t = temperatures[d];
        let ln_u: Vec<Real> = element.partitions.iter().map(|pf| pf.ln_at(t)).collect();

        // Cumulative Saha products relative to the ground stage.
        ladder[0] = 0.0;
        for (i, chi) in element.ionization_potentials_ev.iter().enumerate() {
            ladder[i + 1] = ladder[i] + ln_saha_step(*chi, ln_u[i + 1], ln_u[i], t, ln_ne[d]);
        }

        terms.clear();
        terms.extend_from_slice(&ladder);
        ln_atomic[d] = log_sum_exp(&terms);
        for (m, mol) in molecules.iter().enumerate() {
            let term = mol.ln_inverse_saha(ln_u[0], t, d);
            ln_molecular_terms[m][d] = term;
            terms.push(term);
        }
        let ln_den = log_sum_exp(&terms);
        ln_denominator[d] = ln_den;

        for s in 0..stages {
            let frac = ladder[s] - ln_den;
            ln_fractions[s][d] = frac;
            ln_populations[s][d] = (ln_total[d] + frac).max(ln_floor);
        }
    }

    Ok(StagePopulations {
        ln_populations,
        ln_fractions,
        ln_molecular_terms,
        ln_atomic,
        ln_denominator,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use sg_species::builtin;

    proptest! {
        #[test]
        fn fractions_and_molecules_sum_to_one(
            t in 1500.0_f64..20_000.0,
            log_ne in 6.0_f64..17.0,
            log_partner in 0.0_f64..18.0,
        ) {
            let cat = builtin();
            let fe = ElementStages::from_catalog(cat, Element::Fe).unwrap();
            let si = ElementStages::from_catalog(cat, Element::Si).unwrap();
            let sio = cat.diatomics().iter().find(|d| d.name == "SiO").unwrap();
            let ln_partner = vec![(10f64.powf(log_partner)).ln()];
            let ln_ne = [(10f64.powf(log_ne)).ln()];
            let ln_total = [30.0];

            for (stages, mols) in [
                (fe, Vec::new()),
                (si, vec![MoleculeData::from_diatomic(cat, sio, ln_partner.clone())]),
            ] {
                let pops = stage_populations(&stages, &mols, &[t], &ln_ne, &ln_total).unwrap();
                let den = pops.ln_denominator()[0];
                let atomic: f64 = (0..pops.stage_count()).map(|s| pops.ln_fraction(s)[0].exp()).sum();
                let molecular: f64 = pops.ln_molecular_terms().iter().map(|m| (m[0] - den).exp()).sum();
                prop_assert!((atomic + molecular - 1.0).abs() < 1e-10);
            }
        }
    }
}
