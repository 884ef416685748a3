//! Population of one diatomic molecule relative to its parent's reservoir.

use crate::error::{ChemError, ChemResult, check_len};
use crate::stages::{MoleculeData, with_phantom};
use sg_core::numeric::{FLOOR_VANISHING, Real, floored, log_sum_exp};
use sg_species::PartitionFunction;

/// ln(N_AB / N_A,total) per depth for molecule `target` of `molecules`.
///
/// `ground_ratio` is Σ(atomic stages)/N_A0 of the parent per depth, as
/// returned by [`StagePopulations::ground_ratio`](crate::stages::StagePopulations::ground_ratio).
/// All molecules of the parent compete for its neutral atoms. An empty list
/// stands for a single absent-partner molecule at index 0.
pub fn molecule_fraction(
    parent_partition: &PartitionFunction,
    molecules: &[MoleculeData],
    target: usize,
    ground_ratio: &[Real],
    temperatures: &[Real],
) -> ChemResult<Vec<Real>> {
    let depths = temperatures.len();
    check_len("ground_ratio", depths, ground_ratio.len())?;
    for m in molecules {
        check_len("ln_partner_density", depths, m.ln_partner_density.len())?;
    }
    let molecules = with_phantom(molecules, depths);
    if target >= molecules.len() {
        return Err(ChemError::InvalidInput {
            what: format!("molecule index {target} out of range ({} molecules)", molecules.len()),
        });
    }

    let mut terms = Vec::with_capacity(molecules.len() + 1);
    let fractions = temperatures
        .iter()
        .zip(ground_ratio)
        .enumerate()
        .map(|(d, (&t, &ratio))| {
            let ln_u_parent = parent_partition.ln_at(t);
            terms.clear();
            terms.push(floored(ratio, FLOOR_VANISHING).ln());
            terms.extend(molecules.iter().map(|m| m.ln_inverse_saha(ln_u_parent, t, d)));
            terms[target + 1] - log_sum_exp(&terms)
        })
        .collect();
    Ok(fractions)
}

/// ln N_AB = ln N_A,total + ln fraction, floored at ln(1e-99).
pub fn molecule_population(ln_parent_total: &[Real], ln_fraction: &[Real]) -> ChemResult<Vec<Real>> {
    check_len("ln_fraction", ln_parent_total.len(), ln_fraction.len())?;
    let ln_floor = FLOOR_VANISHING.ln();
    Ok(ln_parent_total
        .iter()
        .zip(ln_fraction)
        .map(|(total, frac)| (total + frac).max(ln_floor))
        .collect())
}
