//! Raw Saha ratio in pressure form.

use sg_core::constants::{EV_TO_K, H_PLANCK, K_BOLTZMANN, M_ELECTRON};
use sg_core::numeric::Real;
use sg_species::PartitionFunction;
use std::f64::consts::{LN_2, PI};

/// ln Φ(T) = ln[(2π mₑ)^1.5 (kT)^2.5 / h³] + ln 2 + ln U_upper - ln U_lower - χ/(kT).
///
/// Φ = N_upper·Pe / N_lower in dyn/cm².
pub fn saha_rhs(chi_ev: Real, upper: &PartitionFunction, lower: &PartitionFunction, t: Real) -> Real {
    1.5 * (2.0 * PI * M_ELECTRON).ln() + 2.5 * (K_BOLTZMANN * t).ln() - 3.0 * H_PLANCK.ln()
        + LN_2
        + upper.ln_at(t)
        - lower.ln_at(t)
        - chi_ev * EV_TO_K / t
}
