//! Temperature-banded partition functions.
//!
//! Every partition function is tabulated as log₁₀ U at five temperature
//! breakpoints. Values in between are interpolated linearly in T; outside the
//! table the end values are held constant.

use crate::species::SpeciesKey;
use serde::{Deserialize, Serialize};
use sg_core::Real;
use std::collections::HashMap;
use std::f64::consts::LN_10;

/// Temperature breakpoints [K] of every partition-function table.
pub const BREAKPOINTS: [Real; 5] = [130.0, 500.0, 3000.0, 8000.0, 10000.0];

/// Piecewise-linear interpolation of `values` tabulated at `breakpoints`.
///
/// Clamped at both ends. At an exact breakpoint the tabulated value is
/// returned unchanged.
pub fn interpolate(breakpoints: &[Real; 5], values: &[Real; 5], t: Real) -> Real {
    if t <= breakpoints[0] {
        return values[0];
    }
    for i in 0..4 {
        if t < breakpoints[i + 1] {
            let frac = (t - breakpoints[i]) / (breakpoints[i + 1] - breakpoints[i]);
            return values[i] + frac * (values[i + 1] - values[i]);
        }
    }
    values[4]
}

/// log₁₀ U at the five [`BREAKPOINTS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionFunction {
    log10: [Real; 5],
}

impl PartitionFunction {
    pub const fn new(log10: [Real; 5]) -> Self {
        Self { log10 }
    }

    /// Temperature-independent U = g, e.g. a bare ground-state weight.
    pub fn constant(weight: Real) -> Self {
        Self {
            log10: [weight.log10(); 5],
        }
    }

    /// U = 1 everywhere.
    pub const fn unity() -> Self {
        Self { log10: [0.0; 5] }
    }

    pub fn nodes(&self) -> &[Real; 5] {
        &self.log10
    }

    pub fn log10_at(&self, t: Real) -> Real {
        interpolate(&BREAKPOINTS, &self.log10, t)
    }

    /// Natural log of U at temperature `t`.
    pub fn ln_at(&self, t: Real) -> Real {
        LN_10 * self.log10_at(t)
    }
}

/// Partition functions keyed by species. Species without an entry have U = 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionTable {
    entries: HashMap<SpeciesKey, PartitionFunction>,
}

impl PartitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: SpeciesKey, pf: PartitionFunction) {
        self.entries.insert(key, pf);
    }

    pub fn contains(&self, key: &SpeciesKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &SpeciesKey) -> PartitionFunction {
        self.entries
            .get(key)
            .copied()
            .unwrap_or_else(PartitionFunction::unity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpeciesKey, &PartitionFunction)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    const VALUES: [Real; 5] = [0.1, 0.2, 0.5, 1.3, 1.7];

    #[test]
    fn exact_at_every_breakpoint() {
        for (t, v) in BREAKPOINTS.iter().zip(VALUES.iter()) {
            assert_eq!(interpolate(&BREAKPOINTS, &VALUES, *t), *v);
        }
    }

    #[test]
    fn clamped_outside_range() {
        assert_eq!(interpolate(&BREAKPOINTS, &VALUES, 10.0), 0.1);
        assert_eq!(interpolate(&BREAKPOINTS, &VALUES, -5.0), 0.1);
        assert_eq!(interpolate(&BREAKPOINTS, &VALUES, 20_000.0), 1.7);
    }

    #[test]
    fn linear_between_breakpoints() {
        // Midway between 3000 and 8000 K.
        let v = interpolate(&BREAKPOINTS, &VALUES, 5500.0);
        assert!((v - 0.9).abs() < 1e-14);
        let v = interpolate(&BREAKPOINTS, &VALUES, 9000.0);
        assert!((v - 1.5).abs() < 1e-14);
    }

    #[test]
    fn continuous_across_breakpoints() {
        for t in &BREAKPOINTS[1..4] {
            let below = interpolate(&BREAKPOINTS, &VALUES, t - 1e-9);
            let above = interpolate(&BREAKPOINTS, &VALUES, t + 1e-9);
            assert!((below - above).abs() < 1e-9);
        }
    }

    #[test]
    fn ln_is_scaled_log10() {
        let pf = PartitionFunction::constant(2.0);
        assert!((pf.ln_at(4000.0) - 2.0_f64.ln()).abs() < 1e-14);
        assert!((pf.log10_at(4000.0) - 2.0_f64.log10()).abs() < 1e-14);
    }

    #[test]
    fn missing_entry_is_unity() {
        let table = PartitionTable::new();
        let pf = table.get(&SpeciesKey::atom(Element::Fe));
        assert_eq!(pf.ln_at(5000.0), 0.0);
    }
}
