//! Elemental composition of the gas.

use crate::element::{ELEMENT_COUNT, Element};
use crate::error::{SpeciesError, SpeciesResult};
use sg_core::numeric::{Real, Tolerances, nearly_equal};

/// Gas composition as number fractions of nuclei, one slot per element.
///
/// Always normalized (fractions sum to 1.0). Absent elements hold exactly 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    fractions: [Real; ELEMENT_COUNT],
}

impl Composition {
    /// Single-element gas.
    pub fn pure(element: Element) -> Self {
        let mut fractions = [0.0; ELEMENT_COUNT];
        fractions[element.slot()] = 1.0;
        Self { fractions }
    }

    /// Create a composition from relative number abundances.
    ///
    /// Validates that all abundances are finite, non-negative, and have a
    /// positive sum, then normalizes to sum=1. Repeated elements accumulate.
    pub fn new_number_fractions(abundances: Vec<(Element, Real)>) -> SpeciesResult<Self> {
        if abundances.is_empty() {
            return Err(SpeciesError::Composition {
                what: "empty composition",
            });
        }

        let mut fractions = [0.0; ELEMENT_COUNT];
        for (element, x) in abundances {
            if !x.is_finite() {
                return Err(SpeciesError::Composition {
                    what: "non-finite abundance",
                });
            }
            if x < 0.0 {
                return Err(SpeciesError::Composition {
                    what: "negative abundance",
                });
            }
            fractions[element.slot()] += x;
        }

        let sum: Real = fractions.iter().sum();
        if sum <= 0.0 || !sum.is_finite() {
            return Err(SpeciesError::Composition {
                what: "abundances sum to zero or non-finite",
            });
        }
        for x in fractions.iter_mut() {
            *x /= sum;
        }
        Ok(Self { fractions })
    }

    /// Create a composition from astronomical abundances log ε = log₁₀(N_X/N_H) + 12.
    pub fn from_log_eps(abundances: &[(Element, Real)]) -> SpeciesResult<Self> {
        if abundances.iter().any(|(_, log_eps)| !log_eps.is_finite()) {
            return Err(SpeciesError::Composition {
                what: "non-finite log epsilon",
            });
        }
        Self::new_number_fractions(
            abundances
                .iter()
                .map(|(e, log_eps)| (*e, 10f64.powf(log_eps - 12.0)))
                .collect(),
        )
    }

    /// Solar photospheric mixture of all tracked elements.
    pub fn solar() -> Self {
        let mut fractions = [0.0; ELEMENT_COUNT];
        for e in Element::ALL {
            fractions[e.slot()] = 10f64.powf(e.solar_log_eps() - 12.0);
        }
        let sum: Real = fractions.iter().sum();
        for x in fractions.iter_mut() {
            *x /= sum;
        }
        Self { fractions }
    }

    /// Number fraction of `element` (0.0 if absent).
    pub fn fraction(&self, element: Element) -> Real {
        self.fractions[element.slot()]
    }

    pub fn contains(&self, element: Element) -> bool {
        self.fraction(element) > 0.0
    }

    /// Per-element fractions indexed by slot (Z - 1).
    pub fn as_slots(&self) -> &[Real; ELEMENT_COUNT] {
        &self.fractions
    }

    /// Returns `Some(element)` if exactly one element has fraction ≈1.0.
    pub fn is_pure(&self) -> Option<Element> {
        let tol = Tolerances {
            abs: 1e-10,
            rel: 1e-10,
        };
        let mut present = self.iter();
        match (present.next(), present.next()) {
            (Some((e, x)), None) if nearly_equal(x, 1.0, tol) => Some(e),
            _ => None,
        }
    }

    /// Iterate over elements with non-zero fractions, in atomic-number order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, Real)> + '_ {
        Element::ALL
            .into_iter()
            .map(|e| (e, self.fraction(e)))
            .filter(|(_, x)| *x > 0.0)
    }

    /// log ε = log₁₀(N_X/N_H) + 12 of a present element, if hydrogen is present.
    pub fn log_eps(&self, element: Element) -> Option<Real> {
        let h = self.fraction(Element::H);
        let x = self.fraction(element);
        (h > 0.0 && x > 0.0).then(|| (x / h).log10() + 12.0)
    }

    /// Mean mass per nucleus [amu]: Σ xᵢ·mᵢ.
    pub fn mean_atomic_mass(&self) -> Real {
        self.iter().map(|(e, x)| x * e.atomic_mass()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tol() -> Tolerances {
        Tolerances {
            abs: 1e-12,
            rel: 1e-10,
        }
    }

    #[test]
    fn pure_composition() {
        let comp = Composition::pure(Element::H);
        assert_eq!(comp.is_pure(), Some(Element::H));
        assert_eq!(comp.fraction(Element::H), 1.0);
        assert_eq!(comp.fraction(Element::He), 0.0);
        assert_eq!(comp.iter().count(), 1);
    }

    #[test]
    fn normalization_non_unit_sum() {
        let comp =
            Composition::new_number_fractions(vec![(Element::H, 9.0), (Element::He, 1.0)]).unwrap();
        assert_eq!(comp.is_pure(), None);
        assert!(nearly_equal(comp.fraction(Element::H), 0.9, tol()));
        assert!(nearly_equal(comp.fraction(Element::He), 0.1, tol()));
    }

    #[test]
    fn repeated_elements_accumulate() {
        let comp = Composition::new_number_fractions(vec![
            (Element::H, 1.0),
            (Element::O, 0.5),
            (Element::O, 0.5),
        ])
        .unwrap();
        assert!(nearly_equal(comp.fraction(Element::O), 0.5, tol()));
    }

    #[test]
    fn invalid_abundances_rejected() {
        assert!(Composition::new_number_fractions(vec![]).is_err());
        assert!(Composition::new_number_fractions(vec![(Element::H, -1.0)]).is_err());
        assert!(Composition::new_number_fractions(vec![(Element::H, Real::NAN)]).is_err());
        assert!(Composition::new_number_fractions(vec![(Element::H, 0.0)]).is_err());
        assert!(Composition::from_log_eps(&[(Element::H, Real::INFINITY)]).is_err());
    }

    #[test]
    fn log_eps_roundtrip() {
        let comp =
            Composition::from_log_eps(&[(Element::H, 12.0), (Element::Fe, 7.5), (Element::C, 8.43)])
                .unwrap();
        let fe = comp.log_eps(Element::Fe).unwrap();
        assert!((fe - 7.5).abs() < 1e-10);
        assert!((comp.log_eps(Element::H).unwrap() - 12.0).abs() < 1e-12);
        assert_eq!(comp.log_eps(Element::Ti), None);
    }

    #[test]
    fn solar_is_hydrogen_dominated() {
        let sun = Composition::solar();
        let sum: Real = sun.as_slots().iter().sum();
        assert!(nearly_equal(sum, 1.0, tol()));
        assert!(sun.fraction(Element::H) > 0.9);
        assert!(sun.fraction(Element::He) > 0.07);
        assert!(sun.contains(Element::Zr));
        assert!(sun.mean_atomic_mass() > 1.2 && sun.mean_atomic_mass() < 1.4);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fractions_always_normalized(
            weights in prop::collection::vec(0.0_f64..1.0e3, 1..ELEMENT_COUNT),
        ) {
            prop_assume!(weights.iter().sum::<f64>() > 0.0);
            let abundances = weights
                .iter()
                .enumerate()
                .map(|(i, w)| (Element::ALL[i], *w))
                .collect();
            let comp = Composition::new_number_fractions(abundances).unwrap();
            let sum: f64 = comp.as_slots().iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-12);
            prop_assert!(comp.as_slots().iter().all(|x| *x >= 0.0));
        }
    }
}
