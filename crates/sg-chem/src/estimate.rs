//! Closed-form initial guess for electron pressure and major partial pressures.
//!
//! The estimate seeds the full nonlinear gas solver of the host code. It is a
//! pure function of (T, Pt, composition, registry): hydrogen sets a first
//! electron pressure, the easily ionized metals a second one, and the larger
//! of the two is refined by a bounded fixed point over the electron donors.
//! Atomic partial pressures then follow from sequential closed-form balances.

use crate::equilibrium::{EquilibriumConstants, evaluate_equilibrium_constants};
use crate::error::{ChemResult, check_positive};
use crate::gas_state::{GasState, PeConvergence};
use serde::{Deserialize, Serialize};
use sg_core::numeric::{FLOOR_TINY, Real, floored, positive_root};
use sg_core::units::{Pressure, Temperature, dyn_cm2_value, kelvin_value};
use sg_species::{Composition, Element, SpeciesKey, SpeciesRegistry};
use tracing::debug;

/// Which elements get an equation of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveLevel {
    /// Only the abundant, chemically important elements.
    MajorOnly,
    /// Every element present in the composition.
    #[default]
    MajorAndMinor,
}

impl SolveLevel {
    pub fn includes(self, element: Element) -> bool {
        match self {
            SolveLevel::MajorOnly => element.is_major(),
            SolveLevel::MajorAndMinor => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolveLevel::MajorOnly => "major_only",
            SolveLevel::MajorAndMinor => "major_and_minor",
        }
    }
}

impl std::str::FromStr for SolveLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "major_only" | "major" => Ok(SolveLevel::MajorOnly),
            "major_and_minor" | "all" => Ok(SolveLevel::MajorAndMinor),
            other => Err(format!("unknown solve level: {other}")),
        }
    }
}

/// Fixed-point settings for the electron-pressure refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    /// Maximum refinement rounds
    pub max_rounds: usize,
    /// Relative tolerance on |ΔPe/Pe|
    pub rel_tol: Real,
    /// Lower bound on Pe as a fraction of Pt
    pub floor_ratio: Real,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            max_rounds: 15,
            rel_tol: 1e-3,
            floor_ratio: 1e-20,
        }
    }
}

/// The two electron-pressure seeds before refinement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeSeed {
    /// Hydrogen-only estimate
    pub peh: Real,
    /// Sum of single-donor metal estimates
    pub pem: Real,
}

impl PeSeed {
    pub fn start(&self) -> Real {
        self.peh.max(self.pem)
    }
}

/// Result of [`estimate_initial_guess`].
#[derive(Debug, Clone, PartialEq)]
pub struct InitialGuess {
    pub state: GasState,
    /// H₂ partial pressure [dyn/cm²]
    pub p_h2: Real,
    /// Fictitious nuclei pressure Pt + P(H₂) - Pe [dyn/cm²]
    pub pd: Real,
    /// 1 (charge balance) + one per estimated element
    pub equation_count: usize,
    pub seed: PeSeed,
}

impl InitialGuess {
    pub fn pe(&self) -> Real {
        self.state.electron_pressure
    }

    pub fn partial_pressure(&self, element: Element) -> Real {
        self.state.partial_pressure(element)
    }

    pub fn rounds(&self) -> usize {
        self.state.rounds
    }

    pub fn convergence(&self) -> PeConvergence {
        self.state.convergence
    }
}

/// Donors other than H and He, used for the metal seed.
const METAL_DONORS: [Element; 8] = [
    Element::C,
    Element::Na,
    Element::Mg,
    Element::Al,
    Element::Si,
    Element::K,
    Element::Ca,
    Element::Fe,
];

/// Elements with a dedicated closed form ahead of the generic one.
const SEQUENTIAL: [Element; 6] = [
    Element::H,
    Element::C,
    Element::N,
    Element::O,
    Element::Si,
    Element::S,
];

/// Equilibrium constants looked up by species key. Species missing from the
/// registry behave as if they never form.
struct ConstantLookup<'a> {
    registry: &'a SpeciesRegistry,
    eq: EquilibriumConstants,
}

impl ConstantLookup<'_> {
    fn k(&self, key: &SpeciesKey) -> Real {
        self.registry
            .id(key)
            .map(|id| self.eq.constant(id))
            .unwrap_or(0.0)
    }

    /// K of the first positive ion.
    fn ion(&self, element: Element) -> Real {
        self.k(&SpeciesKey::ion(element, 1))
    }

    /// Ionization factor of the first positive ion.
    fn ion_factor(&self, element: Element) -> Real {
        self.registry
            .id(&SpeciesKey::ion(element, 1))
            .map(|id| self.eq.factor(id))
            .unwrap_or(0.0)
    }

    /// 1/K of a molecule, 0 when it does not form.
    fn inverse(&self, parent: Element, partners: &[Element]) -> Real {
        let k = self.k(&SpeciesKey::molecule(parent, partners.to_vec()));
        if k > 0.0 { 1.0 / k } else { 0.0 }
    }
}

/// Two elements A and B bound together in a molecule AB with dissociation
/// constant `k_ab`, each with its own reservoir factor g (ionization and
/// competing molecules): `g_A·P_A + P_A·P_B/K = N_A`, same for B.
fn coupled_pair(n_a: Real, g_a: Real, n_b: Real, g_b: Real, k_ab: Real) -> (Real, Real) {
    if k_ab <= 0.0 {
        return (n_a / g_a, n_b / g_b);
    }
    let p_b = positive_root(g_b, g_b * k_ab * g_a + n_a - n_b, -n_b * k_ab * g_a);
    let p_a = n_a / (g_a + p_b / k_ab);
    (p_a, p_b)
}

/// Estimate electron pressure and neutral partial pressures at one depth.
///
/// `t` in K, `pt` in dyn/cm². Reaching the round cap is reported through
/// [`PeConvergence::RoundCapReached`], not as an error.
pub fn estimate_initial_guess(
    t: Real,
    pt: Real,
    level: SolveLevel,
    composition: &Composition,
    registry: &SpeciesRegistry,
    config: &EstimatorConfig,
) -> ChemResult<InitialGuess> {
    check_positive("temperature", t)?;
    check_positive("total pressure", pt)?;

    let kv = ConstantLookup {
        registry,
        eq: evaluate_equilibrium_constants(registry, t),
    };
    let x = |e: Element| composition.fraction(e);
    let mut state = GasState::new(t, pt);

    // Hydrogen seed: H against H2, then H against H+.
    let x_h = x(Element::H);
    let inv_h2 = kv.inverse(Element::H, &[Element::H]);
    let k_hplus = kv.ion(Element::H);
    let p_h0 = positive_root(inv_h2, 1.0, -pt * x_h);
    let assoc = p_h0 * inv_h2;
    let peh = if k_hplus > 0.0 {
        positive_root((1.0 + assoc) / k_hplus, 2.0, -pt * x_h)
    } else {
        0.0
    };
    let mut p_h2 = p_h0 * p_h0 * inv_h2;

    // Metal seed: each donor alone against its first ion.
    let pem: Real = METAL_DONORS
        .iter()
        .map(|&e| {
            let k = kv.ion(e);
            let xe = x(e);
            if k > 0.0 && xe > 0.0 {
                positive_root(1.0, k, -pt * xe * k)
            } else {
                0.0
            }
        })
        .sum();
    let seed = PeSeed { peh, pem };

    // Fixed point over all donors.
    let floor = pt * config.floor_ratio;
    let mut pe = seed.start().clamp(floor, pt);
    let mut rounds = 0;
    let mut first_pass = true;
    let convergence = loop {
        if rounds >= config.max_rounds {
            break PeConvergence::RoundCapReached;
        }
        rounds += 1;

        let mut sum1 = 0.0;
        let mut sum2 = 0.0;
        for &e in &Element::ELECTRON_DONORS {
            let k = kv.ion(e);
            let xe = x(e);
            if k > 0.0 && xe > 0.0 {
                let d = k + pe;
                sum1 += xe * k / d;
                sum2 += xe * k / (d * d);
            }
        }
        let pd = pt + p_h2 - pe;
        let dpe = (pd * sum1 - pe) / (1.0 + sum1 + pd * sum2);
        pe = (pe + dpe).clamp(floor, pt);

        // `dpe` is the unclamped correction: a step cut short by the clamp
        // is never taken for convergence.
        if !first_pass && (dpe / pe).abs() < config.rel_tol {
            break PeConvergence::Converged { rounds };
        }
        if pe <= floor {
            break PeConvergence::Floored { rounds };
        }
        first_pass = false;
    };
    debug!(t, pt, pe, rounds, %convergence, "electron pressure estimate");

    state.electron_pressure = pe;
    state.rounds = rounds;
    state.convergence = convergence;

    // Atomic hydrogen against H2, H- and H+ at the refined Pe.
    let pd = pt + p_h2 - pe;
    let k_hminus = kv.k(&SpeciesKey::ion(Element::H, -1));
    let p_h = positive_root(2.0 * inv_h2, 1.0 + pe * k_hminus + k_hplus / pe, -pd * x_h);
    p_h2 = p_h * p_h * inv_h2;
    let pd = pt + p_h2 - pe;

    let n = |e: Element| pd * x(e);
    let f = |e: Element| 1.0 + kv.ion(e) / pe;

    // C and O through CO, N on its own, Si and S through SiS.
    let g_c = f(Element::C) + p_h * kv.inverse(Element::C, &[Element::H]);
    let g_o = f(Element::O)
        + p_h * kv.inverse(Element::O, &[Element::H])
        + p_h * p_h * kv.inverse(Element::O, &[Element::H, Element::H]);
    let k_co = kv.k(&SpeciesKey::molecule(Element::C, vec![Element::O]));
    let (p_c, p_o) = coupled_pair(n(Element::C), g_c, n(Element::O), g_o, k_co);

    let p_n = positive_root(
        2.0 * kv.inverse(Element::N, &[Element::N]),
        f(Element::N) + p_h * kv.inverse(Element::N, &[Element::H]),
        -n(Element::N),
    );

    let g_si = f(Element::Si) + p_o * kv.inverse(Element::Si, &[Element::O]);
    let g_s = f(Element::S)
        + p_h * kv.inverse(Element::S, &[Element::H])
        + p_h * p_h * kv.inverse(Element::S, &[Element::H, Element::H]);
    let k_sis = kv.k(&SpeciesKey::molecule(Element::Si, vec![Element::S]));
    let (p_si, p_s) = coupled_pair(n(Element::Si), g_si, n(Element::S), g_s, k_sis);

    let estimated = |e: Element| composition.contains(e) && level.includes(e);
    let mut set = |e: Element, p: Real| {
        if estimated(e) {
            state.partial_pressures[e.slot()] = floored(p, FLOOR_TINY);
        }
    };
    set(Element::H, p_h);
    set(Element::C, p_c);
    set(Element::N, p_n);
    set(Element::O, p_o);
    set(Element::Si, p_si);
    set(Element::S, p_s);

    // Everything else: first ion plus, for a few, one dominant molecule.
    for e in Element::ALL {
        if SEQUENTIAL.contains(&e) {
            continue;
        }
        let extra = match e {
            Element::Cl => p_h * kv.inverse(Element::Cl, &[Element::H]),
            Element::Sc | Element::Ti | Element::V | Element::Y | Element::Zr => {
                p_o * kv.inverse(e, &[Element::O])
            }
            _ => 0.0,
        };
        let delta = kv.ion_factor(e);
        set(e, n(e) / (1.0 + delta * kv.ion(e) / pe + extra));
    }

    let equation_count = 1 + Element::ALL.iter().filter(|&&e| estimated(e)).count();

    Ok(InitialGuess {
        state,
        p_h2,
        pd,
        equation_count,
        seed,
    })
}

/// [`estimate_initial_guess`] with `uom` quantities at the boundary.
pub fn estimate_at(
    t: Temperature,
    pt: Pressure,
    level: SolveLevel,
    composition: &Composition,
    registry: &SpeciesRegistry,
    config: &EstimatorConfig,
) -> ChemResult<InitialGuess> {
    estimate_initial_guess(
        kelvin_value(t),
        dyn_cm2_value(pt),
        level,
        composition,
        registry,
        config,
    )
}
