//! Chemical element definitions.

use serde::{Deserialize, Serialize};

/// Elements tracked by the gas model: hydrogen through zirconium.
///
/// The discriminant is the atomic number, so `element as usize - 1` is the
/// slot of the element in 40-wide per-element vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He,
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    K,
    Ca,
    Sc,
    Ti,
    V,
    Cr,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Ga,
    Ge,
    As,
    Se,
    Br,
    Kr,
    Rb,
    Sr,
    Y,
    Zr,
}

/// Number of tracked elements (and width of per-element vectors).
pub const ELEMENT_COUNT: usize = 40;

struct ElementData {
    symbol: &'static str,
    name: &'static str,
    /// Atomic mass [amu]
    mass: f64,
    /// Solar photospheric abundance, log ε (H = 12)
    solar_log_eps: f64,
}

const fn data(symbol: &'static str, name: &'static str, mass: f64, solar_log_eps: f64) -> ElementData {
    ElementData {
        symbol,
        name,
        mass,
        solar_log_eps,
    }
}

const ELEMENT_DATA: [ElementData; ELEMENT_COUNT] = [
    data("H", "Hydrogen", 1.008, 12.00),
    data("He", "Helium", 4.0026, 10.93),
    data("Li", "Lithium", 6.94, 1.05),
    data("Be", "Beryllium", 9.0122, 1.38),
    data("B", "Boron", 10.81, 2.70),
    data("C", "Carbon", 12.011, 8.43),
    data("N", "Nitrogen", 14.007, 7.83),
    data("O", "Oxygen", 15.999, 8.69),
    data("F", "Fluorine", 18.998, 4.56),
    data("Ne", "Neon", 20.180, 7.93),
    data("Na", "Sodium", 22.990, 6.24),
    data("Mg", "Magnesium", 24.305, 7.60),
    data("Al", "Aluminium", 26.982, 6.45),
    data("Si", "Silicon", 28.085, 7.51),
    data("P", "Phosphorus", 30.974, 5.41),
    data("S", "Sulfur", 32.06, 7.12),
    data("Cl", "Chlorine", 35.45, 5.50),
    data("Ar", "Argon", 39.948, 6.40),
    data("K", "Potassium", 39.098, 5.03),
    data("Ca", "Calcium", 40.078, 6.34),
    data("Sc", "Scandium", 44.956, 3.15),
    data("Ti", "Titanium", 47.867, 4.95),
    data("V", "Vanadium", 50.942, 3.93),
    data("Cr", "Chromium", 51.996, 5.64),
    data("Mn", "Manganese", 54.938, 5.43),
    data("Fe", "Iron", 55.845, 7.50),
    data("Co", "Cobalt", 58.933, 4.99),
    data("Ni", "Nickel", 58.693, 6.22),
    data("Cu", "Copper", 63.546, 4.19),
    data("Zn", "Zinc", 65.38, 4.56),
    data("Ga", "Gallium", 69.723, 3.04),
    data("Ge", "Germanium", 72.630, 3.65),
    data("As", "Arsenic", 74.922, 2.30),
    data("Se", "Selenium", 78.971, 3.34),
    data("Br", "Bromine", 79.904, 2.54),
    data("Kr", "Krypton", 83.798, 3.25),
    data("Rb", "Rubidium", 85.468, 2.52),
    data("Sr", "Strontium", 87.62, 2.87),
    data("Y", "Yttrium", 88.906, 2.21),
    data("Zr", "Zirconium", 91.224, 2.58),
];

impl Element {
    pub const ALL: [Element; ELEMENT_COUNT] = [
        Element::H,
        Element::He,
        Element::Li,
        Element::Be,
        Element::B,
        Element::C,
        Element::N,
        Element::O,
        Element::F,
        Element::Ne,
        Element::Na,
        Element::Mg,
        Element::Al,
        Element::Si,
        Element::P,
        Element::S,
        Element::Cl,
        Element::Ar,
        Element::K,
        Element::Ca,
        Element::Sc,
        Element::Ti,
        Element::V,
        Element::Cr,
        Element::Mn,
        Element::Fe,
        Element::Co,
        Element::Ni,
        Element::Cu,
        Element::Zn,
        Element::Ga,
        Element::Ge,
        Element::As,
        Element::Se,
        Element::Br,
        Element::Kr,
        Element::Rb,
        Element::Sr,
        Element::Y,
        Element::Zr,
    ];

    /// Elements whose first ion supplies most free electrons in cool atmospheres.
    pub const ELECTRON_DONORS: [Element; 10] = [
        Element::H,
        Element::He,
        Element::C,
        Element::Na,
        Element::Mg,
        Element::Al,
        Element::Si,
        Element::K,
        Element::Ca,
        Element::Fe,
    ];

    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    /// 0-based slot in per-element vectors.
    pub fn slot(self) -> usize {
        self as usize - 1
    }

    pub fn from_atomic_number(z: u8) -> Option<Element> {
        if (1..=ELEMENT_COUNT as u8).contains(&z) {
            Some(Self::ALL[z as usize - 1])
        } else {
            None
        }
    }

    pub fn symbol(self) -> &'static str {
        ELEMENT_DATA[self.slot()].symbol
    }

    pub fn display_name(self) -> &'static str {
        ELEMENT_DATA[self.slot()].name
    }

    /// Atomic mass [amu].
    pub fn atomic_mass(self) -> f64 {
        ELEMENT_DATA[self.slot()].mass
    }

    /// Solar photospheric abundance log ε, on the scale log ε(H) = 12.
    pub fn solar_log_eps(self) -> f64 {
        ELEMENT_DATA[self.slot()].solar_log_eps
    }

    /// Whether the element belongs to the reduced ("major") equation set.
    pub fn is_major(self) -> bool {
        matches!(
            self,
            Element::H
                | Element::He
                | Element::C
                | Element::N
                | Element::O
                | Element::Ne
                | Element::Na
                | Element::Mg
                | Element::Al
                | Element::Si
                | Element::S
                | Element::K
                | Element::Ca
                | Element::Fe
        )
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for Element {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Element::ALL
            .iter()
            .copied()
            .find(|e| {
                e.symbol().eq_ignore_ascii_case(trimmed) || e.display_name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or("unknown element")
    }
}
