// sg-core/src/units.rs
//
// The engine works in CGS internally (dyn/cm², cm⁻³, erg). uom quantities are
// used at the API boundary so callers can hand in whatever units they hold.

use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature};
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;

pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

/// Pascal per dyn/cm².
pub const DYN_CM2_TO_PA: f64 = 0.1;

#[inline]
pub fn k(v: f64) -> Temperature {
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn dyn_cm2(v: f64) -> Pressure {
    Pressure::new::<pascal>(v * DYN_CM2_TO_PA)
}

#[inline]
pub fn kelvin_value(t: Temperature) -> f64 {
    t.get::<kelvin>()
}

#[inline]
pub fn dyn_cm2_value(p: Pressure) -> f64 {
    p.get::<pascal>() / DYN_CM2_TO_PA
}

/// Physical constants in CGS.
pub mod constants {
    /// Boltzmann constant [erg/K].
    pub const K_BOLTZMANN: f64 = 1.380_649e-16;
    /// Planck constant [erg s].
    pub const H_PLANCK: f64 = 6.626_070_15e-27;
    /// Electron mass [g].
    pub const M_ELECTRON: f64 = 9.109_383_7e-28;
    /// Atomic mass unit [g].
    pub const AMU: f64 = 1.660_539_07e-24;
    /// Electron volt [erg].
    pub const EV_TO_ERG: f64 = 1.602_176_634e-12;
    /// Electron volt over Boltzmann constant [K].
    pub const EV_TO_K: f64 = EV_TO_ERG / K_BOLTZMANN;
    /// θ = THETA_SCALE / T, with energies in eV entering as -θ·E in log10 space.
    pub const THETA_SCALE: f64 = 5039.77;
    /// Temperature below which the chemistry is treated as frozen [K].
    pub const FROZEN_CHEMISTRY_T: f64 = 1200.0;
}
