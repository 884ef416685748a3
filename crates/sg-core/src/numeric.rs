/// Floating point type used throughout system
pub type Real = f64;

/// Floor for pressures, energies and other quantities whose logarithm is taken downstream.
pub const FLOOR_TINY: Real = 1.0e-49;

/// Floor for number densities and population fractions.
pub const FLOOR_VANISHING: Real = 1.0e-99;

/// Below this value of `|4ac/b²|` the quadratic term is treated as round-off.
pub const LINEAR_FALLBACK_RATIO: Real = 1.0e-10;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Clamp `v` from below to `floor`. NaN maps to the floor as well.
#[inline]
pub fn floored(v: Real, floor: Real) -> Real {
    if v > floor { v } else { floor }
}

/// Positive root of `a·x² + b·x + c = 0`.
///
/// Uses the form `(−b + |b|·√(1 − 4ac/b²)) / 2a` with the discriminant ratio
/// clamped so the square root never sees a negative argument. When
/// `|4ac/b²|` is below [`LINEAR_FALLBACK_RATIO`] the quadratic term is
/// negligible: the root is `−c/b` for `b > 0`, and the dominant root `−b/a`
/// for `b < 0`.
pub fn positive_root(a: Real, b: Real, c: Real) -> Real {
    if a == 0.0 {
        return if b != 0.0 { -c / b } else { 0.0 };
    }
    if b == 0.0 {
        return (-c / a).max(0.0).sqrt();
    }

    let ratio = 4.0 * a * c / (b * b);
    if ratio.abs() >= LINEAR_FALLBACK_RATIO {
        let disc = (1.0 - ratio).max(0.0);
        (-b + b.abs() * disc.sqrt()) / (2.0 * a)
    } else if b > 0.0 {
        -c / b
    } else {
        -b / a
    }
}

/// `ln(Σ exp(xᵢ))` without overflow. Returns `-inf` for an empty slice.
pub fn log_sum_exp(values: &[Real]) -> Real {
    let max = values.iter().copied().fold(Real::NEG_INFINITY, Real::max);
    if !max.is_finite() {
        return max;
    }
    let sum: Real = values.iter().map(|v| (v - max).exp()).sum();
    max + sum.ln()
}
