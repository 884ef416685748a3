//! Error types for equilibrium computations.

use sg_core::error::SgError;
use sg_species::SpeciesError;
use thiserror::Error;

/// Errors raised at the boundary of the chemistry engine.
///
/// Numerical singularities inside the solvers are absorbed by the floors and
/// never show up here; these are malformed inputs only.
#[derive(Error, Debug)]
pub enum ChemError {
    #[error("Length mismatch: {what} (expected {expected}, got {actual})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Non-finite input for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error("Species error: {0}")]
    Species(#[from] SpeciesError),
}

pub type ChemResult<T> = Result<T, ChemError>;

impl From<ChemError> for SgError {
    fn from(e: ChemError) -> Self {
        match e {
            ChemError::LengthMismatch {
                what,
                expected,
                actual,
            } => SgError::LengthMismatch {
                what,
                expected,
                actual,
            },
            ChemError::NonFinite { what, value } => SgError::NonFinite { what, value },
            ChemError::InvalidInput { what } => SgError::InvalidArg { what },
            ChemError::Species(e) => e.into(),
        }
    }
}

/// Check that a per-depth array has the grid length.
pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> ChemResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(ChemError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

/// Check that a scalar input is finite and strictly positive.
pub(crate) fn check_positive(what: &'static str, value: f64) -> ChemResult<f64> {
    if !value.is_finite() {
        return Err(ChemError::NonFinite { what, value });
    }
    if value <= 0.0 {
        return Err(ChemError::InvalidInput {
            what: format!("{what} must be positive, got {value}"),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_checks() {
        assert!(check_len("temperatures", 3, 3).is_ok());
        assert!(matches!(
            check_len("temperatures", 3, 2),
            Err(ChemError::LengthMismatch { expected: 3, actual: 2, .. })
        ));
        assert_eq!(check_positive("pressure", 1e5).unwrap(), 1e5);
        assert!(matches!(
            check_positive("pressure", f64::NAN),
            Err(ChemError::NonFinite { .. })
        ));
        assert!(matches!(
            check_positive("temperature", -1.0),
            Err(ChemError::InvalidInput { .. })
        ));
    }

    #[test]
    fn converts_to_sg_error() {
        let err: SgError = ChemError::LengthMismatch {
            what: "ln_ne",
            expected: 4,
            actual: 1,
        }
        .into();
        assert!(matches!(err, SgError::LengthMismatch { expected: 4, .. }));
    }
}
