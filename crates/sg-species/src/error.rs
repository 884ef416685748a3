//! Species table errors.

use sg_core::SgError;
use thiserror::Error;

/// Result type for species table operations.
pub type SpeciesResult<T> = Result<T, SpeciesError>;

/// Errors raised while building or loading species and partition tables.
#[derive(Error, Debug)]
pub enum SpeciesError {
    /// Two rows share a key or a name.
    #[error("Duplicate species: {name}")]
    Duplicate { name: String },

    /// Ion-ladder rows of one parent are split up or out of charge order.
    #[error("Ion ladder of {element} is not contiguous and charge-ordered at {name}")]
    LadderOrder { element: &'static str, name: String },

    /// A species has no neutral atom of its parent element in the table.
    #[error("Missing neutral parent for {name}")]
    MissingParent { name: String },

    /// Shape of a row does not match its kind.
    #[error("Invalid species {name}: {reason}")]
    Invalid { name: String, reason: &'static str },

    /// Unknown element symbol or species name.
    #[error("Unknown {what}: {name}")]
    Unknown { what: &'static str, name: String },

    /// Composition problems (negative or non-finite abundances, zero sum).
    #[error("Invalid composition: {what}")]
    Composition { what: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SpeciesError> for SgError {
    fn from(err: SpeciesError) -> Self {
        match err {
            SpeciesError::Composition { what } => SgError::InvalidArg {
                what: format!("composition: {what}"),
            },
            other => SgError::Invariant {
                what: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SpeciesError::LadderOrder {
            element: "Fe",
            name: "Fe++".into(),
        };
        assert!(err.to_string().contains("Fe++"));
    }

    #[test]
    fn error_to_sg_error() {
        let err: SgError = SpeciesError::Composition { what: "zero sum" }.into();
        assert!(matches!(err, SgError::InvalidArg { .. }));
        let err: SgError = SpeciesError::Duplicate { name: "CO".into() }.into();
        assert!(matches!(err, SgError::Invariant { .. }));
    }
}
