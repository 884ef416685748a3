//! Validation of model files before they are turned into depth grids.

use crate::schema::{CompositionDef, LATEST_VERSION, Model};
use sg_species::Element;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Unknown element '{symbol}' in {context}")]
    UnknownElement { symbol: String, context: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: f64,
        reason: &'static str,
    },

    #[error("Missing {what}")]
    Missing { what: &'static str },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_model(model: &Model) -> Result<(), ValidationError> {
    if model.version == 0 || model.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: model.version,
        });
    }

    if model.depths.is_empty() {
        return Err(ValidationError::Missing { what: "depth points" });
    }
    for (i, depth) in model.depths.iter().enumerate() {
        check_positive(format!("depths[{i}].temperature_k"), depth.temperature_k)?;
        check_positive(format!("depths[{i}].pressure_dyn_cm2"), depth.pressure_dyn_cm2)?;
    }

    validate_composition(&model.composition)?;

    if let Some(estimator) = &model.estimator {
        if estimator.max_rounds == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: "estimator.max_rounds".to_string(),
                value: 0.0,
                reason: "must allow at least one round",
            });
        }
        if let Some(tol) = estimator.rel_tol {
            check_positive("estimator.rel_tol".to_string(), tol)?;
        }
    }

    Ok(())
}

fn validate_composition(def: &CompositionDef) -> Result<(), ValidationError> {
    match def {
        CompositionDef::Solar => Ok(()),
        CompositionDef::Pure { element } => parse_element(element, "composition").map(|_| ()),
        CompositionDef::LogEpsilon { abundances } => {
            if abundances.is_empty() {
                return Err(ValidationError::Missing { what: "abundances" });
            }
            for (symbol, log_eps) in abundances {
                parse_element(symbol, "composition.abundances")?;
                if !log_eps.is_finite() {
                    return Err(ValidationError::InvalidValue {
                        field: format!("composition.abundances.{symbol}"),
                        value: *log_eps,
                        reason: "must be finite",
                    });
                }
            }
            Ok(())
        }
        CompositionDef::NumberFractions { fractions } => {
            if fractions.is_empty() {
                return Err(ValidationError::Missing { what: "fractions" });
            }
            let mut sum = 0.0;
            for (symbol, x) in fractions {
                parse_element(symbol, "composition.fractions")?;
                if !x.is_finite() || *x < 0.0 {
                    return Err(ValidationError::InvalidValue {
                        field: format!("composition.fractions.{symbol}"),
                        value: *x,
                        reason: "must be finite and non-negative",
                    });
                }
                sum += x;
            }
            if sum <= 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: "composition.fractions".to_string(),
                    value: sum,
                    reason: "must have a positive sum",
                });
            }
            Ok(())
        }
    }
}

pub(crate) fn parse_element(symbol: &str, context: &str) -> Result<Element, ValidationError> {
    Element::from_str(symbol).map_err(|_| ValidationError::UnknownElement {
        symbol: symbol.to_string(),
        context: context.to_string(),
    })
}

fn check_positive(field: String, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field,
            value,
            reason: "must be finite and positive",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DepthDef;

    fn model(composition: CompositionDef) -> Model {
        Model {
            version: LATEST_VERSION,
            name: "test".to_string(),
            solve_level: Default::default(),
            composition,
            depths: vec![DepthDef {
                temperature_k: 5000.0,
                pressure_dyn_cm2: 1e5,
            }],
            estimator: None,
            catalog: None,
        }
    }

    #[test]
    fn solar_model_validates() {
        assert!(validate_model(&model(CompositionDef::Solar)).is_ok());
    }

    #[test]
    fn unknown_symbol_rejected() {
        let m = model(CompositionDef::Pure {
            element: "Xx".to_string(),
        });
        assert!(matches!(
            validate_model(&m),
            Err(ValidationError::UnknownElement { .. })
        ));
    }

    #[test]
    fn bad_depths_rejected() {
        let mut m = model(CompositionDef::Solar);
        m.depths[0].temperature_k = -1.0;
        assert!(matches!(
            validate_model(&m),
            Err(ValidationError::InvalidValue { .. })
        ));

        m.depths.clear();
        assert!(matches!(validate_model(&m), Err(ValidationError::Missing { .. })));
    }

    #[test]
    fn fractions_must_have_positive_sum() {
        let m = model(CompositionDef::NumberFractions {
            fractions: vec![("H".to_string(), 0.0), ("He".to_string(), 0.0)],
        });
        assert!(validate_model(&m).is_err());

        let m = model(CompositionDef::NumberFractions {
            fractions: vec![("H".to_string(), 0.9), ("He".to_string(), -0.1)],
        });
        assert!(validate_model(&m).is_err());
    }

    #[test]
    fn future_version_rejected() {
        let mut m = model(CompositionDef::Solar);
        m.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_model(&m),
            Err(ValidationError::UnsupportedVersion { .. })
        ));

        m.version = 0;
        assert!(matches!(
            validate_model(&m),
            Err(ValidationError::UnsupportedVersion { version: 0 })
        ));
    }
}
