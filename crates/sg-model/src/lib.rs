//! sg-model: atmosphere model file format and validation.
//!
//! A model file names a composition, a solve level and a list of depth
//! points. Loading checks the version and validates before anything is
//! handed to the chemistry crate.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_model};

use sg_chem::{AtmosphereDepthGrid, ChemError, EstimatorConfig};
use sg_core::SgError;
use sg_species::{Catalog, Composition, SpeciesError};
use std::borrow::Cow;
use std::path::Path;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Species error: {0}")]
    Species(#[from] SpeciesError),

    #[error("Chemistry error: {0}")]
    Chem(#[from] ChemError),

    #[error("Unsupported model file extension: {path}")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ModelError> for SgError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Species(e) => e.into(),
            ModelError::Chem(e) => e.into(),
            other => SgError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}

pub fn load_yaml(path: &Path) -> ModelResult<Model> {
    let content = std::fs::read_to_string(path)?;
    let model: Model = serde_yaml::from_str(&content)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn save_yaml(path: &Path, model: &Model) -> ModelResult<()> {
    validate_model(model)?;
    let content = serde_yaml::to_string(model)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ModelResult<Model> {
    let content = std::fs::read_to_string(path)?;
    let model: Model = serde_json::from_str(&content)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn save_json(path: &Path, model: &Model) -> ModelResult<()> {
    validate_model(model)?;
    let content = serde_json::to_string_pretty(model)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a model, choosing the format from the file extension.
pub fn load(path: &Path) -> ModelResult<Model> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ModelError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Resolve the composition definition into normalized number fractions.
pub fn to_composition(def: &CompositionDef) -> ModelResult<Composition> {
    let composition = match def {
        CompositionDef::Solar => Composition::solar(),
        CompositionDef::Pure { element } => {
            Composition::pure(validate::parse_element(element, "composition")?)
        }
        CompositionDef::LogEpsilon { abundances } => {
            let parsed = abundances
                .iter()
                .map(|(s, v)| validate::parse_element(s, "composition.abundances").map(|e| (e, *v)))
                .collect::<Result<Vec<_>, ValidationError>>()?;
            Composition::from_log_eps(&parsed)?
        }
        CompositionDef::NumberFractions { fractions } => {
            let parsed = fractions
                .iter()
                .map(|(s, v)| validate::parse_element(s, "composition.fractions").map(|e| (e, *v)))
                .collect::<Result<Vec<_>, ValidationError>>()?;
            Composition::new_number_fractions(parsed)?
        }
    };
    Ok(composition)
}

/// Build the depth grid described by `model`.
pub fn to_grid(model: &Model) -> ModelResult<AtmosphereDepthGrid> {
    let composition = to_composition(&model.composition)?;
    let (temperatures, pressures): (Vec<_>, Vec<_>) = model
        .depths
        .iter()
        .map(|d| (d.temperature_k, d.pressure_dyn_cm2))
        .unzip();
    Ok(AtmosphereDepthGrid::new(temperatures, pressures, composition)?)
}

/// Estimator settings with the model's overrides applied.
pub fn estimator_config(model: &Model) -> EstimatorConfig {
    let mut config = EstimatorConfig::default();
    if let Some(overrides) = &model.estimator {
        if let Some(max_rounds) = overrides.max_rounds {
            config.max_rounds = max_rounds;
        }
        if let Some(rel_tol) = overrides.rel_tol {
            config.rel_tol = rel_tol;
        }
    }
    config
}

/// Species catalog for `model`: the alternative file it names, resolved
/// against `base_dir`, or the built-in tables.
pub fn catalog_for(model: &Model, base_dir: &Path) -> ModelResult<Cow<'static, Catalog>> {
    match &model.catalog {
        Some(rel) => Ok(Cow::Owned(Catalog::load(&base_dir.join(rel))?)),
        None => Ok(Cow::Borrowed(sg_species::builtin())),
    }
}
