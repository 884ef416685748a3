//! Model file schema definitions.

use serde::{Deserialize, Serialize};
use sg_chem::SolveLevel;

/// Only model-file version understood by this crate.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub solve_level: SolveLevel,
    pub composition: CompositionDef,
    #[serde(default)]
    pub depths: Vec<DepthDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimator: Option<EstimatorDef>,
    /// Alternative species catalog (YAML or JSON), relative to the model file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CompositionDef {
    Solar,
    Pure { element: String },
    LogEpsilon { abundances: Vec<(String, f64)> },
    NumberFractions { fractions: Vec<(String, f64)> },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DepthDef {
    pub temperature_k: f64,
    pub pressure_dyn_cm2: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EstimatorDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel_tol: Option<f64>,
}
