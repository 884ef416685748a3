//! sg-core: stable foundation for stellargas.
//!
//! Contains:
//! - units (CGS physical constants + uom constructors at the API boundary)
//! - numeric (Real, tolerances, numerical floors, the positive-root policy)
//! - ids (compact species IDs)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{SgError, SgResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
