//! sg-species: species and abundance tables for stellargas.
//!
//! Provides:
//! - Element definitions (H through Zr) with masses and solar abundances
//! - Species keys, kinds and the immutable species registry
//! - Temperature-banded partition functions
//! - The built-in catalog and loading of alternative tables (YAML/JSON)
//! - Composition handling (number fractions, log ε, solar mixture)
//!
//! # Example
//!
//! ```
//! use sg_species::{Composition, Element, SpeciesKey, builtin};
//!
//! let catalog = builtin();
//! let fe_plus = catalog.registry().lookup("Fe+").unwrap();
//! assert_eq!(catalog.registry().get(fe_plus).unwrap().charge(), 1);
//!
//! let u = catalog.partition(&SpeciesKey::atom(Element::Fe));
//! assert!(u.log10_at(5000.0) > 1.0);
//!
//! let sun = Composition::solar();
//! assert!(sun.fraction(Element::H) > 0.9);
//! ```

pub mod catalog;
pub mod composition;
pub mod element;
pub mod error;
pub mod partition;
pub mod registry;
pub mod species;

// Re-exports for ergonomics
pub use catalog::{Catalog, CatalogDef, DiatomicDef, PartitionRowDef, SpeciesRowDef, builtin};
pub use composition::Composition;
pub use element::{ELEMENT_COUNT, Element};
pub use error::{SpeciesError, SpeciesResult};
pub use partition::{BREAKPOINTS, PartitionFunction, PartitionTable, interpolate};
pub use registry::{SpeciesRegistry, SpeciesRegistryBuilder};
pub use species::{Priority, SpeciesDef, SpeciesKey, SpeciesKind};
