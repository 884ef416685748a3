//! Immutable species registry.
//!
//! Rows are added through [`SpeciesRegistryBuilder`] and frozen by `build()`,
//! which validates the table and resolves every row's neutral-parent link.
//! After that the registry only answers lookups: structured key or name to a
//! compact [`SpeciesId`], and id to row.

use crate::element::Element;
use crate::error::{SpeciesError, SpeciesResult};
use crate::species::{Priority, SpeciesDef, SpeciesKey, SpeciesKind};
use sg_core::SpeciesId;
use std::collections::{HashMap, HashSet};

/// Builder for the species table.
#[derive(Debug, Default)]
pub struct SpeciesRegistryBuilder {
    defs: Vec<SpeciesDef>,
}

impl SpeciesRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row. Order matters: ion ladders must stay contiguous.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        key: SpeciesKey,
        kind: SpeciesKind,
        priority: Priority,
    ) -> SpeciesId {
        let id = SpeciesId::from_index(self.defs.len());
        self.defs.push(SpeciesDef {
            name: name.into(),
            key,
            kind,
            priority,
            neutral_parent: None,
        });
        id
    }

    /// Validate and freeze the table.
    pub fn build(self) -> SpeciesResult<SpeciesRegistry> {
        let mut defs = self.defs;
        validate_shapes(&defs)?;
        validate_ladders(&defs)?;

        let mut by_key = HashMap::with_capacity(defs.len());
        let mut by_name = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            let id = SpeciesId::from_index(i);
            if by_key.insert(def.key.clone(), id).is_some() || by_name.insert(def.name.clone(), id).is_some() {
                return Err(SpeciesError::Duplicate {
                    name: def.name.clone(),
                });
            }
        }

        for def in defs.iter_mut() {
            let neutral = by_key
                .get(&SpeciesKey::atom(def.key.element))
                .copied()
                .ok_or_else(|| SpeciesError::MissingParent {
                    name: def.name.clone(),
                })?;
            def.neutral_parent = Some(neutral);
        }

        Ok(SpeciesRegistry {
            defs,
            by_key,
            by_name,
        })
    }
}

fn validate_shapes(defs: &[SpeciesDef]) -> SpeciesResult<()> {
    for def in defs {
        let invalid = |reason| SpeciesError::Invalid {
            name: def.name.clone(),
            reason,
        };
        match &def.kind {
            SpeciesKind::Inert => {
                if !def.key.is_atomic() || def.key.charge != 0 {
                    return Err(invalid("inert species must be a neutral atom"));
                }
            }
            SpeciesKind::IonLadder {
                ionization_potential_ev,
                ..
            } => {
                if !def.key.is_atomic() || def.key.charge == 0 {
                    return Err(invalid("ion ladder species must be a charged atom"));
                }
                if !ionization_potential_ev.is_finite() || *ionization_potential_ev <= 0.0 {
                    return Err(invalid("ionization potential must be positive"));
                }
            }
            SpeciesKind::PolynomialFit { coefficients } => {
                if def.key.is_atomic() {
                    return Err(invalid("polynomial fit species must have bonded partners"));
                }
                if coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(invalid("non-finite polynomial coefficient"));
                }
            }
            SpeciesKind::Molecule {
                dissociation_ev,
                reduced_mass_amu,
                ..
            } => {
                if def.key.is_atomic() {
                    return Err(invalid("molecule must have bonded partners"));
                }
                if !dissociation_ev.is_finite() || *reduced_mass_amu <= 0.0 {
                    return Err(invalid("molecule needs a finite dissociation energy and positive reduced mass"));
                }
            }
        }
    }
    Ok(())
}

/// Ion-ladder rows of one parent form a single block: `+1, +2, ...` ascending,
/// optionally followed by `-1, -2, ...`.
fn validate_ladders(defs: &[SpeciesDef]) -> SpeciesResult<()> {
    let mut closed: HashSet<Element> = HashSet::new();
    let mut current: Option<(Element, i8)> = None;

    for def in defs {
        let SpeciesKind::IonLadder { .. } = def.kind else {
            if let Some((element, _)) = current.take() {
                closed.insert(element);
            }
            continue;
        };

        let element = def.key.element;
        let q = def.key.charge;
        let in_order = match current {
            Some((e, last)) if e == element => {
                (last > 0 && (q == last + 1 || q == -1)) || (last < 0 && q == last - 1)
            }
            _ => {
                if let Some((e, _)) = current {
                    closed.insert(e);
                }
                !closed.contains(&element) && (q == 1 || q == -1)
            }
        };
        if !in_order {
            return Err(SpeciesError::LadderOrder {
                element: element.symbol(),
                name: def.name.clone(),
            });
        }
        current = Some((element, q));
    }
    Ok(())
}

/// Read-only species table with key and name lookups.
#[derive(Debug, Clone)]
pub struct SpeciesRegistry {
    defs: Vec<SpeciesDef>,
    by_key: HashMap<SpeciesKey, SpeciesId>,
    by_name: HashMap<String, SpeciesId>,
}

impl SpeciesRegistry {
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn get(&self, id: SpeciesId) -> Option<&SpeciesDef> {
        self.defs.get(id.index())
    }

    pub fn id(&self, key: &SpeciesKey) -> Option<SpeciesId> {
        self.by_key.get(key).copied()
    }

    pub fn id_by_name(&self, name: &str) -> Option<SpeciesId> {
        self.by_name.get(name).copied()
    }

    /// Look a species up by name, falling back to an ion label such as `Fe++`.
    pub fn lookup(&self, query: &str) -> SpeciesResult<SpeciesId> {
        if let Some(id) = self.id_by_name(query.trim()) {
            return Ok(id);
        }
        query
            .parse::<SpeciesKey>()
            .ok()
            .and_then(|key| self.id(&key))
            .ok_or_else(|| SpeciesError::Unknown {
                what: "species",
                name: query.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, &SpeciesDef)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (SpeciesId::from_index(i), def))
    }

    pub fn defs(&self) -> &[SpeciesDef] {
        &self.defs
    }

    /// Positive ion-ladder rows of `element`, in ascending charge.
    pub fn positive_ladder(&self, element: Element) -> impl Iterator<Item = &SpeciesDef> {
        self.defs.iter().filter(move |d| {
            d.key.element == element
                && d.key.charge > 0
                && matches!(d.kind, SpeciesKind::IonLadder { .. })
        })
    }

    /// Molecules whose parent is `element`.
    pub fn molecules_of(&self, element: Element) -> impl Iterator<Item = &SpeciesDef> {
        self.defs
            .iter()
            .filter(move |d| d.key.element == element && !d.key.is_atomic())
    }

    /// Elements that have a neutral atom row.
    pub fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        self.defs
            .iter()
            .filter(|d| matches!(d.kind, SpeciesKind::Inert))
            .map(|d| d.key.element)
    }
}
