//! The pet catalog

use crate::error::{CatalogError, Result};
use crate::filter::{filter, FilterCriteria};
use crate::pet::{parse_leading_int, Pet};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const BUNDLED: &str = include_str!("../data/pets.json");

/// Ordered, read-only set of pets. Clones share the same records.
#[derive(Clone, Debug)]
pub struct Catalog {
    pets: Arc<[Pet]>,
}

/// Result of resolving a pet identifier
#[derive(Clone, Debug, PartialEq)]
pub enum PetLookup<'a> {
    Found(&'a Pet),
    NotFound { requested: String },
}

impl<'a> PetLookup<'a> {
    pub fn found(self) -> Option<&'a Pet> {
        match self {
            Self::Found(pet) => Some(pet),
            Self::NotFound { .. } => None,
        }
    }
}

impl Catalog {
    /// Build a catalog, rejecting zero or duplicate identifiers.
    pub fn new(pets: Vec<Pet>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(pets.len());
        for pet in &pets {
            if pet.id == 0 {
                return Err(CatalogError::ZeroId);
            }
            if !seen.insert(pet.id) {
                return Err(CatalogError::DuplicateId(pet.id));
            }
        }
        Ok(Self { pets: pets.into() })
    }

    /// Catalog shipped with the crate
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let pets: Vec<Pet> = serde_json::from_str(json)?;
        Self::new(pets)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        info!("Loaded {} pets from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == id)
    }

    /// Resolve an identifier as it arrives from a URL. Only the leading
    /// digits count, so "3-max" resolves pet 3 and "max" resolves nothing.
    pub fn lookup(&self, raw_id: &str) -> PetLookup<'_> {
        match parse_leading_int(raw_id).and_then(|id| self.get(id)) {
            Some(pet) => PetLookup::Found(pet),
            None => PetLookup::NotFound { requested: raw_id.to_string() },
        }
    }

    pub fn search(&self, criteria: &FilterCriteria) -> Vec<&Pet> {
        filter(&self.pets, criteria)
    }

    /// Pets flagged as new arrivals, in catalog order
    pub fn new_arrivals(&self) -> impl Iterator<Item = &Pet> {
        self.pets.iter().filter(|pet| pet.is_new)
    }
}
