//! Pet Heaven Catalog
//!
//! Read-only catalog of adoptable pets and the search filters used to browse it.
//!
//! ## Features
//! - Bundled catalog data, or load your own JSON file
//! - Lookup by identifier with an explicit not-found outcome
//! - Case-insensitive text search over name, breed and description
//! - Species, age band and gender filters
//!
//! ```
//! use heaven_catalog::{Catalog, FilterCriteria, FilterKey};
//!
//! let catalog = Catalog::bundled()?;
//! let mut criteria = FilterCriteria::default();
//! criteria.set(FilterKey::Type, "cat")?;
//! criteria.set(FilterKey::Age, "senior")?;
//!
//! for pet in catalog.search(&criteria) {
//!     println!("{} the {}", pet.name, pet.breed);
//! }
//! # Ok::<(), heaven_catalog::CatalogError>(())
//! ```

pub mod catalog;
pub mod error;
pub mod filter;
pub mod pet;

pub use catalog::{Catalog, PetLookup};
pub use error::{CatalogError, Result};
pub use filter::{age_band, filter, AgeBand, Choice, FilterCriteria, FilterKey};
pub use pet::{Gender, Pet, Species};
