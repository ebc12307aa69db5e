//! Catalog filter engine
//!
//! A pet is kept when it passes every active criterion. Filtering never
//! reorders: the output is a subsequence of the input.

use crate::error::{CatalogError, Result};
use crate::pet::{Gender, Pet, Species};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Age groups offered by the search form.
///
/// Bands cover whole years: puppy `[0, 1]`, young `(1, 3]`, adult `(3, 7]`,
/// senior `(7, ∞)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBand {
    Puppy,
    Young,
    Adult,
    Senior,
}

impl AgeBand {
    pub const ALL: [AgeBand; 4] = [Self::Puppy, Self::Young, Self::Adult, Self::Senior];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Puppy => "puppy",
            Self::Young => "young",
            Self::Adult => "adult",
            Self::Senior => "senior",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Puppy => "Puppy/Kitten (0-1 year)",
            Self::Young => "Young (1-3 years)",
            Self::Adult => "Adult (3-7 years)",
            Self::Senior => "Senior (7+ years)",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeBand {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "puppy" | "kitten" => Ok(Self::Puppy),
            "young" => Ok(Self::Young),
            "adult" => Ok(Self::Adult),
            "senior" => Ok(Self::Senior),
            _ => Err(CatalogError::invalid("age", s)),
        }
    }
}

/// Band for an age in years. An unknown age belongs to no band, so such a pet
/// only shows up while the age filter is `all`.
pub fn age_band(age: Option<u32>) -> Option<AgeBand> {
    match age? {
        0..=1 => Some(AgeBand::Puppy),
        2..=3 => Some(AgeBand::Young),
        4..=7 => Some(AgeBand::Adult),
        _ => Some(AgeBand::Senior),
    }
}

/// Either "all" or one specific value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => write!(f, "{}", value.to_string().to_lowercase()),
        }
    }
}

impl<T: FromStr<Err = CatalogError>> FromStr for Choice<T> {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Names of the mutable criteria, as used by the search form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Search,
    Type,
    Age,
    Gender,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Type => "type",
            Self::Age => "age",
            Self::Gender => "gender",
        }
    }
}

impl FromStr for FilterKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "search" => Ok(Self::Search),
            "type" => Ok(Self::Type),
            "age" => Ok(Self::Age),
            "gender" => Ok(Self::Gender),
            _ => Err(CatalogError::invalid("filter key", s)),
        }
    }
}

/// Current search/filter state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Free-text query; empty means no text filter
    pub search: String,
    pub species: Choice<Species>,
    pub age: Choice<AgeBand>,
    pub gender: Choice<Gender>,
}

impl FilterCriteria {
    /// Update one criterion from its string form. On error the criteria are
    /// left unchanged.
    pub fn set(&mut self, key: FilterKey, value: &str) -> Result<()> {
        match key {
            FilterKey::Search => self.search = value.to_string(),
            FilterKey::Type => self.species = value.parse()?,
            FilterKey::Age => self.age = value.parse()?,
            FilterKey::Gender => self.gender = value.parse()?,
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty() && self.species.is_all() && self.age.is_all() && self.gender.is_all()
    }

    pub fn matches(&self, pet: &Pet) -> bool {
        self.matches_search(pet)
            && self.species.admits(&pet.species)
            && self.matches_age(pet)
            && self.gender.admits(&pet.gender)
    }

    fn matches_search(&self, pet: &Pet) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        [&pet.name, &pet.breed, &pet.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_age(&self, pet: &Pet) -> bool {
        match self.age {
            Choice::All => true,
            Choice::Only(band) => pet.age_band() == Some(band),
        }
    }
}

/// Pets satisfying `criteria`, in their original order.
pub fn filter<'a>(pets: &'a [Pet], criteria: &FilterCriteria) -> Vec<&'a Pet> {
    pets.iter().filter(|pet| criteria.matches(pet)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pet(id: u32, name: &str, breed: &str, age: Option<u32>) -> Pet {
        Pet {
            id,
            name: name.into(),
            species: Species::Dog,
            breed: breed.into(),
            age,
            gender: Gender::Male,
            energy: "High".into(),
            size: "Large".into(),
            description: format!("{name} is looking for a home"),
            full_description: String::new(),
            medical_history: String::new(),
            ideal_home: String::new(),
            vaccinated: true,
            neutered: true,
            good_with_kids: true,
            good_with_pets: true,
            traits: vec![],
            image: String::new(),
            is_new: false,
        }
    }

    fn criteria(search: &str, species: &str, age: &str, gender: &str) -> FilterCriteria {
        let mut c = FilterCriteria::default();
        c.set(FilterKey::Search, search).unwrap();
        c.set(FilterKey::Type, species).unwrap();
        c.set(FilterKey::Age, age).unwrap();
        c.set(FilterKey::Gender, gender).unwrap();
        c
    }

    #[test]
    fn test_default_criteria_keep_everything_in_order() {
        let pets = vec![pet(3, "C", "x", Some(2)), pet(1, "A", "y", None), pet(2, "B", "z", Some(9))];
        let result = filter(&pets, &FilterCriteria::default());
        let ids: Vec<u32> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let pets = vec![
            pet(1, "Golden", "Labrador", Some(2)),
            pet(2, "Max", "Golden Retriever", Some(2)),
            pet(3, "Rex", "Poodle", Some(2)),
        ];
        let result = filter(&pets, &criteria("golden", "all", "all", "all"));
        let ids: Vec<u32> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let result = filter(&pets, &criteria("LOOKING FOR", "all", "all", "all"));
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_age_band_boundaries() {
        assert_eq!(age_band(Some(0)), Some(AgeBand::Puppy));
        assert_eq!(age_band(Some(1)), Some(AgeBand::Puppy));
        assert_eq!(age_band(Some(2)), Some(AgeBand::Young));
        assert_eq!(age_band(Some(3)), Some(AgeBand::Young));
        assert_eq!(age_band(Some(4)), Some(AgeBand::Adult));
        assert_eq!(age_band(Some(7)), Some(AgeBand::Adult));
        assert_eq!(age_band(Some(8)), Some(AgeBand::Senior));
        assert_eq!(age_band(None), None);
    }

    #[test]
    fn test_unknown_age_only_matches_all() {
        let pets = vec![pet(1, "Mystery", "Mutt", None)];
        assert_eq!(filter(&pets, &FilterCriteria::default()).len(), 1);
        for band in AgeBand::ALL {
            let c = criteria("", "all", band.as_str(), "all");
            assert!(filter(&pets, &c).is_empty(), "band {band}");
        }
    }

    #[test]
    fn test_species_and_gender() {
        let mut cat = pet(2, "Luna", "Siamese", Some(2));
        cat.species = Species::Cat;
        cat.gender = Gender::Female;
        let pets = vec![pet(1, "Rex", "Mutt", Some(2)), cat];

        let ids = |c: &FilterCriteria| filter(&pets, c).iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids(&criteria("", "cat", "all", "all")), vec![2]);
        assert_eq!(ids(&criteria("", "dog", "all", "all")), vec![1]);
        assert_eq!(ids(&criteria("", "all", "all", "FEMALE")), vec![2]);
        assert_eq!(ids(&criteria("", "dog", "all", "female")), Vec::<u32>::new());
    }

    #[test]
    fn test_set_rejects_unknown_values() {
        let mut c = FilterCriteria::default();
        c.set(FilterKey::Type, "cat").unwrap();
        let err = c.set(FilterKey::Type, "hamster").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidValue { field: "type", .. }));
        assert_eq!(c.species, Choice::Only(Species::Cat));

        assert!(c.set(FilterKey::Age, "ancient").is_err());
        assert!(c.set(FilterKey::Gender, "other").is_err());
        assert!("colour".parse::<FilterKey>().is_err());
    }

    #[test]
    fn test_reset() {
        let mut c = criteria("max", "dog", "adult", "male");
        assert!(!c.is_unfiltered());
        c.reset();
        assert!(c.is_unfiltered());
        assert_eq!(c, FilterCriteria::default());
    }

    #[test]
    fn test_choice_display() {
        assert_eq!(Choice::<Species>::All.to_string(), "all");
        assert_eq!(Choice::Only(Gender::Female).to_string(), "female");
        assert_eq!(Choice::Only(AgeBand::Senior).to_string(), "senior");
    }

    fn arb_pet() -> impl Strategy<Value = Pet> {
        (
            "[a-zA-Z]{1,8}",
            "[a-zA-Z ]{1,12}",
            proptest::option::of(0u32..20),
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(name, breed, age, is_cat, is_female)| {
                let mut p = pet(1, &name, &breed, age);
                if is_cat {
                    p.species = Species::Cat;
                }
                if is_female {
                    p.gender = Gender::Female;
                }
                p
            })
    }

    fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
        (
            prop_oneof![Just(String::new()), "[a-zA-Z]{1,3}"],
            prop_oneof![Just("all"), Just("dog"), Just("cat")],
            prop_oneof![Just("all"), Just("puppy"), Just("young"), Just("adult"), Just("senior")],
            prop_oneof![Just("all"), Just("male"), Just("female")],
        )
            .prop_map(|(search, species, age, gender)| criteria(&search, species, age, gender))
    }

    proptest! {
        #[test]
        fn prop_single_pet_kept_iff_all_predicates_hold(p in arb_pet(), c in arb_criteria()) {
            let needle = c.search.to_lowercase();
            let search_ok = c.search.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.breed.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle);
            let species_ok = match c.species { Choice::All => true, Choice::Only(s) => s == p.species };
            let age_ok = match c.age { Choice::All => true, Choice::Only(b) => age_band(p.age) == Some(b) };
            let gender_ok = match c.gender { Choice::All => true, Choice::Only(g) => g == p.gender };

            let kept = !filter(std::slice::from_ref(&p), &c).is_empty();
            prop_assert_eq!(kept, search_ok && species_ok && age_ok && gender_ok);
        }

        #[test]
        fn prop_output_is_ordered_subsequence(pets in proptest::collection::vec(arb_pet(), 0..12), c in arb_criteria()) {
            let pets: Vec<Pet> = pets
                .into_iter()
                .enumerate()
                .map(|(i, mut p)| { p.id = i as u32 + 1; p })
                .collect();
            let ids: Vec<u32> = filter(&pets, &c).iter().map(|p| p.id).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
