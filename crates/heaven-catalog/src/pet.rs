//! Pet records

use crate::error::CatalogError;
use crate::filter::{age_band, AgeBand};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// An adoptable animal. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub species: Species,
    pub breed: String,
    /// Age in whole years; `None` when the source value is missing or unreadable
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<u32>,
    pub gender: Gender,
    #[serde(default)]
    pub energy: String,
    #[serde(default)]
    pub size: String,
    pub description: String,
    #[serde(default)]
    pub full_description: String,
    #[serde(default)]
    pub medical_history: String,
    #[serde(default)]
    pub ideal_home: String,
    #[serde(default)]
    pub vaccinated: bool,
    #[serde(default)]
    pub neutered: bool,
    #[serde(default)]
    pub good_with_kids: bool,
    #[serde(default)]
    pub good_with_pets: bool,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_new: bool,
}

impl Pet {
    pub fn age_band(&self) -> Option<AgeBand> {
        age_band(self.age)
    }

    /// Age as shown to people, e.g. "1 year" or "unknown age"
    pub fn age_label(&self) -> String {
        match self.age {
            Some(1) => "1 year".to_string(),
            Some(years) => format!("{years} years"),
            None => "unknown age".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dog => "dog",
            Self::Cat => "cat",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" => Ok(Self::Dog),
            "cat" => Ok(Self::Cat),
            _ => Err(CatalogError::invalid("type", s)),
        }
    }
}

/// Catalog data spells genders "Male"/"Female"; any casing is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(CatalogError::invalid("gender", s)),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Reads the integer prefix of `raw` ("2", " 2 years"). Signs and
/// non-digit prefixes yield `None`.
pub(crate) fn parse_leading_int(raw: &str) -> Option<u32> {
    let trimmed = raw.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAge {
        Whole(u64),
        Signed(i64),
        Fractional(f64),
        Text(String),
        Other(serde_json::Value),
    }

    let age = match Option::<RawAge>::deserialize(deserializer)? {
        Some(RawAge::Whole(years)) => u32::try_from(years).ok(),
        Some(RawAge::Fractional(years)) if years.is_finite() && years >= 0.0 && years < u32::MAX as f64 => {
            Some(years.trunc() as u32)
        }
        Some(RawAge::Text(text)) => parse_leading_int(&text),
        Some(RawAge::Signed(_)) | Some(RawAge::Fractional(_)) | Some(RawAge::Other(_)) | None => None,
    };
    Ok(age)
}
