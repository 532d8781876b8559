//! Raw candidate input and its validation.

use ballot_store::{normalize_name, DEFAULT_PHOTO, MAX_NAME_LEN};
use ballot_types::{Gender, SportCategory};
use serde::Deserialize;

use crate::ElectionError;

const REQUIRED_FIELDS: &str = "name, gender, and sport category are required";

/// Candidate fields as submitted by an admin. Everything is optional here
/// so that a missing field is a validation error rather than a decode error.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDraft {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub sport_category: Option<String>,
    pub photo: Option<String>,
}

/// A draft that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidDraft {
    pub name: String,
    pub gender: Gender,
    pub sport_category: SportCategory,
    pub photo: String,
}

impl CandidateDraft {
    pub fn new(name: &str, gender: Gender, sport_category: SportCategory) -> Self {
        Self {
            name: Some(name.to_string()),
            gender: Some(gender.as_str().to_string()),
            sport_category: Some(sport_category.as_str().to_string()),
            photo: None,
        }
    }

    pub fn with_photo(mut self, photo: &str) -> Self {
        self.photo = Some(photo.to_string());
        self
    }

    pub fn validate(&self) -> Result<ValidDraft, ElectionError> {
        let (Some(name), Some(gender), Some(category)) =
            (non_blank(&self.name), non_blank(&self.gender), non_blank(&self.sport_category))
        else {
            return Err(ElectionError::Validation(REQUIRED_FIELDS.to_string()));
        };

        if normalize_name(name).len() > MAX_NAME_LEN {
            return Err(ElectionError::Validation(format!(
                "name must be at most {MAX_NAME_LEN} bytes"
            )));
        }

        let gender: Gender = gender
            .parse()
            .map_err(|e: ballot_types::TypesError| ElectionError::Validation(e.to_string()))?;
        let sport_category: SportCategory = category
            .parse()
            .map_err(|e: ballot_types::TypesError| ElectionError::Validation(e.to_string()))?;
        let photo = non_blank(&self.photo).unwrap_or(DEFAULT_PHOTO).to_string();

        Ok(ValidDraft {
            name: name.split_whitespace().collect::<Vec<_>>().join(" "),
            gender,
            sport_category,
            photo,
        })
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
