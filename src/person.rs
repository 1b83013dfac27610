use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PersonId = i64;

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})(?:-([0-9]{2}))?$").unwrap());

/// One row of the backend's `/tree` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub id_father: Option<PersonId>,
    #[serde(default)]
    pub id_mother: Option<PersonId>,
    #[serde(default)]
    pub father_name: Option<String>,
    #[serde(default)]
    pub mother_name: Option<String>,
}

impl PersonRecord {
    pub fn new(id: PersonId, firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            id,
            firstname: firstname.into(),
            lastname: lastname.into(),
            role: None,
            image_url: None,
            birthday: None,
            id_father: None,
            id_mother: None,
            father_name: None,
            mother_name: None,
        }
    }

    pub fn with_parents(mut self, father: Option<PersonId>, mother: Option<PersonId>) -> Self {
        self.id_father = father;
        self.id_mother = mother;
        self
    }

    pub fn with_birthday(mut self, birthday: impl Into<String>) -> Self {
        self.birthday = Some(birthday.into());
        self
    }

    /// Father id; `0` is the backend's "unset" and reads as `None`.
    pub fn father(&self) -> Option<PersonId> {
        self.id_father.filter(|id| *id != 0)
    }

    pub fn mother(&self) -> Option<PersonId> {
        self.id_mother.filter(|id| *id != 0)
    }

    pub fn is_orphan(&self) -> bool {
        self.father().is_none() && self.mother().is_none()
    }

    /// The other parent of this person, seen from `parent`.
    pub fn other_parent(&self, parent: PersonId) -> Option<PersonId> {
        if self.father() == Some(parent) {
            self.mother()
        } else {
            self.father()
        }
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birthday.as_deref().and_then(birth_year)
    }
}

#[derive(Debug, Error)]
pub enum PersonsError {
    #[error("invalid person list: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_persons(input: &str) -> Result<Vec<PersonRecord>, PersonsError> {
    let persons: Vec<PersonRecord> = serde_json::from_str(input)?;
    Ok(persons)
}

/// Extracts a calendar year from a loosely formatted date string.
///
/// Anything that is not recognized yields `None`; a year of zero is treated the
/// same way since it cannot carry generational information.
pub fn birth_year(raw: &str) -> Option<i32> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    let year = parse_year(value)?;
    if year == 0 { None } else { Some(year) }
}

fn parse_year(value: &str) -> Option<i32> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.with_timezone(&Utc).year());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.year());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(stamp.year());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%m/%d/%Y") {
        return Some(date.year());
    }
    let caps = YEAR_MONTH_RE.captures(value)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    if let Some(month) = caps.get(2) {
        let month: u32 = month.as_str().parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
    }
    Some(year)
}
