//! The validated résumé record handed to the renderer.
//!
//! Values of these types are produced by the loader after validation and are
//! only ever read by the rendering pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root of the résumé data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub personal: PersonalInfo,
    #[serde(default)]
    pub education: Vec<TimelineEntry>,
    #[serde(default)]
    pub work: Vec<TimelineEntry>,
    #[serde(default)]
    pub certifications: Vec<TimelineEntry>,
    #[serde(default)]
    pub additional: AdditionalInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name_kanji: String,
    pub name_furigana: String,
    /// ISO calendar date, `YYYY-MM-DD`.
    pub birth_date: String,
    #[serde(default)]
    pub gender: Option<String>,
    /// Raw address line, possibly prefixed with a postal code.
    pub address: String,
    #[serde(default)]
    pub address_furigana: Option<String>,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub landline: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
}

/// A raw timeline date token such as `2020-04`, `2018 3` or `現在`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateToken(pub String);

impl DateToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DateToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One dated row of the education, work or certification tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: DateToken,
    /// Event kind, e.g. 入学, 卒業, 入社. Empty for certifications.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl TimelineEntry {
    pub fn new(
        date: impl Into<DateToken>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            description: description.into(),
        }
    }
}

/// Free-text blocks and the commute/dependents cells of the second page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub motivation: String,
    #[serde(default)]
    pub request: String,
    #[serde(default)]
    pub commute_time: Option<String>,
    #[serde(default)]
    pub dependents: Option<u32>,
    #[serde(default)]
    pub spouse: Option<bool>,
    #[serde(default)]
    pub spouse_support: Option<bool>,
}
