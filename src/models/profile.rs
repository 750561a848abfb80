// src/models/profile.rs - domain record, editable draft and form validation

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Opaque user id. Equals the `id` column of the `profiles` row and the
/// authenticated session's subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `profiles` row as the page works with it. Created at registration,
/// read once per visit, replaced in full on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// ISO date, `YYYY-MM-DD`.
    pub birth_date: String,
    pub street: String,
    pub house_number: String,
    pub city: String,
    pub postal_code: String,
    pub username: String,
    pub bio: String,
    /// Well-formed URL or the empty string.
    pub website: String,
    pub status: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
}

/// Form-bound working copy of a [`Profile`]. Lives only while the edit
/// dialog is open; discarded on close and replaced by a fresh fetch after a
/// successful save.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: String,
    pub street: String,
    pub house_number: String,
    pub city: String,
    pub postal_code: String,
    pub username: String,
    pub bio: String,
    pub website: String,
    pub status: String,
}

impl ProfileDraft {
    /// Pre-populates the form from a fetched profile. The birth date is
    /// normalised to `YYYY-MM-DD` whatever format the row carries.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            birth_date: to_iso_date(&profile.birth_date),
            street: profile.street.clone(),
            house_number: profile.house_number.clone(),
            city: profile.city.clone(),
            postal_code: profile.postal_code.clone(),
            username: profile.username.clone(),
            bio: profile.bio.clone(),
            website: profile.website.clone(),
            status: profile.status.clone().unwrap_or_default(),
        }
    }

    /// Materialises the draft back into a full record. Identity, avatar and
    /// cover are carried over from the record being edited; text fields are
    /// trimmed the same way the backend trims them on write.
    pub fn into_profile(self, current: &Profile) -> Profile {
        let status = self.status.trim().to_string();
        Profile {
            id: current.id.clone(),
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            birth_date: to_iso_date(&self.birth_date),
            street: self.street.trim().to_string(),
            house_number: self.house_number.trim().to_string(),
            city: self.city.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            username: self.username.trim().to_string(),
            bio: self.bio.trim().to_string(),
            website: self.website.trim().to_string(),
            status: if status.is_empty() { None } else { Some(status) },
            avatar_url: current.avatar_url.clone(),
            cover_url: current.cover_url.clone(),
        }
    }
}

/// Normalises a date string to ISO `YYYY-MM-DD`, accepting the formats the
/// store has historically held. Unparseable input is passed through
/// untouched so validation can report it.
pub fn to_iso_date(raw: &str) -> String {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// One schema violation, addressed to the offending form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date regex"));

const REQUIRED: &str = "Campo obrigatório";

fn required(errors: &mut Vec<FieldError>, field: &'static str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, REQUIRED));
        return false;
    }
    true
}

/// Validates the whole draft at once; an empty result means the draft may be
/// submitted. At most one error is reported per field, messages are the ones
/// the form shows inline.
pub fn validate(draft: &ProfileDraft) -> Vec<FieldError> {
    let mut errors = Vec::new();

    required(&mut errors, "full_name", &draft.full_name);

    if required(&mut errors, "email", &draft.email) && !EMAIL_RE.is_match(draft.email.trim()) {
        errors.push(FieldError::new("email", "Email inválido"));
    }

    required(&mut errors, "phone", &draft.phone);

    if required(&mut errors, "birth_date", &draft.birth_date) {
        let date = draft.birth_date.trim();
        let well_formed = ISO_DATE_RE.is_match(date)
            && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok();
        if !well_formed {
            errors.push(FieldError::new("birth_date", "Data inválida"));
        }
    }

    required(&mut errors, "street", &draft.street);
    required(&mut errors, "house_number", &draft.house_number);
    required(&mut errors, "city", &draft.city);
    required(&mut errors, "postal_code", &draft.postal_code);

    if required(&mut errors, "username", &draft.username)
        && draft.username.trim().chars().count() < 3
    {
        errors.push(FieldError::new("username", "Mínimo de 3 caracteres"));
    }

    let website = draft.website.trim();
    if !website.is_empty() && Url::parse(website).is_err() {
        errors.push(FieldError::new("website", "URL inválida"));
    }

    errors
}
