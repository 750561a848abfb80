use serde::{Deserialize, Serialize};

use crate::models::profile::{Profile, UserId};

/// Raw `profiles` row as PostgREST returns it. Every column is optional so
/// a sparse row still decodes; conversion to the domain record fills the
/// gaps with empty strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRow {
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub status: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
}

impl ProfileRow {
    pub fn into_profile(self) -> Profile {
        Profile {
            id: UserId::new(self.id),
            full_name: self.full_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            birth_date: self.birth_date.unwrap_or_default(),
            street: self.street.unwrap_or_default(),
            house_number: self.house_number.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            postal_code: self.postal_code.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            bio: self.bio.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            status: self.status,
            avatar_url: self.avatar_url,
            cover_url: self.cover_url,
        }
    }
}

/// Full-record update payload. Every editable column is written on every
/// save; `None` serialises as an explicit null so cleared optional columns
/// are cleared in the store too. The row id never travels in the body, the
/// request filters on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
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
    pub status: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
}

impl ProfileUpdate {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            birth_date: profile.birth_date.clone(),
            street: profile.street.clone(),
            house_number: profile.house_number.clone(),
            city: profile.city.clone(),
            postal_code: profile.postal_code.clone(),
            username: profile.username.clone(),
            bio: profile.bio.clone(),
            website: profile.website.clone(),
            status: profile.status.clone(),
            avatar_url: profile.avatar_url.clone(),
            cover_url: profile.cover_url.clone(),
        }
    }
}
