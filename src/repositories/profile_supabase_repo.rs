// src/repositories/profile_supabase_repo.rs

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use thiserror::Error;
use urlencoding::encode;

use crate::dtos::profile::{ProfileRow, ProfileUpdate};
use crate::models::profile::Profile;
use crate::session::Session;

/// What can go wrong between the page and the store. Messages travel to the
/// user verbatim inside a notification; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("profile query failed: {0}")]
    Query(String),
    #[error("profile update failed: {0}")]
    Update(String),
}

/// The page's only data dependency: read one row, replace one row.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Select the session owner's profile. Exactly one row is expected;
    /// zero rows is a query error, not an empty success.
    async fn fetch_profile(&self, session: &Session) -> Result<Profile, StoreError>;

    /// Replace every editable column of the session owner's row. No
    /// diffing: the caller sends the whole record each time.
    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<(), StoreError>;
}

/// `profiles` table access via Supabase (PostgREST). Authenticates as the
/// user: anon key as `apikey`, the session's access token as the bearer, so
/// row-level security confines every call to the user's own row.
#[derive(Clone)]
pub struct SupabaseProfileStore {
    client: Client,
    base_rest_url: String, // e.g. https://xyz.supabase.co/rest/v1
    anon_key: String,
}

impl SupabaseProfileStore {
    pub fn new(client: Client, supabase_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let supabase_url = supabase_url.into();
        let trimmed = supabase_url.trim_end_matches('/');
        let base_rest_url = if trimmed.ends_with("/rest/v1") {
            trimmed.to_string()
        } else {
            format!("{trimmed}/rest/v1")
        };

        Self {
            client,
            base_rest_url,
            anon_key: anon_key.into(),
        }
    }

    fn profiles_url(&self) -> String {
        format!("{}/profiles", self.base_rest_url)
    }

    fn headers(&self, session: &Session) -> reqwest::header::HeaderMap {
        use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(key) = HeaderValue::from_str(&self.anon_key) {
            headers.insert("apikey", key);
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", session.access_token)) {
            headers.insert(AUTHORIZATION, bearer);
        }
        headers
    }
}

#[async_trait]
impl ProfileStore for SupabaseProfileStore {
    async fn fetch_profile(&self, session: &Session) -> Result<Profile, StoreError> {
        let url = format!(
            "{}?id=eq.{}&select=*",
            self.profiles_url(),
            encode(session.user_id.as_str())
        );
        debug!("fetching profile for {}", session.user_id);

        let resp = self
            .client
            .get(&url)
            .headers(self.headers(session))
            .send()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        if !status.is_success() {
            warn!("profile select returned {status}");
            return Err(StoreError::Query(format!(
                "{} -> {}",
                status.as_u16(),
                backend_message(&text)
            )));
        }

        let rows: Vec<ProfileRow> = serde_json::from_str(&text)
            .map_err(|e| StoreError::Query(format!("invalid response: {e}")))?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Query(format!("no profile row for {}", session.user_id)))?;

        Ok(row.into_profile())
    }

    async fn update_profile(
        &self,
        session: &Session,
        update: &ProfileUpdate,
    ) -> Result<(), StoreError> {
        let url = format!(
            "{}?id=eq.{}",
            self.profiles_url(),
            encode(session.user_id.as_str())
        );
        debug!("updating profile for {}", session.user_id);

        let resp = self
            .client
            .patch(&url)
            .headers(self.headers(session))
            .header("Prefer", "return=minimal")
            .json(update)
            .send()
            .await
            .map_err(|e| StoreError::Update(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!("profile update returned {status}");
            return Err(StoreError::Update(format!(
                "{} -> {}",
                status.as_u16(),
                backend_message(&text)
            )));
        }

        Ok(())
    }
}

/// PostgREST wraps its errors in JSON; surface the human part when there is
/// one, the raw body otherwise.
fn backend_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value
            .get("message")
            .or_else(|| value.get("msg"))
            .and_then(|m| m.as_str())
        {
            return msg.to_string();
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_base_is_normalised() {
        let client = Client::new();
        let plain = SupabaseProfileStore::new(client.clone(), "https://xyz.supabase.co/", "anon");
        assert_eq!(plain.profiles_url(), "https://xyz.supabase.co/rest/v1/profiles");

        let already = SupabaseProfileStore::new(client, "https://xyz.supabase.co/rest/v1", "anon");
        assert_eq!(
            already.profiles_url(),
            "https://xyz.supabase.co/rest/v1/profiles"
        );
    }

    #[test]
    fn backend_message_prefers_the_json_message() {
        assert_eq!(
            backend_message(r#"{"message":"violates check constraint"}"#),
            "violates check constraint"
        );
        assert_eq!(backend_message(r#"{"msg":"row not found"}"#), "row not found");
        assert_eq!(backend_message("plain body"), "plain body");
    }
}
