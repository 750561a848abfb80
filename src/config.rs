use std::env;

use anyhow::{Context, Result};

/// Environment-derived settings for wiring the page against a live backend.
#[derive(Debug, Clone)]
pub struct Settings {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    /// Origin used when building share links, e.g. `https://vitrine.app`.
    pub origin: String,
    /// Access token of the signed-in user, when one is configured.
    pub access_token: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let supabase_url = env::var("SUPABASE_URL").context("SUPABASE_URL not set")?;
        let supabase_anon_key =
            env::var("SUPABASE_ANON_KEY").context("SUPABASE_ANON_KEY not set")?;

        Ok(Self {
            supabase_url: supabase_url.trim().trim_end_matches('/').to_string(),
            supabase_anon_key: supabase_anon_key.trim().to_string(),
            origin: env::var("VITRINE_ORIGIN")
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://vitrine.app".to_string()),
            access_token: env::var("VITRINE_ACCESS_TOKEN")
                .ok()
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty()),
        })
    }
}
