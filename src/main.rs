// src/main.rs - headless demo: load the signed-in user's profile and log it

use std::sync::Arc;

use anyhow::Context;
use log::{error, info, warn};

use vitrine_profile::clipboard::SystemClipboard;
use vitrine_profile::config::Settings;
use vitrine_profile::navigation::LogNavigator;
use vitrine_profile::notify::LogNotifier;
use vitrine_profile::session::BearerSessionProvider;
use vitrine_profile::theme::MemoryThemeProvider;
use vitrine_profile::{PageDeps, ProfilePage, SupabaseProfileStore};

fn mask_key(k: &str) -> String {
    if k.len() <= 8 {
        "[REDACTED]".to_string()
    } else {
        format!("{}***{}", &k[..4], &k[k.len() - 4..])
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env()?;
    info!("Supabase URL: {}", settings.supabase_url);
    info!("Supabase key: {}", mask_key(&settings.supabase_anon_key));

    let Some(access_token) = settings.access_token.clone() else {
        warn!("VITRINE_ACCESS_TOKEN not set; nobody is signed in, nothing to load");
        return Ok(());
    };

    let http_client = reqwest::Client::builder()
        .user_agent("vitrine-profile/0.1")
        .build()
        .context("failed to build http client")?;

    let store = SupabaseProfileStore::new(
        http_client,
        settings.supabase_url.clone(),
        settings.supabase_anon_key.clone(),
    );

    let mut page = ProfilePage::new(PageDeps {
        store: Arc::new(store),
        sessions: Arc::new(BearerSessionProvider::new(access_token)),
        notifier: Arc::new(LogNotifier),
        clipboard: Arc::new(SystemClipboard),
        navigator: Arc::new(LogNavigator),
        themes: Arc::new(MemoryThemeProvider::default()),
    });

    match page.load().await {
        Ok(()) => {
            if let Some(profile) = page.profile() {
                info!("perfil carregado: @{} - {}", profile.username, profile.full_name);
                info!("cidade: {}, {}", profile.city, profile.postal_code);
                if let Some(link) = page.share_link(&settings.origin) {
                    info!("link de compartilhamento: {link}");
                }
            }
        }
        Err(e) => error!("failed to load profile: {e}"),
    }

    Ok(())
}
