//! The profile page, headless: everything the page does except paint.
//!
//! State transitions, validation, store calls and caching live here; the
//! host shell renders from the accessors and forwards user actions to the
//! methods. All collaborators arrive through [`PageDeps`] - nothing is
//! reached through globals.

use std::sync::Arc;

use futures::FutureExt;
use log::{debug, info};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::cache::QueryCache;
use crate::clipboard::Clipboard;
use crate::dtos::profile::ProfileUpdate;
use crate::models::product::Product;
use crate::models::profile::{FieldError, Profile, ProfileDraft, validate};
use crate::navigation::Navigator;
use crate::notify::{Notification, Notifier};
use crate::repositories::profile_supabase_repo::{ProfileStore, StoreError};
use crate::session::SessionProvider;
use crate::theme::{Theme, ThemeProvider};


const PROFILE_KEY: &str = "profile";

/// Everything the page needs from the outside, bundled at construction.
#[derive(Clone)]
pub struct PageDeps {
    pub store: Arc<dyn ProfileStore>,
    pub sessions: Arc<dyn SessionProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub clipboard: Arc<dyn Clipboard>,
    pub navigator: Arc<dyn Navigator>,
    pub themes: Arc<dyn ThemeProvider>,
}

/// `Preview` renders the page as a visitor would see it: owner-only
/// controls disappear, data stays the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Normal,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Posts,
    Products,
    Reels,
}

/// Errors a page operation can surface. Validation failures never reach the
/// store; they annotate the form and block the submit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("dados inválidos")]
    Validation(Vec<FieldError>),
}

struct EditDialog {
    draft: ProfileDraft,
    errors: Vec<FieldError>,
}

pub struct ProfilePage {
    deps: PageDeps,
    cache: QueryCache<Profile>,
    write_gate: Mutex<()>,
    profile: Option<Profile>,
    mode: ViewMode,
    tab: Tab,
    edit: Option<EditDialog>,
    add_cover_input: Option<String>,
    remove_cover_open: bool,
    saving: bool,
    products: Vec<Product>,
}

impl ProfilePage {
    pub fn new(deps: PageDeps) -> Self {
        Self {
            deps,
            cache: QueryCache::new(),
            write_gate: Mutex::new(()),
            profile: None,
            mode: ViewMode::default(),
            tab: Tab::default(),
            edit: None,
            add_cover_input: None,
            remove_cover_open: false,
            saving: false,
            products: Vec::new(),
        }
    }

    // ---- loading -----------------------------------------------------

    /// Fetches the session owner's profile through the cache. After a
    /// successful save the cached value is invalidated, so calling this
    /// again observes the stored record.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        let session = self
            .deps
            .sessions
            .session()
            .ok_or(StoreError::NotAuthenticated)?;

        let store = Arc::clone(&self.deps.store);
        let profile = self
            .cache
            .get_or_fetch(PROFILE_KEY, move || {
                async move { store.fetch_profile(&session).await }.boxed()
            })
            .await?;

        debug!("profile loaded for {}", profile.id);
        self.profile = Some(profile);
        Ok(())
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    // ---- edit dialog -------------------------------------------------

    /// Opens the edit form pre-populated from the last-fetched profile.
    /// Without a loaded profile there is nothing to edit.
    pub fn open_edit_dialog(&mut self) {
        if let Some(profile) = &self.profile {
            self.edit = Some(EditDialog {
                draft: ProfileDraft::from_profile(profile),
                errors: Vec::new(),
            });
        }
    }

    /// Closes the form and discards the draft.
    pub fn close_edit_dialog(&mut self) {
        self.edit = None;
    }

    pub fn edit_dialog_open(&self) -> bool {
        self.edit.is_some()
    }

    pub fn draft(&self) -> Option<&ProfileDraft> {
        self.edit.as_ref().map(|dialog| &dialog.draft)
    }

    /// Form field binding point.
    pub fn draft_mut(&mut self) -> Option<&mut ProfileDraft> {
        self.edit.as_mut().map(|dialog| &mut dialog.draft)
    }

    /// Field errors from the last blocked submit, cleared on the next
    /// successful validation.
    pub fn field_errors(&self) -> &[FieldError] {
        self.edit
            .as_ref()
            .map(|dialog| dialog.errors.as_slice())
            .unwrap_or_default()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Validates the whole draft and, if it passes, replaces the stored
    /// record with it. A failed validation blocks the submit before any
    /// store call; a failed write keeps the dialog and the draft so the
    /// user can retry. Only a successful save closes the dialog.
    pub async fn submit_edit(&mut self) -> Result<(), PageError> {
        let Some(profile) = self.profile.clone() else {
            return Ok(());
        };

        let draft = {
            let Some(dialog) = self.edit.as_mut() else {
                return Ok(());
            };
            let errors = validate(&dialog.draft);
            if !errors.is_empty() {
                dialog.errors = errors.clone();
                return Err(PageError::Validation(errors));
            }
            dialog.errors.clear();
            dialog.draft.clone()
        };

        let record = draft.into_profile(&profile);
        let update = ProfileUpdate::from_profile(&record);

        self.saving = true;
        let result = self.push_update(&update).await;
        self.saving = false;

        match result {
            Ok(()) => {
                self.cache.invalidate(PROFILE_KEY).await;
                self.edit = None;
                info!("profile saved for {}", record.id);
                self.deps
                    .notifier
                    .notify(Notification::success("Perfil atualizado com sucesso!"));
                Ok(())
            }
            Err(e) => {
                self.deps.notifier.notify(Notification::error(e.to_string()));
                Err(e.into())
            }
        }
    }

    // ---- cover controls ----------------------------------------------

    pub fn open_add_cover_dialog(&mut self) {
        self.add_cover_input = Some(String::new());
    }

    pub fn add_cover_dialog_open(&self) -> bool {
        self.add_cover_input.is_some()
    }

    pub fn set_cover_url_input(&mut self, url: impl Into<String>) {
        if let Some(input) = self.add_cover_input.as_mut() {
            *input = url.into();
        }
    }

    pub fn cover_url_input(&self) -> Option<&str> {
        self.add_cover_input.as_deref()
    }

    /// Merges the pasted URL into the current record as the cover and pushes
    /// the full record. The dialog closes the moment the update is issued -
    /// the outcome only surfaces as a notification. The URL itself is taken
    /// as pasted, unchecked.
    pub async fn confirm_add_cover(&mut self) -> Result<(), PageError> {
        let Some(url) = self.add_cover_input.take() else {
            return Ok(());
        };
        self.save_cover(Some(url), "Capa atualizada!").await
    }

    pub fn open_remove_cover_dialog(&mut self) {
        self.remove_cover_open = true;
    }

    pub fn remove_cover_dialog_open(&self) -> bool {
        self.remove_cover_open
    }

    pub fn close_remove_cover_dialog(&mut self) {
        self.remove_cover_open = false;
    }

    /// Clears the cover and pushes the full record. Same dialog semantics
    /// as [`Self::confirm_add_cover`]: closed before the outcome is known.
    pub async fn confirm_remove_cover(&mut self) -> Result<(), PageError> {
        if !self.remove_cover_open {
            return Ok(());
        }
        self.remove_cover_open = false;
        self.save_cover(None, "Capa removida!").await
    }

    async fn save_cover(
        &mut self,
        cover_url: Option<String>,
        success_message: &str,
    ) -> Result<(), PageError> {
        let Some(mut record) = self.profile.clone() else {
            return Ok(());
        };
        record.cover_url = cover_url;
        let update = ProfileUpdate::from_profile(&record);

        match self.push_update(&update).await {
            Ok(()) => {
                self.cache.invalidate(PROFILE_KEY).await;
                self.deps
                    .notifier
                    .notify(Notification::success(success_message));
                Ok(())
            }
            Err(e) => {
                self.deps.notifier.notify(Notification::error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// All writes funnel through here: one session check, and a gate that
    /// serialises rapid repeated saves instead of letting them race.
    async fn push_update(&self, update: &ProfileUpdate) -> Result<(), StoreError> {
        let session = self
            .deps
            .sessions
            .session()
            .ok_or(StoreError::NotAuthenticated)?;
        let _gate = self.write_gate.lock().await;
        self.deps.store.update_profile(&session, update).await
    }

    // ---- preview mode ------------------------------------------------

    pub fn enter_preview(&mut self) {
        self.mode = ViewMode::Preview;
    }

    pub fn exit_preview(&mut self) {
        self.mode = ViewMode::Normal;
    }

    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    /// Edit button, overflow menu and cover controls render only when this
    /// holds.
    pub fn owner_controls_visible(&self) -> bool {
        self.mode == ViewMode::Normal
    }

    // ---- share link --------------------------------------------------

    /// The canonical URL of this profile under the given origin.
    pub fn share_link(&self, origin: &str) -> Option<String> {
        let profile = self.profile.as_ref()?;
        Some(format!(
            "{}/perfil/{}",
            origin.trim_end_matches('/'),
            urlencoding::encode(profile.id.as_str())
        ))
    }

    /// Copies the share link to the clipboard and confirms with a
    /// notification. No network involved.
    pub fn copy_share_link(&self, origin: &str) {
        let Some(link) = self.share_link(origin) else {
            return;
        };
        match self.deps.clipboard.write_text(&link) {
            Ok(()) => self
                .deps
                .notifier
                .notify(Notification::success("Link copiado!")),
            Err(e) => self.deps.notifier.notify(Notification::error(e.to_string())),
        }
    }

    // ---- content tabs ------------------------------------------------

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn active_tab(&self) -> Tab {
        self.tab
    }

    /// Listings for the products tab. No fetch path populates these yet, so
    /// the pane shows its empty state.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Empty-state message for the active tab, `None` when the pane has
    /// content to show.
    pub fn empty_state_label(&self) -> Option<&'static str> {
        match self.tab {
            Tab::Posts => Some("Nenhuma publicação ainda"),
            Tab::Reels => Some("Nenhum reel ainda"),
            Tab::Products => self
                .products
                .is_empty()
                .then_some("Nenhum produto anunciado"),
        }
    }

    // ---- navigation & theme ------------------------------------------

    pub fn go_back(&self) {
        self.deps.navigator.back();
    }

    /// The overflow menu's logout entry: navigates to the login screen.
    /// Tearing down the session happens there, not here.
    pub fn logout(&self) {
        self.deps.navigator.to_login();
    }

    pub fn theme(&self) -> Theme {
        self.deps.themes.theme()
    }

    pub fn toggle_theme(&self) {
        let next = self.deps.themes.theme().toggled();
        self.deps.themes.set_theme(next);
    }
}
