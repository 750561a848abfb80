// src/theme.rs - injected theme state

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Injected in place of the ambient theme state the page used to flip.
pub trait ThemeProvider: Send + Sync {
    fn theme(&self) -> Theme;
    fn set_theme(&self, theme: Theme);
}

#[derive(Default)]
pub struct MemoryThemeProvider {
    theme: Mutex<Theme>,
}

impl ThemeProvider for MemoryThemeProvider {
    fn theme(&self) -> Theme {
        *self.theme.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_theme(&self, theme: Theme) {
        *self
            .theme
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = theme;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_flips_between_the_two_themes() {
        let provider = MemoryThemeProvider::default();
        assert_eq!(provider.theme(), Theme::Light);
        provider.set_theme(provider.theme().toggled());
        assert_eq!(provider.theme(), Theme::Dark);
        provider.set_theme(provider.theme().toggled());
        assert_eq!(provider.theme(), Theme::Light);
    }
}
