// src/navigation.rs - the two moves the page can make

use log::info;

/// Injected in place of router/history. `to_login` is the logout
/// affordance; it only navigates - invalidating the session is the login
/// screen's job.
pub trait Navigator: Send + Sync {
    fn back(&self);
    fn to_login(&self);
}

/// Logs where the page would have gone. Enough for the headless demo.
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn back(&self) {
        info!("navigation: back");
    }

    fn to_login(&self) {
        info!("navigation: /login");
    }
}
