//! Auth context shared by the auth page, the route guard and the dashboard.

use api::{AuthSession, DefaultSessionStore};
use dioxus::prelude::*;
use dispatch_core::{AuthResponse, User};

type Session = AuthSession<DefaultSessionStore>;

/// Handle to the current session. `None` inside means it has not been
/// restored from storage yet.
#[derive(Clone, Copy, PartialEq)]
pub struct AuthContext {
    session: Signal<Option<Session>>,
}

impl AuthContext {
    pub fn is_loading(&self) -> bool {
        self.session.read().is_none()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .as_ref()
            .is_some_and(|s| s.is_authenticated())
    }

    pub fn current_user(&self) -> Option<User> {
        self.session
            .read()
            .as_ref()
            .and_then(|s| s.current_user().cloned())
    }

    /// Keep a successful login. Returns whether the user is now signed in.
    pub fn record_login(&mut self, response: &AuthResponse) -> bool {
        let mut session = self.session.write();
        let Some(session) = session.as_mut() else {
            return false;
        };
        match session.record_login(response) {
            Ok(signed_in) => signed_in,
            Err(e) => {
                tracing::error!("Failed to store session: {}", e);
                false
            }
        }
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.write().as_mut()
            && let Err(e) = session.logout()
        {
            tracing::warn!("Failed to clear session: {}", e);
        }
    }
}

/// Provides [`AuthContext`] to its children and restores the stored session
/// once mounted.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut session = use_signal(|| None::<Session>);
    use_context_provider(|| AuthContext { session });

    use_effect(move || {
        session.set(Some(AuthSession::restore(DefaultSessionStore::default())));
    });

    rsx! {
        {children}
    }
}

/// The auth context provided by the nearest [`AuthProvider`].
pub fn use_auth() -> AuthContext {
    use_context()
}
