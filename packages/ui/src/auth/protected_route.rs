//! Route guard for signed-in pages.

use dioxus::prelude::*;

use super::use_auth;

/// Renders `children` only for a signed-in user.
///
/// Shows a loading screen until the session is restored, then calls
/// `on_unauthenticated` if nobody is signed in.
#[component]
pub fn ProtectedRoute(on_unauthenticated: EventHandler<()>, children: Element) -> Element {
    let auth = use_auth();

    use_effect(move || {
        if !auth.is_loading() && !auth.is_authenticated() {
            on_unauthenticated.call(());
        }
    });

    if auth.is_loading() {
        return rsx! {
            div { class: "loading-screen",
                div { class: "spinner" }
                p { "Loading..." }
            }
        };
    }

    if !auth.is_authenticated() {
        return rsx! {};
    }

    rsx! {
        {children}
    }
}
