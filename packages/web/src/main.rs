// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

use dioxus::prelude::*;

use ui::{AuthPage, AuthProvider, Dashboard, ProtectedRoute};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/auth")]
    Auth {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        use tracing_subscriber::EnvFilter;

        dotenvy::dotenv().ok();
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();

        dioxus::serve(|| async move {
            let relay = api::init_dispatch().await?;
            tracing::info!(
                "Live updates on {} and {}",
                gateway::EVENTS_PATH,
                gateway::WEBHOOK_PATH
            );
            Ok(dioxus::server::router(App).merge(gateway::event_routes(relay)))
        });
    }

    #[cfg(not(feature = "server"))]
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AuthProvider {
            Router::<Route> {}
        }
    }
}

/// Dashboard, for signed-in users only.
#[component]
fn Home() -> Element {
    let nav = use_navigator();
    rsx! {
        ProtectedRoute {
            on_unauthenticated: move |_| {
                nav.replace(Route::Auth {});
            },
            Dashboard {}
        }
    }
}

/// Login and registration.
#[component]
fn Auth() -> Element {
    let nav = use_navigator();
    rsx! {
        AuthPage {
            on_authenticated: move |_| {
                nav.replace(Route::Home {});
            },
        }
    }
}
