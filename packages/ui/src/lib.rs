//! This crate contains all shared UI for the workspace.

// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

pub mod auth;
pub mod dashboard;

pub use auth::{AuthPage, AuthProvider, ProtectedRoute, use_auth};
pub use dashboard::Dashboard;
