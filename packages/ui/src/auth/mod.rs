//! Login, registration and the signed-in gate.

mod auth_page;
mod protected_route;
mod provider;

pub use auth_page::AuthPage;
pub use protected_route::ProtectedRoute;
pub use provider::{AuthContext, AuthProvider, use_auth};
