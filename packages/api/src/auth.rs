//! Login and registration server functions.

use dioxus::prelude::*;
use dispatch_core::{AuthResponse, LoginForm, RegisterForm};

/// Sign in against the user-account API.
///
/// Rejections come back as `success: false` with a message for the user,
/// not as errors.
#[post("/api/auth/login")]
pub async fn login_user(form: LoginForm) -> Result<AuthResponse, ServerFnError> {
    if let Err(errors) = form.validate() {
        return Ok(AuthResponse::failure(errors.to_string()));
    }

    #[cfg(feature = "server")]
    {
        let upstreams = gateway::upstreams().map_err(|e| ServerFnError::new(e.to_string()))?;
        Ok(upstreams.auth.login(&form).await)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Create an account through the user-account API.
#[post("/api/auth/register")]
pub async fn register_user(form: RegisterForm) -> Result<AuthResponse, ServerFnError> {
    if let Err(errors) = form.validate() {
        return Ok(AuthResponse::failure(errors.to_string()));
    }

    #[cfg(feature = "server")]
    {
        let upstreams = gateway::upstreams().map_err(|e| ServerFnError::new(e.to_string()))?;
        Ok(upstreams.auth.register(&form).await)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}
