//! Login and registration forms.

use dioxus::prelude::*;
use dispatch_core::{FieldErrors, LoginForm, RegisterForm};

use super::use_auth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Register,
}

/// Message shown under the form after a submit.
#[derive(Debug, Clone, PartialEq)]
struct Feedback {
    text: String,
    ok: bool,
}

impl Feedback {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ok: true,
        }
    }

    fn err(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ok: false,
        }
    }
}

/// Sign-in page with a toggle to registration.
///
/// `on_authenticated` fires once a login succeeds, or straight away when a
/// session already exists.
#[component]
pub fn AuthPage(on_authenticated: EventHandler<()>) -> Element {
    let auth = use_auth();
    let mut mode = use_signal(|| Mode::Login);
    let mut feedback = use_signal(|| None::<Feedback>);

    use_effect(move || {
        if auth.is_authenticated() {
            on_authenticated.call(());
        }
    });

    let mut switch_to = move |next: Mode| {
        mode.set(next);
        feedback.set(None);
    };

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                h1 { "Job Dispatch" }

                div { class: "auth-tabs",
                    button {
                        class: if mode() == Mode::Login { "tab active" } else { "tab" },
                        onclick: move |_| switch_to(Mode::Login),
                        "Login"
                    }
                    button {
                        class: if mode() == Mode::Register { "tab active" } else { "tab" },
                        onclick: move |_| switch_to(Mode::Register),
                        "Register"
                    }
                }

                if let Some(fb) = feedback() {
                    div { class: if fb.ok { "success-message" } else { "error-message" }, "{fb.text}" }
                }

                {match mode() {
                    Mode::Login => rsx! {
                        LoginPanel { feedback, on_authenticated }
                    },
                    Mode::Register => rsx! {
                        RegisterPanel {
                            feedback,
                            on_registered: move |_| mode.set(Mode::Login),
                        }
                    },
                }}
            }
        }
    }
}

#[component]
fn LoginPanel(mut feedback: Signal<Option<Feedback>>, on_authenticated: EventHandler<()>) -> Element {
    let mut auth = use_auth();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut errors = use_signal(FieldErrors::default);
    let mut submitting = use_signal(|| false);

    let submit = move |_| {
        let form = LoginForm {
            email: email(),
            password: password(),
        };
        if let Err(invalid) = form.validate() {
            errors.set(invalid);
            return;
        }
        errors.set(FieldErrors::default());

        spawn(async move {
            submitting.set(true);
            feedback.set(None);

            let result = api::login_user(form).await;
            submitting.set(false);

            match result {
                Ok(response) if response.success => {
                    if auth.record_login(&response) {
                        on_authenticated.call(());
                    } else {
                        feedback.set(Some(Feedback::err("Login failed. Please try again.")));
                    }
                }
                Ok(response) => feedback.set(Some(Feedback::err(response.message))),
                Err(e) => {
                    tracing::error!("Login request failed: {}", e);
                    feedback.set(Some(Feedback::err("Login failed. Please try again.")));
                }
            }
        });
    };

    rsx! {
        div { class: "auth-form",
            FormField {
                label: "Email",
                kind: "email",
                value: email(),
                error: errors.read().first("email").map(str::to_string),
                on_input: move |v| email.set(v),
            }
            FormField {
                label: "Password",
                kind: "password",
                value: password(),
                error: errors.read().first("password").map(str::to_string),
                on_input: move |v| password.set(v),
            }
            button {
                class: "btn btn-primary",
                disabled: submitting(),
                onclick: submit,
                if submitting() { "Signing in..." } else { "Login" }
            }
        }
    }
}

#[component]
fn RegisterPanel(mut feedback: Signal<Option<Feedback>>, on_registered: EventHandler<()>) -> Element {
    let mut username = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut errors = use_signal(FieldErrors::default);
    let mut submitting = use_signal(|| false);

    let submit = move |_| {
        let form = RegisterForm {
            username: username(),
            email: email(),
            password: password(),
        };
        if let Err(invalid) = form.validate() {
            errors.set(invalid);
            return;
        }
        errors.set(FieldErrors::default());

        spawn(async move {
            submitting.set(true);
            feedback.set(None);

            let result = api::register_user(form).await;
            submitting.set(false);

            match result {
                Ok(response) if response.success => {
                    on_registered.call(());
                    feedback.set(Some(Feedback::ok(format!(
                        "{} Please log in.",
                        response.message
                    ))));
                }
                Ok(response) => feedback.set(Some(Feedback::err(response.message))),
                Err(e) => {
                    tracing::error!("Registration request failed: {}", e);
                    feedback.set(Some(Feedback::err(
                        "Registration failed. Please try again.",
                    )));
                }
            }
        });
    };

    rsx! {
        div { class: "auth-form",
            FormField {
                label: "Username",
                kind: "text",
                value: username(),
                error: errors.read().first("username").map(str::to_string),
                on_input: move |v| username.set(v),
            }
            FormField {
                label: "Email",
                kind: "email",
                value: email(),
                error: errors.read().first("email").map(str::to_string),
                on_input: move |v| email.set(v),
            }
            FormField {
                label: "Password",
                kind: "password",
                value: password(),
                error: errors.read().first("password").map(str::to_string),
                on_input: move |v| password.set(v),
            }
            button {
                class: "btn btn-primary",
                disabled: submitting(),
                onclick: submit,
                if submitting() { "Creating account..." } else { "Register" }
            }
        }
    }
}

#[component]
fn FormField(
    label: &'static str,
    kind: &'static str,
    value: String,
    error: Option<String>,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        div { class: "form-group",
            label { "{label}" }
            input {
                r#type: kind,
                class: if error.is_some() { "input-invalid" } else { "" },
                value: "{value}",
                oninput: move |e| on_input.call(e.value()),
            }
            if let Some(ref err) = error {
                span { class: "field-error", "{err}" }
            }
        }
    }
}
