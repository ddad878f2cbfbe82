//! Registration page.
//!
//! A successful sign-up that comes back with a token signs the user straight
//! in; otherwise the controller sends them to the sign-in page.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use authapp::AuthError;
use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::{AuthState, WebController, publish};

pub(crate) const MISSING_FIELDS: &str = "Enter your name, email and password.";

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub(crate) fn validate_sign_up_input(name: &str, email: &str, password: &str) -> Result<SignUpInput, &'static str> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS);
    }
    Ok(SignUpInput { name: name.to_owned(), email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let controller = expect_context::<WebController>();

    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let message = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let input = match validate_sign_up_input(&name.get(), &email.get(), &password.get()) {
            Ok(input) => input,
            Err(msg) => {
                message.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        message.set(String::new());

        let controller = controller.clone();
        leptos::task::spawn_local(async move {
            match controller.register(&input.name, &input.email, &input.password).await {
                Ok(_) => password.set(String::new()),
                Err(AuthError::Superseded) => {}
                Err(e) => message.set(e.message()),
            }
            publish(&controller, auth);
            busy.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h2>"Sign Up"</h2>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-label">
                        "Name"
                        <input
                            class="auth-input"
                            type="text"
                            required
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="auth-label">
                        "Email"
                        <input
                            class="auth-input"
                            type="email"
                            required
                            placeholder="you@example.com"
                            prop:value=move || email.get()
                            on:input=move |ev| email.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="auth-label">
                        "Password"
                        <input
                            class="auth-input"
                            type="password"
                            required
                            prop:value=move || password.get()
                            on:input=move |ev| password.set(event_target_value(&ev))
                        />
                    </label>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Sign Up" }}
                    </button>
                </form>
                <Show when=move || !message.get().is_empty()>
                    <p class="auth-message auth-message--error">{move || message.get()}</p>
                </Show>
                <p class="auth-card__footer">
                    "Already have an account? "
                    <A href="/signin">"Sign in"</A>
                </p>
            </div>
        </div>
    }
}
