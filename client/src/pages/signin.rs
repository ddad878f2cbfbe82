//! Sign-in page with email + password.

#[cfg(test)]
#[path = "signin_test.rs"]
mod signin_test;

use authapp::AuthError;
use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::{AuthState, WebController, publish};

pub(crate) const MISSING_CREDENTIALS: &str = "Enter both email and password.";

/// Trim the email and require both fields. The password is sent verbatim.
pub(crate) fn validate_sign_in_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(MISSING_CREDENTIALS);
    }
    Ok((email.to_owned(), password.to_owned()))
}

#[component]
pub fn SignInPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let controller = expect_context::<WebController>();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let message = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_sign_in_input(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(msg) => {
                message.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        message.set(String::new());

        let controller = controller.clone();
        leptos::task::spawn_local(async move {
            match controller.login(&email_value, &password_value).await {
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
                <h2>"Sign In"</h2>
                <form class="auth-form" on:submit=on_submit>
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
                        {move || if busy.get() { "Signing in..." } else { "Sign In" }}
                    </button>
                </form>
                <Show when=move || !message.get().is_empty()>
                    <p class="auth-message auth-message--error">{move || message.get()}</p>
                </Show>
                <p class="auth-card__footer">
                    "Don't have an account? "
                    <A href="/signup">"Sign up"</A>
                </p>
            </div>
        </div>
    }
}
