//! Dashboard page: profile overview, profile edit, password change, logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route and only mounts under `Protected`.
//! Every server call goes through the controller, so a 401 from a stale token
//! signs the user out and the controller routes back to sign-in.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use authapp::{ProfilePatch, UserProfile, UserSession};
use leptos::prelude::*;

use crate::state::auth::{AuthState, WebController, publish};

pub(crate) const NOTHING_TO_UPDATE: &str = "Nothing to update.";
pub(crate) const MISSING_PASSWORDS: &str = "Fill in every password field.";
pub(crate) const PASSWORD_MISMATCH: &str = "New passwords do not match.";
pub(crate) const PASSWORD_UNCHANGED: &str = "New password must differ from the current one.";

/// Build a patch holding only the fields that actually change.
pub(crate) fn profile_patch(current: Option<&UserSession>, name: &str, email: &str) -> Result<ProfilePatch, &'static str> {
    let changed = |input: &str, existing: Option<&str>| {
        let input = input.trim();
        (!input.is_empty() && Some(input) != existing).then(|| input.to_owned())
    };
    let patch = ProfilePatch {
        name: changed(name, current.and_then(|user| user.name.as_deref())),
        email: changed(email, current.and_then(|user| user.email.as_deref())),
    };
    if patch.is_empty() { Err(NOTHING_TO_UPDATE) } else { Ok(patch) }
}

pub(crate) fn validate_password_change(
    current: &str,
    new_password: &str,
    confirm: &str,
) -> Result<(String, String), &'static str> {
    if current.is_empty() || new_password.is_empty() || confirm.is_empty() {
        return Err(MISSING_PASSWORDS);
    }
    if new_password != confirm {
        return Err(PASSWORD_MISMATCH);
    }
    if new_password == current {
        return Err(PASSWORD_UNCHANGED);
    }
    Ok((current.to_owned(), new_password.to_owned()))
}

fn field_or_placeholder(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("Not provided").to_owned()
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let controller = expect_context::<WebController>();

    let profile = RwSignal::new(None::<UserProfile>);
    let profile_error = RwSignal::new(String::new());

    let load_controller = controller.clone();
    Effect::new(move || {
        let controller = load_controller.clone();
        leptos::task::spawn_local(async move {
            match controller.get_profile().await {
                Ok(loaded) => profile.set(Some(loaded)),
                Err(e) => profile_error.set(e.message()),
            }
            publish(&controller, auth);
        });
    });

    // Profile edit form.
    let edit_name = RwSignal::new(String::new());
    let edit_email = RwSignal::new(String::new());
    let edit_message = RwSignal::new(String::new());
    let edit_busy = RwSignal::new(false);

    let update_controller = controller.clone();
    let on_update = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if edit_busy.get() {
            return;
        }
        let patch = match profile_patch(auth.get().user(), &edit_name.get(), &edit_email.get()) {
            Ok(patch) => patch,
            Err(msg) => {
                edit_message.set(msg.to_owned());
                return;
            }
        };
        edit_busy.set(true);
        edit_message.set(String::new());

        let controller = update_controller.clone();
        leptos::task::spawn_local(async move {
            match controller.update_profile(&patch).await {
                Ok(session) => {
                    profile.update(|p| {
                        if let Some(p) = p {
                            p.name.clone_from(&session.name);
                            p.email.clone_from(&session.email);
                        }
                    });
                    edit_name.set(String::new());
                    edit_email.set(String::new());
                    edit_message.set("Profile updated.".to_owned());
                }
                Err(e) => edit_message.set(e.message()),
            }
            publish(&controller, auth);
            edit_busy.set(false);
        });
    };

    // Password change form.
    let current_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let password_message = RwSignal::new(String::new());
    let password_busy = RwSignal::new(false);

    let password_controller = controller.clone();
    let on_change_password = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if password_busy.get() {
            return;
        }
        let (current, next) =
            match validate_password_change(&current_password.get(), &new_password.get(), &confirm_password.get()) {
                Ok(values) => values,
                Err(msg) => {
                    password_message.set(msg.to_owned());
                    return;
                }
            };
        password_busy.set(true);
        password_message.set(String::new());

        let controller = password_controller.clone();
        leptos::task::spawn_local(async move {
            match controller.change_password(&current, &next).await {
                Ok(()) => {
                    current_password.set(String::new());
                    new_password.set(String::new());
                    confirm_password.set(String::new());
                    password_message.set("Password changed.".to_owned());
                }
                Err(e) => password_message.set(e.message()),
            }
            publish(&controller, auth);
            password_busy.set(false);
        });
    };

    let logout_controller = controller;
    let on_logout = move |_| {
        let controller = logout_controller.clone();
        leptos::task::spawn_local(async move {
            if let Err(e) = controller.logout().await {
                tracing::warn!(error = %e, "logout did not complete cleanly");
            }
            publish(&controller, auth);
        });
    };

    let greeting = move || auth.get().display_name().unwrap_or_default();
    let shown_name = move || {
        profile
            .get()
            .and_then(|p| p.name)
            .or_else(|| auth.get().user().and_then(|u| u.name.clone()))
    };
    let shown_email = move || {
        profile
            .get()
            .and_then(|p| p.email)
            .or_else(|| auth.get().user().and_then(|u| u.email.clone()))
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <h1>"Dashboard"</h1>
                <span class="dashboard-header__welcome">"Welcome, " {greeting}</span>
                <button class="dashboard-header__logout" on:click=on_logout>
                    "Logout"
                </button>
            </header>

            <section class="dashboard-card">
                <h3>"Profile Information"</h3>
                <p>
                    <span class="dashboard-card__label">"Name: "</span>
                    {move || field_or_placeholder(shown_name().as_deref())}
                </p>
                <p>
                    <span class="dashboard-card__label">"Email: "</span>
                    {move || field_or_placeholder(shown_email().as_deref())}
                </p>
                <Show when=move || !profile_error.get().is_empty()>
                    <p class="auth-message auth-message--error">{move || profile_error.get()}</p>
                </Show>
            </section>

            <section class="dashboard-card">
                <h3>"Edit Profile"</h3>
                <form class="auth-form" on:submit=on_update>
                    <input
                        class="auth-input"
                        type="text"
                        placeholder="New name"
                        prop:value=move || edit_name.get()
                        on:input=move |ev| edit_name.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="New email"
                        prop:value=move || edit_email.get()
                        on:input=move |ev| edit_email.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || edit_busy.get()>
                        "Save"
                    </button>
                </form>
                <Show when=move || !edit_message.get().is_empty()>
                    <p class="auth-message">{move || edit_message.get()}</p>
                </Show>
            </section>

            <section class="dashboard-card">
                <h3>"Change Password"</h3>
                <form class="auth-form" on:submit=on_change_password>
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Current password"
                        prop:value=move || current_password.get()
                        on:input=move |ev| current_password.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="New password"
                        prop:value=move || new_password.get()
                        on:input=move |ev| new_password.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="Confirm new password"
                        prop:value=move || confirm_password.get()
                        on:input=move |ev| confirm_password.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || password_busy.get()>
                        "Change Password"
                    </button>
                </form>
                <Show when=move || !password_message.get().is_empty()>
                    <p class="auth-message">{move || password_message.get()}</p>
                </Show>
            </section>
        </div>
    }
}
