//! Top navigation bar.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::{AuthState, WebController, publish};

/// Sign-in/sign-up links for visitors; dashboard link and logout once signed in.
#[component]
pub fn NavBar() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let controller = expect_context::<WebController>();
    let busy = RwSignal::new(false);

    let on_logout = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        let controller = controller.clone();
        leptos::task::spawn_local(async move {
            if let Err(e) = controller.logout().await {
                tracing::warn!(error = %e, "logout did not complete cleanly");
            }
            publish(&controller, auth);
            busy.set(false);
        });
    };

    view! {
        <nav class="nav-bar">
            <A href="/" attr:class="nav-bar__brand">"AuthApp"</A>
            <div class="nav-bar__links">
                <Show
                    when=move || auth.get().user().is_some()
                    fallback=|| {
                        view! {
                            <A href="/signin" attr:class="nav-bar__link">"Sign In"</A>
                            <A href="/signup" attr:class="nav-bar__link nav-bar__link--primary">"Sign Up"</A>
                        }
                    }
                >
                    <A href="/" attr:class="nav-bar__link">"Dashboard"</A>
                    <button class="nav-bar__logout" on:click=on_logout.clone() disabled=move || busy.get()>
                        "Logout"
                    </button>
                </Show>
            </div>
        </nav>
    }
}
