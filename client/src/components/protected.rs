//! Route wrapper applying the session guard.

use authapp::{GuardDecision, guard};
use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::state::auth::AuthState;

/// Renders `children` only for a signed-in user.
///
/// While the startup check is still running nothing is rendered at all, so
/// neither the protected view nor the sign-in redirect flashes on reload.
#[component]
pub fn Protected(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let decision = Memo::new(move |_| guard(&auth.get().status));

    move || match decision.get() {
        GuardDecision::Defer => ().into_any(),
        GuardDecision::Render => children().into_any(),
        GuardDecision::Redirect(route) => view! { <Redirect path=route.path()/> }.into_any(),
    }
}
