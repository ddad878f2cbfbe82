//! Root application component with routing and context providers.

use authapp::{AuthClient, Route as AppRoute, SessionController};
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    NavigateOptions, StaticSegment,
    components::{Redirect, Route, Router, Routes},
    hooks::use_navigate,
};

use crate::components::{nav_bar::NavBar, protected::Protected};
use crate::net::transport::{BrowserTransport, api_config};
use crate::pages::{dashboard::DashboardPage, signin::SignInPage, signup::SignUpPage};
use crate::state::auth::{AuthState, SignalNavigator, WebController, publish};
use crate::util::storage::LocalStorage;

/// Root application component.
///
/// Builds the one session controller for this page, provides it and the
/// reactive [`AuthState`] mirror as context, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let navigator = SignalNavigator::new();
    let client = AuthClient::new(BrowserTransport::new(api_config()), LocalStorage);
    let controller: WebController = SessionController::new(client, navigator);
    let auth = RwSignal::new(AuthState::from(controller.snapshot()));

    provide_context(controller.clone());
    provide_context(auth);

    // Startup session check, once mounted.
    Effect::new(move || {
        controller.initialize();
        publish(&controller, auth);
    });

    view! {
        <Title text="AuthApp"/>

        <Router>
            <NavigationBridge pending=navigator.pending()/>
            <NavBar/>
            <main class="app-main">
                <Routes fallback=|| view! { <Redirect path="/"/> }>
                    <Route path=StaticSegment("") view=ProtectedDashboard/>
                    <Route path=StaticSegment("dashboard") view=ProtectedDashboard/>
                    <Route path=StaticSegment("signin") view=SignInPage/>
                    <Route path=StaticSegment("signup") view=SignUpPage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn ProtectedDashboard() -> impl IntoView {
    view! {
        <Protected>
            <DashboardPage/>
        </Protected>
    }
}

/// Performs navigation the controller requested through [`SignalNavigator`].
#[component]
fn NavigationBridge(pending: RwSignal<Option<AppRoute>>) -> impl IntoView {
    let navigate = use_navigate();
    Effect::new(move || {
        if let Some(route) = pending.get() {
            pending.set(None);
            navigate(route.path(), NavigateOptions::default());
        }
    });
}
