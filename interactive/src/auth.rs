use bookworm_shared::session::{Session, SessionService};
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::api;
use crate::storage::LocalStore;

/// The page's one session service plus a reactive mirror of it, shared via
/// context. Every write through [`AuthState::service`] lands in `session`.
#[derive(Clone, Copy, Debug)]
pub struct AuthState {
    pub session: RwSignal<Session>,
    service: StoredValue<SessionService<LocalStore>>,
}

impl AuthState {
    /// A handle onto the shared service, for flows that write the session.
    pub fn service(&self) -> SessionService<LocalStore> {
        self.service.get_value()
    }

    /// Pick up writes made outside this page, e.g. from another tab.
    pub fn reload(&self) {
        let session = self.service().get().unwrap_or_default();
        if self.session.with_untracked(|s| *s != session) {
            self.session.set(session);
        }
    }

    pub fn token(&self) -> Option<String> {
        self.session.with_untracked(|s| s.token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.with(Session::is_authenticated)
    }
}

/// Puts an [`AuthState`] in context for everything below it.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let service = SessionService::new(LocalStore).with_policy(api::unauthorized_policy());
    let session = RwSignal::new(service.get().unwrap_or_default());
    service.subscribe(move |s| session.set(s.clone()));

    provide_context(AuthState {
        session,
        service: StoredValue::new(service),
    });

    children()
}

/// Renders its children only with a stored token; otherwise sends the user
/// back to the login screen.
#[component]
pub fn RequireSession(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthState>();
    auth.reload();

    let navigate = use_navigate();
    Effect::new(move |_| {
        if !auth.is_logged_in() {
            navigate("/", Default::default());
        }
    });

    move || auth.is_logged_in().then(|| children())
}
