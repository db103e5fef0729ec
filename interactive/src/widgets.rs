use bookworm_shared::format::star_bar;
use bookworm_shared::ClientError;
use leptos::prelude::*;
use web_sys::window;

use crate::auth::AuthState;

pub fn alert(message: &str) {
    if let Some(w) = window() {
        let _ = w.alert_with_message(message);
    }
}

pub fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Surface a failed flow, applying the unauthorized policy first.
pub fn report(auth: &AuthState, err: &ClientError) {
    if err.is_auth_failure() {
        // A cleared session reaches the guard through the subscription
        let _ = auth.service().handle_error(err);
    }
    alert(&err.user_message());
}

#[component]
pub fn Stars(rating: u8) -> impl IntoView {
    view! {
        <span class="bookworm-stars" title={format!("{rating} / 5")}>{star_bar(rating)}</span>
    }
}

/// Bottom navigation between the signed-in screens.
#[component]
pub fn TabBar() -> impl IntoView {
    view! {
        <nav class="bookworm-tabs">
            <a href="/home">"Home"</a>
            <a href="/create">"Add Books"</a>
            <a href="/profile">"Profile"</a>
        </nav>
    }
}
