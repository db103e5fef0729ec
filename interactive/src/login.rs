use bookworm_shared::auth::{self as flows, LoginForm};
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::GlooApi;
use crate::auth::{AuthState};
use crate::widgets::{alert, report};

/// Login by phone number or email. The server answers with a one-time code.
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let email = RwSignal::new(String::new());
    let phone = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);
    let navigate = use_navigate();

    // Already signed in: go straight to the feed
    {
        let navigate = navigate.clone();
        Effect::new(move |_| {
            if auth.is_logged_in() {
                navigate("/home", Default::default());
            }
        });
    }

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let form = LoginForm {
            email: email.get_untracked(),
            phonenumber: phone.get_untracked(),
        };
        submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            let mut session = auth.service();
            match flows::login(&GlooApi, &mut session, &form).await {
                Ok(challenge) => {
                    alert(&format!("Code- {}", challenge.otp));
                    navigate("/verify", Default::default());
                }
                Err(e) => report(&auth, &e),
            }
            submitting.set(false);
        });
    };

    view! {
        <section class="bookworm-auth">
            <h1>"BookWorm"</h1>
            <p class="bookworm-hint">"Share your favorite reads"</p>
            <form class="bookworm-form" on:submit=on_submit>
                <label>"Phone number"</label>
                <input
                    type="tel"
                    placeholder="Enter your phone number"
                    prop:value=move || phone.get()
                    on:input=move |ev| phone.set(event_target_value(&ev))
                />
                <p class="bookworm-divider">"or"</p>
                <label>"Email"</label>
                <input
                    type="email"
                    placeholder="Enter your email"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <button class="bookworm-btn" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Sending code..." } else { "Login" }}
                </button>
            </form>
            <p>"Don't have an account? " <a href="/signup">"Sign Up"</a></p>
        </section>
    }
}
