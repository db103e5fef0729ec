use bookworm_shared::auth as flows;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::GlooApi;
use crate::auth::{AuthState};
use crate::widgets::report;

/// Exchange the code for a token. The phone number comes from the session
/// written by login or signup.
#[component]
pub fn VerifyPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let code = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);
    let navigate = use_navigate();

    let phone = move || {
        auth.session
            .with(|s| s.phonenumber.clone())
            .unwrap_or_default()
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let code = code.get_untracked();
        submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            let mut session = auth.service();
            match flows::verify(&GlooApi, &mut session, &code).await {
                Ok(_) => {
                    navigate("/home", Default::default());
                }
                Err(e) => report(&auth, &e),
            }
            submitting.set(false);
        });
    };

    view! {
        <section class="bookworm-auth">
            <h1>"Verify"</h1>
            <p class="bookworm-hint">"Enter the code sent to " {phone}</p>
            <form class="bookworm-form" on:submit=on_submit>
                <input
                    type="text"
                    inputmode="numeric"
                    placeholder="Code"
                    prop:value=move || code.get()
                    on:input=move |ev| code.set(event_target_value(&ev))
                />
                <button class="bookworm-btn" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Verifying..." } else { "Verify" }}
                </button>
            </form>
        </section>
    }
}
