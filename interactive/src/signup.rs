use bookworm_shared::auth::{self as flows, SignupForm};
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::GlooApi;
use crate::auth::{AuthState};
use crate::widgets::{alert, report};

#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let form = RwSignal::new(SignupForm::default());
    let submitting = RwSignal::new(false);
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let form = form.get_untracked();
        submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            let mut session = auth.service();
            match flows::signup(&GlooApi, &mut session, &form).await {
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
            <h1>"Create Account"</h1>
            <form class="bookworm-form" on:submit=on_submit>
                <label>"Username"</label>
                <input
                    type="text"
                    placeholder="johndoe"
                    prop:value=move || form.with(|f| f.username.clone())
                    on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                />
                <label>"Email"</label>
                <input
                    type="email"
                    placeholder="johndoe@gmail.com"
                    prop:value=move || form.with(|f| f.email.clone())
                    on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                />
                <label>"Phone number"</label>
                <input
                    type="tel"
                    placeholder="Enter your phone number"
                    prop:value=move || form.with(|f| f.phonenumber.clone())
                    on:input=move |ev| form.update(|f| f.phonenumber = event_target_value(&ev))
                />
                <button class="bookworm-btn" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Creating account..." } else { "Sign Up" }}
                </button>
            </form>
            <p>"Already have an account? " <a href="/">"Login"</a></p>
        </section>
    }
}
