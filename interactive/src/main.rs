mod api;
mod auth;
mod create;
mod home;
mod login;
mod profile;
mod signup;
mod storage;
mod verify;
mod widgets;

use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use wasm_bindgen::JsCast;

#[component]
fn App() -> impl IntoView {
    view! {
        <auth::AuthProvider>
            <Router>
                <main class="bookworm-app">
                    <Routes fallback=|| view! { <p>"Page not found."</p> }>
                        <Route path=path!("/") view=login::LoginPage />
                        <Route path=path!("/signup") view=signup::SignupPage />
                        <Route path=path!("/verify") view=verify::VerifyPage />
                        <Route path=path!("/home") view=home::HomePage />
                        <Route path=path!("/create") view=create::CreatePage />
                        <Route path=path!("/profile") view=profile::ProfilePage />
                    </Routes>
                </main>
            </Router>
        </auth::AuthProvider>
    }
}

fn main() {
    console_error_panic_hook::set_once();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    // Mount into #bookworm-app when the page provides it
    match document.get_element_by_id("bookworm-app") {
        Some(el) => {
            let html_el: web_sys::HtmlElement = el.unchecked_into();
            leptos::mount::mount_to(html_el, App).forget();
        }
        None => leptos::mount::mount_to_body(App),
    }
}
