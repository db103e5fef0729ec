use bookworm_shared::auth as flows;
use bookworm_shared::delete::PendingDeletes;
use bookworm_shared::format::format_short_date;
use bookworm_shared::shelf::Recommendations;
use bookworm_shared::{BookApi, Recommendation};
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::spawn_local;

use crate::api::GlooApi;
use crate::auth::{AuthState, RequireSession};
use crate::widgets::{alert, confirm, report, Stars, TabBar};

#[component]
pub fn ProfilePage() -> impl IntoView {
    view! {
        <RequireSession>
            <Profile />
            <TabBar />
        </RequireSession>
    }
}

/// The signed-in user's details and their own recommendations.
#[component]
fn Profile() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let shelf = RwSignal::new(Recommendations::new());
    let pending = RwSignal::new(PendingDeletes::new());
    let loading = RwSignal::new(false);
    let navigate = use_navigate();

    let fetch = move || {
        let Some(token) = auth.token() else {
            return;
        };
        if loading.get_untracked() {
            return;
        }
        loading.set(true);
        spawn_local(async move {
            match flows::user_books(&GlooApi, &token).await {
                Ok(books) => shelf.update(|s| s.replace_all(books)),
                Err(e) => report(&auth, &e),
            }
            loading.set(false);
        });
    };

    fetch();

    let on_logout = move |_| {
        if !confirm("Are you sure you want to logout?") {
            return;
        }
        let navigate = navigate.clone();
        spawn_local(async move {
            let mut session = auth.service();
            match flows::logout(&GlooApi, &mut session).await {
                Ok(()) => {
                    navigate("/", Default::default());
                }
                Err(e) => report(&auth, &e),
            }
        });
    };

    let username = move || auth.session.with(|s| s.username.clone().unwrap_or_default());
    let email = move || auth.session.with(|s| s.email.clone().unwrap_or_default());

    view! {
        <section class="bookworm-profile">
            <header class="bookworm-profile-header">
                <h1>{username}</h1>
                <p>{email}</p>
                <button class="bookworm-btn-small" on:click=on_logout>"Logout"</button>
            </header>
            <div class="bookworm-shelf-header">
                <h2>"Your Recommendations"</h2>
                <span>{move || format!("{} books", shelf.with(Recommendations::len))}</span>
                <button
                    class="bookworm-btn-small"
                    disabled=move || loading.get()
                    on:click=move |_| fetch()
                >
                    "Refresh"
                </button>
            </div>
            <Show when=move || loading.get()>
                <p class="bookworm-loading">"Loading..."</p>
            </Show>
            <Show when=move || !loading.get() && shelf.with(Recommendations::is_empty)>
                <p class="bookworm-empty">"No recommendations yet"</p>
                <a class="bookworm-btn" href="/create">"Add Your First Book"</a>
            </Show>
            <div class="bookworm-list">
                <For each=move || shelf.with(Recommendations::to_vec) key=|b| b.id.clone() let:book>
                    <ShelfItem book=book shelf=shelf pending=pending />
                </For>
            </div>
        </section>
    }
}

#[component]
fn ShelfItem(
    book: Recommendation,
    shelf: RwSignal<Recommendations>,
    pending: RwSignal<PendingDeletes>,
) -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let id = book.id.clone();
    let deleting = {
        let id = id.clone();
        move || pending.with(|p| p.is_pending(&id))
    };

    let on_delete = move |_| {
        if !confirm("Are you sure you want to delete this recommendation?") {
            return;
        }
        let Some(token) = auth.token() else {
            return;
        };
        let Some(ticket) = pending.try_update(|p| p.begin(&id)).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = GlooApi.delete_book(&token, ticket.id()).await;
            let Some(mut list) = shelf.try_get_untracked() else {
                return;
            };
            // Signals are gone once the user has left the profile screen
            match pending.try_update(|p| p.finish(ticket, &mut list, result)) {
                Some(Ok(())) => {
                    shelf.set(list);
                    alert("Recommendation deleted successfully");
                }
                Some(Err(e)) => report(&auth, &e),
                None => {}
            }
        });
    };

    let deleting_label = deleting.clone();
    view! {
        <article class="bookworm-shelf-item">
            <img class="bookworm-thumb" src={book.image_url.clone()} alt={book.name.clone()} />
            <div class="bookworm-shelf-info">
                <h3>{book.name.clone()}</h3>
                <Stars rating=book.ratings />
                <p>{book.caption.clone()}</p>
                <p class="bookworm-date">{format_short_date(&book.created_at)}</p>
            </div>
            <button
                class="bookworm-btn-danger"
                disabled=deleting.clone()
                on:click=on_delete
            >
                {move || if deleting_label() { "Deleting..." } else { "Delete" }}
            </button>
        </article>
    }
}
