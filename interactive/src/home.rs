use bookworm_shared::feed::{FeedPaginator, LoadMode};
use bookworm_shared::format::format_publish_date;
use bookworm_shared::{BookApi, Recommendation};
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::GlooApi;
use crate::auth::{AuthState, RequireSession};
use crate::widgets::{report, Stars, TabBar};

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <RequireSession>
            <Feed />
            <TabBar />
        </RequireSession>
    }
}

/// Paginated feed of everyone's recommendations.
#[component]
fn Feed() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let feed = RwSignal::new(FeedPaginator::default());

    let load = move |mode: LoadMode| {
        let Some(token) = auth.token() else {
            return;
        };
        let Some(request) = feed.try_update(|f| f.begin(mode)).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = GlooApi
                .list_books(&token, request.page, request.limit)
                .await;
            if let Some(Err(e)) = feed.try_update(|f| f.complete(request, result)) {
                report(&auth, &e);
            }
        });
    };

    // A different (or no) token invalidates whatever the feed holds
    Effect::new(move |prev: Option<Option<String>>| {
        let token = auth.session.with(|s| s.token.clone());
        if prev.is_some_and(|prev| prev != token) {
            feed.update(FeedPaginator::reset);
            if token.is_some() {
                load(LoadMode::Initial);
            }
        }
        token
    });

    load(LoadMode::Initial);

    let items = move || feed.with(|f| f.items().to_vec());
    let is_empty = move || feed.with(|f| f.items().is_empty() && !f.is_busy());

    view! {
        <section class="bookworm-feed">
            <header class="bookworm-feed-header">
                <h1>"BookWorm"</h1>
                <p class="bookworm-hint">"Discover great reads from the community"</p>
                <button
                    class="bookworm-btn-small"
                    disabled=move || feed.with(FeedPaginator::is_busy)
                    on:click=move |_| load(LoadMode::Refresh)
                >
                    {move || if feed.with(FeedPaginator::is_refreshing) { "Refreshing..." } else { "Refresh" }}
                </button>
            </header>
            <Show when=is_empty>
                <p class="bookworm-empty">"No recommendations yet"</p>
            </Show>
            <div class="bookworm-list">
                <For each=items key=|b| b.id.clone() let:book>
                    <BookCard book=book />
                </For>
            </div>
            <Show when=move || feed.with(FeedPaginator::is_loading)>
                <p class="bookworm-loading">"Loading..."</p>
            </Show>
            <Show when=move || feed.with(|f| f.has_more() && !f.is_busy() && !f.items().is_empty())>
                <button class="bookworm-btn" on:click=move |_| load(LoadMode::Append)>
                    "Load more"
                </button>
            </Show>
        </section>
    }
}

#[component]
fn BookCard(book: Recommendation) -> impl IntoView {
    view! {
        <article class="bookworm-card">
            <header class="bookworm-card-header">
                <strong>{book.username.clone()}</strong>
            </header>
            <img class="bookworm-cover" src={book.image_url.clone()} alt={book.name.clone()} />
            <h2>{book.name.clone()}</h2>
            <Stars rating=book.ratings />
            <p>{book.caption.clone()}</p>
            <p class="bookworm-date">"Shared on " {format_publish_date(&book.created_at)}</p>
        </article>
    }
}
