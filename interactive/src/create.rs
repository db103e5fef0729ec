use bookworm_shared::draft::{self, Draft, ImageAttachment, MAX_RATING};
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{File, HtmlInputElement, Url};

use crate::api::GlooApi;
use crate::auth::{AuthState, RequireSession};
use crate::widgets::{alert, report, TabBar};

#[component]
pub fn CreatePage() -> impl IntoView {
    view! {
        <RequireSession>
            <ComposeForm />
            <TabBar />
        </RequireSession>
    }
}

async fn read_file(file: &File) -> Option<Vec<u8>> {
    let buf = JsFuture::from(file.array_buffer()).await.ok()?;
    Some(js_sys::Uint8Array::new(&buf).to_vec())
}

/// New recommendation form: title, caption, star rating and a cover image.
#[component]
fn ComposeForm() -> impl IntoView {
    let auth = expect_context::<AuthState>();
    let draft = RwSignal::new(Draft::new());
    let preview: RwSignal<Option<String>> = RwSignal::new(None);
    let submitting = RwSignal::new(false);
    let navigate = use_navigate();

    let on_pick = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        spawn_local(async move {
            let Some(bytes) = read_file(&file).await else {
                alert("Could not read the selected image");
                return;
            };
            let attachment = ImageAttachment::from_file_name(&file.name(), bytes);
            draft.update(|d| d.image = Some(attachment));
            if let Some(url) = preview.get_untracked() {
                let _ = Url::revoke_object_url(&url);
            }
            preview.set(Url::create_object_url_with_blob(&file).ok());
        });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let Some(token) = auth.token() else {
            return;
        };
        let mut pending = draft.get_untracked();
        submitting.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match draft::submit(&GlooApi, &token, &mut pending).await {
                Ok(_) => {
                    draft.set(pending);
                    if let Some(url) = preview.get_untracked() {
                        let _ = Url::revoke_object_url(&url);
                    }
                    preview.set(None);
                    alert("Your Book recommendation has been posted");
                    navigate("/home", Default::default());
                }
                Err(e) => report(&auth, &e),
            }
            submitting.set(false);
        });
    };

    let stars = move || {
        (1..=MAX_RATING)
            .map(|n| {
                let filled = move || draft.with(|d| d.rating >= n);
                view! {
                    <button
                        type="button"
                        class="bookworm-star"
                        class:filled=filled
                        on:click=move |_| draft.update(|d| d.rating = n)
                    >
                        {move || if filled() { "★" } else { "☆" }}
                    </button>
                }
            })
            .collect_view()
    };

    view! {
        <section class="bookworm-create">
            <h1>"Add Book Recommendation"</h1>
            <p class="bookworm-hint">"Share your favorite reads with others"</p>
            <form class="bookworm-form" on:submit=on_submit>
                <label>"Book Title"</label>
                <input
                    type="text"
                    placeholder="Enter book title"
                    prop:value=move || draft.with(|d| d.title.clone())
                    on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
                />
                <label>"Your Rating"</label>
                <div class="bookworm-rating">{stars}</div>
                <label>"Book Image"</label>
                <input type="file" accept="image/*" on:change=on_pick />
                <Show when=move || preview.with(Option::is_some)>
                    <img class="bookworm-preview" src=move || preview.get() alt="Selected cover" />
                </Show>
                <label>"Caption"</label>
                <textarea
                    placeholder="Write your review or thoughts about this book..."
                    prop:value=move || draft.with(|d| d.caption.clone())
                    on:input=move |ev| draft.update(|d| d.caption = event_target_value(&ev))
                />
                <button class="bookworm-btn" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Sharing..." } else { "Share" }}
                </button>
            </form>
        </section>
    }
}
