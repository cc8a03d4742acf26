use dioxus::prelude::*;
use dioxus_router::Link;
use study_core::model::{ContentId, MaterialKind};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ContentCardVm, ContentFilterVm, map_content_cards};

#[component]
pub fn ContentsView() -> Element {
    let ctx = use_context::<AppContext>();
    let library = ctx.library();
    let mut filter = use_signal(ContentFilterVm::default);
    let mut action_error = use_signal(|| None::<ViewError>);

    let resource = {
        let library = library.clone();
        use_resource(move || {
            let library = library.clone();
            let query = filter.read().to_query();
            async move {
                let contents = library
                    .list_contents(&query)
                    .await
                    .map_err(|err| ViewError::from(&err))?;
                Ok::<_, ViewError>(map_content_cards(&contents))
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let on_delete = use_callback(move |id: String| {
        let library = library.clone();
        spawn(async move {
            let Ok(id) = ContentId::new(id) else {
                action_error.set(Some(ViewError::NotFound));
                return;
            };
            let result = library.delete_content(&id).await;
            action_error.set(result.err().map(|err| ViewError::from(&err)));
            let mut resource = resource;
            resource.restart();
        });
    });
    let on_open = {
        let opener = ctx.link_opener();
        use_callback(move |url: String| opener.open_url(&url))
    };

    rsx! {
        div { class: "page contents",
            div { class: "page__header",
                h2 { "Your content" }
                Link { class: "btn", to: Route::Upload {}, "Upload" }
            }

            div { class: "filters",
                input {
                    r#type: "search",
                    placeholder: "Search content",
                    value: "{filter.read().search}",
                    oninput: move |evt| filter.write().search = evt.value(),
                }
                select {
                    value: "{filter.read().kind}",
                    onchange: move |evt| filter.write().kind = evt.value(),
                    option { value: "", "All sources" }
                    option { value: "pdf", "PDF" }
                    option { value: "url", "Web page" }
                    option { value: "youtube", "YouTube" }
                }
                select {
                    value: "{filter.read().status}",
                    onchange: move |evt| filter.write().status = evt.value(),
                    option { value: "", "Any status" }
                    option { value: "pending", "Pending" }
                    option { value: "processing", "Processing" }
                    option { value: "completed", "Ready" }
                    option { value: "failed", "Failed" }
                }
            }
            if let Some(err) = action_error() {
                p { class: "form-error", "{err.message()}" }
            }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        div { class: "empty",
                            p { "Nothing uploaded yet." }
                            Link { class: "btn", to: Route::Upload {}, "Upload your first document" }
                        }
                    } else {
                        ul { class: "contents__list",
                            for card in cards {
                                ContentCard {
                                    key: "{card.id}",
                                    card: card,
                                    on_delete: on_delete,
                                    on_open: on_open,
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[component]
fn ContentCard(
    card: ContentCardVm,
    on_delete: EventHandler<String>,
    on_open: EventHandler<String>,
) -> Element {
    let delete_id = card.id.clone();
    let source = card.source_url.clone();

    rsx! {
        li { class: "content-card",
            div { class: "content-card__body",
                h3 {
                    Link { to: Route::ContentDetail { id: card.id.clone() }, "{card.title}" }
                }
                p { class: "content-card__meta",
                    "{card.kind_label} · {card.created_at_str} "
                    span { class: "{card.status_class}", "{card.status_label}" }
                }
            }
            div { class: "content-card__actions",
                if card.ready {
                    for kind in MaterialKind::ALL {
                        Link {
                            class: "btn btn-secondary",
                            to: Route::Generate { content_id: card.id.clone(), kind: kind.as_str().to_string() },
                            "{kind.label()}"
                        }
                    }
                }
                if let Some(url) = source {
                    button {
                        class: "btn btn-ghost",
                        r#type: "button",
                        onclick: move |_| on_open.call(url.clone()),
                        "Open source"
                    }
                }
                button {
                    class: "btn btn-danger",
                    r#type: "button",
                    onclick: move |_| on_delete.call(delete_id.clone()),
                    "Delete"
                }
            }
        }
    }
}
