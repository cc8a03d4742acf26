use std::collections::BTreeSet;

use dioxus::prelude::*;
use dioxus_router::Link;
use study_core::model::{MaterialId, MaterialKind};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{LibraryFilterVm, MaterialCardVm, map_material_cards, stats_rows};

#[derive(Clone, Debug, PartialEq)]
struct LibraryData {
    cards: Vec<MaterialCardVm>,
    total: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct FilterOptions {
    folders: Vec<String>,
    tags: Vec<String>,
    stats: Vec<(&'static str, usize)>,
}

#[must_use]
pub fn study_route(card: &MaterialCardVm) -> Option<Route> {
    let id = card.id.clone();
    match card.kind {
        MaterialKind::Flashcard => Some(Route::Flashcards { id }),
        MaterialKind::Quiz => Some(Route::Quiz { id }),
        MaterialKind::Summary => Some(Route::Summary { id }),
        MaterialKind::Concepts => None,
    }
}

#[component]
pub fn LibraryView() -> Element {
    let ctx = use_context::<AppContext>();
    let library = ctx.library();
    let mut filter = use_signal(LibraryFilterVm::default);
    let mut selected = use_signal(BTreeSet::<String>::new);
    let mut action_error = use_signal(|| None::<ViewError>);

    let resource = {
        let library = library.clone();
        use_resource(move || {
            let library = library.clone();
            let query = filter.read().to_query();
            async move {
                let page = library
                    .list_materials(&query)
                    .await
                    .map_err(|err| ViewError::from(&err))?;
                Ok::<_, ViewError>(LibraryData {
                    cards: map_material_cards(&page.materials),
                    total: page.pagination.total,
                })
            }
        })
    };

    let options_resource = {
        let library = library.clone();
        use_resource(move || {
            let library = library.clone();
            async move {
                // Sidebar extras are best-effort; the list itself reports errors.
                let folders = library.folders().await.unwrap_or_default();
                let tags = library.tags().await.unwrap_or_default();
                let stats = library
                    .stats()
                    .await
                    .map(|stats| stats_rows(&stats))
                    .unwrap_or_default();
                FilterOptions {
                    folders,
                    tags,
                    stats,
                }
            }
        })
    };

    let state = view_state_from_resource(&resource);
    let options = options_resource
        .value()
        .read()
        .as_ref()
        .cloned()
        .unwrap_or_default();
    let selected_count = selected.read().len();

    let on_delete_selected = {
        let library = library.clone();
        move |_: MouseEvent| {
            let library = library.clone();
            let ids: Vec<MaterialId> = selected
                .read()
                .iter()
                .filter_map(|id| MaterialId::new(id.as_str()).ok())
                .collect();
            spawn(async move {
                let result = library.bulk_delete(&ids).await;
                action_error.set(result.err().map(|err| ViewError::from(&err)));
                selected.write().clear();
                let mut resource = resource;
                let mut options_resource = options_resource;
                resource.restart();
                options_resource.restart();
            });
        }
    };

    rsx! {
        div { class: "page library",
            h2 { "Study materials" }

            if !options.stats.is_empty() {
                ul { class: "stats",
                    for (label, count) in options.stats.iter() {
                        li { class: "stats__item",
                            span { class: "stats__count", "{count}" }
                            span { class: "stats__label", "{label}" }
                        }
                    }
                }
            }

            div { class: "filters",
                input {
                    class: "filters__search",
                    r#type: "search",
                    placeholder: "Search materials",
                    value: "{filter.read().search}",
                    oninput: move |evt| filter.write().search = evt.value(),
                }
                select {
                    value: "{filter.read().kind}",
                    onchange: move |evt| filter.write().kind = evt.value(),
                    option { value: "", "All types" }
                    for kind in MaterialKind::ALL {
                        option { value: "{kind.as_str()}", "{kind.label()}" }
                    }
                }
                select {
                    value: "{filter.read().folder}",
                    onchange: move |evt| filter.write().folder = evt.value(),
                    option { value: "", "All folders" }
                    for folder in options.folders.iter() {
                        option { value: "{folder}", "{folder}" }
                    }
                }
                select {
                    value: "{filter.read().tag}",
                    onchange: move |evt| filter.write().tag = evt.value(),
                    option { value: "", "All tags" }
                    for tag in options.tags.iter() {
                        option { value: "{tag}", "{tag}" }
                    }
                }
                if filter.read().is_filtered() {
                    button {
                        class: "btn btn-ghost",
                        r#type: "button",
                        onclick: move |_| filter.set(LibraryFilterVm::default()),
                        "Clear filters"
                    }
                }
            }

            if selected_count > 0 {
                div { class: "bulk-actions",
                    span { "{selected_count} selected" }
                    button {
                        class: "btn btn-danger",
                        r#type: "button",
                        onclick: on_delete_selected,
                        "Delete selected"
                    }
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
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        div { class: "empty",
                            p { "No study materials yet." }
                            Link { class: "btn", to: Route::Contents {}, "Generate from your content" }
                        }
                    } else {
                        p { class: "library__count", "Showing {data.cards.len()} of {data.total}" }
                        ul { class: "materials",
                            for card in data.cards {
                                MaterialCard {
                                    key: "{card.id}",
                                    checked: selected.read().contains(&card.id),
                                    on_toggle: move |id: String| {
                                        let mut set = selected.write();
                                        if !set.remove(&id) {
                                            set.insert(id);
                                        }
                                    },
                                    card: card,
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
fn MaterialCard(card: MaterialCardVm, checked: bool, on_toggle: EventHandler<String>) -> Element {
    let route = study_route(&card);
    let id = card.id.clone();

    rsx! {
        li { class: "material-card",
            input {
                r#type: "checkbox",
                checked: checked,
                aria_label: "Select {card.title}",
                onchange: move |_| on_toggle.call(id.clone()),
            }
            div { class: "material-card__body",
                h3 { "{card.title}" }
                p { class: "material-card__meta",
                    span { class: "badge", "{card.kind_label}" }
                    " {card.size_label} · {card.created_at_str}"
                }
                if let Some(folder) = card.folder.as_deref() {
                    p { class: "material-card__folder", "Folder: {folder}" }
                }
                if !card.tags.is_empty() {
                    ul { class: "tags",
                        for tag in card.tags.iter() {
                            li { class: "tag", "{tag}" }
                        }
                    }
                }
            }
            if let Some(route) = route {
                Link { class: "btn", to: route, "{card.action_label()}" }
            } else {
                span { class: "material-card__note", "{card.action_label()}" }
            }
        }
    }
}
