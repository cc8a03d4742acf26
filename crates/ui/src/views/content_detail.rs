use dioxus::prelude::*;
use dioxus_router::Link;
use study_core::model::{ContentId, MaterialId, MaterialKind};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::library::study_route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{ContentCardVm, MaterialCardVm, folder_choice, map_material_cards};

#[derive(Clone, Debug, PartialEq)]
struct ContentDetailData {
    content: ContentCardVm,
    materials: Vec<MaterialCardVm>,
}

/// One uploaded source and the materials generated from it.
#[component]
pub fn ContentDetailView(id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let library = ctx.library();
    let mut action_error = use_signal(|| None::<ViewError>);

    let resource = {
        let library = library.clone();
        use_resource(move || {
            let library = library.clone();
            let id = id.clone();
            async move {
                let id = ContentId::new(id).map_err(|_| ViewError::NotFound)?;
                let content = library
                    .get_content(&id)
                    .await
                    .map_err(|err| ViewError::from(&err))?;
                let materials = library
                    .materials_for_content(&id)
                    .await
                    .map_err(|err| ViewError::from(&err))?;
                Ok::<_, ViewError>(ContentDetailData {
                    content: ContentCardVm::from(&content),
                    materials: map_material_cards(&materials),
                })
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let on_delete = {
        let library = library.clone();
        use_callback(move |id: String| {
            let library = library.clone();
            spawn(async move {
                let Ok(id) = MaterialId::new(id) else {
                    action_error.set(Some(ViewError::NotFound));
                    return;
                };
                let result = library.delete_material(&id).await;
                action_error.set(result.err().map(|err| ViewError::from(&err)));
                let mut resource = resource;
                resource.restart();
            });
        })
    };
    let on_move = use_callback(move |(id, folder): (String, String)| {
        let library = library.clone();
        spawn(async move {
            let Ok(id) = MaterialId::new(id) else {
                action_error.set(Some(ViewError::NotFound));
                return;
            };
            let result = library.move_to_folder(&id, folder_choice(&folder)).await;
            action_error.set(result.err().map(|err| ViewError::from(&err)));
            let mut resource = resource;
            resource.restart();
        });
    });

    rsx! {
        div { class: "page content-detail",
            div { class: "page__header",
                Link { class: "btn btn-ghost", to: Route::Contents {}, "Back to content" }
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
                ViewState::Ready(ContentDetailData { content, materials }) => rsx! {
                    h2 { "{content.title}" }
                    p { class: "content-card__meta",
                        "{content.kind_label} · {content.created_at_str} "
                        span { class: "{content.status_class}", "{content.status_label}" }
                    }

                    section { class: "content-detail__generate",
                        h3 { "Generate study materials" }
                        if content.ready {
                            div { class: "content-card__actions",
                                for kind in MaterialKind::ALL {
                                    Link {
                                        class: "btn btn-secondary",
                                        to: Route::Generate { content_id: content.id.clone(), kind: kind.as_str().to_string() },
                                        "{kind.label()}"
                                    }
                                }
                            }
                        } else {
                            p { "{ViewError::ContentNotReady.message()}" }
                        }
                    }

                    section { class: "content-detail__materials",
                        h3 { "Your study materials" }
                        if materials.is_empty() {
                            p { class: "empty", "No study materials yet. Generate some above." }
                        } else {
                            ul { class: "materials",
                                for card in materials {
                                    SourceMaterialRow {
                                        key: "{card.id}",
                                        card: card,
                                        on_move: on_move,
                                        on_delete: on_delete,
                                    }
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
fn SourceMaterialRow(
    card: MaterialCardVm,
    on_move: EventHandler<(String, String)>,
    on_delete: EventHandler<String>,
) -> Element {
    let mut folder = use_signal(|| card.folder.clone().unwrap_or_default());
    let route = study_route(&card);
    let move_id = card.id.clone();
    let delete_id = card.id.clone();

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        on_move.call((move_id.clone(), folder()));
    };

    rsx! {
        li { class: "material-card",
            div { class: "material-card__body",
                h3 { "{card.title}" }
                p { class: "material-card__meta",
                    span { class: "badge", "{card.kind_label}" }
                    " {card.size_label} · {card.created_at_str}"
                }
                form { class: "material-card__folder", onsubmit: on_submit,
                    input {
                        r#type: "text",
                        placeholder: "No folder",
                        aria_label: "Folder for {card.title}",
                        value: "{folder}",
                        oninput: move |evt| folder.set(evt.value()),
                    }
                    button { class: "btn btn-ghost", r#type: "submit", "Move" }
                }
            }
            div { class: "content-card__actions",
                if let Some(route) = route {
                    Link { class: "btn", to: route, "{card.action_label()}" }
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
