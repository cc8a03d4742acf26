use dioxus::prelude::*;
use services::api::{GenerateRequest, MaterialDraft};
use study_core::model::{ContentId, MaterialData, MaterialKind};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::library::study_route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{MaterialCardVm, PreviewVm};

#[derive(Clone, Debug, PartialEq)]
struct Generated {
    data: MaterialData,
    preview: PreviewVm,
    suggested_title: String,
}

#[component]
pub fn GenerateView(content_id: String, kind: String) -> Element {
    let ctx = use_context::<AppContext>();
    let library = ctx.library();
    let navigator = use_navigator();
    let mut title = use_signal(String::new);
    let mut folder = use_signal(String::new);
    let mut save_error = use_signal(|| None::<ViewError>);
    let mut saving = use_signal(|| false);

    let resource = {
        let library = library.clone();
        let content_id = content_id.clone();
        let kind = kind.clone();
        use_resource(move || {
            let library = library.clone();
            let content_id = content_id.clone();
            let kind = MaterialKind::parse(&kind);
            async move {
                let kind = kind.ok_or(ViewError::WrongKind)?;
                let id = ContentId::new(content_id).map_err(|_| ViewError::NotFound)?;
                let content = library
                    .get_content(&id)
                    .await
                    .map_err(|err| ViewError::from(&err))?;
                let suggested_title = format!("{} – {}", content.title, kind.label());
                let request = GenerateRequest {
                    title: suggested_title.clone(),
                    count: None,
                };
                let data = library
                    .generate(&content, kind, &request)
                    .await
                    .map_err(|err| ViewError::from(&err))?;
                title.set(suggested_title.clone());
                Ok::<_, ViewError>(Generated {
                    preview: PreviewVm::from(&data),
                    data,
                    suggested_title,
                })
            }
        })
    };
    let state = view_state_from_resource(&resource);
    let heading = MaterialKind::parse(&kind).map_or("materials", MaterialKind::label);

    let on_save = {
        let content_id = content_id.clone();
        use_callback(move |data: MaterialData| {
            let library = library.clone();
            let content_id = content_id.clone();
            let folder = folder().trim().to_string();
            let draft = MaterialDraft {
                title: title().trim().to_string(),
                tags: Vec::new(),
                folder: (!folder.is_empty()).then_some(folder),
                data,
            };
            saving.set(true);
            spawn(async move {
                let result = match ContentId::new(content_id) {
                    Ok(id) => library
                        .save_generated(&id, &draft)
                        .await
                        .map_err(|err| ViewError::from(&err)),
                    Err(_) => Err(ViewError::NotFound),
                };
                saving.set(false);
                match result {
                    Ok(saved) => {
                        let card = MaterialCardVm::from(&saved);
                        navigator.replace(study_route(&card).unwrap_or(Route::Library {}));
                    }
                    Err(err) => save_error.set(Some(err)),
                }
            });
        })
    };

    rsx! {
        div { class: "page generate",
            h2 { "Generate {heading}" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Generating… this can take a minute." }
                },
                ViewState::Ready(generated) => rsx! {
                    GeneratedPreview {
                        generated: generated,
                        title: title,
                        folder: folder,
                        saving: saving(),
                        save_error: save_error(),
                        on_save: on_save,
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
                        "Try again"
                    }
                },
            }
        }
    }
}

#[component]
fn GeneratedPreview(
    generated: Generated,
    mut title: Signal<String>,
    mut folder: Signal<String>,
    saving: bool,
    save_error: Option<ViewError>,
    on_save: EventHandler<MaterialData>,
) -> Element {
    let data = generated.data.clone();
    let preview = generated.preview;

    rsx! {
        p { class: "generate__size", "Generated {preview.size_label}" }
        if let Some(html) = preview.summary_html.as_deref() {
            article { class: "summary__text", dangerous_inner_html: "{html}" }
        }
        ol { class: "preview",
            for item in preview.items.iter() {
                li { class: "preview__item",
                    p { class: "preview__heading", "{item.heading}" }
                    if !item.detail.is_empty() {
                        p { class: "preview__detail", "{item.detail}" }
                    }
                }
            }
        }
        if preview.savable() {
            div { class: "generate__save",
                label { r#for: "generate-title", "Title" }
                input {
                    id: "generate-title",
                    r#type: "text",
                    placeholder: "{generated.suggested_title}",
                    value: "{title}",
                    oninput: move |evt| title.set(evt.value()),
                }
                label { r#for: "generate-folder", "Folder (optional)" }
                input {
                    id: "generate-folder",
                    r#type: "text",
                    value: "{folder}",
                    oninput: move |evt| folder.set(evt.value()),
                }
                if let Some(err) = save_error {
                    p { class: "form-error", "{err.message()}" }
                }
                button {
                    class: "btn",
                    r#type: "button",
                    disabled: saving,
                    onclick: move |_| on_save.call(data.clone()),
                    "Save to library"
                }
            }
        } else {
            p { class: "generate__note", "Key concepts are a preview and are not saved." }
        }
    }
}
