use std::path::PathBuf;

use dioxus::prelude::*;
use services::api::UploadSource;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::job_progress_label;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SourceTab {
    Pdf,
    Url,
    Youtube,
}

impl SourceTab {
    const ALL: [Self; 3] = [Self::Pdf, Self::Url, Self::Youtube];

    fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Url => "Web page",
            Self::Youtube => "YouTube",
        }
    }

    fn location_label(self) -> &'static str {
        match self {
            Self::Pdf => "Path to PDF file",
            Self::Url => "Article URL",
            Self::Youtube => "YouTube video URL",
        }
    }

    fn source(self, location: String, title: String) -> UploadSource {
        match self {
            Self::Pdf => UploadSource::Pdf {
                path: PathBuf::from(location),
                title,
            },
            Self::Url => UploadSource::Url {
                url: location,
                title,
            },
            Self::Youtube => UploadSource::Youtube {
                url: location,
                title,
            },
        }
    }
}

#[component]
pub fn UploadView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut tab = use_signal(|| SourceTab::Pdf);
    let mut location = use_signal(String::new);
    let mut title = use_signal(String::new);
    let mut progress = use_signal(|| None::<String>);
    let mut error = use_signal(|| None::<ViewError>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let uploads = ctx.uploads();
        let source = tab().source(location().trim().to_string(), title().trim().to_string());
        busy.set(true);
        error.set(None);
        progress.set(Some("Uploading…".to_string()));
        spawn(async move {
            let outcome = async {
                let receipt = uploads.upload(&source).await?;
                if let Some(job_id) = receipt.job_id {
                    uploads
                        .wait_for_job(&job_id, |status| {
                            progress.set(Some(job_progress_label(status)));
                        })
                        .await?;
                }
                Ok::<_, services::UploadError>(())
            }
            .await;
            busy.set(false);
            match outcome {
                Ok(()) => {
                    navigator.push(Route::Contents {});
                }
                Err(err) => {
                    progress.set(None);
                    error.set(Some(ViewError::from(&err)));
                }
            }
        });
    };

    rsx! {
        div { class: "page upload",
            h2 { "Upload content" }
            div { class: "tabs", role: "tablist",
                for candidate in SourceTab::ALL {
                    button {
                        class: if tab() == candidate { "tab tab--active" } else { "tab" },
                        r#type: "button",
                        role: "tab",
                        disabled: busy(),
                        onclick: move |_| tab.set(candidate),
                        "{candidate.label()}"
                    }
                }
            }
            form { class: "upload__form", onsubmit: on_submit,
                label { r#for: "upload-location", "{tab().location_label()}" }
                input {
                    id: "upload-location",
                    r#type: "text",
                    value: "{location}",
                    oninput: move |evt| location.set(evt.value()),
                }
                label { r#for: "upload-title", "Title" }
                input {
                    id: "upload-title",
                    r#type: "text",
                    value: "{title}",
                    oninput: move |evt| title.set(evt.value()),
                }
                if let Some(err) = error() {
                    p { class: "form-error", role: "alert", "{err.message()}" }
                }
                if let Some(line) = progress() {
                    p { class: "upload__progress", aria_live: "polite", "{line}" }
                }
                button { class: "btn", r#type: "submit", disabled: busy(), "Upload" }
            }
        }
    }
}
