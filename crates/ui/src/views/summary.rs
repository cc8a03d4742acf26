use dioxus::prelude::*;
use dioxus_router::Link;
use study_core::model::MaterialId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::SummaryVm;

#[component]
pub fn SummaryView(id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let study = ctx.study();

    let resource = use_resource(move || {
        let study = study.clone();
        let id = id.clone();
        async move {
            let id = MaterialId::new(id).map_err(|_| ViewError::NotFound)?;
            let material = study
                .open_summary(&id)
                .await
                .map_err(|err| ViewError::from(&err))?;
            SummaryVm::from_material(&material).ok_or(ViewError::WrongKind)
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page summary",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(summary) => rsx! {
                    div { class: "page__header",
                        h2 { "{summary.title}" }
                        Link { class: "btn btn-ghost", to: Route::Library {}, "Back to library" }
                    }
                    p { class: "summary__meta",
                        span { "{summary.type_label}" }
                        " · "
                        span { "{summary.reading_label}" }
                    }
                    article { class: "summary__body", dangerous_inner_html: "{summary.html}" }
                    if !summary.key_concepts.is_empty() {
                        section { class: "summary__concepts",
                            h3 { "Key concepts" }
                            ul {
                                for concept in summary.key_concepts {
                                    li { "{concept}" }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
            }
        }
    }
}
