use std::collections::BTreeMap;

use dioxus::prelude::*;
use dioxus_router::Link;
use services::MaterialQuery;
use study_core::model::MaterialKind;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptCardVm, map_attempt_cards};

#[derive(Clone, Debug, PartialEq)]
struct HistoryData {
    cards: Vec<AttemptCardVm>,
    titles: BTreeMap<String, String>,
}

#[component]
pub fn HistoryView() -> Element {
    let ctx = use_context::<AppContext>();
    let study = ctx.study();
    let library = ctx.library();

    let resource = use_resource(move || {
        let study = study.clone();
        let library = library.clone();
        async move {
            let rows = study
                .latest_attempts()
                .await
                .map_err(|err| ViewError::from(&err))?;
            // Titles are cosmetic; history still renders offline.
            let titles = library
                .list_materials(&MaterialQuery::all().with_kind(MaterialKind::Quiz))
                .await
                .map(|page| {
                    page.materials
                        .into_iter()
                        .map(|m| (m.id.as_str().to_string(), m.title))
                        .collect()
                })
                .unwrap_or_default();
            Ok(HistoryData {
                cards: map_attempt_cards(&rows),
                titles,
            })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            h2 { "Quiz history" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.cards.is_empty() {
                        p { "No quiz attempts yet." }
                    } else {
                        ul { class: "history",
                            for card in data.cards {
                                AttemptCard {
                                    key: "{card.id}",
                                    title: data
                                        .titles
                                        .get(&card.material_id)
                                        .cloned()
                                        .unwrap_or_else(|| "Deleted quiz".to_string()),
                                    card: card,
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

#[component]
fn AttemptCard(card: AttemptCardVm, title: String) -> Element {
    rsx! {
        li { class: "card history__item",
            div { class: "history__title", "{title}" }
            div { class: "history__meta",
                span { class: "grade", "{card.grade}" }
                span { "{card.score_label} ({card.percentage}%)" }
                span { "{card.completed_at_str}" }
            }
            Link {
                class: "btn btn-secondary",
                to: Route::Quiz { id: card.material_id.clone() },
                "Retake"
            }
        }
    }
}
