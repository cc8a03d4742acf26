use dioxus::prelude::*;
use dioxus_router::Link;
use study_core::model::MaterialId;
use study_core::session::SessionError;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{FlashcardIntent, FlashcardVm, completion_message};

#[component]
pub fn FlashcardsView(id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let study = ctx.study();
    let mut vm = use_signal(|| None::<FlashcardVm>);

    let resource = use_resource(move || {
        let study = study.clone();
        let id = id.clone();
        async move {
            let id = MaterialId::new(id).map_err(|_| ViewError::NotFound)?;
            let (material, session) = study
                .start_flashcards(&id)
                .await
                .map_err(|err| ViewError::from(&err))?;
            vm.set(Some(FlashcardVm::new(material.title, session)));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let mut hint = use_signal(|| None::<&'static str>);

    let dispatch = use_callback(move |intent: FlashcardIntent| {
        let mut guard = vm.write();
        let Some(vm) = guard.as_mut() else {
            return;
        };
        match vm.apply(intent) {
            Ok(()) => hint.set(None),
            Err(SessionError::NotRevealed) => hint.set(Some("Flip the card before marking it.")),
            Err(_) => hint.set(Some(ViewError::Unknown.message())),
        }
    });

    let on_key = move |evt: KeyboardEvent| {
        let revealed = vm
            .read()
            .as_ref()
            .is_some_and(|vm| vm.session().is_revealed());
        let intent = match evt.data.key() {
            Key::Character(value) if value == " " => Some(FlashcardIntent::Flip),
            Key::Enter => Some(FlashcardIntent::Flip),
            Key::ArrowRight => Some(FlashcardIntent::Next),
            Key::ArrowLeft => Some(FlashcardIntent::Previous),
            Key::Character(value) if revealed && value.eq_ignore_ascii_case("k") => {
                Some(FlashcardIntent::MarkKnown(true))
            }
            Key::Character(value) if revealed && value.eq_ignore_ascii_case("d") => {
                Some(FlashcardIntent::MarkKnown(false))
            }
            _ => None,
        };
        if let Some(intent) = intent {
            evt.prevent_default();
            dispatch.call(intent);
        }
    };

    let guard = vm.read();
    let title = guard.as_ref().map(|vm| vm.title().to_string()).unwrap_or_default();
    let face = guard.as_ref().map(FlashcardVm::face);
    let completion = guard.as_ref().and_then(FlashcardVm::completion);
    drop(guard);

    rsx! {
        div { class: "page flashcards", tabindex: "0", onkeydown: on_key,
            div { class: "page__header",
                h2 { "{title}" }
                Link { class: "btn btn-ghost", to: Route::Library {}, "Back to library" }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
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
                ViewState::Ready(()) => rsx! {
                    if let Some(face) = face {
                        div { class: "flashcards__progress",
                            span { "{face.position_label}" }
                            span { "{face.known_label}" }
                            progress { max: "100", value: "{face.progress_percent}" }
                        }
                        button {
                            class: if face.revealed { "flashcard flashcard--revealed" } else { "flashcard" },
                            id: "flashcard-face",
                            r#type: "button",
                            aria_label: "Flip card",
                            onclick: move |_| dispatch.call(FlashcardIntent::Flip),
                            span { class: "flashcard__label", "{face.face_label}" }
                            p { class: "flashcard__text", "{face.text}" }
                        }
                        if let Some(text) = hint() {
                            p { class: "form-error", role: "status", "{text}" }
                        }
                        if face.revealed {
                            div { class: "flashcard__marks",
                                button {
                                    class: if face.is_known { "btn btn-secondary" } else { "btn btn-danger" },
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(FlashcardIntent::MarkKnown(false)),
                                    "Don't know"
                                }
                                button {
                                    class: if face.is_known { "btn btn-success" } else { "btn btn-secondary" },
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(FlashcardIntent::MarkKnown(true)),
                                    "Know it"
                                }
                            }
                        }
                        div { class: "flashcards__nav",
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                disabled: !face.can_go_back,
                                onclick: move |_| dispatch.call(FlashcardIntent::Previous),
                                "Previous"
                            }
                            button {
                                class: "btn btn-ghost",
                                r#type: "button",
                                onclick: move |_| dispatch.call(FlashcardIntent::Shuffle),
                                "Shuffle"
                            }
                            button {
                                class: "btn btn-ghost",
                                r#type: "button",
                                onclick: move |_| dispatch.call(FlashcardIntent::Restart),
                                "Restart"
                            }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                disabled: !face.can_go_forward,
                                onclick: move |_| dispatch.call(FlashcardIntent::Next),
                                "Next"
                            }
                        }
                    }
                    if let Some(done) = completion {
                        div { class: "flashcards__complete", role: "status",
                            h3 { "Deck complete" }
                            p { "{completion_message(done)}" }
                            div { class: "flashcards__complete-actions",
                                button {
                                    class: "btn",
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(FlashcardIntent::Restart),
                                    "Study again"
                                }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(FlashcardIntent::Shuffle),
                                    "Shuffle and review again"
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
