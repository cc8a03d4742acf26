use dioxus::prelude::*;
use dioxus_router::Link;
use services::{QuizTimer, TimerExit};
use study_core::model::{MaterialId, QuizResult};
use study_core::session::Tick;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuizIntent, QuizResultsVm, QuizVm};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SaveState {
    Saving,
    Saved,
    SavedLocally,
    Failed(ViewError),
}

impl SaveState {
    fn message(self) -> &'static str {
        match self {
            Self::Saving => "Saving your result…",
            Self::Saved => "Result saved.",
            Self::SavedLocally => "Result saved on this device; the server did not accept it.",
            Self::Failed(err) => err.message(),
        }
    }
}

#[component]
pub fn QuizView(id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let study = ctx.study();
    let mut vm = use_signal(|| None::<QuizVm>);
    let mut save_state = use_signal(|| None::<SaveState>);

    let resource = {
        let study = study.clone();
        let id = id.clone();
        use_resource(move || {
            let study = study.clone();
            let id = id.clone();
            async move {
                let id = MaterialId::new(id).map_err(|_| ViewError::NotFound)?;
                let (material, session) = study
                    .start_quiz(&id)
                    .await
                    .map_err(|err| ViewError::from(&err))?;
                vm.set(Some(QuizVm::new(material.title, session)));
                save_state.set(None);
                Ok::<_, ViewError>(())
            }
        })
    };
    let state = view_state_from_resource(&resource);

    let record = use_callback(move |result: QuizResult| {
        let study = study.clone();
        let Ok(material_id) = MaterialId::new(id.clone()) else {
            save_state.set(Some(SaveState::Failed(ViewError::NotFound)));
            return;
        };
        save_state.set(Some(SaveState::Saving));
        spawn(async move {
            let next = match study.record_result(&material_id, &result).await {
                Ok(recorded) if recorded.forwarded => SaveState::Saved,
                Ok(_) => SaveState::SavedLocally,
                Err(err) => SaveState::Failed(ViewError::from(&err)),
            };
            save_state.set(Some(next));
        });
    });

    let dispatch = use_callback(move |intent: QuizIntent| {
        let submitted = vm
            .write()
            .as_mut()
            .and_then(|vm| vm.apply(intent).ok().flatten());
        if let Some(result) = submitted {
            record.call(result);
        }
    });

    let on_expired = use_callback(move |()| {
        let result = vm
            .read()
            .as_ref()
            .and_then(|vm| vm.session().result().cloned());
        if let Some(result) = result {
            record.call(result);
        }
    });

    let guard = vm.read();
    let title = guard.as_ref().map(|vm| vm.title().to_string()).unwrap_or_default();
    let ticking = guard
        .as_ref()
        .is_some_and(|vm| vm.session().is_timed_and_running());
    let timer_label = guard.as_ref().and_then(QuizVm::timer_label);
    let timer_low = guard.as_ref().is_some_and(QuizVm::timer_is_low);
    let results = guard.as_ref().and_then(QuizVm::results);
    let show_explanations = guard.as_ref().is_some_and(QuizVm::show_explanations);
    let question = guard
        .as_ref()
        .filter(|vm| !vm.is_submitted())
        .map(QuizVm::question);
    let nav_dots = guard.as_ref().map(QuizVm::nav_dots).unwrap_or_default();
    let warning = guard.as_ref().and_then(QuizVm::unanswered_warning);
    drop(guard);

    rsx! {
        div { class: "page quiz",
            div { class: "page__header",
                h2 { "{title}" }
                if let Some(label) = timer_label {
                    span {
                        class: if timer_low { "timer timer--low" } else { "timer" },
                        id: "quiz-timer",
                        role: "timer",
                        "{label}"
                    }
                }
            }
            if ticking {
                CountdownDriver { vm: vm, on_expired: on_expired }
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
                    if let Some(results) = results {
                        QuizResults {
                            results: results,
                            show_explanations: show_explanations,
                            save_state: save_state(),
                            on_toggle: move |()| dispatch.call(QuizIntent::ToggleExplanations),
                            on_retake: move |()| {
                                let mut resource = resource;
                                resource.restart();
                            },
                        }
                    } else if let Some(question) = question {
                        div { class: "quiz__status",
                            span { "{question.position_label}" }
                            span { "{question.answered_label}" }
                            progress { max: "100", value: "{question.progress_percent}" }
                        }
                        section { class: "quiz__question",
                            h3 { "{question.text}" }
                            ul { class: "quiz__options", role: "radiogroup",
                                for option in question.options {
                                    li { key: "{option.index}",
                                        button {
                                            class: if option.selected { "option option--selected" } else { "option" },
                                            r#type: "button",
                                            role: "radio",
                                            aria_checked: "{option.selected}",
                                            onclick: move |_| dispatch.call(QuizIntent::Select(option.index)),
                                            span { class: "option__label", "{option.label}" }
                                            span { class: "option__text", "{option.text}" }
                                        }
                                    }
                                }
                            }
                        }
                        nav { class: "quiz__navigator", aria_label: "Questions",
                            for dot in nav_dots {
                                button {
                                    key: "{dot.index}",
                                    class: match (dot.current, dot.answered) {
                                        (true, _) => "dot dot--current",
                                        (false, true) => "dot dot--answered",
                                        (false, false) => "dot",
                                    },
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(QuizIntent::Jump(dot.index)),
                                    {(dot.index + 1).to_string()}
                                }
                            }
                        }
                        div { class: "quiz__nav",
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                disabled: !question.can_go_back,
                                onclick: move |_| dispatch.call(QuizIntent::Previous),
                                "Previous"
                            }
                            if question.is_last {
                                if let Some(warning) = warning {
                                    span { class: "quiz__warning", "{warning}" }
                                }
                                button {
                                    class: "btn",
                                    id: "quiz-submit",
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(QuizIntent::Submit),
                                    "Submit quiz"
                                }
                            } else {
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(QuizIntent::Next),
                                    "Next"
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}

/// Owns the one timer future for a mounted quiz. Unmounting drops it.
#[component]
fn CountdownDriver(vm: Signal<Option<QuizVm>>, on_expired: EventHandler<()>) -> Element {
    use_future(move || async move {
        let mut vm = vm;
        let timer = QuizTimer::new();
        let exit = timer
            .run(|| vm.write().as_mut().map_or(Tick::Stopped, QuizVm::tick))
            .await;
        if exit == TimerExit::Expired {
            on_expired.call(());
        }
    });
    rsx! {}
}

#[component]
fn QuizResults(
    results: QuizResultsVm,
    show_explanations: bool,
    save_state: Option<SaveState>,
    on_toggle: EventHandler<()>,
    on_retake: EventHandler<()>,
) -> Element {
    rsx! {
        section { class: "results",
            header { class: "results__score",
                if results.timed_out {
                    p { class: "results__timeout", "Time's up! Your answers were submitted automatically." }
                }
                p { class: "results__percentage", "{results.percentage}%" }
                p { class: "results__grade", "Grade {results.grade}" }
                p { class: "results__headline", "{results.headline}" }
                p { "{results.score_label}" }
                ul { class: "results__breakdown",
                    li { "Correct: {results.correct}" }
                    li { "Wrong: {results.wrong}" }
                    li { "Unanswered: {results.unanswered}" }
                }
                if let Some(save) = save_state {
                    p { class: "results__save", role: "status", "{save.message()}" }
                }
            }
            div { class: "results__actions",
                button { class: "btn", r#type: "button", onclick: move |_| on_retake.call(()), "Retake quiz" }
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: move |_| on_toggle.call(()),
                    if show_explanations { "Hide explanations" } else { "Show explanations" }
                }
                Link { class: "btn btn-ghost", to: Route::Library {}, "Back to library" }
            }
            h3 { "Review answers" }
            ol { class: "results__review",
                for row in results.rows {
                    li {
                        key: "{row.number}",
                        class: if row.is_correct { "review review--correct" } else { "review review--wrong" },
                        p { class: "review__question", "{row.number}. {row.question}" }
                        p { class: "review__chosen",
                            "Your answer: "
                            {row.chosen.clone().unwrap_or_else(|| "Not answered".to_string())}
                        }
                        if !row.is_correct {
                            p { class: "review__correct", "Correct answer: {row.correct_answer}" }
                        }
                        if show_explanations {
                            if let Some(explanation) = row.explanation {
                                p { class: "review__explanation", "{explanation}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
