use dioxus::prelude::*;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    SignIn,
    Register,
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut mode = use_signal(|| Mode::SignIn);
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<ViewError>);
    let mut busy = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if busy() {
            return;
        }
        let auth = ctx.auth();
        let mode = mode();
        let (name, email, password) = (name(), email(), password());
        busy.set(true);
        spawn(async move {
            let result = match mode {
                Mode::SignIn => auth.login(&email, &password).await,
                Mode::Register => auth.register(&name, &email, &password).await,
            };
            busy.set(false);
            match result {
                Ok(_) => {
                    error.set(None);
                    navigator.replace(Route::Library {});
                }
                Err(err) => error.set(Some(ViewError::from_login(&err))),
            }
        });
    };

    let (heading, submit_label, switch_label) = match mode() {
        Mode::SignIn => ("Sign in", "Sign in", "Need an account? Register"),
        Mode::Register => ("Create an account", "Register", "Have an account? Sign in"),
    };

    rsx! {
        div { class: "page page--centered login",
            h2 { "{heading}" }
            form { class: "login__form", onsubmit: on_submit,
                if mode() == Mode::Register {
                    label { r#for: "login-name", "Name" }
                    input {
                        id: "login-name",
                        r#type: "text",
                        value: "{name}",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                label { r#for: "login-email", "Email" }
                input {
                    id: "login-email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(err) = error() {
                    p { class: "form-error", role: "alert", "{err.message()}" }
                }
                button { class: "btn", r#type: "submit", disabled: busy(), "{submit_label}" }
            }
            button {
                class: "btn btn-ghost",
                r#type: "button",
                onclick: move |_| {
                    error.set(None);
                    mode.set(match mode() {
                        Mode::SignIn => Mode::Register,
                        Mode::Register => Mode::SignIn,
                    });
                },
                "{switch_label}"
            }
        }
    }
}
