use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{
    ContentDetailView, ContentsView, FlashcardsView, GenerateView, HistoryView, LibraryView,
    LoginView, QuizView, SummaryView, UploadView, ViewError,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login", LoginView)] Login {},
    #[layout(Layout)]
        #[route("/", LibraryView)] Library {},
        #[route("/content", ContentsView)] Contents {},
        #[route("/content/:id", ContentDetailView)] ContentDetail { id: String },
        #[route("/upload", UploadView)] Upload {},
        #[route("/generate/:content_id/:kind", GenerateView)] Generate { content_id: String, kind: String },
        #[route("/flashcards/:id", FlashcardsView)] Flashcards { id: String },
        #[route("/quiz/:id", QuizView)] Quiz { id: String },
        #[route("/summary/:id", SummaryView)] Summary { id: String },
        #[route("/history", HistoryView)] History {},
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    if !ctx.auth().is_signed_in() {
        return rsx! {
            div { class: "page page--centered",
                h2 { "Welcome" }
                p { "Sign in to see your study materials." }
                Link { class: "btn", to: Route::Login {}, "Sign in" }
            }
        };
    }

    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let user_name = ctx
        .auth()
        .current_user()
        .map(|user| user.name)
        .unwrap_or_default();

    let mut logout_error = use_signal(|| None::<ViewError>);

    let on_logout = move |_: MouseEvent| {
        let auth = ctx.auth();
        spawn(async move {
            match auth.logout().await {
                Ok(()) => {
                    navigator.replace(Route::Login {});
                }
                Err(err) => logout_error.set(Some(ViewError::from_logout(&err))),
            }
        });
    };

    rsx! {
        nav { class: "sidebar",
            h1 { "Study" }
            ul {
                li { Link { to: Route::Library {}, "Library" } }
                li { Link { to: Route::Contents {}, "Content" } }
                li { Link { to: Route::Upload {}, "Upload" } }
                li { Link { to: Route::History {}, "Quiz history" } }
            }
            div { class: "sidebar__user",
                span { "{user_name}" }
                button { class: "btn btn-ghost", r#type: "button", onclick: on_logout, "Sign out" }
            }
            if let Some(err) = logout_error() {
                p { class: "form-error", role: "alert", "{err.message()}" }
                Link { class: "btn btn-secondary", to: Route::Login {}, "Continue to sign in" }
            }
        }
    }
}
