use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

const STYLESHEET: Asset = asset!("/assets/style.css");

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: STYLESHEET }
        // Window title stays fixed; pages render their own headings.
        document::Title { "Study" }
        div { class: "app-root",
            ErrorBoundary { handle_error: render_fatal, Router::<Route> {} }
        }
    }
}

fn render_fatal(errors: ErrorContext) -> Element {
    rsx! {
        div { class: "fatal", role: "alert",
            h1 { "Something went wrong" }
            p { "Restart the app to continue studying. Your quiz history is kept on this device." }
            details {
                summary { "Details" }
                pre { "{errors:?}" }
            }
        }
    }
}
