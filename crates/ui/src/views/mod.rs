mod content_detail;
mod contents;
mod flashcards;
mod generate;
mod history;
pub(crate) mod library;
mod login;
mod quiz;
mod state;
mod summary;
mod upload;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use content_detail::ContentDetailView;
pub use contents::ContentsView;
pub use flashcards::FlashcardsView;
pub use generate::GenerateView;
pub use history::HistoryView;
pub use library::LibraryView;
pub use login::LoginView;
pub use quiz::QuizView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use summary::SummaryView;
pub use upload::UploadView;
