mod attempt_vm;
mod content_vm;
mod flashcard_vm;
mod library_vm;
mod markdown_vm;
mod quiz_vm;
mod summary_vm;
mod time_fmt;

pub use attempt_vm::{AttemptCardVm, map_attempt_cards};
pub use content_vm::{ContentCardVm, ContentFilterVm, job_progress_label, map_content_cards};
pub use flashcard_vm::{FlashcardFaceVm, FlashcardIntent, FlashcardVm, completion_message};
pub use library_vm::{
    LibraryFilterVm, MaterialCardVm, folder_choice, map_material_cards, stats_rows,
};
pub use markdown_vm::{markdown_to_html, sanitize_html};
pub use quiz_vm::{
    NavDotVm, OptionVm, QuestionVm, QuizIntent, QuizResultsVm, QuizVm, ReviewRowVm,
};
pub use summary_vm::{PreviewItemVm, PreviewVm, SummaryVm};
pub use time_fmt::{format_date, format_datetime};
