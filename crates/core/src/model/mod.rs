mod attempt;
mod content;
mod flashcard;
mod grade;
mod ids;
mod material;
mod quiz;
mod user;

pub use ids::{ContentId, IdError, MaterialId, UserId};

pub use attempt::{AttemptError, QuizAttempt, QuizResult};
pub use content::{Content, ContentKind, JobStatus, ProcessingStatus};
pub use flashcard::{Flashcard, FlashcardError};
pub use grade::{Grade, percentage};
pub use material::{Concept, MaterialData, MaterialKind, StudyMaterial, SummaryType};
pub use quiz::{QuizQuestion, QuizQuestionError, option_label};
pub use user::{AccessToken, Credentials, User};
