use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::flashcard::Flashcard;
use crate::model::ids::{ContentId, MaterialId};
use crate::model::quiz::QuizQuestion;

//
// ─── KINDS ─────────────────────────────────────────────────────────────────────
//

/// Discriminant of `MaterialData`, also used as a library filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Flashcard,
    Quiz,
    Summary,
    Concepts,
}

impl MaterialKind {
    pub const ALL: [Self; 4] = [Self::Flashcard, Self::Quiz, Self::Summary, Self::Concepts];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flashcard => "flashcard",
            Self::Quiz => "quiz",
            Self::Summary => "summary",
            Self::Concepts => "concepts",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Flashcard => "Flashcards",
            Self::Quiz => "Quiz",
            Self::Summary => "Summary",
            Self::Concepts => "Key concepts",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    #[default]
    Short,
    Detailed,
}

/// A named idea extracted from content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    pub name: String,
    pub description: String,
}

//
// ─── PAYLOAD ───────────────────────────────────────────────────────────────────
//

/// Generated payload, one variant per material type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialData {
    Flashcards(Vec<Flashcard>),
    Quiz(Vec<QuizQuestion>),
    Summary {
        text: String,
        summary_type: SummaryType,
        key_concepts: Vec<String>,
    },
    Concepts(Vec<Concept>),
}

impl MaterialData {
    #[must_use]
    pub fn kind(&self) -> MaterialKind {
        match self {
            Self::Flashcards(_) => MaterialKind::Flashcard,
            Self::Quiz(_) => MaterialKind::Quiz,
            Self::Summary { .. } => MaterialKind::Summary,
            Self::Concepts(_) => MaterialKind::Concepts,
        }
    }

    /// Human-readable size, e.g. "12 cards".
    #[must_use]
    pub fn size_label(&self) -> String {
        fn plural(n: usize, one: &str, many: &str) -> String {
            if n == 1 {
                format!("1 {one}")
            } else {
                format!("{n} {many}")
            }
        }

        match self {
            Self::Flashcards(cards) => plural(cards.len(), "card", "cards"),
            Self::Quiz(questions) => plural(questions.len(), "question", "questions"),
            Self::Summary { summary_type, .. } => match summary_type {
                SummaryType::Short => "short summary".to_string(),
                SummaryType::Detailed => "detailed summary".to_string(),
            },
            Self::Concepts(concepts) => plural(concepts.len(), "concept", "concepts"),
        }
    }
}

//
// ─── MATERIAL ──────────────────────────────────────────────────────────────────
//

/// A saved study material belonging to one content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyMaterial {
    pub id: MaterialId,
    pub content_id: ContentId,
    pub title: String,
    pub folder: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub data: MaterialData,
}

impl StudyMaterial {
    #[must_use]
    pub fn kind(&self) -> MaterialKind {
        self.data.kind()
    }

    #[must_use]
    pub fn flashcards(&self) -> Option<&[Flashcard]> {
        match &self.data {
            MaterialData::Flashcards(cards) => Some(cards),
            _ => None,
        }
    }

    #[must_use]
    pub fn questions(&self) -> Option<&[QuizQuestion]> {
        match &self.data {
            MaterialData::Quiz(questions) => Some(questions),
            _ => None,
        }
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
