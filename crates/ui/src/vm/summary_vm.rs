use study_core::model::{MaterialData, MaterialKind, StudyMaterial, SummaryType, option_label};

use crate::vm::markdown_vm::{markdown_to_html, reading_minutes};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub title: String,
    pub type_label: &'static str,
    pub reading_label: String,
    pub html: String,
    pub key_concepts: Vec<String>,
}

impl SummaryVm {
    /// `None` unless the material is a summary.
    #[must_use]
    pub fn from_material(material: &StudyMaterial) -> Option<Self> {
        let MaterialData::Summary {
            text,
            summary_type,
            key_concepts,
        } = &material.data
        else {
            return None;
        };
        Some(Self {
            title: material.title.clone(),
            type_label: summary_type_label(*summary_type),
            reading_label: format!("{} min read", reading_minutes(text)),
            html: markdown_to_html(text),
            key_concepts: key_concepts.clone(),
        })
    }
}

fn summary_type_label(summary_type: SummaryType) -> &'static str {
    match summary_type {
        SummaryType::Short => "Short summary",
        SummaryType::Detailed => "Detailed summary",
    }
}

/// A generated item before it is saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewItemVm {
    pub heading: String,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewVm {
    pub kind: MaterialKind,
    pub size_label: String,
    pub items: Vec<PreviewItemVm>,
    pub summary_html: Option<String>,
}

impl PreviewVm {
    #[must_use]
    pub fn savable(&self) -> bool {
        self.kind != MaterialKind::Concepts
    }
}

impl From<&MaterialData> for PreviewVm {
    fn from(data: &MaterialData) -> Self {
        let (items, summary_html) = match data {
            MaterialData::Flashcards(cards) => (
                cards
                    .iter()
                    .map(|card| PreviewItemVm {
                        heading: card.question().to_string(),
                        detail: card.answer().to_string(),
                    })
                    .collect(),
                None,
            ),
            MaterialData::Quiz(questions) => (
                questions
                    .iter()
                    .map(|q| PreviewItemVm {
                        heading: q.question().to_string(),
                        detail: q
                            .option(q.correct_answer())
                            .map(|text| {
                                format!("Answer: {}. {text}", option_label(q.correct_answer()))
                            })
                            .unwrap_or_default(),
                    })
                    .collect(),
                None,
            ),
            MaterialData::Summary {
                text, key_concepts, ..
            } => (
                key_concepts
                    .iter()
                    .map(|concept| PreviewItemVm {
                        heading: concept.clone(),
                        detail: String::new(),
                    })
                    .collect(),
                Some(markdown_to_html(text)),
            ),
            MaterialData::Concepts(concepts) => (
                concepts
                    .iter()
                    .map(|c| PreviewItemVm {
                        heading: c.name.clone(),
                        detail: c.description.clone(),
                    })
                    .collect(),
                None,
            ),
        };
        Self {
            kind: data.kind(),
            size_label: data.size_label(),
            items,
            summary_html,
        }
    }
}
