use services::{MaterialQuery, MaterialStats};
use study_core::model::{MaterialKind, StudyMaterial};

use crate::vm::time_fmt::format_date;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaterialCardVm {
    pub id: String,
    pub title: String,
    pub kind: MaterialKind,
    pub kind_label: &'static str,
    pub size_label: String,
    pub folder: Option<String>,
    pub tags: Vec<String>,
    pub created_at_str: String,
}

impl MaterialCardVm {
    /// Concept lists have no study screen.
    #[must_use]
    pub fn is_studyable(&self) -> bool {
        self.kind != MaterialKind::Concepts
    }

    #[must_use]
    pub fn action_label(&self) -> &'static str {
        match self.kind {
            MaterialKind::Flashcard => "Study",
            MaterialKind::Quiz => "Take quiz",
            MaterialKind::Summary => "Read",
            MaterialKind::Concepts => "Preview only",
        }
    }
}

impl From<&StudyMaterial> for MaterialCardVm {
    fn from(material: &StudyMaterial) -> Self {
        let kind = material.kind();
        Self {
            id: material.id.as_str().to_string(),
            title: material.title.clone(),
            kind,
            kind_label: kind.label(),
            size_label: material.data.size_label(),
            folder: material.folder.clone(),
            tags: material.tags.clone(),
            created_at_str: format_date(material.created_at),
        }
    }
}

#[must_use]
pub fn map_material_cards(materials: &[StudyMaterial]) -> Vec<MaterialCardVm> {
    materials.iter().map(MaterialCardVm::from).collect()
}

/// Filter form state. Blank selects mean "any".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LibraryFilterVm {
    pub search: String,
    pub kind: String,
    pub folder: String,
    pub tag: String,
}

impl LibraryFilterVm {
    #[must_use]
    pub fn to_query(&self) -> MaterialQuery {
        let mut query = MaterialQuery::all().with_search(self.search.trim());
        if let Some(kind) = MaterialKind::parse(&self.kind) {
            query = query.with_kind(kind);
        }
        if !self.folder.trim().is_empty() {
            query = query.with_folder(self.folder.trim());
        }
        if !self.tag.trim().is_empty() {
            query = query.with_tag(self.tag.trim());
        }
        query
    }

    #[must_use]
    pub fn is_filtered(&self) -> bool {
        *self != Self::default()
    }
}

/// Folder field text to a folder choice; blank means "no folder".
#[must_use]
pub fn folder_choice(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// `(label, count)` pairs for the stats strip, total first.
#[must_use]
pub fn stats_rows(stats: &MaterialStats) -> Vec<(&'static str, usize)> {
    let mut rows = vec![("All materials", stats.total)];
    rows.extend(
        MaterialKind::ALL
            .into_iter()
            .map(|kind| (kind.label(), stats.count(kind))),
    );
    rows
}
