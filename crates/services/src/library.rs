//! Material and content library: filtering, stats, and bulk operations.
//!
//! The backend accepts the same filters as query parameters, but results are
//! always filtered again client-side so stale or partial server filtering
//! never leaks into the view.

use std::collections::BTreeMap;
use std::sync::Arc;

use study_core::model::{
    Content, ContentId, ContentKind, MaterialData, MaterialId, MaterialKind, ProcessingStatus,
    StudyMaterial,
};
use tracing::{info, warn};

use crate::api::{
    ContentApi, GenerateRequest, MaterialApi, MaterialDraft, MaterialPage, MaterialUpdate,
};
use crate::error::LibraryError;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Filters over the material library. Empty fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialQuery {
    pub search: String,
    pub kind: Option<MaterialKind>,
    pub folder: Option<String>,
    pub tags: Vec<String>,
    pub page: u32,
    pub limit: u32,
}

impl MaterialQuery {
    #[must_use]
    pub fn all() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: MaterialKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Search is a case-insensitive substring match on the title; every other
    /// filter must also hold. A material must carry all requested tags.
    #[must_use]
    pub fn matches(&self, material: &StudyMaterial) -> bool {
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() && !material.title.to_lowercase().contains(&needle) {
            return false;
        }
        if self.kind.is_some_and(|kind| kind != material.kind()) {
            return false;
        }
        if let Some(folder) = &self.folder {
            if material.folder.as_deref() != Some(folder.as_str()) {
                return false;
            }
        }
        self.tags.iter().all(|tag| material.has_tag(tag))
    }

    #[must_use]
    pub fn apply<'a>(&self, materials: &'a [StudyMaterial]) -> Vec<&'a StudyMaterial> {
        materials.iter().filter(|m| self.matches(m)).collect()
    }

    /// Query-string pairs for `GET /study-materials`.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.search.trim().is_empty() {
            pairs.push(("search", self.search.trim().to_string()));
        }
        if let Some(kind) = self.kind {
            pairs.push(("type", kind.as_str().to_string()));
        }
        if let Some(folder) = &self.folder {
            pairs.push(("folder", folder.clone()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.join(",")));
        }
        pairs.push(("page", self.page.max(1).to_string()));
        let limit = if self.limit == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.limit
        };
        pairs.push(("limit", limit.to_string()));
        pairs
    }
}

/// Filters over uploaded content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentQuery {
    pub search: String,
    pub kind: Option<ContentKind>,
    pub status: Option<ProcessingStatus>,
}

impl ContentQuery {
    #[must_use]
    pub fn matches(&self, content: &Content) -> bool {
        let needle = self.search.trim().to_lowercase();
        (needle.is_empty() || content.title.to_lowercase().contains(&needle))
            && self.kind.is_none_or(|kind| kind == content.kind)
            && self.status.is_none_or(|status| status == content.status)
    }

    #[must_use]
    pub fn apply<'a>(&self, contents: &'a [Content]) -> Vec<&'a Content> {
        contents.iter().filter(|c| self.matches(c)).collect()
    }
}

/// Counts per material type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialStats {
    pub total: usize,
    pub by_kind: BTreeMap<MaterialKind, usize>,
}

impl MaterialStats {
    #[must_use]
    pub fn from_materials(materials: &[StudyMaterial]) -> Self {
        let mut by_kind = BTreeMap::new();
        for material in materials {
            *by_kind.entry(material.kind()).or_insert(0) += 1;
        }
        Self {
            total: materials.len(),
            by_kind,
        }
    }

    #[must_use]
    pub fn count(&self, kind: MaterialKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}

/// Sorted, de-duplicated folder names in use.
#[must_use]
pub fn folders_of(materials: &[StudyMaterial]) -> Vec<String> {
    let mut folders: Vec<String> = materials
        .iter()
        .filter_map(|m| m.folder.clone())
        .filter(|f| !f.trim().is_empty())
        .collect();
    folders.sort();
    folders.dedup();
    folders
}

/// Sorted tags in use, de-duplicated case-insensitively.
#[must_use]
pub fn tags_of(materials: &[StudyMaterial]) -> Vec<String> {
    let mut tags: Vec<String> = materials.iter().flat_map(|m| m.tags.clone()).collect();
    tags.sort_by_key(|t| t.to_lowercase());
    tags.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    tags
}

/// Facade over the material and content endpoints.
#[derive(Clone)]
pub struct LibraryService {
    materials: Arc<dyn MaterialApi>,
    contents: Arc<dyn ContentApi>,
}

impl LibraryService {
    #[must_use]
    pub fn new(materials: Arc<dyn MaterialApi>, contents: Arc<dyn ContentApi>) -> Self {
        Self {
            materials,
            contents,
        }
    }

    /// Fetch one page of materials, then apply the query locally.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn list_materials(&self, query: &MaterialQuery) -> Result<MaterialPage, LibraryError> {
        let mut page = self.materials.list_materials(query).await?;
        page.materials.retain(|m| query.matches(m));
        Ok(page)
    }

    /// Materials generated from one content item.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn materials_for_content(
        &self,
        content_id: &ContentId,
    ) -> Result<Vec<StudyMaterial>, LibraryError> {
        let page = self.materials.list_materials(&MaterialQuery::all()).await?;
        Ok(page
            .materials
            .into_iter()
            .filter(|m| &m.content_id == content_id)
            .collect())
    }

    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn get_material(&self, id: &MaterialId) -> Result<StudyMaterial, LibraryError> {
        Ok(self.materials.get_material(id).await?)
    }

    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn folders(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self.materials.folders().await?)
    }

    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn tags(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self.materials.tags().await?)
    }

    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn stats(&self) -> Result<MaterialStats, LibraryError> {
        Ok(self.materials.stats().await?)
    }

    /// Move a material into `folder`, or out of any folder with `None`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn move_to_folder(
        &self,
        id: &MaterialId,
        folder: Option<String>,
    ) -> Result<StudyMaterial, LibraryError> {
        let update = MaterialUpdate {
            folder: Some(folder.unwrap_or_default()),
            ..MaterialUpdate::default()
        };
        let moved = self.materials.update_material(id, &update).await?;
        info!(material = %id, folder = moved.folder.as_deref().unwrap_or("-"), "material moved");
        Ok(moved)
    }

    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn delete_material(&self, id: &MaterialId) -> Result<(), LibraryError> {
        self.materials.delete_material(id).await?;
        info!(material = %id, "material deleted");
        Ok(())
    }

    /// Delete every id, continuing past individual failures.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::PartialDelete` if any deletion failed.
    pub async fn bulk_delete(&self, ids: &[MaterialId]) -> Result<(), LibraryError> {
        let mut failed = 0;
        for id in ids {
            if let Err(err) = self.materials.delete_material(id).await {
                warn!(material = %id, error = %err, "bulk delete failed for material");
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(LibraryError::PartialDelete {
                failed,
                requested: ids.len(),
            });
        }
        info!(count = ids.len(), "materials deleted");
        Ok(())
    }

    /// Ask the backend to generate a preview; nothing is saved yet.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::ContentNotReady` while the content is still
    /// processing, or `LibraryError::Api` if the request fails.
    pub async fn generate(
        &self,
        content: &Content,
        kind: MaterialKind,
        request: &GenerateRequest,
    ) -> Result<MaterialData, LibraryError> {
        if !content.is_ready() {
            return Err(LibraryError::ContentNotReady);
        }
        Ok(self.materials.generate(&content.id, kind, request).await?)
    }

    /// Save a (possibly edited) preview as a material.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotSavable` for concept lists, or
    /// `LibraryError::Api` if the request fails.
    pub async fn save_generated(
        &self,
        content_id: &ContentId,
        draft: &MaterialDraft,
    ) -> Result<StudyMaterial, LibraryError> {
        let kind = draft.data.kind();
        if kind == MaterialKind::Concepts {
            return Err(LibraryError::NotSavable(kind));
        }
        let saved = self.materials.save_generated(content_id, draft).await?;
        info!(material = %saved.id, kind = %kind, "material saved");
        Ok(saved)
    }

    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn list_contents(&self, query: &ContentQuery) -> Result<Vec<Content>, LibraryError> {
        let contents = self.contents.list_contents().await?;
        Ok(contents.into_iter().filter(|c| query.matches(c)).collect())
    }

    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn get_content(&self, id: &ContentId) -> Result<Content, LibraryError> {
        Ok(self.contents.get_content(id).await?)
    }

    /// # Errors
    ///
    /// Returns `LibraryError::Api` if the request fails.
    pub async fn delete_content(&self, id: &ContentId) -> Result<(), LibraryError> {
        self.contents.delete_content(id).await?;
        info!(content = %id, "content deleted");
        Ok(())
    }
}
