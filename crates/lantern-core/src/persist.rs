//! Durable persistence of category stores.
//!
//! One JSON document per category, named after the category, inside the
//! configured storage directory:
//!
//! ```text
//! <storage_dir>/analytics_items.json
//! { "items": [ { "eventName": "...", "createdAt": "2018-04-10T14:22:05+0200", ... } ] }
//! ```
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write leaves the previous document intact.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LanternError, Result};
use crate::item::DiagnosticItem;
use crate::store::CategoryStore;
use crate::types::Category;

/// Reads and writes category stores to durable storage.
pub trait PersistenceAdapter: Send + Sync {
    /// Loads the persisted store for `category`.
    ///
    /// Returns `Ok(None)` when nothing was persisted.
    fn load(&self, category: Category) -> Result<Option<CategoryStore>>;

    /// Persists `store`, replacing any previous document for its category.
    fn store(&self, store: &CategoryStore) -> Result<()>;

    /// Discards the persisted document for `category`, if any.
    fn discard(&self, category: Category) -> Result<()>;
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    items: &'a [DiagnosticItem],
}

#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    items: Vec<DiagnosticItem>,
}

/// Renders a store in the persisted document format.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn render(store: &CategoryStore) -> Result<String> {
    Ok(serde_json::to_string_pretty(&DocumentRef {
        items: store.items(),
    })?)
}

/// Returns the fixed file name for a category's document.
#[must_use]
pub fn file_name(category: Category) -> String {
    format!("{}_items.json", category.as_str().replace('-', "_"))
}

// =============================================================================
// JsonFileStore
// =============================================================================

/// File-backed persistence adapter.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates an adapter rooted at `dir`. The directory is created lazily.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the document path for a category.
    #[must_use]
    pub fn path_for(&self, category: Category) -> PathBuf {
        self.dir.join(file_name(category))
    }
}

impl PersistenceAdapter for JsonFileStore {
    fn load(&self, category: Category) -> Result<Option<CategoryStore>> {
        let path = self.path_for(category);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LanternError::persistence_read(&path, e)),
        };

        let document: Document = serde_json::from_str(&content)
            .map_err(|e| LanternError::persistence_read(&path, e))?;

        Ok(Some(CategoryStore::from_items(category, document.items)))
    }

    fn store(&self, store: &CategoryStore) -> Result<()> {
        let path = self.path_for(store.category());
        let content = render(store).map_err(|e| LanternError::persistence_write(&path, e))?;

        std::fs::create_dir_all(&self.dir)
            .map_err(|e| LanternError::persistence_write(&path, e))?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| LanternError::persistence_write(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(LanternError::persistence_write(&path, e));
        }

        tracing::debug!(
            category = %store.category(),
            count = store.len(),
            path = %path.display(),
            "persisted category store"
        );
        Ok(())
    }

    fn discard(&self, category: Category) -> Result<()> {
        let path = self.path_for(category);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LanternError::persistence_write(&path, e)),
        }
    }
}
