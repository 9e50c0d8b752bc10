//! Document service
//!
//! Loads JSON documents from disk, turns them into zone records and writes
//! the results back out.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    encode_with_ttl, export_json, import_json, normalize_fqdn, render_zone, DocumentTree,
    ResourceRecord,
};
use crate::infrastructure::traits::FileSystem;

/// Service for the file side of `create` and `resolve`.
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
}

impl DocumentService {
    /// Create a new document service.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and import a JSON document.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<DocumentTree> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::NotFound(path.to_path_buf()));
        }
        let bytes = self.fs.read(path).with_path_context("read document", path)?;
        Ok(import_json(&bytes)?)
    }

    /// Encode the document at `path` as TXT records under `base`.
    ///
    /// `base` may omit the trailing dot and may be an internationalized name.
    pub fn create_records(
        &self,
        path: &Path,
        base: &str,
        ttl: u32,
    ) -> ApplicationResult<Vec<ResourceRecord>> {
        let base = normalize_fqdn(base)?;
        let tree = self.load(path)?;
        let records = encode_with_ttl(&tree, &base, ttl);
        debug!("create_records: {} records for {}", records.len(), base);
        Ok(records)
    }

    /// Write records as zone-file lines.
    pub fn write_zone(&self, records: &[ResourceRecord], path: &Path) -> ApplicationResult<()> {
        self.write(path, &render_zone(records))
    }

    /// Write a tree as pretty-printed JSON.
    pub fn write_json(&self, tree: &DocumentTree, path: &Path) -> ApplicationResult<()> {
        let json = export_json(tree)?;
        let mut text = String::from_utf8_lossy(&json).into_owned();
        text.push('\n');
        self.write(path, &text)
    }

    fn write(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, content)
            .with_path_context("write file", path)?;
        debug!("wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}
