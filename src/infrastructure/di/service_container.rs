//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::services::{DidResolver, DocumentService};
use crate::config::Settings;
use crate::infrastructure::dns::{DnsTxtLookup, ZoneTxtLookup};
use crate::infrastructure::traits::{FileSystem, RealFileSystem, TxtLookup};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding the settings and I/O implementations services are
/// built from.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    pub fn document_service(&self) -> DocumentService {
        DocumentService::new(Arc::clone(&self.fs))
    }

    /// Resolver answering from `zone_file` when given, from live DNS otherwise.
    pub fn resolver(&self, zone_file: Option<&Path>) -> InfraResult<DidResolver> {
        let lookup: Arc<dyn TxtLookup> = match zone_file {
            Some(path) => {
                let zone = self
                    .fs
                    .read_to_string(path)
                    .map_err(|e| InfraError::io(format!("read zone file: {}", path.display()), e))?;
                let lookup = ZoneTxtLookup::parse(&zone)?;
                debug!("zone lookup with {} names from {}", lookup.len(), path.display());
                Arc::new(lookup)
            }
            None => Arc::new(DnsTxtLookup::new(&self.settings.dns).map_err(|e| {
                InfraError::Resolver {
                    message: e.to_string(),
                }
            })?),
        };
        Ok(DidResolver::new(lookup))
    }
}
