use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use datadriven_core::{AttributeStore, DataDrivenError, DataLoader};

use crate::CsvLoader;

/// Maps lowercase file extensions to the loader that reads them.
///
/// `LoaderRegistry::new()` knows `csv` only. New formats are added with
/// [`register_loader`](Self::register_loader).
#[derive(Clone)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn DataLoader>>,
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_loader("csv", Arc::new(CsvLoader::new()));
        registry
    }
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with no formats at all.
    pub fn empty() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Register `loader` for `extension`. A leading dot is ignored and the
    /// extension is matched case-insensitively. Replaces any earlier loader.
    pub fn register_loader(&mut self, extension: &str, loader: Arc<dyn DataLoader>) {
        self.loaders.insert(normalize(extension), loader);
    }

    pub fn get(&self, extension: &str) -> Option<Arc<dyn DataLoader>> {
        self.loaders.get(&normalize(extension)).cloned()
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Load `path` with the loader registered for its extension.
    pub fn load(
        &self,
        path: impl AsRef<Path>,
        target: &mut dyn AttributeStore,
    ) -> Result<usize, DataDrivenError> {
        let path = path.as_ref();
        let loader = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.get(ext))
            .ok_or_else(|| {
                DataDrivenError::InvalidArgument(format!(
                    "unsupported file format: {} (only {} supported)",
                    path.display(),
                    self.extensions().join(", ")
                ))
            })?;
        loader.load(path, target)
    }
}

fn normalize(extension: &str) -> String {
    extension.trim_start_matches('.').to_ascii_lowercase()
}

/// Load a data file into `target`, choosing the format by extension.
///
/// Only `.csv` (any case) is supported; other extensions fail with
/// `InvalidArgument`.
pub fn load_data(
    path: impl AsRef<Path>,
    target: &mut dyn AttributeStore,
) -> Result<usize, DataDrivenError> {
    LoaderRegistry::default().load(path, target)
}
