//! Translator seam: per-source normalization into the common schema.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Normalizes one vendor file into the common intermediate schema.
///
/// Implementations live with their retrieval source; the chunker only
/// needs "input path to output path, success or failure". Failures are
/// surfaced through `anyhow` and abort that day's processing only.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Identity translator for inputs already in the common schema.
pub struct CopyTranslator;

#[async_trait]
impl Translator for CopyTranslator {
    async fn translate(&self, input: &Path, output: &Path) -> Result<()> {
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}

/// Lookup table of translators keyed by source name.
#[derive(Clone)]
pub struct TranslatorRegistry {
    translators: HashMap<String, Arc<dyn Translator>>,
}

impl TranslatorRegistry {
    /// Registry pre-seeded with the identity translator as `default`.
    pub fn new() -> Self {
        let mut registry = Self {
            translators: HashMap::new(),
        };
        registry.register("default", Arc::new(CopyTranslator));
        registry
    }

    pub fn register(&mut self, source: impl Into<String>, translator: Arc<dyn Translator>) {
        self.translators.insert(source.into(), translator);
    }

    pub fn get(&self, source: &str) -> Option<Arc<dyn Translator>> {
        self.translators.get(source).cloned()
    }

    /// Registered source names, sorted for error messages.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.translators.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for TranslatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
