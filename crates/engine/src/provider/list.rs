use std::sync::Arc;

use recdata_types::Record;
use tracing::debug;

use super::{DataProvider, ProviderResolver};

/// Ordered provider list.
///
/// Resolution keeps insertion order and drops providers whose
/// [`DataProvider::triggers`] rejects the target.
#[derive(Debug, Clone, Default)]
pub struct ProviderList {
    providers: Vec<Arc<dyn DataProvider>>,
}

impl ProviderList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl DataProvider + 'static) -> Self {
        self.push(Arc::new(provider));
        self
    }

    pub fn push(&mut self, provider: Arc<dyn DataProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ProviderResolver for ProviderList {
    fn resolve_providers(&self, table: &str, field: &str, record: &Record) -> Vec<Arc<dyn DataProvider>> {
        let selected: Vec<Arc<dyn DataProvider>> = self
            .providers
            .iter()
            .filter(|provider| provider.triggers(table, field, record))
            .cloned()
            .collect();
        debug!(
            table = %table,
            field = %field,
            registered = self.providers.len(),
            selected = selected.len(),
            "providers resolved"
        );
        selected
    }
}
