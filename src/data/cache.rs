use std::collections::HashMap;
use std::sync::Arc;

use super::error::LoadError;
use super::loader::load_source;
use super::model::SalesTable;
use crate::config::SourceConfig;

/// Memoized loads, keyed by the full source description.
///
/// A table is parsed at most once per key until [`LoadCache::invalidate`]
/// is called. Failed loads are not cached.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: HashMap<SourceConfig, Arc<SalesTable>>,
}

impl LoadCache {
    pub fn get_or_load(&mut self, source: &SourceConfig) -> Result<Arc<SalesTable>, LoadError> {
        self.get_or_load_with(source, load_source)
    }

    /// Same as [`LoadCache::get_or_load`] with an explicit loader.
    pub fn get_or_load_with<F>(
        &mut self,
        source: &SourceConfig,
        load: F,
    ) -> Result<Arc<SalesTable>, LoadError>
    where
        F: FnOnce(&SourceConfig) -> Result<SalesTable, LoadError>,
    {
        if let Some(table) = self.entries.get(source) {
            log::debug!("cache hit for {}", source.path.display());
            return Ok(Arc::clone(table));
        }
        let table = Arc::new(load(source)?);
        self.entries.insert(source.clone(), Arc::clone(&table));
        Ok(table)
    }

    /// Drop the memoized table of one source.
    pub fn evict(&mut self, source: &SourceConfig) {
        if self.entries.remove(source).is_some() {
            log::debug!("evicted cached table for {}", source.path.display());
        }
    }

    /// Drop every memoized table.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::fixtures::sample_table;

    #[test]
    fn second_load_is_served_from_cache() {
        let mut cache = LoadCache::default();
        let source = SourceConfig::default();
        let calls = Cell::new(0);
        let load = |_: &SourceConfig| {
            calls.set(calls.get() + 1);
            Ok(sample_table())
        };

        let first = cache.get_or_load_with(&source, load).unwrap();
        let second = cache.get_or_load_with(&source, load).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let mut cache = LoadCache::default();
        let source = SourceConfig::default();
        let calls = Cell::new(0);
        let load = |_: &SourceConfig| {
            calls.set(calls.get() + 1);
            Ok(sample_table())
        };

        cache.get_or_load_with(&source, load).unwrap();
        cache.invalidate();
        assert!(cache.is_empty());
        cache.get_or_load_with(&source, load).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn evict_drops_only_that_source() {
        let mut cache = LoadCache::default();
        let first = SourceConfig::default();
        let second = SourceConfig {
            path: "other.csv".into(),
            ..SourceConfig::default()
        };
        cache.get_or_load_with(&first, |_| Ok(sample_table())).unwrap();
        cache.get_or_load_with(&second, |_| Ok(sample_table())).unwrap();
        assert_eq!(cache.len(), 2);

        cache.evict(&first);
        assert_eq!(cache.len(), 1);
        let calls = Cell::new(0);
        cache
            .get_or_load_with(&second, |_| {
                calls.set(calls.get() + 1);
                Ok(sample_table())
            })
            .unwrap();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache = LoadCache::default();
        let source = SourceConfig::default();

        let err = cache
            .get_or_load_with(&source, |s| Err(LoadError::NotFound(s.path.clone())))
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert!(cache.is_empty());

        cache.get_or_load_with(&source, |_| Ok(sample_table())).unwrap();
        assert_eq!(cache.len(), 1);
    }
}
