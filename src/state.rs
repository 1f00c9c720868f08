use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::cache::LoadCache;
use crate::data::filter::{Selection, filtered_indices, init_selection};
use crate::data::model::{Dimension, SalesTable};
use crate::data::report::Report;
use crate::geo::MapLayers;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Memoized loads.
    pub cache: LoadCache,

    /// Loaded table (None until a load succeeds, or after a failed one).
    pub table: Option<Arc<SalesTable>>,

    /// Per-dimension filter selections.
    pub selection: Selection,

    /// Indices of rows passing the current selection.
    pub visible_indices: Vec<usize>,

    /// Summaries and groupings of the visible rows.
    pub report: Option<Report>,

    /// Synthetic customer-location layers.
    pub map: MapLayers,

    /// Load error shown instead of the dashboard.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let map = MapLayers::build(&config.map);
        Self {
            config,
            cache: LoadCache::default(),
            table: None,
            selection: Selection::default(),
            visible_indices: Vec::new(),
            report: None,
            map,
            status_message: None,
        }
    }

    /// Load the configured source (through the cache).
    ///
    /// A failure clears any previously loaded table, so nothing stale or
    /// partial is shown next to the error.
    pub fn load(&mut self) {
        match self.cache.get_or_load(&self.config.source) {
            Ok(table) => {
                log::info!(
                    "Loaded {} transactions from {}",
                    table.len(),
                    self.config.source.path.display()
                );
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.config.source.path.display());
                self.table = None;
                self.selection.clear();
                self.visible_indices.clear();
                self.report = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the cached table and load the source again.
    pub fn reload(&mut self) {
        if !self.cache.is_empty() {
            log::debug!("dropping {} cached table(s)", self.cache.len());
        }
        self.cache.invalidate();
        self.load();
    }

    /// Switch to another source file, releasing the table of the old one.
    pub fn open(&mut self, path: PathBuf) {
        if path != self.config.source.path {
            self.cache.evict(&self.config.source);
        }
        self.config.source.path = path;
        self.load();
    }

    /// Ingest a newly loaded table and select everything.
    pub fn set_table(&mut self, table: Arc<SalesTable>) {
        self.selection = init_selection(&table);
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and the report after a selection change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.visible_indices = filtered_indices(table, &self.selection);
            self.report = Some(Report::compute(table, &self.visible_indices));
            log::debug!(
                "{} of {} transactions selected",
                self.visible_indices.len(),
                table.len()
            );
        }
    }

    /// Select every observed value of every dimension.
    pub fn reset_selection(&mut self) {
        if let Some(table) = &self.table {
            self.selection = init_selection(table);
            self.refilter();
        }
    }

    /// Toggle a single value in a dimension's selection.
    pub fn toggle_value(&mut self, dim: Dimension, value: &str) {
        let selected = self.selection.entry(dim).or_default();
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select all values of a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(table) = &self.table {
            let all: BTreeSet<String> = table.distinct(dim).iter().cloned().collect();
            self.selection.insert(dim, all);
            self.refilter();
        }
    }

    /// Deselect all values of a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.selection.insert(dim, BTreeSet::new());
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::data::fixtures::sample_table;

    fn state_with_fixture() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_table(Arc::new(sample_table()));
        state
    }

    #[test]
    fn new_table_shows_everything() {
        let state = state_with_fixture();
        assert_eq!(state.visible_indices.len(), 8);
        assert_eq!(state.report.as_ref().unwrap().summary.transactions, 8);
    }

    #[test]
    fn toggling_values_refilters() {
        let mut state = state_with_fixture();
        state.toggle_value(Dimension::City, "Yangon");
        assert_eq!(state.visible_indices, vec![1, 4, 6, 7]);

        state.toggle_value(Dimension::City, "Yangon");
        assert_eq!(state.visible_indices.len(), 8);
    }

    #[test]
    fn select_none_then_all() {
        let mut state = state_with_fixture();
        state.select_none(Dimension::Gender);
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.report.as_ref().unwrap().summary.average_rating, None);

        state.select_all(Dimension::Gender);
        assert_eq!(state.visible_indices.len(), 8);

        state.select_none(Dimension::Branch);
        state.reset_selection();
        assert_eq!(state.visible_indices.len(), 8);
    }

    #[test]
    fn failed_load_clears_the_dashboard() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with_fixture();
        state.config.source = SourceConfig {
            path: dir.path().join("missing.xlsx"),
            ..SourceConfig::default()
        };
        state.load();

        assert!(state.table.is_none());
        assert!(state.report.is_none());
        assert!(state.visible_indices.is_empty());
        let message = state.status_message.unwrap();
        assert!(message.contains("not found"), "{message}");
    }

    #[test]
    fn open_switches_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        let mut writer = csv::Writer::from_path(&path).unwrap();
        writer
            .write_record([
                "Invoice ID", "Branch", "City", "Customer_type", "Gender", "Product line",
                "Unit price", "Quantity", "Tax 5%", "Total", "Date", "Time", "Payment", "cogs",
                "gross margin percentage", "gross income", "Rating",
            ])
            .unwrap();
        writer
            .write_record([
                "101-17-6199", "A", "Yangon", "Normal", "Male", "Food and beverages", "45.79",
                "7", "16.0265", "336.5565", "3/13/2019", "19:44", "Credit card", "320.53",
                "4.761904762", "16.0265", "7",
            ])
            .unwrap();
        writer.flush().unwrap();

        let mut state = AppState::new(DashboardConfig::default());
        state.open(path.clone());
        assert!(state.status_message.is_none());
        assert_eq!(state.table.as_ref().unwrap().len(), 1);
        assert_eq!(state.report.as_ref().unwrap().sales_by_hour[0].0, 19);
        assert_eq!(state.cache.len(), 1);

        // Opening a second file releases the first one's table.
        let other = dir.path().join("other.csv");
        std::fs::copy(&path, &other).unwrap();
        let previous = state.table.clone().unwrap();
        state.open(other);
        assert_eq!(state.cache.len(), 1);
        assert!(!Arc::ptr_eq(&previous, state.table.as_ref().unwrap()));
    }
}
