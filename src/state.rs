use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::{ExplorerConfig, RankingPolicy};
use crate::data::catalog::{DataSource, DatasetCatalog, DatasetLabel};
use crate::data::loader;
use crate::data::model::{CategoryTotal, PatternShare, RegionUsage, UsageTable};
use crate::data::query;

/// Region selector entry that sums collaboration shares over every region.
pub const ALL_REGIONS: &str = "ALL";

/// Where the table on screen came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveDataset {
    Bundled(DatasetLabel),
    File(PathBuf),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Selections flow through a fixed pipeline; each setter recomputes only
/// what sits downstream of it:
/// dataset → geography → region → {usage summary, breakdown}, and
/// dataset → facet → facet summary.
pub struct AppState {
    pub config: ExplorerConfig,
    catalog: DatasetCatalog,

    /// Dataset on screen (None until a load succeeds).
    pub active: Option<ActiveDataset>,
    pub table: Option<Arc<UsageTable>>,

    pub geography_options: Vec<String>,
    pub geography: String,
    pub region_options: Vec<String>,
    pub region: String,
    pub ranking: RankingPolicy,
    pub usage_summary: Vec<RegionUsage>,
    pub breakdown: Vec<PatternShare>,

    pub facet_options: Vec<String>,
    pub facet: String,
    pub facet_summary: Vec<CategoryTotal>,

    /// Colours for collaboration patterns of the current dataset.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state and load the configured default dataset.
    pub fn new(config: ExplorerConfig) -> Self {
        let default_dataset = config.default_dataset;
        let mut state = Self {
            ranking: config.ranking,
            region: config.fallback_region.clone(),
            geography: config.default_geography.clone(),
            config,
            catalog: DatasetCatalog::embedded(),
            active: None,
            table: None,
            geography_options: Vec::new(),
            region_options: Vec::new(),
            usage_summary: Vec::new(),
            breakdown: Vec::new(),
            facet_options: Vec::new(),
            facet: String::new(),
            facet_summary: Vec::new(),
            color_map: None,
            status_message: None,
        };
        state.select_dataset(default_dataset);
        state
    }

    pub fn data_source(&self) -> &DataSource {
        self.catalog.source()
    }

    /// Label of the bundled dataset on screen, if any.
    pub fn bundled_label(&self) -> Option<DatasetLabel> {
        match &self.active {
            Some(ActiveDataset::Bundled(label)) => Some(*label),
            _ => None,
        }
    }

    /// Human-readable name of the dataset on screen.
    pub fn dataset_name(&self) -> Option<String> {
        match &self.active {
            Some(ActiveDataset::Bundled(label)) => Some(label.to_string()),
            Some(ActiveDataset::File(path)) => Some(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            ),
            None => None,
        }
    }

    // -- dataset stage --

    /// Switch to one of the bundled datasets (memoised by the catalog).
    pub fn select_dataset(&mut self, label: DatasetLabel) {
        match self.catalog.load(label.as_str()) {
            Ok(table) => {
                self.active = Some(ActiveDataset::Bundled(label));
                self.set_table(table);
            }
            Err(e) => {
                log::error!("{e}");
                self.clear(format!("Error: {e}"));
            }
        }
    }

    /// Load an arbitrary CSV / JSON / Parquet file, bypassing the catalog.
    pub fn open_file(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows from {} with columns {:?}",
                    table.len(),
                    path.display(),
                    table.column_names
                );
                self.active = Some(ActiveDataset::File(path.to_path_buf()));
                self.set_table(Arc::new(table));
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Read the full exports from `dir` from now on.
    pub fn use_data_directory(&mut self, dir: PathBuf) {
        log::info!("Reading datasets from {}", dir.display());
        self.replace_catalog(DatasetCatalog::from_directory(dir));
    }

    /// Go back to the samples compiled into the binary.
    pub fn use_bundled_samples(&mut self) {
        self.replace_catalog(DatasetCatalog::embedded());
    }

    fn replace_catalog(&mut self, catalog: DatasetCatalog) {
        self.catalog = catalog;
        let label = self.bundled_label().unwrap_or(self.config.default_dataset);
        self.select_dataset(label);
    }

    fn set_table(&mut self, table: Arc<UsageTable>) {
        self.geography_options = query::geography_options(&table);
        self.geography = if self.geography_options.contains(&self.config.default_geography) {
            self.config.default_geography.clone()
        } else {
            self.geography_options
                .first()
                .cloned()
                .unwrap_or_else(|| self.config.default_geography.clone())
        };

        self.facet_options = query::facet_options(&table);
        self.facet = self.facet_options.first().cloned().unwrap_or_default();

        self.color_map = Some(ColorMap::new(&query::cluster_names(
            &table,
            query::COLLABORATION_FACET,
        )));
        self.table = Some(table);
        self.status_message = None;

        self.refresh_regions();
        self.refresh_facet_summary();
    }

    fn clear(&mut self, message: String) {
        self.active = None;
        self.table = None;
        self.geography_options.clear();
        self.region_options.clear();
        self.usage_summary.clear();
        self.breakdown.clear();
        self.facet_options.clear();
        self.facet_summary.clear();
        self.color_map = None;
        self.status_message = Some(message);
    }

    // -- geography / region stage --

    pub fn set_geography(&mut self, geography: String) {
        if geography == self.geography {
            return;
        }
        log::debug!("Geography level set to '{geography}'");
        self.geography = geography;
        self.refresh_regions();
    }

    pub fn set_region(&mut self, region: String) {
        if region == self.region {
            return;
        }
        log::debug!("Region focus set to '{region}'");
        self.region = region;
        self.refresh_views();
    }

    pub fn set_ranking(&mut self, ranking: RankingPolicy) {
        if ranking == self.ranking {
            return;
        }
        log::debug!("Ranking policy set to {ranking:?}");
        self.ranking = ranking;
        self.refresh_views();
    }

    fn refresh_regions(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.region_options =
            query::region_options(table, &self.geography, self.config.region_top_n);
        self.region = match self.region_options.first() {
            Some(top) => top.clone(),
            None => {
                log::warn!(
                    "No regions ranked for geography '{}', using '{}'",
                    self.geography,
                    self.config.fallback_region
                );
                self.config.fallback_region.clone()
            }
        };
        self.refresh_views();
    }

    fn refresh_views(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        let top_n = self.config.summary_top_n;

        self.usage_summary = match self.ranking {
            RankingPolicy::TopRow => query::usage_summary(table, &self.geography, top_n),
            RankingPolicy::GroupedSum => query::usage_totals(table, &self.geography, top_n),
        };

        self.breakdown = if self.region == ALL_REGIONS {
            query::collaboration_totals(table, &self.geography, None)
        } else {
            match self.ranking {
                RankingPolicy::TopRow => {
                    query::collaboration_breakdown(table, &self.geography, &self.region)
                }
                RankingPolicy::GroupedSum => {
                    query::collaboration_totals(table, &self.geography, Some(self.region.as_str()))
                }
            }
        };
    }

    // -- facet stage --

    pub fn set_facet(&mut self, facet: String) {
        if facet == self.facet {
            return;
        }
        log::debug!("Facet set to '{facet}'");
        self.facet = facet;
        self.refresh_facet_summary();
    }

    fn refresh_facet_summary(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        self.facet_summary = query::facet_summary(table, &self.facet, self.config.facet_top_n);
    }
}
