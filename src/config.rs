use crate::data::catalog::DatasetLabel;

/// How the usage ranking and per-region breakdown are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingPolicy {
    /// One `usage_pct` row per region, one `collaboration_pct` row per pattern.
    TopRow,
    /// Sum every matching row per region / pattern before ranking.
    GroupedSum,
}

impl RankingPolicy {
    /// Header of the value column in the usage table.
    pub fn usage_column(self) -> &'static str {
        match self {
            RankingPolicy::TopRow => "Usage %",
            RankingPolicy::GroupedSum => "Total Usage",
        }
    }
}

/// Explorer settings. Everything has a fixed default; there is no config file.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Dataset shown at start-up.
    pub default_dataset: DatasetLabel,
    /// Preferred geography level when the dataset has it.
    pub default_geography: String,
    /// Region used when a geography level ranks no regions.
    pub fallback_region: String,
    /// Entries in the region selector.
    pub region_top_n: usize,
    /// Rows in the usage table.
    pub summary_top_n: usize,
    /// Rows in the facet table.
    pub facet_top_n: usize,
    pub ranking: RankingPolicy,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            window_size: [1200.0, 800.0],
            min_window_size: [600.0, 400.0],
            default_dataset: DatasetLabel::ClaudeAi,
            default_geography: "country".to_string(),
            fallback_region: "GLOBAL".to_string(),
            region_top_n: 25,
            summary_top_n: 10,
            facet_top_n: 15,
            ranking: RankingPolicy::TopRow,
        }
    }
}
