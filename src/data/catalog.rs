use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;

use super::loader;
use super::model::UsageTable;
use crate::error::DatasetError;

const CLAUDE_AI_SAMPLE: &str = include_str!("../../data/claude_ai_sample.csv");
const API_SAMPLE: &str = include_str!("../../data/api_sample.csv");

// ---------------------------------------------------------------------------
// DatasetLabel – the fixed set of published datasets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetLabel {
    ClaudeAi,
    FirstPartyApi,
}

impl DatasetLabel {
    pub const ALL: [DatasetLabel; 2] = [DatasetLabel::ClaudeAi, DatasetLabel::FirstPartyApi];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetLabel::ClaudeAi => "Claude.ai usage",
            DatasetLabel::FirstPartyApi => "1P API usage",
        }
    }

    /// File name of the full export inside a data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            DatasetLabel::ClaudeAi => "aei_raw_claude_ai_2025-08-04_to_2025-08-11.csv",
            DatasetLabel::FirstPartyApi => "aei_raw_1p_api_2025-08-04_to_2025-08-11.csv",
        }
    }

    fn embedded(self) -> &'static str {
        match self {
            DatasetLabel::ClaudeAi => CLAUDE_AI_SAMPLE,
            DatasetLabel::FirstPartyApi => API_SAMPLE,
        }
    }
}

impl fmt::Display for DatasetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetLabel {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| DatasetError::UnknownLabel(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// DatasetCatalog – label → parsed table, memoised for the process lifetime
// ---------------------------------------------------------------------------

/// Where the catalog reads its datasets from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Sample CSVs compiled into the binary.
    Embedded,
    /// Full exports under a directory, looked up by [`DatasetLabel::file_name`].
    Directory(PathBuf),
}

/// Resolves dataset labels to tables. Each label is parsed at most once;
/// failed loads are not cached.
#[derive(Debug)]
pub struct DatasetCatalog {
    source: DataSource,
    cache: HashMap<DatasetLabel, Arc<UsageTable>>,
}

impl DatasetCatalog {
    pub fn new(source: DataSource) -> Self {
        DatasetCatalog {
            source,
            cache: HashMap::new(),
        }
    }

    pub fn embedded() -> Self {
        DatasetCatalog::new(DataSource::Embedded)
    }

    pub fn from_directory(dir: impl Into<PathBuf>) -> Self {
        DatasetCatalog::new(DataSource::Directory(dir.into()))
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    #[cfg(test)]
    pub fn is_cached(&self, label: DatasetLabel) -> bool {
        self.cache.contains_key(&label)
    }

    /// Load a dataset by its display label.
    pub fn load(&mut self, label: &str) -> Result<Arc<UsageTable>, DatasetError> {
        let label: DatasetLabel = label.parse()?;
        self.load_label(label)
    }

    pub fn load_label(&mut self, label: DatasetLabel) -> Result<Arc<UsageTable>, DatasetError> {
        if let Some(table) = self.cache.get(&label) {
            log::debug!("Dataset '{label}' served from cache");
            return Ok(Arc::clone(table));
        }

        let (resource, parsed) = match &self.source {
            DataSource::Embedded => (
                format!("bundled sample '{}'", label.file_name()),
                loader::parse_csv(label.embedded().as_bytes()),
            ),
            DataSource::Directory(dir) => {
                let path = dir.join(label.file_name());
                let parsed = std::fs::File::open(&path)
                    .with_context(|| format!("opening {}", path.display()))
                    .and_then(loader::parse_csv);
                (path.display().to_string(), parsed)
            }
        };

        let table = parsed.map_err(|source| DatasetError::Parse {
            label: label.to_string(),
            resource: resource.clone(),
            source,
        })?;
        log::info!(
            "Loaded dataset '{label}' from {resource}: {} rows, columns {:?}",
            table.len(),
            table.column_names
        );

        let table = Arc::new(table);
        self.cache.insert(label, Arc::clone(&table));
        Ok(table)
    }
}
