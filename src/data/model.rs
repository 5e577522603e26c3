use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// UsageRecord – one row of the economic index table
// ---------------------------------------------------------------------------

/// Columns every dataset must provide. Anything else is carried along as
/// an extra column name but never read.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "geo_id",
    "geography",
    "date_start",
    "date_end",
    "facet",
    "variable",
    "cluster_name",
    "value",
];

/// A single observation: one metric for one geographic unit, facet and
/// cluster over a reporting window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsageRecord {
    /// Country code, region name or `GLOBAL`.
    pub geo_id: String,
    /// Granularity the row belongs to (`country`, `country-state`, …).
    pub geography: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// Analysis dimension (`country`, `collaboration`, `onet_task`, …).
    pub facet: String,
    /// Metric name (`usage_pct`, `collaboration_pct`, …).
    pub variable: String,
    /// Sub-category inside the facet; empty when the facet has none.
    #[serde(default, deserialize_with = "empty_if_null")]
    pub cluster_name: String,
    pub value: f64,
}

fn empty_if_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// UsageTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An immutable, fully parsed dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageTable {
    /// All rows, in file order.
    pub records: Vec<UsageRecord>,
    /// Column names as they appeared in the source (includes extras).
    pub column_names: Vec<String>,
}

impl UsageTable {
    pub fn new(records: Vec<UsageRecord>, column_names: Vec<String>) -> Self {
        UsageTable {
            records,
            column_names,
        }
    }

    /// Build a table whose columns are exactly the required schema.
    #[cfg(test)]
    pub fn from_records(records: Vec<UsageRecord>) -> Self {
        let column_names = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        UsageTable::new(records, column_names)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest `date_start` and latest `date_end`, if there are rows.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.records.iter().map(|r| r.date_start).min()?;
        let end = self.records.iter().map(|r| r.date_end).max()?;
        Some((start, end))
    }
}

// ---------------------------------------------------------------------------
// Derived rows handed to the UI
// ---------------------------------------------------------------------------

/// One row of the usage ranking: `(Region, Usage %)`, or the summed total
/// when ranking by grouped sums.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionUsage {
    pub region: String,
    pub usage: f64,
}

/// One row of the collaboration breakdown: `(Collaboration pattern, Share %)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternShare {
    pub pattern: String,
    pub share_pct: f64,
}

/// Summed value of one cluster inside a facet.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[cfg(test)]
pub(crate) fn record(
    geo_id: &str,
    geography: &str,
    facet: &str,
    variable: &str,
    cluster_name: &str,
    value: f64,
) -> UsageRecord {
    UsageRecord {
        geo_id: geo_id.to_string(),
        geography: geography.to_string(),
        date_start: NaiveDate::from_ymd_opt(2025, 8, 4).unwrap(),
        date_end: NaiveDate::from_ymd_opt(2025, 8, 11).unwrap(),
        facet: facet.to_string(),
        variable: variable.to_string(),
        cluster_name: cluster_name.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_spans_all_rows() {
        let mut early = record("US", "country", "country", "usage_pct", "", 1.0);
        early.date_start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let mut late = record("GB", "country", "country", "usage_pct", "", 2.0);
        late.date_end = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();

        let table = UsageTable::from_records(vec![early, late]);
        let (start, end) = table.date_range().unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 9, 30).unwrap());
    }

    #[test]
    fn empty_table_has_no_date_range() {
        let table = UsageTable::from_records(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.date_range(), None);
    }
}
