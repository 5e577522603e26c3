/// Data layer: record types, loading, memoisation and queries.
///
/// Architecture:
/// ```text
///  bundled .csv / data folder / custom .csv .json .parquet
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │ catalog   │────▶│  loader   │  parse file → UsageTable
///   └──────────┘      └──────────┘
///        │  Arc<UsageTable>, cached per label
///        ▼
///   ┌──────────┐
///   │  query    │  filter / group / rank → options and summary rows
///   └──────────┘
/// ```

pub mod catalog;
pub mod loader;
pub mod model;
pub mod query;
