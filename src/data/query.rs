use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use super::model::{CategoryTotal, PatternShare, RegionUsage, UsageRecord, UsageTable};

pub const USAGE_PCT: &str = "usage_pct";
pub const USAGE_COUNT: &str = "usage_count";
pub const COLLABORATION_FACET: &str = "collaboration";
pub const COLLABORATION_PCT: &str = "collaboration_pct";
pub const NOT_CLASSIFIED: &str = "not_classified";

// ---------------------------------------------------------------------------
// Ordering helpers
// ---------------------------------------------------------------------------

/// Descending order on values with NaN placed last. Used with the stable
/// `sort_by`, so ties keep their input order.
fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

// ---------------------------------------------------------------------------
// Selector options
// ---------------------------------------------------------------------------

/// Distinct geography levels, ascending.
pub fn geography_options(table: &UsageTable) -> Vec<String> {
    distinct_sorted(table.records.iter().map(|r| r.geography.as_str()))
}

/// The `top_n` regions of a geography level by their own usage share.
///
/// Empty when nothing matches; the caller decides on a fallback.
pub fn region_options(table: &UsageTable, geography: &str, top_n: usize) -> Vec<String> {
    usage_summary(table, geography, top_n)
        .into_iter()
        .map(|row| row.region)
        .collect()
}

/// Distinct facets, ascending.
pub fn facet_options(table: &UsageTable) -> Vec<String> {
    distinct_sorted(table.records.iter().map(|r| r.facet.as_str()))
}

/// Distinct classified cluster names of a facet, ascending.
pub fn cluster_names(table: &UsageTable, facet: &str) -> BTreeSet<String> {
    table
        .records
        .iter()
        .filter(|r| r.facet == facet)
        .filter(|r| !r.cluster_name.is_empty() && r.cluster_name != NOT_CLASSIFIED)
        .map(|r| r.cluster_name.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Usage ranking
// ---------------------------------------------------------------------------

/// Rows that report each region's own usage share at `geography`.
fn own_usage_rows<'a>(
    table: &'a UsageTable,
    geography: &'a str,
) -> impl Iterator<Item = &'a UsageRecord> + 'a {
    table.records.iter().filter(move |r| {
        r.geography == geography && r.facet == geography && r.variable == USAGE_PCT
    })
}

/// Top `top_n` regions by usage share. Matching rows pass through one to
/// one; duplicates for a region are not merged.
pub fn usage_summary(table: &UsageTable, geography: &str, top_n: usize) -> Vec<RegionUsage> {
    let mut rows: Vec<RegionUsage> = own_usage_rows(table, geography)
        .map(|r| RegionUsage {
            region: r.geo_id.clone(),
            usage: r.value,
        })
        .collect();
    rows.sort_by(|a, b| descending(a.usage, b.usage));
    rows.truncate(top_n);
    rows
}

/// Top `top_n` regions by the sum of every `usage_count` and `usage_pct`
/// row of the geography level. Equal totals rank by region name.
///
/// `variable` must equal one of the two names exactly; metrics that merely
/// contain them (e.g. `usage_pct_index`) are not summed.
pub fn usage_totals(table: &UsageTable, geography: &str, top_n: usize) -> Vec<RegionUsage> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in table.records.iter().filter(|r| {
        r.geography == geography && (r.variable == USAGE_COUNT || r.variable == USAGE_PCT)
    }) {
        *totals.entry(r.geo_id.as_str()).or_insert(0.0) += r.value;
    }

    let mut rows: Vec<RegionUsage> = totals
        .into_iter()
        .map(|(region, usage)| RegionUsage {
            region: region.to_string(),
            usage,
        })
        .collect();
    rows.sort_by(|a, b| descending(a.usage, b.usage));
    rows.truncate(top_n);
    rows
}

// ---------------------------------------------------------------------------
// Collaboration breakdown
// ---------------------------------------------------------------------------

fn is_collaboration_share(r: &UsageRecord, geography: &str) -> bool {
    r.geography == geography
        && r.facet == COLLABORATION_FACET
        && r.variable == COLLABORATION_PCT
        && r.cluster_name != NOT_CLASSIFIED
}

/// Collaboration pattern shares of one region, largest first.
pub fn collaboration_breakdown(
    table: &UsageTable,
    geography: &str,
    geo_id: &str,
) -> Vec<PatternShare> {
    let mut rows: Vec<PatternShare> = table
        .records
        .iter()
        .filter(|r| r.geo_id == geo_id && is_collaboration_share(r, geography))
        .map(|r| PatternShare {
            pattern: r.cluster_name.clone(),
            share_pct: r.value,
        })
        .collect();
    rows.sort_by(|a, b| descending(a.share_pct, b.share_pct));
    rows
}

/// Collaboration shares summed per pattern, for one region or (`None`)
/// across every region of the geography level.
pub fn collaboration_totals(
    table: &UsageTable,
    geography: &str,
    geo_id: Option<&str>,
) -> Vec<PatternShare> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in table
        .records
        .iter()
        .filter(|r| geo_id.map_or(true, |id| r.geo_id == id))
        .filter(|r| is_collaboration_share(r, geography))
    {
        *totals.entry(r.cluster_name.as_str()).or_insert(0.0) += r.value;
    }

    let mut rows: Vec<PatternShare> = totals
        .into_iter()
        .map(|(pattern, share_pct)| PatternShare {
            pattern: pattern.to_string(),
            share_pct,
        })
        .collect();
    rows.sort_by(|a, b| descending(a.share_pct, b.share_pct));
    rows
}

// ---------------------------------------------------------------------------
// Facet analysis
// ---------------------------------------------------------------------------

/// The `top_n` clusters of a facet by summed value.
pub fn facet_summary(table: &UsageTable, facet: &str, top_n: usize) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in table
        .records
        .iter()
        .filter(|r| r.facet == facet && !r.cluster_name.is_empty())
    {
        *totals.entry(r.cluster_name.as_str()).or_insert(0.0) += r.value;
    }

    let mut rows: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    rows.sort_by(|a, b| descending(a.total, b.total));
    rows.truncate(top_n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::record;
    use proptest::prelude::*;

    fn country_table() -> UsageTable {
        UsageTable::from_records(vec![
            record("GB", "country", "country", "usage_pct", "", 41.0),
            record("US", "country", "country", "usage_pct", "", 58.2),
            record("US", "country", "country", "usage_count", "", 15420.0),
            record("DE", "country-state", "country-state", "usage_pct", "", 12.0),
            record("US", "country", "collaboration", "collaboration_pct", "not_classified", 58.2),
            record("US", "country", "collaboration", "collaboration_pct", "task iteration", 41.8),
            record("US", "country", "collaboration", "collaboration_count", "task iteration", 11080.0),
            record("US", "country", "collaboration", "collaboration_pct", "directive", 30.0),
            record("GB", "country", "collaboration", "collaboration_pct", "directive", 20.0),
        ])
    }

    #[test]
    fn geography_options_are_sorted_and_distinct() {
        let table = country_table();
        assert_eq!(geography_options(&table), vec!["country", "country-state"]);
        assert!(geography_options(&UsageTable::from_records(Vec::new())).is_empty());
    }

    #[test]
    fn usage_summary_ranks_regions() {
        let summary = usage_summary(&country_table(), "country", 10);
        assert_eq!(
            summary,
            vec![
                RegionUsage { region: "US".into(), usage: 58.2 },
                RegionUsage { region: "GB".into(), usage: 41.0 },
            ]
        );
        assert_eq!(usage_summary(&country_table(), "country", 1).len(), 1);
    }

    #[test]
    fn usage_summary_keeps_duplicate_regions() {
        let table = UsageTable::from_records(vec![
            record("US", "country", "country", "usage_pct", "", 10.0),
            record("US", "country", "country", "usage_pct", "", 20.0),
        ]);
        let summary = usage_summary(&table, "country", 10);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].usage, 20.0);
    }

    #[test]
    fn ties_keep_input_order() {
        let table = UsageTable::from_records(vec![
            record("FR", "country", "country", "usage_pct", "", 5.0),
            record("BE", "country", "country", "usage_pct", "", 5.0),
            record("NL", "country", "country", "usage_pct", "", 7.0),
        ]);
        assert_eq!(region_options(&table, "country", 25), vec!["NL", "FR", "BE"]);
    }

    #[test]
    fn nan_values_rank_last() {
        let table = UsageTable::from_records(vec![
            record("XX", "country", "country", "usage_pct", "", f64::NAN),
            record("US", "country", "country", "usage_pct", "", 1.0),
        ]);
        assert_eq!(region_options(&table, "country", 25), vec!["US", "XX"]);
    }

    #[test]
    fn region_options_empty_for_unknown_geography() {
        assert!(region_options(&country_table(), "continent", 25).is_empty());
    }

    #[test]
    fn usage_ranking_requires_matching_facet() {
        let mut records = country_table().records;
        records.push(record("US", "country", "collaboration", "usage_pct", "", 99.0));
        records.push(record("FR", "country", "collaboration", "usage_pct", "", 98.0));
        let table = UsageTable::from_records(records);

        let summary = usage_summary(&table, "country", 10);
        assert!(summary.iter().all(|row| row.usage != 99.0 && row.usage != 98.0));
        assert_eq!(summary.len(), 2);
        assert_eq!(region_options(&table, "country", 25), vec!["US", "GB"]);
    }

    #[test]
    fn breakdown_requires_matching_geography() {
        let mut records = country_table().records;
        records.push(record("US", "country-state", "collaboration", "collaboration_pct", "directive", 88.0));
        let table = UsageTable::from_records(records);

        let breakdown = collaboration_breakdown(&table, "country", "US");
        assert!(breakdown.iter().all(|row| row.share_pct != 88.0));
        assert_eq!(breakdown.len(), 2);

        let state_level = collaboration_breakdown(&table, "country-state", "US");
        assert_eq!(
            state_level,
            vec![PatternShare { pattern: "directive".into(), share_pct: 88.0 }]
        );
    }

    #[test]
    fn usage_totals_ignore_lookalike_variables() {
        let table = UsageTable::from_records(vec![
            record("US", "country", "country", "usage_pct", "", 10.0),
            record("US", "country", "country", "usage_pct_index", "", 1000.0),
        ]);
        assert_eq!(
            usage_totals(&table, "country", 10),
            vec![RegionUsage { region: "US".into(), usage: 10.0 }]
        );
    }

    #[test]
    fn usage_totals_sum_counts_and_shares() {
        let totals = usage_totals(&country_table(), "country", 10);
        assert_eq!(totals[0].region, "US");
        assert!((totals[0].usage - (58.2 + 15420.0)).abs() < 1e-9);
        assert_eq!(totals[1], RegionUsage { region: "GB".into(), usage: 41.0 });
    }

    #[test]
    fn breakdown_drops_unclassified_and_sorts() {
        let breakdown = collaboration_breakdown(&country_table(), "country", "US");
        assert_eq!(
            breakdown,
            vec![
                PatternShare { pattern: "task iteration".into(), share_pct: 41.8 },
                PatternShare { pattern: "directive".into(), share_pct: 30.0 },
            ]
        );
    }

    #[test]
    fn breakdown_of_only_unclassified_rows_is_empty() {
        let table = UsageTable::from_records(vec![record(
            "AD",
            "country",
            "collaboration",
            "collaboration_pct",
            "not_classified",
            100.0,
        )]);
        assert!(collaboration_breakdown(&table, "country", "AD").is_empty());
    }

    #[test]
    fn collaboration_totals_span_all_regions() {
        let totals = collaboration_totals(&country_table(), "country", None);
        assert_eq!(
            totals,
            vec![
                PatternShare { pattern: "directive".into(), share_pct: 50.0 },
                PatternShare { pattern: "task iteration".into(), share_pct: 41.8 },
            ]
        );

        let gb = collaboration_totals(&country_table(), "country", Some("GB"));
        assert_eq!(gb, vec![PatternShare { pattern: "directive".into(), share_pct: 20.0 }]);
    }

    #[test]
    fn facet_summary_groups_clusters() {
        let summary = facet_summary(&country_table(), "collaboration", 15);
        assert_eq!(summary[0].category, "task iteration");
        assert!((summary[0].total - (41.8 + 11080.0)).abs() < 1e-9);
        assert!(summary.iter().any(|row| row.category == "not_classified"));
        assert_eq!(facet_summary(&country_table(), "collaboration", 1).len(), 1);
        assert!(facet_summary(&country_table(), "country", 15).is_empty());
    }

    #[test]
    fn cluster_names_skip_unclassified() {
        let names: Vec<String> = cluster_names(&country_table(), COLLABORATION_FACET)
            .into_iter()
            .collect();
        assert_eq!(names, vec!["directive", "task iteration"]);
    }

    // -- properties over generated tables --

    fn arb_record() -> impl Strategy<Value = UsageRecord> {
        (
            prop::sample::select(vec!["US", "GB", "CA", "DE", "IN"]),
            prop::sample::select(vec!["country", "country-state"]),
            prop::sample::select(vec!["country", "country-state", "collaboration"]),
            prop::sample::select(vec!["usage_pct", "usage_count", "collaboration_pct"]),
            prop::sample::select(vec!["directive", "task iteration", "not_classified"]),
            0.0f64..100.0,
        )
            .prop_map(|(geo, geography, facet, variable, cluster, value)| {
                record(geo, geography, facet, variable, cluster, value)
            })
    }

    fn arb_table() -> impl Strategy<Value = UsageTable> {
        prop::collection::vec(arb_record(), 0..60).prop_map(UsageTable::from_records)
    }

    proptest! {
        #[test]
        fn geography_options_strictly_ascending(table in arb_table()) {
            let options = geography_options(&table);
            prop_assert!(options.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn region_options_bounded_and_ranked(table in arb_table(), top_n in 0usize..8) {
            let options = region_options(&table, "country", top_n);
            let summary = usage_summary(&table, "country", top_n);
            prop_assert!(options.len() <= top_n);
            prop_assert_eq!(
                &options,
                &summary.iter().map(|row| row.region.clone()).collect::<Vec<_>>()
            );
            prop_assert!(summary.windows(2).all(|w| w[0].usage >= w[1].usage));
            for region in &options {
                prop_assert!(table.records.iter().any(|r| &r.geo_id == region
                    && r.geography == "country"
                    && r.facet == "country"
                    && r.variable == USAGE_PCT));
            }
        }

        #[test]
        fn breakdown_never_lists_unclassified(table in arb_table()) {
            for geo in ["US", "GB", "CA", "DE", "IN"] {
                let breakdown = collaboration_breakdown(&table, "country", geo);
                prop_assert!(breakdown.iter().all(|row| row.pattern != NOT_CLASSIFIED));
                prop_assert!(breakdown.windows(2).all(|w| w[0].share_pct >= w[1].share_pct));
            }
        }

        #[test]
        fn queries_are_repeatable(table in arb_table()) {
            prop_assert_eq!(usage_summary(&table, "country", 10), usage_summary(&table, "country", 10));
            prop_assert_eq!(usage_totals(&table, "country", 10), usage_totals(&table, "country", 10));
            prop_assert_eq!(
                collaboration_totals(&table, "country", None),
                collaboration_totals(&table, "country", None)
            );
        }
    }
}
