use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CategoryTotal, PatternShare, RegionUsage, UsageTable};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Dataset overview
// ---------------------------------------------------------------------------

pub fn overview(ui: &mut Ui, table: &UsageTable) {
    ui.heading("Dataset overview");

    let mut columns = table
        .column_names
        .iter()
        .take(6)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if table.column_names.len() > 6 {
        columns.push('…');
    }
    let date_range = table
        .date_range()
        .map(|(start, end)| format!("{start} → {end}"))
        .unwrap_or_else(|| "–".to_string());

    egui::Grid::new("overview")
        .num_columns(2)
        .spacing([24.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Rows");
            ui.label(table.len().to_string());
            ui.end_row();

            ui.strong("Columns");
            ui.label(columns);
            ui.end_row();

            ui.strong("Date range");
            ui.label(date_range);
            ui.end_row();
        });
}

// ---------------------------------------------------------------------------
// Two-column tables
// ---------------------------------------------------------------------------

/// Render `(label, value)` rows under two headers. Values print with two
/// decimals.
fn two_column_table(ui: &mut Ui, id: &str, headers: [&str; 2], rows: &[(&str, f64)]) {
    if rows.is_empty() {
        ui.label(RichText::new("No data for this selection.").italics());
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(Column::auto().at_least(160.0))
            .column(Column::remainder())
            .header(HEADER_HEIGHT, |mut header| {
                for title in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (label, value) in rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(*label);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.monospace(format!("{value:.2}"));
                        });
                    });
                }
            });
    });
}

pub fn usage_table(ui: &mut Ui, rows: &[RegionUsage], value_header: &str) {
    let rows: Vec<(&str, f64)> = rows.iter().map(|r| (r.region.as_str(), r.usage)).collect();
    two_column_table(ui, "usage_table", ["Region", value_header], &rows);
}

pub fn breakdown_table(ui: &mut Ui, rows: &[PatternShare]) {
    let rows: Vec<(&str, f64)> = rows
        .iter()
        .map(|r| (r.pattern.as_str(), r.share_pct))
        .collect();
    two_column_table(
        ui,
        "breakdown_table",
        ["Collaboration pattern", "Share %"],
        &rows,
    );
}

pub fn facet_table(ui: &mut Ui, rows: &[CategoryTotal]) {
    let rows: Vec<(&str, f64)> = rows
        .iter()
        .map(|r| (r.category.as_str(), r.total))
        .collect();
    two_column_table(ui, "facet_table", ["Category", "Total Value"], &rows);
}
