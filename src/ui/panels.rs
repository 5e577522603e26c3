use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::RankingPolicy;
use crate::data::catalog::{DataSource, DatasetLabel};
use crate::state::{ALL_REGIONS, AppState};

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Dataset ----
            ui.strong("Select dataset");
            let current = state.bundled_label();
            for label in DatasetLabel::ALL {
                if ui.radio(current == Some(label), label.as_str()).clicked() {
                    state.select_dataset(label);
                }
            }
            ui.separator();

            if state.table.is_none() {
                ui.label("No dataset loaded.");
                return;
            }

            // ---- Geography level ----
            ui.strong("Geography level");
            let mut geography = state.geography.clone();
            egui::ComboBox::from_id_salt("geography")
                .selected_text(&geography)
                .show_ui(ui, |ui: &mut Ui| {
                    for option in &state.geography_options {
                        ui.selectable_value(&mut geography, option.clone(), option);
                    }
                });
            state.set_geography(geography);

            // ---- Region focus ----
            ui.strong("Region focus");
            let mut region = state.region.clone();
            egui::ComboBox::from_id_salt("region")
                .selected_text(&region)
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut region, ALL_REGIONS.to_string(), "ALL (every region)");
                    if state.region_options.is_empty() {
                        let fallback = state.config.fallback_region.clone();
                        ui.selectable_value(&mut region, fallback.clone(), fallback);
                    }
                    for option in &state.region_options {
                        ui.selectable_value(&mut region, option.clone(), option);
                    }
                });
            state.set_region(region);

            let mut grouped = state.ranking == RankingPolicy::GroupedSum;
            if ui
                .checkbox(&mut grouped, "Sum all matching rows")
                .on_hover_text("Rank regions and patterns by summed values instead of the single share row")
                .changed()
            {
                state.set_ranking(if grouped {
                    RankingPolicy::GroupedSum
                } else {
                    RankingPolicy::TopRow
                });
            }
            ui.separator();

            // ---- Facet ----
            ui.strong("Analysis dimension (facet)");
            let mut facet = state.facet.clone();
            egui::ComboBox::from_id_salt("facet")
                .selected_text(&facet)
                .show_ui(ui, |ui: &mut Ui| {
                    for option in &state.facet_options {
                        ui.selectable_value(&mut facet, option.clone(), option);
                    }
                });
            state.set_facet(facet);
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Use data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            let bundled = *state.data_source() == DataSource::Embedded;
            if ui
                .add_enabled(!bundled, egui::Button::new("Use bundled samples"))
                .clicked()
            {
                state.use_bundled_samples();
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(name), Some(table)) = (state.dataset_name(), &state.table) {
            ui.label(format!("{name}: {} rows", table.len()));
        }
        if let DataSource::Directory(dir) = state.data_source() {
            ui.label(RichText::new(format!("folder: {}", dir.display())).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open usage data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_file(&path);
    }
}

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Folder with the full AEI exports")
        .pick_folder();

    if let Some(dir) = folder {
        state.use_data_directory(dir);
    }
}
