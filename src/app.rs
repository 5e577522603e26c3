use eframe::egui::{self, ScrollArea, Ui};

use crate::config::ExplorerConfig;
use crate::state::AppState;
use crate::ui::{panels, plot, tables};

const DISCUSSION: &[&str] = &[
    "How do directive vs collaborative patterns shift between the Claude.ai and 1P API datasets?",
    "Which regions sit above the global usage share, and how might local industries explain that concentration?",
    "Compare two regions of interest: what collaboration pattern differences stand out and what workflows could they reflect?",
];

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AeiExplorerApp {
    pub state: AppState,
}

impl AeiExplorerApp {
    pub fn new(config: ExplorerConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for AeiExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selections ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tables and chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_view(ui, &self.state);
        });
    }
}

fn central_view(ui: &mut Ui, state: &AppState) {
    ui.heading("Anthropic Economic Index Explorer");

    let Some(table) = &state.table else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No dataset loaded  (File → Open… or pick a dataset)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            tables::overview(ui, table);
            if table.is_empty() {
                ui.label("The dataset has a header but no rows.");
            }
            ui.separator();

            ui.heading("Usage concentration");
            ui.label(format!(
                "Top regions by share of conversations for the '{}' geography level.",
                state.geography
            ));
            tables::usage_table(ui, &state.usage_summary, state.ranking.usage_column());
            ui.separator();

            ui.heading(format!("Collaboration patterns: {}", state.region));
            plot::collaboration_chart(ui, state);
            tables::breakdown_table(ui, &state.breakdown);
            ui.separator();

            ui.heading(format!("Analysis dimension: {}", state.facet));
            tables::facet_table(ui, &state.facet_summary);
            ui.separator();

            ui.heading("Discussion prompts");
            for prompt in DISCUSSION {
                ui.label(format!("• {prompt}"));
            }
        });
}
