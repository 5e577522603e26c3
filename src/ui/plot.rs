use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::data::model::PatternShare;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Collaboration bar chart
// ---------------------------------------------------------------------------

/// Horizontal bar chart of the current collaboration breakdown, largest
/// share on top.
pub fn collaboration_chart(ui: &mut Ui, state: &AppState) {
    if state.breakdown.is_empty() {
        ui.label(
            RichText::new(format!(
                "No classified collaboration data for {}.",
                state.region
            ))
            .italics(),
        );
        return;
    }

    let n = state.breakdown.len();
    let patterns = patterns_of(&state.breakdown);

    Plot::new("collaboration_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Share of conversations (%)")
        .y_axis_label("Pattern")
        .y_axis_formatter(move |mark, _range| {
            pattern_at(&patterns, mark.value)
                .map(str::to_owned)
                .unwrap_or_default()
        })
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            // One chart per pattern so every pattern gets a legend entry.
            for (i, row) in state.breakdown.iter().enumerate() {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&row.pattern))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let bar = Bar::new(bar_position(i, n), row.share_pct)
                    .name(format!("{}: {:.2}%", row.pattern, row.share_pct))
                    .fill(color);

                let chart = BarChart::new(vec![bar])
                    .name(&row.pattern)
                    .color(color)
                    .width(0.7)
                    .horizontal();

                plot_ui.bar_chart(chart);
            }
        });
}

/// Y position of the `i`-th of `n` bars; the first (largest) bar sits on top.
fn bar_position(i: usize, n: usize) -> f64 {
    (n - i) as f64
}

/// Pattern drawn at a y position, if the position is one of the bars.
fn pattern_at(patterns: &[String], position: f64) -> Option<&str> {
    let n = patterns.len();
    if position.fract() != 0.0 || position < 1.0 || position > n as f64 {
        return None;
    }
    patterns.get(n - position as usize).map(String::as_str)
}

fn patterns_of(rows: &[PatternShare]) -> Vec<String> {
    rows.iter().map(|r| r.pattern.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_ticks_name_the_bar_at_each_position() {
        let rows = vec![
            PatternShare { pattern: "task iteration".into(), share_pct: 41.8 },
            PatternShare { pattern: "directive".into(), share_pct: 30.0 },
            PatternShare { pattern: "learning".into(), share_pct: 12.5 },
        ];
        let patterns = patterns_of(&rows);
        let n = patterns.len();

        for (i, row) in rows.iter().enumerate() {
            assert_eq!(pattern_at(&patterns, bar_position(i, n)), Some(row.pattern.as_str()));
        }
        assert_eq!(pattern_at(&patterns, 3.0), Some("task iteration"));
    }

    #[test]
    fn axis_ticks_between_or_outside_bars_are_blank() {
        let patterns = vec!["directive".to_string(), "learning".to_string()];
        assert_eq!(pattern_at(&patterns, 0.0), None);
        assert_eq!(pattern_at(&patterns, 1.5), None);
        assert_eq!(pattern_at(&patterns, 3.0), None);
        assert_eq!(pattern_at(&patterns, -1.0), None);
        assert_eq!(pattern_at(&[], 1.0), None);
    }
}
