use eframe::egui::{Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{Analysis, AppState};
use crate::stats::SummaryStats;

use super::plot;

const MEM_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
const CPU_COLOR: Color32 = Color32::from_rgb(214, 39, 40);

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// File name, row accounting and view toggles.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        let source = state.analysis.source();
        ui.strong(source.display_name());
        ui.separator();
        ui.label(format!(
            "{} rows loaded, {} dropped, {} plotted",
            source.rows_loaded,
            source.rows_dropped,
            state.analysis.plotted_len()
        ));

        if matches!(state.analysis, Analysis::Durations(_)) {
            ui.separator();
            if ui
                .selectable_label(state.show_trend, "EWMA trend")
                .clicked()
            {
                state.show_trend = !state.show_trend;
            }
        }

        if state.analysis.plotted_len() == 0 {
            ui.separator();
            ui.label(RichText::new("nothing to plot").color(Color32::RED));
        }
    });

    if let Analysis::Durations(analysis) = &state.analysis {
        ui.separator();
        stats_table(ui, &analysis.stats);
    }
}

// ---------------------------------------------------------------------------
// Summary table
// ---------------------------------------------------------------------------

fn stats_table(ui: &mut Ui, stats: &SummaryStats) {
    let cells = [
        ("calls", stats.count.to_string()),
        ("mean / ms", format_stat(stats.mean)),
        ("std / ms", format_stat(stats.std_dev)),
        ("p99 / ms", format_stat(stats.p99)),
    ];

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(90.0), cells.len())
        .header(18.0, |mut header| {
            for (title, _) in &cells {
                header.col(|ui: &mut Ui| {
                    ui.strong(*title);
                });
            }
        })
        .body(|mut body| {
            body.row(18.0, |mut row| {
                for (_, value) in &cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(value);
                    });
                }
            });
        });
}

fn format_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}"))
}

// ---------------------------------------------------------------------------
// Figure: two panels side by side
// ---------------------------------------------------------------------------

pub fn figure(ui: &mut Ui, state: &AppState) {
    ui.columns(2, |columns: &mut [Ui]| match &state.analysis {
        Analysis::Durations(analysis) => {
            plot::duration_trend_plot(&mut columns[0], analysis, state.show_trend);
            plot::duration_histogram_plot(&mut columns[1], analysis);
        }
        Analysis::Resources(analysis) => {
            plot::resource_plot(
                &mut columns[0],
                "MEM",
                &analysis.series,
                &analysis.series.mem,
                "Memory usage of conclave host / %",
                MEM_COLOR,
            );
            plot::resource_plot(
                &mut columns[1],
                "CPU",
                &analysis.series,
                &analysis.series.cpu,
                "CPU usage of conclave host / %",
                CPU_COLOR,
            );
        }
    });
}

/// Window title for the loaded analysis.
pub fn window_title(analysis: &Analysis) -> String {
    let kind = match analysis {
        Analysis::Durations(_) => "Call durations",
        Analysis::Resources(_) => "Memory & CPU",
    };
    format!("Rusty Perfplot – {kind} – {}", analysis.source().display_name())
}
