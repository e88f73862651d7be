use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDateTime};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::data::model::ResourceSeries;
use crate::state::DurationAnalysis;
use crate::stats::Histogram;

const SAMPLE_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
const TREND_COLOR: Color32 = Color32::from_rgb(255, 165, 0);

/// Bars start here on the log axis so single-count buckets stay visible.
const LOG_BASE: f64 = -0.5;

// ---------------------------------------------------------------------------
// Duration panels
// ---------------------------------------------------------------------------

/// Scatter of every measured call with the EWMA trend on top.
pub fn duration_trend_plot(ui: &mut Ui, analysis: &DurationAnalysis, show_trend: bool) {
    let durations = &analysis.series.durations_ms;
    if durations.is_empty() {
        ui.label("No measured calls in this log.");
    }

    Plot::new("duration_trend")
        .legend(Legend::default())
        .x_axis_label("Call index")
        .y_axis_label("Duration / milliseconds")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let samples: PlotPoints = indexed(durations).collect();
            plot_ui.points(
                Points::new(samples)
                    .name("duration")
                    .shape(MarkerShape::Cross)
                    .radius(2.5)
                    .color(SAMPLE_COLOR),
            );

            if show_trend {
                let trend: PlotPoints = indexed(&analysis.stats.smoothed).collect();
                plot_ui.line(Line::new(trend).name("EWMA").color(TREND_COLOR).width(2.0));
            }
        });
}

/// Histogram of call durations with a logarithmic count axis.
pub fn duration_histogram_plot(ui: &mut Ui, analysis: &DurationAnalysis) {
    let bars: Vec<Bar> = analysis
        .stats
        .histogram
        .as_ref()
        .map(|hist| {
            log_bars(hist)
                .into_iter()
                .map(|(center, height)| {
                    Bar::new(center, height)
                        .width(hist.bucket_width)
                        .base_offset(LOG_BASE)
                })
                .collect()
        })
        .unwrap_or_default();

    Plot::new("duration_histogram")
        .x_axis_label("Duration / milliseconds")
        .y_axis_label("Count")
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| log_count_label(mark.value))
        .include_y(LOG_BASE)
        .include_y(1.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(SAMPLE_COLOR));
        });
}

/// `(bucket center, bar height above LOG_BASE)` for each non-empty bucket.
fn log_bars(hist: &Histogram) -> Vec<(f64, f64)> {
    hist.counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(i, &count)| (hist.bucket_center(i), (count as f64).log10() - LOG_BASE))
        .collect()
}

/// Axis label for a log10 count: decades only.
fn log_count_label(exponent: f64) -> String {
    if exponent < 0.0 || (exponent - exponent.round()).abs() > 1e-6 {
        return String::new();
    }
    format!("{}", 10f64.powi(exponent.round() as i32))
}

fn indexed(values: &[f64]) -> impl Iterator<Item = [f64; 2]> + '_ {
    values.iter().enumerate().map(|(i, &v)| [i as f64, v])
}

// ---------------------------------------------------------------------------
// Resource panels
// ---------------------------------------------------------------------------

/// One utilisation metric against wall-clock time.
pub fn resource_plot(
    ui: &mut Ui,
    id: &str,
    series: &ResourceSeries,
    values: &[f64],
    y_label: &str,
    color: Color32,
) {
    if series.is_empty() {
        ui.label("No valid samples in this log.");
    }

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label("Datetime")
        .y_axis_label(y_label)
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| clock_label(mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let points: PlotPoints = series
                .timestamps
                .iter()
                .zip(values)
                .map(|(t, &v)| [unix_seconds(t), v])
                .collect();
            plot_ui.line(Line::new(points).name(id).color(color).width(1.5));
        });
}

fn unix_seconds(t: &NaiveDateTime) -> f64 {
    t.and_utc().timestamp() as f64
}

fn clock_label(seconds: f64) -> String {
    DateTime::from_timestamp(seconds.round() as i64, 0)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn log_bars_skip_empty_buckets() {
        let hist = Histogram {
            start: 0.0,
            bucket_width: 2.0,
            counts: vec![1, 0, 100],
        };

        let bars = log_bars(&hist);

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0], (1.0, 0.5));
        assert_eq!(bars[1].0, 5.0);
        assert!((bars[1].1 - 2.5).abs() < 1e-12);
    }

    #[test]
    fn count_axis_labels_decades_only() {
        assert_eq!(log_count_label(0.0), "1");
        assert_eq!(log_count_label(2.0), "100");
        assert_eq!(log_count_label(1.5), "");
        assert_eq!(log_count_label(-0.5), "");
    }

    #[test]
    fn time_axis_round_trips_wall_clock() {
        let t = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(13, 4, 59)
            .unwrap();

        assert_eq!(clock_label(unix_seconds(&t)), "13:04:59");
    }
}
