use std::path::{Path, PathBuf};

use crate::data::error::LoadError;
use crate::data::loader::load_file;
use crate::data::model::{
    DurationRecord, DurationSeries, RawDataset, ResourceRecord, ResourceSeries,
};
use crate::data::normalize::normalize;
use crate::data::select::{select_durations, select_resources};
use crate::stats::SummaryStats;

// ---------------------------------------------------------------------------
// Analyses: one full pipeline run over one file
// ---------------------------------------------------------------------------

/// Row accounting shared by both analyses.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub path: PathBuf,
    /// Data rows read from the file.
    pub rows_loaded: usize,
    /// Rows discarded because a required field failed coercion.
    pub rows_dropped: usize,
}

impl SourceInfo {
    /// File name for titles, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Call durations of the measured phase and their statistics.
#[derive(Debug, Clone)]
pub struct DurationAnalysis {
    pub source: SourceInfo,
    pub series: DurationSeries,
    pub stats: SummaryStats,
}

impl DurationAnalysis {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        Self::from_raw(&load_file(path)?)
    }

    pub fn from_raw(raw: &RawDataset) -> Result<Self, LoadError> {
        let normalized = normalize::<DurationRecord>(raw)?;
        let series = select_durations(&normalized.records);
        let stats = SummaryStats::compute(&series.durations_ms);
        log::info!("Selected {} measured calls", series.len());

        Ok(DurationAnalysis {
            source: SourceInfo {
                path: raw.path.clone(),
                rows_loaded: raw.len(),
                rows_dropped: normalized.dropped,
            },
            series,
            stats,
        })
    }
}

/// Memory and CPU utilisation over time.
#[derive(Debug, Clone)]
pub struct ResourceAnalysis {
    pub source: SourceInfo,
    pub series: ResourceSeries,
}

impl ResourceAnalysis {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        Self::from_raw(&load_file(path)?)
    }

    pub fn from_raw(raw: &RawDataset) -> Result<Self, LoadError> {
        let normalized = normalize::<ResourceRecord>(raw)?;
        let series = select_resources(&normalized.records);
        log::info!("Selected {} memory/cpu samples", series.len());

        Ok(ResourceAnalysis {
            source: SourceInfo {
                path: raw.path.clone(),
                rows_loaded: raw.len(),
                rows_dropped: normalized.dropped,
            },
            series,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Analysis {
    Durations(DurationAnalysis),
    Resources(ResourceAnalysis),
}

impl Analysis {
    pub fn source(&self) -> &SourceInfo {
        match self {
            Analysis::Durations(a) => &a.source,
            Analysis::Resources(a) => &a.source,
        }
    }

    /// Number of points that end up in the plots.
    pub fn plotted_len(&self) -> usize {
        match self {
            Analysis::Durations(a) => a.series.len(),
            Analysis::Resources(a) => a.series.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Computed once before the window opens; never mutated afterwards.
    pub analysis: Analysis,

    /// Whether the EWMA trend line is drawn over the duration scatter.
    pub show_trend: bool,
}

impl AppState {
    pub fn new(analysis: Analysis) -> Self {
        Self {
            analysis,
            show_trend: true,
        }
    }
}
