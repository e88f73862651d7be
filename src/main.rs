mod app;
mod data;
mod state;
mod stats;
mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::anyhow;
use app::PerfplotApp;
use clap::{Parser, Subcommand};
use data::error::LoadError;
use eframe::egui;
use state::{Analysis, AppState, DurationAnalysis, ResourceAnalysis};

#[derive(Parser, Debug)]
#[command(
    name = "rusty-perfplot",
    version,
    about = "Plot call durations and memory/CPU usage logged by the threading benchmark host"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Call duration scatter, EWMA trend and histogram
    Durations {
        /// Print statistics without opening the figure
        #[arg(long)]
        no_window: bool,

        /// The output file generated by the fibonacci host
        output_file: Option<PathBuf>,
    },

    /// Memory and CPU usage over time
    MemCpu {
        /// Load and check the log without opening the figure
        #[arg(long)]
        no_window: bool,

        /// The memory and cpu log file
        log_file: Option<PathBuf>,
    },
}

impl Command {
    fn usage(&self) -> &'static str {
        match self {
            Command::Durations { .. } => {
                "Usage: rusty-perfplot durations OUTPUT_FILE\n\
                 OUTPUT_FILE: the output file generated by the fibonacci host"
            }
            Command::MemCpu { .. } => {
                "Usage: rusty-perfplot mem-cpu LOG_FILE\n\
                 LOG_FILE: the path to the memory and cpu log file generated by the mem/cpu logger"
            }
        }
    }

    fn file(&self) -> Option<&Path> {
        match self {
            Command::Durations { output_file, .. } => output_file.as_deref(),
            Command::MemCpu { log_file, .. } => log_file.as_deref(),
        }
    }

    fn no_window(&self) -> bool {
        match self {
            Command::Durations { no_window, .. } | Command::MemCpu { no_window, .. } => *no_window,
        }
    }

    fn analyze(&self, path: &Path) -> Result<Analysis, LoadError> {
        match self {
            Command::Durations { .. } => DurationAnalysis::from_path(path).map(Analysis::Durations),
            Command::MemCpu { .. } => ResourceAnalysis::from_path(path).map(Analysis::Resources),
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let command = cli.command;

    let Some(path) = command.file() else {
        println!("{}", command.usage());
        return ExitCode::FAILURE;
    };

    let analysis = match command.analyze(path) {
        Ok(analysis) => analysis,
        Err(e) => {
            log::error!("Failed to load log: {e}");
            println!("{}", command.usage());
            return ExitCode::FAILURE;
        }
    };

    if let Analysis::Durations(durations) = &analysis {
        println!("{}", durations.stats);
    }

    if command.no_window() {
        return ExitCode::SUCCESS;
    }

    match show(analysis) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Open the two-panel figure and block until the window is closed.
fn show(analysis: Analysis) -> anyhow::Result<()> {
    let title = ui::panels::window_title(&analysis);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 600.0])
            .with_min_inner_size([600.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(PerfplotApp::new(AppState::new(analysis))))),
    )
    .map_err(|e| anyhow!("failed to open plot window: {e}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn durations_takes_one_positional_file() {
        let cli = Cli::try_parse_from(["rusty-perfplot", "durations", "out.csv"]).unwrap();

        assert_eq!(cli.command.file(), Some(Path::new("out.csv")));
        assert!(!cli.command.no_window());
    }

    #[test]
    fn missing_file_falls_through_to_usage() {
        let cli = Cli::try_parse_from(["rusty-perfplot", "mem-cpu", "--no-window"]).unwrap();

        assert_eq!(cli.command.file(), None);
        assert!(cli.command.no_window());
        let usage = cli.command.usage();
        assert_eq!(usage.lines().count(), 2);
        assert!(usage.starts_with("Usage: rusty-perfplot mem-cpu LOG_FILE"));
    }

    #[test]
    fn unreadable_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from(["rusty-perfplot", "durations", "x.csv"]).unwrap();

        let err = cli.command.analyze(&dir.path().join("x.csv")).unwrap_err();

        assert!(matches!(err, LoadError::Io { .. }));
    }
}
