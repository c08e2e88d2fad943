use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use mshm::discovery::{DiscoveryMode, PeakFileLayout, SampleLayout};
use mshm::snapshot::Snapshot;
use mshm::view::MassHeatMap;

mod build;
mod config;
mod info;
#[cfg(feature = "plotting")]
mod plot;

pub use config::Config;

/// MSHM - Mass Spectrometry Heat Maps
#[derive(Parser)]
#[command(name = "mshm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// How sample directories map onto samples.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Keep only the highest-numbered run per sample prefix
    LatestRun,
    /// Treat every matching directory as its own sample
    AllDirectories,
}

impl From<ModeArg> for DiscoveryMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::LatestRun => DiscoveryMode::LatestRun,
            ModeArg::AllDirectories => DiscoveryMode::AllDirectories,
        }
    }
}

/// Arrangement of values in peak files.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PeakLayoutArg {
    /// One "mass intensity" pair per line
    Pairs,
    /// A line of masses followed by a line of intensities
    Rows,
}

impl From<PeakLayoutArg> for PeakFileLayout {
    fn from(arg: PeakLayoutArg) -> Self {
        match arg {
            PeakLayoutArg::Pairs => PeakFileLayout::Pairs,
            PeakLayoutArg::Rows => PeakFileLayout::Rows,
        }
    }
}

/// Options shared by every command that reads a sample folder.
#[derive(clap::Args, Debug, Default)]
pub struct SourceArgs {
    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory-to-sample mapping
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Peak file layout
    #[arg(long, value_enum)]
    peak_layout: Option<PeakLayoutArg>,

    /// Rename a sample, as OLD=NEW (repeatable)
    #[arg(long = "rename", value_name = "OLD=NEW", value_parser = parse_rename)]
    renames: Vec<(String, String)>,
}

impl SourceArgs {
    /// Config file contents, or defaults when no file was given
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::from_file(path),
            None => Ok(Config::default()),
        }
    }

    /// Sample layout from the config file with command-line overrides applied
    pub fn layout(&self, config: &Config) -> SampleLayout {
        let mut layout = config.layout.clone();
        if let Some(mode) = self.mode {
            layout.mode = mode.into();
        }
        if let Some(peak_layout) = self.peak_layout {
            layout.peak_layout = peak_layout.into();
        }
        layout
    }

    /// Open the input and apply any `--rename` arguments
    pub fn open(&self, input: &Path, config: &Config) -> Result<MassHeatMap> {
        let mut heat_map = open_session(input, &self.layout(config))?;
        if !self.renames.is_empty() {
            let mapping: HashMap<String, String> = self.renames.iter().cloned().collect();
            heat_map
                .rename_aliases(&mapping)
                .context("Failed to rename samples")?;
        }
        Ok(heat_map)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble a folder of sample directories into a snapshot
    Build {
        /// Folder containing the sample directories
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output snapshot (.mshm container, or .json)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
    },

    /// Display information about a sample folder or snapshot
    Info {
        /// Sample folder, .mshm container or .json snapshot
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Render a heat map as a standalone HTML page
    #[cfg(feature = "plotting")]
    Plot {
        /// Sample folder, .mshm container or .json snapshot
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output HTML file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        plot: plot::PlotArgs,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build {
            input,
            output,
            source,
            force,
        } => build::run(input, output, source, force),
        Commands::Info { input, source } => info::run(input, source),
        #[cfg(feature = "plotting")]
        Commands::Plot {
            input,
            output,
            source,
            plot,
        } => plot::run(input, output, source, plot),
    }
}

/// Open a sample folder, a `.json` snapshot or a `.mshm` container
pub fn open_session(input: &Path, layout: &SampleLayout) -> Result<MassHeatMap> {
    if !input.exists() {
        anyhow::bail!("Input does not exist: {}", input.display());
    }

    if input.is_dir() {
        MassHeatMap::open(input, layout)
            .with_context(|| format!("Failed to assemble samples in {}", input.display()))
    } else if is_json(input) {
        let json = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        let snapshot = Snapshot::from_json(&json).context("Failed to decode snapshot")?;
        MassHeatMap::from_snapshot(snapshot).context("Failed to restore snapshot")
    } else {
        MassHeatMap::load(input)
            .with_context(|| format!("Failed to load snapshot {}", input.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn parse_rename(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((old, new)) if !old.is_empty() => Ok((old.to_string(), new.to_string())),
        _ => Err(format!("expected OLD=NEW, got '{}'", s)),
    }
}
