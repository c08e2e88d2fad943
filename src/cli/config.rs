//! TOML configuration file support.
//!
//! Instead of passing many CLI flags, users can keep lab conventions in a
//! config file:
//!
//! ```toml
//! # mshm.toml
//! [layout]
//! directory_suffix = "_unidecfiles"
//! spectrum_suffix = "_mass.txt"
//! peaks_suffix = "_peaks.dat"
//! peak_layout = "pairs"
//! mode = "latest-run"
//!
//! [plot]
//! normalize = true
//! rank = 3
//! threshold = 5.0
//! deduction = 0.0
//! title = "Fractions"
//! annotate = true
//! color_scale = [
//!     { position = 0.0, color = "white" },
//!     { position = 1.0, color = "navy" },
//! ]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mshm::discovery::SampleLayout;
use mshm::render::ColorStop;

/// Root configuration structure for mshm.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Sample folder naming conventions.
    #[serde(default)]
    pub layout: SampleLayout,

    /// Plot settings.
    #[serde(default)]
    pub plot: PlotConfig,
}

/// Configuration for the plot command; command-line flags take precedence.
#[derive(Debug, Default, Deserialize)]
#[cfg_attr(not(feature = "plotting"), allow(dead_code))]
pub struct PlotConfig {
    pub normalize: Option<bool>,

    /// Mass offset subtracted from every mass.
    pub deduction: Option<f64>,

    /// Number of peaks used as normalization basis.
    pub rank: Option<usize>,

    /// Minimum peak intensity for the normalization basis.
    pub threshold: Option<f64>,

    pub title: Option<String>,

    /// Label peaks with mass and intensity.
    pub annotate: Option<bool>,

    pub color_scale: Option<Vec<ColorStop>>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
