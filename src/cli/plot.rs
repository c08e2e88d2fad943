use anyhow::{Context, Result};
use log::{info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use plotly::Plot;

use mshm::render::{plotly_heatmap, HeatMapStyle};
use mshm::view::{MassHeatMap, PlotOptions};

use super::config::PlotConfig;
use super::SourceArgs;

/// Selection and display flags for the plot command.
#[derive(clap::Args, Debug, Default)]
pub struct PlotArgs {
    /// Samples to plot, in order (comma separated aliases; default: all)
    #[arg(short, long, value_delimiter = ',')]
    samples: Vec<String>,

    /// Mass window as LO:HI in Daltons (clamped to the data)
    #[arg(short, long, value_name = "LO:HI", value_parser = parse_range)]
    range: Option<(f64, f64)>,

    /// Rescale each sample to percent of its top-ranked peaks
    #[arg(short, long)]
    normalize: bool,

    /// Number of peaks used as normalization basis
    #[arg(long)]
    rank: Option<usize>,

    /// Minimum peak intensity for the normalization basis
    #[arg(long)]
    threshold: Option<f64>,

    /// Mass offset subtracted from every mass
    #[arg(short, long, allow_hyphen_values = true)]
    deduction: Option<f64>,

    /// Figure title
    #[arg(short, long)]
    title: Option<String>,

    /// Do not label peaks
    #[arg(long)]
    no_annotations: bool,

    /// Also write the plotted matrix as TSV
    #[arg(long, value_name = "FILE")]
    tsv: Option<PathBuf>,

    /// Also write the plotted peaks as TSV
    #[arg(long, value_name = "FILE")]
    peaks_tsv: Option<PathBuf>,
}

impl PlotArgs {
    /// Plot options from the config file with command-line overrides applied
    fn options(&self, config: &PlotConfig) -> PlotOptions {
        let defaults = PlotOptions::default();
        PlotOptions {
            normalize: self.normalize || config.normalize.unwrap_or(defaults.normalize),
            deduction: self
                .deduction
                .or(config.deduction)
                .unwrap_or(defaults.deduction),
            rank: self.rank.or(config.rank).unwrap_or(defaults.rank),
            threshold: self
                .threshold
                .or(config.threshold)
                .unwrap_or(defaults.threshold),
        }
    }

    fn style(&self, config: &PlotConfig) -> HeatMapStyle {
        let mut style = HeatMapStyle::default();
        if let Some(title) = self.title.clone().or_else(|| config.title.clone()) {
            style.title = title;
        }
        if let Some(color_scale) = config.color_scale.clone() {
            style.color_scale = color_scale;
        }
        style.annotate = !self.no_annotations && config.annotate.unwrap_or(true);
        style
    }

    fn apply_selection(&self, heat_map: &mut MassHeatMap) -> Result<()> {
        if !self.samples.is_empty() {
            heat_map.set_selection(&self.samples);
            let dropped = self.samples.len() - heat_map.samples().len();
            if dropped > 0 {
                warn!("{} requested sample(s) were not found or repeated", dropped);
            }
        }
        if let Some((lo, hi)) = self.range {
            heat_map
                .set_mass_range(lo, hi)
                .context("Failed to set mass range")?;
        }
        Ok(())
    }
}

/// Render a heat map as HTML
pub fn run(input: PathBuf, output: PathBuf, source: SourceArgs, args: PlotArgs) -> Result<()> {
    let config = source.load_config()?;
    let mut heat_map = source.open(&input, &config)?;
    args.apply_selection(&mut heat_map)?;

    let style = args.style(&config.plot);
    if !style.has_valid_color_scale() {
        anyhow::bail!("Color scale needs at least two stops ordered within [0, 1]");
    }

    let view = heat_map
        .prepare(&args.options(&config.plot))
        .context("Failed to prepare plotting data")?;
    for warning in &view.warnings {
        eprintln!("Warning: {}", warning);
    }
    if view.is_empty() {
        warn!("Nothing to plot: no samples or mass columns selected");
    }
    info!(
        "Plotting {} samples x {} mass columns",
        view.nrows(),
        view.ncols()
    );

    write_figure(&plotly_heatmap(&view, &style), &output)?;
    println!("Heat map written to {}", output.display());

    if let Some(path) = &args.tsv {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        view.write_tsv(BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.peaks_tsv {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        view.write_peaks_tsv(BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}

fn write_figure(plot: &Plot, path: &Path) -> Result<()> {
    std::fs::write(path, plot.to_html())
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn parse_range(s: &str) -> Result<(f64, f64), String> {
    let (lo, hi) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LO:HI, got '{}'", s))?;
    let lo: f64 = lo
        .trim()
        .parse()
        .map_err(|_| format!("invalid lower bound '{}'", lo))?;
    let hi: f64 = hi
        .trim()
        .parse()
        .map_err(|_| format!("invalid upper bound '{}'", hi))?;
    Ok((lo, hi))
}
