use crate::view::PlottingView;

/// Height in pixels of one sample row
pub const ROW_HEIGHT_PX: usize = 50;
/// Vertical space in pixels taken by title and axes
pub const FRAME_HEIGHT_PX: usize = 150;
/// Fixed figure width in pixels
pub const FIGURE_WIDTH_PX: usize = 1200;

/// Offset of the mass label above a row centre (intensity labels sit below)
const LABEL_OFFSET: f64 = 0.2;

/// Exact coordinates of a heat map figure.
///
/// Columns are centred on their (deducted) mass and rows on `0..n`, top to
/// bottom. Cells are `column_step` wide and one unit tall.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotGeometry {
    /// Width of one cell along the mass axis
    pub column_step: f64,
    /// Left and right edge of the heat map
    pub x_extent: (f64, f64),
    /// Top and bottom edge of the heat map
    pub y_extent: (f64, f64),
    /// Row centres, in plotting order
    pub row_centres: Vec<f64>,
    /// Horizontal lines between adjacent rows
    pub row_separators: Vec<f64>,
    pub height_px: usize,
    pub width_px: usize,
    /// Title position as a fraction of the figure height from the bottom
    pub title_y: f64,
}

impl PlotGeometry {
    pub fn from_view(view: &PlottingView) -> Self {
        let rows = view.nrows();
        let column_step = match view.masses.as_slice() {
            [first, second, ..] => second - first,
            _ => 1.0,
        };
        let half = column_step / 2.0;
        let x_extent = match (view.masses.first(), view.masses.last()) {
            (Some(first), Some(last)) => (first - half, last + half),
            _ => (-half, half),
        };

        let height_px = rows * ROW_HEIGHT_PX + FRAME_HEIGHT_PX;
        Self {
            column_step,
            x_extent,
            y_extent: (-0.5, rows as f64 - 0.5),
            row_centres: (0..rows).map(|i| i as f64).collect(),
            row_separators: (1..rows).map(|i| i as f64 - 0.5).collect(),
            height_px,
            width_px: FIGURE_WIDTH_PX,
            title_y: (height_px - ROW_HEIGHT_PX) as f64 / height_px as f64,
        }
    }
}

/// One peak label pair: the mass above the row centre, the intensity below
#[derive(Debug, Clone, PartialEq)]
pub struct PeakAnnotation {
    /// Mass coordinate of the peak
    pub x: f64,
    /// Vertical position of the mass label
    pub mass_y: f64,
    /// Vertical position of the intensity label
    pub intensity_y: f64,
    pub mass_label: String,
    pub intensity_label: String,
}

impl PeakAnnotation {
    /// Annotations for every peak in the view, row by row
    pub fn for_view(view: &PlottingView) -> Vec<Self> {
        view.peaks
            .iter()
            .enumerate()
            .flat_map(|(row, peaks)| {
                let centre = row as f64;
                peaks.iter().map(move |(mass, intensity)| PeakAnnotation {
                    x: mass,
                    mass_y: centre - LABEL_OFFSET,
                    intensity_y: centre + LABEL_OFFSET,
                    mass_label: mass_label(mass),
                    intensity_label: intensity_label(intensity),
                })
            })
            .collect()
    }
}

/// Mass truncated to whole Daltons
pub fn mass_label(mass: f64) -> String {
    format!("{}", mass.trunc() as i64)
}

/// Intensity rounded to one decimal, followed by `%`
pub fn intensity_label(intensity: f64) -> String {
    format!("{:.1}%", intensity)
}
