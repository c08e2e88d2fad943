//! # Heat Map Rendering
//!
//! Everything a renderer needs to draw a [`PlottingView`](crate::view::PlottingView):
//! display options ([`HeatMapStyle`]), exact figure coordinates
//! ([`PlotGeometry`]) and per-peak labels ([`PeakAnnotation`]).
//!
//! With the `plotting` feature, [`plotly_heatmap`] turns a view into a
//! `plotly::Plot` that can be written as a standalone HTML page.

mod geometry;

#[cfg(feature = "plotting")]
mod figure;

use serde::{Deserialize, Serialize};

pub use geometry::{
    intensity_label, mass_label, PeakAnnotation, PlotGeometry, FIGURE_WIDTH_PX, FRAME_HEIGHT_PX,
    ROW_HEIGHT_PX,
};

#[cfg(feature = "plotting")]
pub use figure::plotly_heatmap;

/// Colour at one position of a continuous colour scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position in `[0, 1]`
    pub position: f64,
    /// Any CSS colour
    pub color: String,
}

impl ColorStop {
    pub fn new(position: f64, color: impl Into<String>) -> Self {
        Self {
            position,
            color: color.into(),
        }
    }
}

/// Display options for a heat map figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatMapStyle {
    pub title: String,
    /// Stops ordered by position, from 0 to 1
    pub color_scale: Vec<ColorStop>,
    /// Label every peak with its mass and intensity
    pub annotate: bool,
    pub x_axis_title: String,
    pub y_axis_title: String,
}

impl Default for HeatMapStyle {
    fn default() -> Self {
        Self {
            title: String::new(),
            color_scale: vec![ColorStop::new(0.0, "white"), ColorStop::new(1.0, "black")],
            annotate: true,
            x_axis_title: "Molecular Weight (Da)".to_string(),
            y_axis_title: "Samples".to_string(),
        }
    }
}

impl HeatMapStyle {
    /// True when the colour scale has at least two stops, ascending within `[0, 1]`
    pub fn has_valid_color_scale(&self) -> bool {
        self.color_scale.len() >= 2
            && self
                .color_scale
                .iter()
                .all(|stop| (0.0..=1.0).contains(&stop.position))
            && self
                .color_scale
                .windows(2)
                .all(|w| w[0].position <= w[1].position)
    }
}
