use plotly::common::{ColorScale, ColorScaleElement, Font, Title};
use plotly::layout::{Annotation, Axis, Margin, Shape, ShapeLine, ShapeType};
use plotly::{HeatMap, Layout, Plot};

use super::{HeatMapStyle, PeakAnnotation, PlotGeometry};
use crate::view::PlottingView;

const MASS_LABEL_COLOR: &str = "#4A90E2";
const INTENSITY_LABEL_COLOR: &str = "#ff66cc";
const LABEL_FONT_SIZE: usize = 9;
const LABEL_ANGLE: f64 = 25.0;

/// Draw a plotting view as a plotly heat map with frame, row separators and peak labels
pub fn plotly_heatmap(view: &PlottingView, style: &HeatMapStyle) -> Plot {
    let geometry = PlotGeometry::from_view(view);

    let z: Vec<Vec<f64>> = view.matrix.rows().map(<[f64]>::to_vec).collect();
    let color_scale = ColorScale::Vector(
        style
            .color_scale
            .iter()
            .map(|stop| ColorScaleElement(stop.position, stop.color.clone()))
            .collect(),
    );
    let trace = HeatMap::new(view.masses.clone(), geometry.row_centres.clone(), z)
        .color_scale(color_scale);

    let (x0, x1) = geometry.x_extent;
    let (y0, y1) = geometry.y_extent;
    let mut shapes = vec![Shape::new()
        .shape_type(ShapeType::Rect)
        .x0(x0)
        .x1(x1)
        .y0(y0)
        .y1(y1)
        .line(ShapeLine::new().color("black").width(2.0))
        .fill_color("rgba(0,0,0,0)")];
    shapes.extend(geometry.row_separators.iter().map(|&y| {
        Shape::new()
            .shape_type(ShapeType::Line)
            .x0(x0)
            .x1(x1)
            .y0(y)
            .y1(y)
            .line(ShapeLine::new().color("black").width(1.0))
    }));

    let annotations = if style.annotate {
        PeakAnnotation::for_view(view)
            .into_iter()
            .flat_map(|peak| {
                [
                    label(peak.x, peak.mass_y, &peak.mass_label, MASS_LABEL_COLOR),
                    label(
                        peak.x,
                        peak.intensity_y,
                        &peak.intensity_label,
                        INTENSITY_LABEL_COLOR,
                    ),
                ]
            })
            .collect()
    } else {
        Vec::new()
    };

    let layout = Layout::new()
        .title(Title::with_text(&format!("<b>{}</b>", style.title)).y(geometry.title_y))
        .width(geometry.width_px)
        .height(geometry.height_px)
        .margin(Margin::new().left(200).right(100).bottom(50).top(100))
        .x_axis(
            Axis::new()
                .title(Title::with_text(&format!("<b>{}</b>", style.x_axis_title)))
                .range(vec![x0, x1])
                .show_line(true)
                .mirror(true),
        )
        .y_axis(
            Axis::new()
                .title(Title::with_text(&format!("<b>{}</b>", style.y_axis_title)))
                .range(vec![y1, y0])
                .tick_values(geometry.row_centres.clone())
                .tick_text(view.labels.clone())
                .show_line(true)
                .mirror(true),
        )
        .shapes(shapes)
        .annotations(annotations);

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(layout);
    plot
}

fn label(x: f64, y: f64, text: &str, color: &'static str) -> Annotation {
    Annotation::new()
        .x(x)
        .y(y)
        .text(&format!("<b>{}</b>", text))
        .show_arrow(false)
        .text_angle(LABEL_ANGLE)
        .font(Font::new().color(color).size(LABEL_FONT_SIZE))
}
