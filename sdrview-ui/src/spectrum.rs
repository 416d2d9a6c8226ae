use eframe::egui::{
    Align2, FontId, Mesh, Pos2, Rect, Response, Sense, Shape, Stroke, Ui, Widget, pos2,
};
use eframe::epaint::Color32;

use crate::axes::AxisLabels;
use crate::colormap::Palette;
use crate::range::DisplayRange;

const GRID_COLOR: Color32 = Color32::from_gray(50);
const LABEL_COLOR: Color32 = Color32::from_gray(170);
const TRACE_COLOR: Color32 = Color32::from_gray(230);
const MAX_HOLD_COLOR: Color32 = Color32::from_rgb(255, 90, 90);

/// Pixel heights of a trace, measured up from the bottom of a plot `extent` pixels tall.
///
/// Off-scale values are clamped to the plot edges.
pub fn trace_heights(bins: &[f32], range: &DisplayRange, extent: usize) -> Vec<usize> {
    bins.iter().map(|&v| range.squeeze(v, extent)).collect()
}

/// Screen positions of a trace inside `rect`, bins spread evenly from left to right edge.
pub fn trace_points(heights: &[usize], rect: Rect) -> Vec<Pos2> {
    let last = heights.len().saturating_sub(1).max(1) as f32;
    heights
        .iter()
        .enumerate()
        .map(|(i, &h)| {
            let x = if heights.len() == 1 {
                rect.center().x
            } else {
                rect.left() + rect.width() * i as f32 / last
            };
            pos2(x, (rect.bottom() - h as f32).max(rect.top()))
        })
        .collect()
}

/// Area under the trace, coloured bottom to top with the palette.
fn fill_mesh(points: &[Pos2], heights: &[usize], extent: usize, bottom: f32, palette: &Palette) -> Mesh {
    let mut mesh = Mesh::default();
    let floor = palette.color(0);
    for (i, (pair, level)) in points.windows(2).zip(heights.windows(2)).enumerate() {
        let base = (i * 4) as u32;
        mesh.colored_vertex(pos2(pair[0].x, bottom), floor);
        mesh.colored_vertex(pos2(pair[1].x, bottom), floor);
        mesh.colored_vertex(pair[1], palette.color_at_height(level[1], extent));
        mesh.colored_vertex(pair[0], palette.color_at_height(level[0], extent));
        mesh.add_triangle(base, base + 1, base + 2);
        mesh.add_triangle(base, base + 2, base + 3);
    }
    mesh
}

/// Line plot of the current spectrum with its axis labels.
pub struct SpectrumPlot<'a> {
    pub trace: &'a [usize],
    pub max_hold: Option<&'a [usize]>,
    pub extent: usize,
    pub palette: &'a Palette,
    pub labels: &'a AxisLabels,
}

impl SpectrumPlot<'_> {
    fn paint_grid(&self, ui: &Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        let font = FontId::monospace(10.0);

        for tick in self.labels.level() {
            let y = rect.bottom() - tick.fraction * rect.height();
            painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], Stroke::new(1.0, GRID_COLOR));
            painter.text(pos2(rect.left() + 2.0, y), Align2::LEFT_BOTTOM, &tick.label, font.clone(), LABEL_COLOR);
        }
        for tick in self.labels.frequency() {
            let x = rect.left() + tick.fraction * rect.width();
            painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], Stroke::new(1.0, GRID_COLOR));
            painter.text(pos2(x, rect.bottom()), Align2::CENTER_BOTTOM, &tick.label, font.clone(), LABEL_COLOR);
        }
    }
}

impl Widget for SpectrumPlot<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        ui.painter_at(rect).rect_filled(rect, 0.0, Color32::BLACK);

        let painter = ui.painter_at(rect);
        if self.trace.len() >= 2 {
            let points = trace_points(self.trace, rect);
            painter.add(Shape::mesh(fill_mesh(
                &points,
                self.trace,
                self.extent,
                rect.bottom(),
                self.palette,
            )));
            painter.add(Shape::line(points, Stroke::new(1.0, TRACE_COLOR)));
        }
        if let Some(held) = self.max_hold.filter(|h| h.len() >= 2) {
            painter.add(Shape::line(trace_points(held, rect), Stroke::new(1.0, MAX_HOLD_COLOR)));
        }

        self.paint_grid(ui, rect);
        response
    }
}
