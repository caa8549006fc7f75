use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, MarkerShape, Plot, PlotPoints, Points};

use crate::data::histogram::Histogram;
use crate::state::AppState;
use crate::views::{SCATTER_X, SCATTER_Y};

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Scatterplot
// ---------------------------------------------------------------------------

/// Body mass vs bill depth, coloured by species.
pub fn scatterplot(ui: &mut Ui, state: &mut AppState) {
    let colors = state.colors.clone();
    let series = state.scatterplot();

    Plot::new("species_scatterplot")
        .legend(Legend::default())
        .x_axis_label(SCATTER_X.label())
        .y_axis_label(SCATTER_Y.label())
        .height(CHART_HEIGHT)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for s in series {
                let points = Points::new(PlotPoints::from(s.points.clone()))
                    .name(s.species.as_str())
                    .color(colors.color_for(s.species))
                    .shape(MarkerShape::Circle)
                    .filled(true)
                    .radius(3.0);
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram A: egui_plot bar chart
// ---------------------------------------------------------------------------

pub fn plotly_histogram(ui: &mut Ui, state: &mut AppState) {
    let attribute = state.inputs().selected_attribute;
    let color = state.colors.neutral();
    let hist = state.plotly_histogram();

    if hist.is_empty() {
        empty_hint(ui, "No values to bin for the current selection.");
        return;
    }

    let width = hist.bin_width();
    let bars: Vec<Bar> = hist
        .buckets()
        .map(|(lo, hi, count)| {
            Bar::new((lo + hi) / 2.0, count as f64)
                .width(width)
                .name(format!("{lo:.1} – {hi:.1}"))
        })
        .collect();

    Plot::new("plotly_histogram")
        .x_axis_label(attribute.label())
        .y_axis_label("count")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color).name(attribute.column()));
        });
}

// ---------------------------------------------------------------------------
// Histogram B: drawn straight onto the egui painter
// ---------------------------------------------------------------------------

pub fn seaborn_histogram(ui: &mut Ui, state: &mut AppState) {
    let attribute = state.inputs().selected_attribute;
    let bins = state.inputs().seaborn_bin_count;
    let color = state.colors.neutral();
    let hist = state.seaborn_histogram();

    if bins == 0 {
        empty_hint(ui, "Bin count is 0: move the slider to draw the histogram.");
        return;
    }
    if hist.is_empty() {
        empty_hint(ui, "No values to bin for the current selection.");
        return;
    }

    let size = Vec2::new(ui.available_width(), CHART_HEIGHT);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let frame = response.rect;
    let text_color = ui.visuals().text_color();
    let axis = Stroke::new(1.0, ui.visuals().weak_text_color());

    // Leave room for tick labels on the left and bottom.
    let plot = Rect::from_min_max(
        frame.min + Vec2::new(48.0, 8.0),
        frame.max - Vec2::new(8.0, 36.0),
    );
    let layout = HistogramLayout::new(hist, plot);

    for (i, bar) in layout.bars.iter().enumerate() {
        let hovered = response.hover_pos().is_some_and(|p| bar.x_range().contains(p.x));
        let fill = if hovered { color } else { color.gamma_multiply(0.7) };
        painter.rect_filled(*bar, 0.0, fill);
        let outline = Stroke::new(1.0, color);
        for edge in [
            [bar.left_top(), bar.right_top()],
            [bar.left_top(), bar.left_bottom()],
            [bar.right_top(), bar.right_bottom()],
        ] {
            painter.line_segment(edge, outline);
        }
        if hovered {
            painter.text(
                bar.center_top() - Vec2::new(0.0, 2.0),
                Align2::CENTER_BOTTOM,
                hist.counts[i].to_string(),
                FontId::proportional(12.0),
                text_color,
            );
        }
    }

    // Axes
    painter.line_segment([plot.left_bottom(), plot.right_bottom()], axis);
    painter.line_segment([plot.left_bottom(), plot.left_top()], axis);

    let small = FontId::proportional(11.0);
    for (x, edge) in layout.edge_ticks(hist) {
        painter.text(
            Pos2::new(x, plot.bottom() + 3.0),
            Align2::CENTER_TOP,
            format!("{edge:.1}"),
            small.clone(),
            text_color,
        );
    }
    let max = hist.max_count();
    for (y, count) in [(plot.bottom(), 0), (plot.top(), max)] {
        painter.text(
            Pos2::new(plot.left() - 4.0, y),
            Align2::RIGHT_CENTER,
            count.to_string(),
            small.clone(),
            text_color,
        );
    }
    painter.text(
        Pos2::new(plot.center().x, frame.bottom()),
        Align2::CENTER_BOTTOM,
        attribute.column(),
        FontId::proportional(12.0),
        text_color,
    );
}

/// Screen geometry of the bars for a histogram inside `plot`.
struct HistogramLayout {
    bars: Vec<Rect>,
    plot: Rect,
}

impl HistogramLayout {
    fn new(hist: &Histogram, plot: Rect) -> Self {
        let n = hist.bins().max(1) as f32;
        let max = hist.max_count().max(1) as f32;
        let bar_width = plot.width() / n;
        let bars = hist
            .counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let left = plot.left() + bar_width * i as f32;
                let top = plot.bottom() - plot.height() * (count as f32 / max);
                Rect::from_min_max(Pos2::new(left, top), Pos2::new(left + bar_width, plot.bottom()))
            })
            .collect();
        HistogramLayout { bars, plot }
    }

    /// Screen x of every bucket edge, thinned to at most ~8 labels.
    fn edge_ticks<'a>(&'a self, hist: &'a Histogram) -> impl Iterator<Item = (f32, f64)> + 'a {
        let n = hist.edges.len().max(1);
        let step = n.div_ceil(8).max(1);
        let dx = self.plot.width() / hist.bins().max(1) as f32;
        hist.edges
            .iter()
            .enumerate()
            .filter(move |(i, _)| i % step == 0 || *i == n - 1)
            .map(move |(i, &e)| (self.plot.left() + dx * i as f32, e))
    }
}

fn empty_hint(ui: &mut Ui, text: &str) {
    ui.allocate_ui(Vec2::new(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(egui::RichText::new(text).color(Color32::GRAY));
        });
    });
}
