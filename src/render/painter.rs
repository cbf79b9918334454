use std::f32::consts::FRAC_PI_2;
use egui::{Color32, FontId, Pos2, Rect, Stroke};
use crate::render::chart::ChartModel;
use crate::render::legend_layout::place_legend;
use crate::render::ticks::{compute_ticks, format_tick_value};

// Figures are drawn on paper colors regardless of the UI theme so the saved
// image looks the same as the window.
const FIGURE_BG: Color32 = Color32::WHITE;
const INK: Color32 = Color32::from_rgb(30, 30, 30);
const DIM_INK: Color32 = Color32::from_rgb(90, 90, 90);

const MARGIN_LEFT: f32 = 78.0;
const MARGIN_RIGHT: f32 = 24.0;
const MARGIN_TOP: f32 = 18.0;
const MARGIN_BOTTOM: f32 = 52.0;

const LINE_WIDTH: f32 = 1.5;
const MAJOR_TICK: f32 = 5.0;
const MINOR_TICK: f32 = 2.5;

const LEGEND_ROW_HEIGHT: f32 = 18.0;
const LEGEND_SWATCH: f32 = 22.0;
const LEGEND_PAD: f32 = 6.0;

/// Inner plotting area of a figure occupying `total_rect`.
pub fn plot_area(total_rect: Rect) -> Rect {
    Rect::from_min_max(
        total_rect.min + egui::vec2(MARGIN_LEFT, MARGIN_TOP),
        total_rect.max - egui::vec2(MARGIN_RIGHT, MARGIN_BOTTOM),
    )
}

/// Paint a complete figure: background, frame, ticks, labels, lines, legend.
pub fn paint_chart(painter: &egui::Painter, chart: &ChartModel, total_rect: Rect) {
    let plot_rect = plot_area(total_rect);

    painter.rect_filled(total_rect, 0.0, FIGURE_BG);
    draw_axes_and_labels(painter, chart, plot_rect, total_rect);

    let screen_lines: Vec<Vec<Pos2>> = chart
        .lines
        .iter()
        .map(|line| {
            line.points
                .iter()
                .map(|&[x, y]| chart.view.data_to_screen(x, y, plot_rect))
                .collect()
        })
        .collect();

    let clipped = painter.with_clip_rect(plot_rect);
    for (line, points) in chart.lines.iter().zip(&screen_lines) {
        if points.len() < 2 {
            continue;
        }
        clipped.add(egui::Shape::line(
            points.clone(),
            Stroke::new(LINE_WIDTH, line.color.color32()),
        ));
    }

    draw_legend(painter, chart, plot_rect, &screen_lines);
}

// ---------------------------------------------------------------------------
// Axis labels, tick marks
// ---------------------------------------------------------------------------

fn draw_axes_and_labels(painter: &egui::Painter, chart: &ChartModel, plot_rect: Rect, total_rect: Rect) {
    let view = &chart.view;
    let tick_font = FontId::proportional(11.0);

    painter.rect_stroke(plot_rect, 0.0, Stroke::new(1.0, INK), egui::StrokeKind::Outside);

    for tick in compute_ticks(view.x.min, view.x.max) {
        let screen_x = view.data_to_screen(tick.value, view.y.min, plot_rect).x;
        let len = if tick.major { MAJOR_TICK } else { MINOR_TICK };
        painter.vline(
            screen_x,
            plot_rect.bottom()..=(plot_rect.bottom() + len),
            Stroke::new(1.0, INK),
        );
        if tick.major {
            painter.text(
                Pos2::new(screen_x, plot_rect.bottom() + MAJOR_TICK + 3.0),
                egui::Align2::CENTER_TOP,
                format_tick_value(tick.value),
                tick_font.clone(),
                DIM_INK,
            );
        }
    }

    for tick in compute_ticks(view.y.min, view.y.max) {
        let screen_y = view.data_to_screen(view.x.min, tick.value, plot_rect).y;
        let len = if tick.major { MAJOR_TICK } else { MINOR_TICK };
        painter.hline(
            (plot_rect.left() - len)..=plot_rect.left(),
            screen_y,
            Stroke::new(1.0, INK),
        );
        if tick.major {
            painter.text(
                Pos2::new(plot_rect.left() - MAJOR_TICK - 3.0, screen_y),
                egui::Align2::RIGHT_CENTER,
                format_tick_value(tick.value),
                tick_font.clone(),
                DIM_INK,
            );
        }
    }

    let label_font = FontId::proportional(13.0);

    painter.text(
        Pos2::new(plot_rect.center().x, total_rect.bottom() - 6.0),
        egui::Align2::CENTER_BOTTOM,
        &chart.x_label,
        label_font.clone(),
        INK,
    );

    // Rotated a quarter turn so it reads bottom to top; the galley pivots
    // around its top-left corner.
    let galley = painter.layout_no_wrap(chart.y_label.clone(), label_font, INK);
    let pos = Pos2::new(
        total_rect.left() + 6.0,
        plot_rect.center().y + galley.size().x / 2.0,
    );
    painter.add(egui::epaint::TextShape::new(pos, galley, INK).with_angle(-FRAC_PI_2));
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

fn draw_legend(
    painter: &egui::Painter,
    chart: &ChartModel,
    plot_rect: Rect,
    screen_lines: &[Vec<Pos2>],
) {
    if chart.legend.is_empty() {
        return;
    }

    let font = FontId::proportional(12.0);
    let galleys: Vec<_> = chart
        .legend
        .iter()
        .map(|entry| painter.layout_no_wrap(entry.code.clone(), font.clone(), INK))
        .collect();

    let max_width = galleys.iter().map(|g| g.size().x).fold(0.0_f32, f32::max);
    let size = egui::vec2(
        LEGEND_PAD * 3.0 + LEGEND_SWATCH + max_width,
        LEGEND_PAD * 2.0 + galleys.len() as f32 * LEGEND_ROW_HEIGHT,
    );

    let legend_rect = place_legend(chart.legend_position, plot_rect, size, screen_lines);
    painter.rect_filled(legend_rect, 3.0, FIGURE_BG.gamma_multiply(0.85));
    painter.rect_stroke(
        legend_rect,
        3.0,
        Stroke::new(0.8, DIM_INK.gamma_multiply(0.6)),
        egui::StrokeKind::Inside,
    );

    let mut y = legend_rect.top() + LEGEND_PAD + LEGEND_ROW_HEIGHT / 2.0;
    let swatch_left = legend_rect.left() + LEGEND_PAD;
    for (entry, galley) in chart.legend.iter().zip(galleys) {
        painter.line_segment(
            [Pos2::new(swatch_left, y), Pos2::new(swatch_left + LEGEND_SWATCH, y)],
            Stroke::new(LINE_WIDTH + 0.5, entry.color.color32()),
        );
        let text_pos = Pos2::new(
            swatch_left + LEGEND_SWATCH + LEGEND_PAD,
            y - galley.size().y / 2.0,
        );
        painter.galley(text_pos, galley, INK);
        y += LEGEND_ROW_HEIGHT;
    }
}
