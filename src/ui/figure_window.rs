use std::path::PathBuf;
use eframe::egui;
use crate::render::chart::ChartModel;
use crate::render::painter;

/// Frames a new window needs before its contents are on screen; the first
/// frame of an egui window is an invisible sizing pass.
const FRAMES_BEFORE_CAPTURE: u32 = 2;

/// Actions that a figure window can request from the parent.
pub enum FigureAction {
    None,
    SaveImage,
    CopyImage,
}

/// One plotted chart shown in its own window.
pub struct Figure {
    pub id: usize,
    pub chart: ChartModel,
    /// Set when the chart must be written to disk once it is visible.
    pub save_to: Option<PathBuf>,
    pub open: bool,
    /// Screen rect of the chart area, set each frame for screenshot cropping.
    pub chart_rect: Option<egui::Rect>,
    frames_shown: u32,
}

impl Figure {
    pub fn new(id: usize, chart: ChartModel, save_to: Option<PathBuf>) -> Self {
        Self {
            id,
            chart,
            save_to,
            open: true,
            chart_rect: None,
            frames_shown: 0,
        }
    }

    pub fn title(&self) -> String {
        format!("Figure {}", self.id)
    }

    /// Whether the pending save can be captured this frame.
    pub fn ready_for_capture(&self) -> bool {
        self.save_to.is_some() && self.frames_shown >= FRAMES_BEFORE_CAPTURE
    }
}

fn window_id(figure_id: usize) -> egui::Id {
    egui::Id::new(("figure", figure_id))
}

/// Paint layer of a figure window, for raising it above everything else.
pub fn layer_id(figure_id: usize) -> egui::LayerId {
    egui::LayerId::new(egui::Order::Middle, window_id(figure_id))
}

/// Helper to create a toolbar button with consistent min size.
fn toolbar_btn(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(label).min_size(egui::vec2(0.0, 26.0)))
}

/// Render a figure window. Returns an action if the user clicked a button.
pub fn show_figure(ctx: &egui::Context, figure: &mut Figure) -> FigureAction {
    let mut action = FigureAction::None;

    egui::Window::new(figure.title())
        .id(window_id(figure.id))
        .open(&mut figure.open)
        .default_size([900.0, 600.0])
        .min_size([480.0, 320.0])
        .resizable(true)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;
                if toolbar_btn(ui, "Save Image...").on_hover_text("Save this figure as PNG").clicked() {
                    action = FigureAction::SaveImage;
                }
                if toolbar_btn(ui, "Copy Image").on_hover_text("Copy this figure to the clipboard").clicked() {
                    action = FigureAction::CopyImage;
                }
                ui.separator();
                ui.label(
                    egui::RichText::new(format!(
                        "{} series, {} points",
                        figure.chart.lines.len(),
                        figure.chart.point_count()
                    ))
                    .weak(),
                );
            });

            ui.add_space(4.0);

            let size = ui.available_size().max(egui::vec2(480.0, 320.0));
            let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());
            painter::paint_chart(&ui.painter_at(rect), &figure.chart, rect);
            figure.chart_rect = Some(rect);
        });

    figure.frames_shown = figure.frames_shown.saturating_add(1);
    action
}
