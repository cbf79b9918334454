use std::path::PathBuf;
use std::sync::Arc;
use eframe::egui;
use crate::data::loader::SUPPORTED_EXTENSIONS;
use crate::render::export;
use crate::error::PlotError;
use crate::state::app_state::{present_failure, AppState, ShellPhase, VERSION};
use crate::state::config::PlotConfig;
use crate::state::legend::LegendPosition;
use crate::ui::figure_window::{self, Figure, FigureAction};

/// Tooltip delay while a figure is being captured, long enough that none appear.
const CAPTURE_TOOLTIP_DELAY: f32 = 3600.0;

/// What to do with a figure once the next screenshot arrives.
enum PendingCapture {
    SaveFile { figure_id: usize, path: PathBuf },
    Clipboard { figure_id: usize },
}

impl PendingCapture {
    fn figure_id(&self) -> usize {
        match self {
            PendingCapture::SaveFile { figure_id, .. } => *figure_id,
            PendingCapture::Clipboard { figure_id } => *figure_id,
        }
    }
}

/// The main SectionPlot application.
pub struct SectionPlotApp {
    pub state: AppState,
    /// Open figure windows, oldest first.
    figures: Vec<Figure>,
    next_figure_id: usize,
    /// Failure message shown in the error dialog until dismissed.
    pub error_message: Option<String>,
    pending_captures: Vec<PendingCapture>,
    /// Tooltip delay from the global style, restored once captures finish.
    tooltip_delay: f32,
}

impl SectionPlotApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: PlotConfig) -> Self {
        // --- Global UI style ---
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();

        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::proportional(15.0),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            egui::FontId::proportional(14.5),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::proportional(22.0),
        );

        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);

        style.visuals.window_corner_radius = egui::CornerRadius::same(8);
        style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
        style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
        style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(6);

        let tooltip_delay = style.interaction.tooltip_delay;
        ctx.set_style(style);

        Self {
            tooltip_delay,
            ..Self::with_config(config)
        }
    }

    fn with_config(config: PlotConfig) -> Self {
        Self {
            state: AppState::new(config),
            figures: Vec::new(),
            next_figure_id: 1,
            error_message: None,
            pending_captures: Vec::new(),
            tooltip_delay: 0.5,
        }
    }

    /// Open a native file dialog for the data file.
    fn open_input_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("spreadsheet files", SUPPORTED_EXTENSIONS)
            .set_directory(self.state.working_dir())
            .pick_file();
        self.state.select_input(picked);
    }

    /// Open a native save dialog for the figure image.
    fn open_output_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("png files", &[export::IMAGE_EXTENSION])
            .set_directory(self.state.working_dir())
            .save_file();
        self.state.select_output(picked);
    }

    /// Run the pipeline and open a figure window, or show why it failed.
    fn plot(&mut self) {
        tracing::info!("Plotting {:?}", self.state.input());
        let result = self.state.run_plot();
        debug_assert_eq!(self.state.phase(), ShellPhase::Idle);
        match result {
            Ok(outcome) => {
                self.error_message = None;
                let id = self.next_figure_id;
                self.next_figure_id += 1;
                tracing::info!(
                    "Opening figure {id} with {} series",
                    outcome.chart.lines.len()
                );
                self.figures.push(Figure::new(id, outcome.chart, outcome.save_to));
            }
            Err(e) => self.error_message = Some(present_failure(&e)),
        }
    }

    /// True from the moment a figure needs saving until its screenshot is handled.
    /// Overlays stay hidden meanwhile so they can't end up in the image.
    fn capture_in_progress(&self) -> bool {
        !self.pending_captures.is_empty() || self.figures.iter().any(|f| f.save_to.is_some())
    }

    fn request_capture(&mut self, ctx: &egui::Context, capture: PendingCapture) {
        ctx.move_to_top(figure_window::layer_id(capture.figure_id()));
        self.pending_captures.push(capture);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }

    /// Crop a screenshot to each waiting figure and save or copy it.
    fn finish_captures(&mut self, ctx: &egui::Context, screenshot: &egui::ColorImage) {
        let ppp = ctx.pixels_per_point();
        for capture in std::mem::take(&mut self.pending_captures) {
            let figure_id = capture.figure_id();
            let Some(rect) = self
                .figures
                .iter()
                .find(|f| f.id == figure_id)
                .and_then(|f| f.chart_rect)
            else {
                if let PendingCapture::SaveFile { path, .. } = capture {
                    self.error_message = Some(present_failure(&PlotError::SaveSkipped(path)));
                }
                continue;
            };

            let pixels = export::crop_screenshot(screenshot, rect, ppp);
            let result = match capture {
                PendingCapture::SaveFile { path, .. } => export::save_png(&path, &pixels),
                PendingCapture::Clipboard { .. } => export::copy_to_clipboard(pixels),
            };
            if let Err(e) = result {
                self.error_message = Some(present_failure(&e));
            }
        }
    }

    /// Forget closed figure windows, reporting any whose image was never saved.
    fn drop_closed_figures(&mut self) {
        let mut skipped = None;
        self.figures.retain_mut(|f| {
            if !f.open {
                if let Some(path) = f.save_to.take() {
                    skipped = Some(PlotError::SaveSkipped(path));
                }
            }
            f.open
        });
        if let Some(err) = skipped {
            self.error_message = Some(present_failure(&err));
        }
    }

    fn show_form(&mut self, ctx: &egui::Context) {
        let mut pick_input = false;
        let mut pick_output = false;
        let mut run_plot = false;
        let mut position = self.state.legend_position();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::Grid::new("plot_form")
                .num_columns(2)
                .spacing([24.0, 10.0])
                .show(ui, |ui| {
                    ui.label("Select input file:");
                    if ui.button("Select File").clicked() {
                        pick_input = true;
                    }
                    ui.end_row();

                    ui.label("Select output file:");
                    if ui.button("Select File").clicked() {
                        pick_output = true;
                    }
                    ui.end_row();
                });

            ui.add_space(12.0);
            ui.label(self.state.input_status());
            ui.label(self.state.output_status());
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                ui.label("Set Legend Position:");
                egui::ComboBox::from_id_salt("legend_position")
                    .selected_text(position.label())
                    .width(140.0)
                    .show_ui(ui, |ui| {
                        for pos in LegendPosition::ALL {
                            ui.selectable_value(&mut position, pos, pos.label());
                        }
                    });
            });

            ui.add_space(12.0);
            let plot_btn = egui::Button::new(egui::RichText::new("Plot").strong())
                .min_size(egui::vec2(120.0, 32.0));
            if ui.add(plot_btn).clicked() {
                run_plot = true;
            }
        });

        if position != self.state.legend_position() {
            self.state.set_legend_position(position);
        }
        if pick_input {
            self.open_input_dialog();
        }
        if pick_output {
            self.open_output_dialog();
        }
        if run_plot {
            self.plot();
        }
    }

    fn show_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(msg) = &self.error_message else { return };
        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.error_message = None;
        }
    }
}

impl eframe::App for SectionPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let tooltip_delay = if self.capture_in_progress() {
            CAPTURE_TOOLTIP_DELAY
        } else {
            self.tooltip_delay
        };
        ctx.style_mut(|style| style.interaction.tooltip_delay = tooltip_delay);

        // ------------------------------------------------------------------
        // 0. Handle screenshot events from previous frame
        // ------------------------------------------------------------------
        if !self.pending_captures.is_empty() {
            let mut screenshot: Option<Arc<egui::ColorImage>> = None;
            ctx.input(|i| {
                for event in &i.raw.events {
                    if let egui::Event::Screenshot { image, .. } = event {
                        screenshot = Some(image.clone());
                    }
                }
            });
            if let Some(image) = screenshot {
                self.finish_captures(ctx, &image);
            }
        }

        // ------------------------------------------------------------------
        // 1. Dropped data files become the input selection
        // ------------------------------------------------------------------
        let dropped: Option<PathBuf> = ctx.input(|i| {
            i.raw.dropped_files.iter().filter_map(|f| f.path.clone()).find(|path| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
        });
        if let Some(path) = dropped {
            self.state.select_input(Some(path));
        }

        // ------------------------------------------------------------------
        // 2. Figures that were plotted with an output file get saved once visible
        // ------------------------------------------------------------------
        let mut auto_saves = Vec::new();
        for figure in &mut self.figures {
            if figure.ready_for_capture() {
                if let Some(path) = figure.save_to.take() {
                    auto_saves.push(PendingCapture::SaveFile { figure_id: figure.id, path });
                }
            }
        }
        for capture in auto_saves {
            self.request_capture(ctx, capture);
        }

        // ------------------------------------------------------------------
        // 3. Form
        // ------------------------------------------------------------------
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(format!("SectionPlot v{VERSION}")).weak());
                ui.separator();
                let registry = self.state.registry();
                ui.label(
                    egui::RichText::new(format!("{} codes configured", registry.len())).weak(),
                )
                .on_hover_text(registry.codes().join(", "));
            });
        });
        self.show_form(ctx);

        // ------------------------------------------------------------------
        // 4. Figure windows
        // ------------------------------------------------------------------
        let mut actions = Vec::new();
        for figure in &mut self.figures {
            match figure_window::show_figure(ctx, figure) {
                FigureAction::None => {}
                FigureAction::SaveImage => actions.push((figure.id, true)),
                FigureAction::CopyImage => actions.push((figure.id, false)),
            }
        }
        for (figure_id, save) in actions {
            if save {
                let picked = rfd::FileDialog::new()
                    .set_file_name("figure.png")
                    .add_filter("png files", &[export::IMAGE_EXTENSION])
                    .set_directory(self.state.working_dir())
                    .save_file();
                if let Some(path) = picked {
                    let path = export::normalize_output_path(&path);
                    self.request_capture(ctx, PendingCapture::SaveFile { figure_id, path });
                }
            } else {
                self.request_capture(ctx, PendingCapture::Clipboard { figure_id });
            }
        }

        self.drop_closed_figures();

        // ------------------------------------------------------------------
        // 5. Error dialog, held back while a figure is being captured
        // ------------------------------------------------------------------
        if self.capture_in_progress() {
            // Keep frames coming until every requested image has been written.
            ctx.request_repaint();
        } else {
            self.show_error_dialog(ctx);
        }
    }
}
