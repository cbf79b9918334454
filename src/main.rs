mod state;
mod data;
mod processing;
mod render;
mod ui;
mod error;
mod app;

use std::path::PathBuf;
use app::SectionPlotApp;
use eframe::egui;
use eframe::egui_wgpu;
use state::config::PlotConfig;
use tracing_subscriber::EnvFilter;

/// Renderer setup. Figures are plain 2D line art, so the integrated GPU is
/// enough. GL is the fallback for machines without a modern graphics API.
fn renderer_options() -> egui_wgpu::WgpuConfiguration {
    let backends = eframe::wgpu::Backends::DX12
        | eframe::wgpu::Backends::VULKAN
        | eframe::wgpu::Backends::METAL
        | eframe::wgpu::Backends::GL;

    egui_wgpu::WgpuConfiguration {
        present_mode: eframe::wgpu::PresentMode::AutoVsync,
        wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
            instance_descriptor: eframe::wgpu::InstanceDescriptor {
                backends,
                ..Default::default()
            },
            power_preference: eframe::wgpu::PowerPreference::LowPower,
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Optional first argument: path to a config file.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = PlotConfig::load_or_default(config_path.as_deref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("SectionPlot")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([520.0, 360.0])
            .with_drag_and_drop(true),
        wgpu_options: renderer_options(),
        ..Default::default()
    };

    eframe::run_native(
        "SectionPlot",
        options,
        Box::new(move |cc| Ok(Box::new(SectionPlotApp::new(cc, config)))),
    )
}
