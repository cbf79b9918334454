pub mod chart;
pub mod export;
pub mod legend_layout;
pub mod painter;
pub mod ticks;
