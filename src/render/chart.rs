use std::collections::HashSet;
use crate::data::cell::Cell;
use crate::error::PlotError;
use crate::processing::series::Series;
use crate::state::colors::{ColorRegistry, Rgb};
use crate::state::config::{AxisRange, PlotConfig};
use crate::state::legend::LegendPosition;

/// Fixed data window of a chart, mapped onto a screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartView {
    pub x: AxisRange,
    pub y: AxisRange,
}

impl ChartView {
    /// Convert data coordinates to screen position.
    pub fn data_to_screen(&self, x: f64, y: f64, rect: egui::Rect) -> egui::Pos2 {
        let t_x = (x - self.x.min) / self.x.span();
        let t_y = 1.0 - (y - self.y.min) / self.y.span();
        egui::Pos2::new(
            rect.left() + (t_x as f32) * rect.width(),
            rect.top() + (t_y as f32) * rect.height(),
        )
    }
}

/// One series resolved to numbers and a color, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub code: String,
    pub color: Rgb,
    /// `[distance, elevation]` pairs in series order.
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub code: String,
    pub color: Rgb,
}

/// Everything needed to draw one figure, independent of the UI toolkit.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub view: ChartView,
    pub x_label: String,
    pub y_label: String,
    pub lines: Vec<ChartLine>,
    pub legend: Vec<LegendEntry>,
    pub legend_position: LegendPosition,
}

impl ChartModel {
    /// Resolve series against the color table and axis settings.
    ///
    /// Fails with `UnknownCode` for a code missing from the table, and with
    /// `Unexpected` for a coordinate that is not a number.
    pub fn build(
        series: &[Series],
        legend_position: LegendPosition,
        config: &PlotConfig,
        registry: &ColorRegistry,
    ) -> Result<Self, PlotError> {
        let lines = series
            .iter()
            .map(|s| resolve_line(s, registry))
            .collect::<Result<Vec<_>, _>>()?;

        let legend = build_legend(series, registry)?;

        Ok(Self {
            view: ChartView { x: config.x_axis, y: config.y_axis },
            x_label: config.x_axis_label.clone(),
            y_label: config.y_axis_label.clone(),
            lines,
            legend,
            legend_position,
        })
    }

    pub fn point_count(&self) -> usize {
        self.lines.iter().map(|l| l.points.len()).sum()
    }
}

fn resolve_line(series: &Series, registry: &ColorRegistry) -> Result<ChartLine, PlotError> {
    let color = registry.color(&series.code)?;
    let points = series
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| -> Result<[f64; 2], PlotError> {
            Ok([
                numeric(&p.distance, "distance", &series.code, i)?,
                numeric(&p.elevation, "elevation", &series.code, i)?,
            ])
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ChartLine { code: series.code.clone(), color, points })
}

fn numeric(cell: &Cell, field: &str, code: &str, index: usize) -> Result<f64, PlotError> {
    cell.as_f64().ok_or_else(|| {
        PlotError::Unexpected(format!(
            "series {code:?}, point {index}: {field} {cell:?} is not numeric"
        ))
    })
}

/// One entry per distinct code, ordered by the color table rather than by
/// first appearance.
fn build_legend(series: &[Series], registry: &ColorRegistry) -> Result<Vec<LegendEntry>, PlotError> {
    let mut seen = HashSet::new();
    let mut ranked = Vec::new();
    for s in series {
        if seen.insert(s.code.as_str()) {
            ranked.push((registry.rank(&s.code)?, s.code.as_str()));
        }
    }
    ranked.sort_by_key(|&(rank, _)| rank);

    ranked
        .into_iter()
        .map(|(_, code)| -> Result<LegendEntry, PlotError> {
            Ok(LegendEntry {
                code: code.to_string(),
                color: registry.color(code)?,
            })
        })
        .collect()
}
