use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use crate::data::loader;
use crate::error::PlotError;
use crate::processing::series::make_series;
use crate::render::chart::ChartModel;
use crate::render::export::normalize_output_path;
use crate::state::colors::ColorRegistry;
use crate::state::config::PlotConfig;
use crate::state::legend::LegendPosition;

pub const VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellPhase {
    Idle,
    Plotting,
}

/// A successfully built figure and where it should be saved, if anywhere.
#[derive(Debug, Clone)]
pub struct PlotOutcome {
    pub chart: ChartModel,
    pub save_to: Option<PathBuf>,
}

/// Form state of the plotting window, independent of the UI toolkit.
///
/// Every field changes only through the named transitions below, each
/// triggered by a single user action.
#[derive(Debug, Clone)]
pub struct AppState {
    config: PlotConfig,
    registry: ColorRegistry,
    input: Option<PathBuf>,
    /// Output location with its extension stripped.
    output_stem: Option<PathBuf>,
    legend_position: LegendPosition,
    working_dir: PathBuf,
    phase: ShellPhase,
}

impl AppState {
    pub fn new(config: PlotConfig) -> Self {
        let registry = config.registry();
        let legend_position = config.default_legend_position;
        Self {
            config,
            registry,
            input: None,
            output_stem: None,
            legend_position,
            working_dir: std::env::current_dir().unwrap_or_default(),
            phase: ShellPhase::Idle,
        }
    }

    pub fn registry(&self) -> &ColorRegistry {
        &self.registry
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    /// Where the next plot will be saved, always with a `.png` extension.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_stem.as_deref().map(normalize_output_path)
    }

    pub fn legend_position(&self) -> LegendPosition {
        self.legend_position
    }

    /// Directory the file dialogs open in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn phase(&self) -> ShellPhase {
        self.phase
    }

    /// `None` means the dialog was cancelled and clears the selection.
    pub fn select_input(&mut self, path: Option<PathBuf>) {
        if let Some(dir) = path.as_deref().and_then(Path::parent) {
            self.working_dir = dir.to_path_buf();
        }
        self.input = path;
    }

    pub fn select_output(&mut self, path: Option<PathBuf>) {
        if let Some(dir) = path.as_deref().and_then(Path::parent) {
            self.working_dir = dir.to_path_buf();
        }
        self.output_stem = path.map(|p| p.with_extension(""));
    }

    pub fn set_legend_position(&mut self, position: LegendPosition) {
        self.legend_position = position;
    }

    pub fn input_status(&self) -> String {
        match &self.input {
            Some(path) => format!("You've selected: {}", path.display()),
            None => "You haven't selected an input file".to_string(),
        }
    }

    pub fn output_status(&self) -> String {
        match self.output_path() {
            Some(path) => format!("Plot will be saved to: {}", path.display()),
            None => "You haven't named an output file".to_string(),
        }
    }

    /// Read, group and chart the selected input.
    ///
    /// A panic anywhere in the pipeline is reported as `Unexpected` so the
    /// form stays usable.
    pub fn run_plot(&mut self) -> Result<PlotOutcome, PlotError> {
        self.phase = ShellPhase::Plotting;
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.plot_pipeline()))
            .unwrap_or_else(|_| Err(PlotError::Unexpected("plotting pipeline panicked".to_string())));
        self.phase = ShellPhase::Idle;
        result
    }

    fn plot_pipeline(&self) -> Result<PlotOutcome, PlotError> {
        let input = self
            .input
            .as_deref()
            .ok_or_else(|| PlotError::Unexpected("no input file selected".to_string()))?;

        let points = loader::read_file(input)?;
        let series = make_series(points);
        tracing::info!("Grouped {:?} into {} series", input, series.len());

        let chart = ChartModel::build(&series, self.legend_position, &self.config, &self.registry)?;
        Ok(PlotOutcome { chart, save_to: self.output_path() })
    }
}

/// Message to show for a failed plot. Unexpected failures are logged with
/// their detail, which the user never sees.
pub fn present_failure(err: &PlotError) -> String {
    if err.is_domain() {
        tracing::warn!("Plot failed: {err}");
    } else {
        tracing::error!("Plot failed: {err}");
    }
    err.user_message()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_FAILURE_MESSAGE;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("sectionplot_app_{}_{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn starts_idle_with_nothing_selected() {
        let state = AppState::new(PlotConfig::default());
        assert_eq!(state.phase(), ShellPhase::Idle);
        assert_eq!(state.input(), None);
        assert_eq!(state.output_path(), None);
        assert_eq!(state.legend_position(), LegendPosition::Best);
        assert_eq!(state.input_status(), "You haven't selected an input file");
        assert_eq!(state.output_status(), "You haven't named an output file");
    }

    #[test]
    fn selecting_files_updates_status_and_working_dir() {
        let mut state = AppState::new(PlotConfig::default());

        state.select_input(Some(PathBuf::from("/surveys/line4/points.csv")));
        assert_eq!(state.input_status(), "You've selected: /surveys/line4/points.csv");
        assert_eq!(state.working_dir(), Path::new("/surveys/line4"));

        state.select_output(Some(PathBuf::from("/figures/line4.jpeg")));
        assert_eq!(state.output_path(), Some(PathBuf::from("/figures/line4.png")));
        assert_eq!(state.output_status(), "Plot will be saved to: /figures/line4.png");
        assert_eq!(state.working_dir(), Path::new("/figures"));

        state.select_output(None);
        assert_eq!(state.output_path(), None);
        state.select_input(None);
        assert_eq!(state.input(), None);
        assert_eq!(state.working_dir(), Path::new("/figures"));
    }

    #[test]
    fn plotting_without_input_is_unexpected_and_returns_to_idle() {
        let mut state = AppState::new(PlotConfig::default());
        let err = state.run_plot().unwrap_err();
        assert!(!err.is_domain());
        assert_eq!(present_failure(&err), GENERIC_FAILURE_MESSAGE);
        assert_eq!(state.phase(), ShellPhase::Idle);
    }

    #[test]
    fn full_pipeline_builds_a_chart() {
        let input = write_temp(
            "pipeline.csv",
            "distance,elevation,code\n0,300,Q7u\n100,310,Q7u\n200,305,Q9w\n300,320,Q7u\n",
        );
        let mut state = AppState::new(PlotConfig::default());
        state.select_input(Some(input.clone()));
        state.select_output(Some(PathBuf::from("section")));
        state.set_legend_position(LegendPosition::LowerRight);

        let outcome = state.run_plot().unwrap();

        assert_eq!(outcome.chart.lines.len(), 3);
        assert_eq!(outcome.chart.point_count(), 4);
        let legend: Vec<&str> = outcome.chart.legend.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(legend, ["Q7u", "Q9w"]);
        assert_eq!(outcome.chart.legend_position, LegendPosition::LowerRight);
        assert_eq!(outcome.save_to, Some(PathBuf::from("section.png")));
        assert_eq!(state.phase(), ShellPhase::Idle);
        std::fs::remove_file(input).ok();
    }

    #[test]
    fn domain_errors_reach_the_user_verbatim() {
        let input = write_temp("unknown_code.csv", "d,e,c\n0,300,Q7u\n1,301,Xx1\n");
        let mut state = AppState::new(PlotConfig::default());
        state.select_input(Some(input.clone()));

        let err = state.run_plot().unwrap_err();
        assert_eq!(err, PlotError::UnknownCode("Xx1".to_string()));
        assert_eq!(
            present_failure(&err),
            "Could not find code: Xx1, you may need to add it to 'code_colors'"
        );

        // The form is still usable afterwards.
        state.select_input(Some(PathBuf::from("notes.txt")));
        assert_eq!(
            state.run_plot().unwrap_err(),
            PlotError::UnsupportedFiletype(".txt".to_string())
        );
        assert_eq!(state.phase(), ShellPhase::Idle);
        std::fs::remove_file(input).ok();
    }
}
