use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::ConfigError;
use crate::state::colors::{ColorRegistry, Rgb};
use crate::state::legend::LegendPosition;

/// File name looked up in the working directory when no config path is given.
pub const CONFIG_FILE_NAME: &str = "sectionplot.json";

/// One row of the color table, with components in `[0, 255]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeColor {
    pub code: String,
    pub rgb: [u8; 3],
}

impl CodeColor {
    fn new(code: &str, rgb: [u8; 3]) -> Self {
        Self { code: code.to_string(), rgb }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    fn check(&self, axis: &'static str) -> Result<(), ConfigError> {
        if !(self.span() > 0.0 && self.span().is_finite()) {
            return Err(ConfigError::BadRange { axis, min: self.min, max: self.max });
        }
        Ok(())
    }
}

/// Maintainer-edited plot settings. Read once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Code → color table; its order is the legend order.
    pub code_colors: Vec<CodeColor>,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub x_axis: AxisRange,
    pub y_axis: AxisRange,
    pub default_legend_position: LegendPosition,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            code_colors: vec![
                CodeColor::new("Q1ta", [130, 130, 130]),
                CodeColor::new("Q3a", [130, 130, 130]),
                CodeColor::new("Q7u", [43, 133, 161]),
                CodeColor::new("Q8i", [194, 158, 215]),
                CodeColor::new("Q8c", [255, 207, 255]),
                CodeColor::new("Q9w", [79, 122, 56]),
                CodeColor::new("eQw", [255, 127, 127]),
            ],
            x_axis_label: "Distance, East-West (m)".to_string(),
            y_axis_label: "Elevation (m)".to_string(),
            x_axis: AxisRange { min: 0.0, max: 20250.0 },
            y_axis: AxisRange { min: 120.0, max: 530.0 },
            default_legend_position: LegendPosition::Best,
        }
    }
}

impl PlotConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.x_axis.check("x")?;
        config.y_axis.check("y")?;
        Ok(config)
    }

    /// Load `explicit` if given, else `sectionplot.json` from the working
    /// directory if present. Falls back to the built-in table on any failure.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let candidate: Option<PathBuf> = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let local = PathBuf::from(CONFIG_FILE_NAME);
                local.is_file().then_some(local)
            }
        };

        let Some(path) = candidate else {
            tracing::info!("No config file found, using built-in code colors");
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?} ({} codes)", path, config.code_colors.len());
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring config {:?}: {e}", path);
                Self::default()
            }
        }
    }

    pub fn registry(&self) -> ColorRegistry {
        ColorRegistry::new(
            self.code_colors
                .iter()
                .map(|entry| (entry.code.clone(), Rgb::from_bytes(entry.rgb))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_the_survey_table() {
        let config = PlotConfig::default();
        let registry = config.registry();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.rank("Q1ta").unwrap(), 0);
        assert_eq!(registry.rank("eQw").unwrap(), 6);
        assert_eq!(config.x_axis, AxisRange { min: 0.0, max: 20250.0 });
        assert_eq!(config.y_axis.span(), 410.0);
    }

    #[test]
    fn json_round_trip_preserves_color_order() {
        let mut config = PlotConfig::default();
        config.code_colors.reverse();
        config.default_legend_position = LegendPosition::LowerLeft;

        let json = serde_json::to_string_pretty(&config).unwrap();
        let back: PlotConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.registry().rank("eQw").unwrap(), 0);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let back: PlotConfig = serde_json::from_str(
            r#"{ "code_colors": [ { "code": "Zz", "rgb": [1, 2, 3] } ], "default_legend_position": "upper left" }"#,
        )
        .unwrap();
        assert_eq!(back.code_colors, vec![CodeColor::new("Zz", [1, 2, 3])]);
        assert_eq!(back.x_axis_label, "Distance, East-West (m)");
        assert_eq!(back.default_legend_position, LegendPosition::UpperLeft);
    }

    #[test]
    fn broken_config_file_falls_back_to_defaults() {
        let path = std::env::temp_dir()
            .join(format!("sectionplot_config_{}_broken.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(PlotConfig::load(&path), Err(ConfigError::Parse(_))));
        assert_eq!(PlotConfig::load_or_default(Some(&path)), PlotConfig::default());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn flat_axis_range_is_rejected() {
        let path = std::env::temp_dir()
            .join(format!("sectionplot_config_{}_flat.json", std::process::id()));
        std::fs::write(&path, r#"{ "y_axis": { "min": 200.0, "max": 200.0 } }"#).unwrap();

        assert!(matches!(
            PlotConfig::load(&path),
            Err(ConfigError::BadRange { axis: "y", .. })
        ));
        assert_eq!(PlotConfig::load_or_default(Some(&path)), PlotConfig::default());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn inverted_axis_range_is_rejected() {
        let path = std::env::temp_dir()
            .join(format!("sectionplot_config_{}_inverted.json", std::process::id()));
        std::fs::write(&path, r#"{ "x_axis": { "min": 20250.0, "max": 0.0 } }"#).unwrap();

        let err = PlotConfig::load(&path).unwrap_err();
        assert_eq!(err.to_string(), "x axis range 20250..0 must have max greater than min");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_explicit_config_is_an_io_error() {
        let path = std::env::temp_dir().join("sectionplot_config_missing.json");
        assert!(matches!(PlotConfig::load(&path), Err(ConfigError::Io(_))));
    }
}
