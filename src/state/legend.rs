use serde::{Deserialize, Serialize};

/// Named anchor for the legend box inside the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LegendPosition {
    Best,
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
}

impl Default for LegendPosition {
    fn default() -> Self {
        LegendPosition::Best
    }
}

impl LegendPosition {
    /// Every selectable position, in the order the selector lists them.
    pub const ALL: [LegendPosition; 10] = [
        LegendPosition::Best,
        LegendPosition::UpperRight,
        LegendPosition::UpperLeft,
        LegendPosition::LowerLeft,
        LegendPosition::LowerRight,
        LegendPosition::CenterLeft,
        LegendPosition::CenterRight,
        LegendPosition::LowerCenter,
        LegendPosition::UpperCenter,
        LegendPosition::Center,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LegendPosition::Best => "Best",
            LegendPosition::UpperRight => "Upper Right",
            LegendPosition::UpperLeft => "Upper Left",
            LegendPosition::LowerLeft => "Lower Left",
            LegendPosition::LowerRight => "Lower Right",
            LegendPosition::CenterLeft => "Center Left",
            LegendPosition::CenterRight => "Center Right",
            LegendPosition::LowerCenter => "Lower Center",
            LegendPosition::UpperCenter => "Upper Center",
            LegendPosition::Center => "Center",
        }
    }

    /// Where the legend box sits within the plot area.
    /// `None` for `Best`, which is resolved against the drawn data.
    pub fn align(&self) -> Option<egui::Align2> {
        match self {
            LegendPosition::Best => None,
            LegendPosition::UpperRight => Some(egui::Align2::RIGHT_TOP),
            LegendPosition::UpperLeft => Some(egui::Align2::LEFT_TOP),
            LegendPosition::LowerLeft => Some(egui::Align2::LEFT_BOTTOM),
            LegendPosition::LowerRight => Some(egui::Align2::RIGHT_BOTTOM),
            LegendPosition::CenterLeft => Some(egui::Align2::LEFT_CENTER),
            LegendPosition::CenterRight => Some(egui::Align2::RIGHT_CENTER),
            LegendPosition::LowerCenter => Some(egui::Align2::CENTER_BOTTOM),
            LegendPosition::UpperCenter => Some(egui::Align2::CENTER_TOP),
            LegendPosition::Center => Some(egui::Align2::CENTER_CENTER),
        }
    }

    /// Parse a position name, ignoring case, spaces, underscores and dashes.
    pub fn parse(name: &str) -> Option<Self> {
        let wanted: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();
        Self::ALL.into_iter().find(|pos| {
            pos.label().replace(' ', "").to_lowercase() == wanted
        })
    }
}

impl From<String> for LegendPosition {
    fn from(name: String) -> Self {
        LegendPosition::parse(&name).unwrap_or_else(|| {
            tracing::warn!("Unknown legend position {name:?}, using Best");
            LegendPosition::Best
        })
    }
}

impl From<LegendPosition> for String {
    fn from(pos: LegendPosition) -> Self {
        pos.label().to_string()
    }
}
