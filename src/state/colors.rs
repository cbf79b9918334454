use std::collections::HashMap;
use crate::error::PlotError;

/// A display color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn from_bytes([r, g, b]: [u8; 3]) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub fn color32(&self) -> egui::Color32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        egui::Color32::from_rgb(channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Ordered code → color table. Order sets legend precedence.
#[derive(Debug, Clone, Default)]
pub struct ColorRegistry {
    codes: Vec<String>,
    colors: HashMap<String, Rgb>,
    ranks: HashMap<String, usize>,
}

impl ColorRegistry {
    /// Build a registry from `(code, color)` pairs. If a code repeats, its
    /// first entry wins.
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Rgb)>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for (code, color) in pairs {
            let code = code.into();
            if registry.colors.contains_key(&code) {
                tracing::warn!("Code {code:?} is listed more than once in code_colors; keeping the first color");
                continue;
            }
            registry.ranks.insert(code.clone(), registry.codes.len());
            registry.colors.insert(code.clone(), color);
            registry.codes.push(code);
        }
        registry
    }

    pub fn color(&self, code: &str) -> Result<Rgb, PlotError> {
        self.colors
            .get(code)
            .copied()
            .ok_or_else(|| PlotError::UnknownCode(code.to_string()))
    }

    /// Position of `code` in the configured order.
    pub fn rank(&self, code: &str) -> Result<usize, PlotError> {
        self.ranks
            .get(code)
            .copied()
            .ok_or_else(|| PlotError::UnknownCode(code.to_string()))
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ColorRegistry {
        ColorRegistry::new([
            ("A", Rgb::from_bytes([255, 0, 0])),
            ("B", Rgb::from_bytes([0, 0, 255])),
        ])
    }

    #[test]
    fn lookups_follow_configuration() {
        let reg = registry();
        assert_eq!(reg.color("B").unwrap(), Rgb { r: 0.0, g: 0.0, b: 1.0 });
        assert_eq!(reg.rank("A").unwrap(), 0);
        assert_eq!(reg.rank("B").unwrap(), 1);
        assert_eq!(reg.codes(), ["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn unknown_code_is_named_in_the_error() {
        let reg = registry();
        let err = reg.color("Q8x").unwrap_err();
        assert_eq!(err, PlotError::UnknownCode("Q8x".to_string()));
        assert!(err.to_string().contains("Q8x"));
        assert!(err.to_string().contains("code_colors"));
        assert_eq!(reg.rank("Q8x"), Err(PlotError::UnknownCode("Q8x".to_string())));
    }

    #[test]
    fn duplicate_codes_keep_first_entry() {
        let reg = ColorRegistry::new([
            ("A", Rgb::from_bytes([255, 0, 0])),
            ("B", Rgb::from_bytes([0, 255, 0])),
            ("A", Rgb::from_bytes([0, 0, 255])),
        ]);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.rank("A").unwrap(), 0);
        assert_eq!(reg.color("A").unwrap(), Rgb::from_bytes([255, 0, 0]));
    }

    #[test]
    fn byte_colors_convert_to_color32() {
        let rgb = Rgb::from_bytes([43, 133, 161]);
        assert_eq!(rgb.color32(), egui::Color32::from_rgb(43, 133, 161));
    }
}
