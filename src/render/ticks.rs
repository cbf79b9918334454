/// An axis tick in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Major ticks carry a label; minor ticks are short marks only.
    pub major: bool,
}

/// Round `raw` up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let order = 10f64.powf(raw.log10().floor());
    let normalized = raw / order;

    if normalized <= 1.0 {
        order
    } else if normalized <= 2.0 {
        2.0 * order
    } else if normalized <= 5.0 {
        5.0 * order
    } else {
        10.0 * order
    }
}

/// Tick positions for an axis range, about eight major ticks with four
/// minor ticks between each pair.
pub fn compute_ticks(min: f64, max: f64) -> Vec<Tick> {
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Vec::new();
    }

    let major_step = nice_step(range / 8.0);
    let minor_step = major_step / 5.0;

    let start = (min / minor_step).floor() as i64;
    let end = (max / minor_step).ceil() as i64;

    (start..=end)
        .map(|i| i as f64 * minor_step)
        .filter(|&value| value >= min && value <= max)
        .map(|value| Tick {
            value,
            major: ((value / major_step).round() * major_step - value).abs() < major_step * 0.01,
        })
        .collect()
}

/// Tick label text: plain decimals without trailing zeros, scientific
/// notation for very large or very small magnitudes.
pub fn format_tick_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if !(1e-3..1e6).contains(&value.abs()) {
        return format!("{value:.2e}");
    }
    format!("{value:.6}")
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn majors(min: f64, max: f64) -> Vec<f64> {
        compute_ticks(min, max)
            .into_iter()
            .filter(|t| t.major)
            .map(|t| t.value)
            .collect()
    }

    #[test]
    fn distance_axis_gets_round_ticks() {
        assert_eq!(majors(0.0, 20250.0), vec![0.0, 5000.0, 10000.0, 15000.0, 20000.0]);
    }

    #[test]
    fn elevation_axis_stays_inside_range() {
        let ticks = compute_ticks(120.0, 530.0);
        assert!(ticks.iter().all(|t| t.value >= 120.0 && t.value <= 530.0));
        assert_eq!(majors(120.0, 530.0), vec![200.0, 300.0, 400.0, 500.0]);
    }

    #[test]
    fn degenerate_range_has_no_ticks() {
        assert!(compute_ticks(5.0, 5.0).is_empty());
        assert!(compute_ticks(10.0, 0.0).is_empty());
    }

    #[test]
    fn tick_labels_drop_trailing_zeros() {
        assert_eq!(format_tick_value(0.0), "0");
        assert_eq!(format_tick_value(5000.0), "5000");
        assert_eq!(format_tick_value(2.5), "2.5");
        assert_eq!(format_tick_value(2.5e7), "2.50e7");
        assert_eq!(format_tick_value(-125.0), "-125");
        assert_eq!(format_tick_value(0.0005), "5.00e-4");
    }
}
