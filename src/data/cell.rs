use std::fmt;

/// A single field value as read from an input file.
///
/// Delimited-text coordinates are always `Number`. Spreadsheet cells are kept
/// as the workbook stores them, so a text cell in a numeric column survives
/// until the chart is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
    Error(String),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Empty => Ok(()),
            Cell::Error(e) => write!(f, "#{e}"),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&calamine::Data> for Cell {
    fn from(data: &calamine::Data) -> Self {
        use calamine::Data;
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            // Workbooks store booleans and dates as numbers; keep them that way.
            Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Error(format!("{e:?}")),
        }
    }
}

/// One input row: a location along the section and its classification code.
#[derive(Debug, Clone, PartialEq)]
pub struct CodedPoint {
    pub distance: Cell,
    pub elevation: Cell,
    pub code: String,
}

impl CodedPoint {
    pub fn new(distance: impl Into<Cell>, elevation: impl Into<Cell>, code: impl Into<String>) -> Self {
        Self {
            distance: distance.into(),
            elevation: elevation.into(),
            code: code.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Data;

    #[test]
    fn spreadsheet_cells_keep_their_kind() {
        assert_eq!(Cell::from(&Data::Float(12.5)), Cell::Number(12.5));
        assert_eq!(Cell::from(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(Cell::from(&Data::Bool(true)), Cell::Number(1.0));
        assert_eq!(Cell::from(&Data::String("abc".into())), Cell::Text("abc".into()));
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn only_numbers_convert_to_f64() {
        assert_eq!(Cell::Number(3.0).as_f64(), Some(3.0));
        assert_eq!(Cell::Text("3.0".into()).as_f64(), None);
        assert_eq!(Cell::Empty.as_f64(), None);
    }

    #[test]
    fn display_uses_shortest_number_form() {
        assert_eq!(Cell::Number(3.0).to_string(), "3");
        assert_eq!(Cell::Number(0.25).to_string(), "0.25");
        assert_eq!(Cell::Text("Q7u".into()).to_string(), "Q7u");
        assert_eq!(Cell::Empty.to_string(), "");
    }
}
