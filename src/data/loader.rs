use std::path::Path;
use crate::data::cell::{Cell, CodedPoint};
use crate::error::PlotError;

/// Extensions `read_file` accepts, lowercase and without the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xls"];

/// Number of logical columns in an input row: distance, elevation, code.
const FIELDS_PER_ROW: usize = 3;

/// Load a CSV or legacy Excel file and return its rows as coded points, in file order.
///
/// The first row of either format is a header and is skipped.
pub fn read_file(path: &Path) -> Result<Vec<CodedPoint>, PlotError> {
    let ext = path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let points = match ext.as_str() {
        "csv" => read_csv(path)?,
        "xls" => read_xls(path)?,
        "" => return Err(PlotError::UnsupportedFiletype(String::new())),
        _ => return Err(PlotError::UnsupportedFiletype(format!(".{ext}"))),
    };

    tracing::info!("Read {} rows from {:?}", points.len(), path);
    Ok(points)
}

fn read_csv(path: &Path) -> Result<Vec<CodedPoint>, PlotError> {
    parse_csv(path).map_err(|cause| {
        tracing::debug!("Rejecting {:?}: {cause}", path);
        PlotError::ReadFailed(path.to_path_buf())
    })
}

fn parse_csv(path: &Path) -> Result<Vec<CodedPoint>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot open file: {e}"))?;

    // The csv reader drops empty lines on its own; a blank data row is malformed.
    if let Some(line) = first_blank_row(&contents) {
        return Err(format!("line {line}: blank row"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut points = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| format!("malformed record: {e}"))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != FIELDS_PER_ROW {
            return Err(format!(
                "line {line}: expected {FIELDS_PER_ROW} fields, found {}",
                record.len()
            ));
        }

        let distance = parse_number(&record[0])
            .ok_or_else(|| format!("line {line}: distance {:?} is not a number", &record[0]))?;
        let elevation = parse_number(&record[1])
            .ok_or_else(|| format!("line {line}: elevation {:?} is not a number", &record[1]))?;

        points.push(CodedPoint::new(distance, elevation, &record[2]));
    }

    Ok(points)
}

/// 1-based line number of the first empty line, ignoring line breaks inside
/// quoted fields.
fn first_blank_row(contents: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut line = 1;
    let mut line_is_empty = true;

    for ch in contents.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                line_is_empty = false;
            }
            '\n' if !in_quotes => {
                if line_is_empty {
                    return Some(line);
                }
                line += 1;
                line_is_empty = true;
            }
            '\r' if !in_quotes => {}
            _ => line_is_empty = false,
        }
    }

    None
}

fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

fn read_xls(path: &Path) -> Result<Vec<CodedPoint>, PlotError> {
    parse_xls(path).map_err(|cause| {
        tracing::debug!("Rejecting {:?}: {cause}", path);
        PlotError::ReadFailed(path.to_path_buf())
    })
}

fn parse_xls(path: &Path) -> Result<Vec<CodedPoint>, String> {
    use calamine::{open_workbook_auto, Reader};

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Cannot open Excel file: {e}"))?;

    let sheet_name = workbook.sheet_names().first()
        .ok_or("No sheets found")?
        .clone();

    let range = workbook.worksheet_range(&sheet_name)
        .map_err(|e| format!("Cannot read sheet: {e}"))?;

    // Cell positions are absolute: row 0 is the header even when the used
    // range of the sheet starts further down or to the right.
    let last_row = match range.end() {
        Some((row, _)) => row,
        None => return Ok(Vec::new()),
    };

    let cell_at = |row: u32, col: u32| -> Cell {
        range.get_value((row, col))
            .map(Cell::from)
            .unwrap_or(Cell::Empty)
    };

    let points = (1..=last_row)
        .map(|row| CodedPoint {
            distance: cell_at(row, 0),
            elevation: cell_at(row, 1),
            code: cell_at(row, 2).to_string(),
        })
        .collect();

    Ok(points)
}
