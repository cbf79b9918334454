use crate::data::cell::{Cell, CodedPoint};

/// A location along the section, without its classification code.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub distance: Cell,
    pub elevation: Cell,
}

impl Point {
    pub fn new(distance: impl Into<Cell>, elevation: impl Into<Cell>) -> Self {
        Self {
            distance: distance.into(),
            elevation: elevation.into(),
        }
    }
}

/// A maximal run of adjacent input rows sharing one code.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub code: String,
    pub points: Vec<Point>,
}

/// Split points into runs of equal adjacent codes, preserving input order.
///
/// A code interrupted by another code starts a fresh series when it returns,
/// so the same code may appear in several series.
pub fn make_series<I>(points: I) -> Vec<Series>
where
    I: IntoIterator<Item = CodedPoint>,
{
    let mut series: Vec<Series> = Vec::new();

    for CodedPoint { distance, elevation, code } in points {
        let point = Point::new(distance, elevation);
        match series.last_mut() {
            Some(current) if current.code == code => current.points.push(point),
            _ => series.push(Series { code, points: vec![point] }),
        }
    }

    series
}
