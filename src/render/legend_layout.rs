use egui::{Pos2, Rect, Vec2};
use crate::state::legend::LegendPosition;

/// Gap between the legend box and the plot frame.
pub const LEGEND_MARGIN: f32 = 8.0;

/// Screen rectangle for a legend of `size` inside `plot_rect`.
///
/// `Best` picks the fixed anchor whose box covers the least of `lines`
/// (screen-space polylines), preferring anchors earlier in
/// `LegendPosition::ALL` on ties.
pub fn place_legend(
    position: LegendPosition,
    plot_rect: Rect,
    size: Vec2,
    lines: &[Vec<Pos2>],
) -> Rect {
    let frame = plot_rect.shrink(LEGEND_MARGIN);
    if let Some(align) = position.align() {
        return align.align_size_within_rect(size, frame);
    }

    let mut best: Option<(usize, Rect)> = None;
    for candidate in LegendPosition::ALL {
        let Some(align) = candidate.align() else { continue };
        let rect = align.align_size_within_rect(size, frame);
        let badness = coverage(rect, lines);
        if best.map_or(true, |(lowest, _)| badness < lowest) {
            best = Some((badness, rect));
        }
        if badness == 0 {
            break;
        }
    }

    best.map(|(_, rect)| rect)
        .unwrap_or_else(|| egui::Align2::RIGHT_TOP.align_size_within_rect(size, frame))
}

/// How much of the data a legend box would hide: vertices inside it plus
/// segments passing through it.
pub fn coverage(rect: Rect, lines: &[Vec<Pos2>]) -> usize {
    let vertices = lines
        .iter()
        .flatten()
        .filter(|p| rect.contains(**p))
        .count();
    let segments = lines
        .iter()
        .flat_map(|line| line.windows(2))
        .filter(|seg| segment_hits_rect(seg[0], seg[1], rect))
        .count();
    vertices + segments
}

fn segment_hits_rect(a: Pos2, b: Pos2, rect: Rect) -> bool {
    if rect.contains(a) || rect.contains(b) {
        return true;
    }
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    (0..4).any(|i| segments_cross(a, b, corners[i], corners[(i + 1) % 4]))
}

fn segments_cross(p1: Pos2, p2: Pos2, q1: Pos2, q2: Pos2) -> bool {
    let orient = |a: Pos2, b: Pos2, c: Pos2| (b - a).x * (c - a).y - (b - a).y * (c - a).x;
    let d1 = orient(q1, q2, p1);
    let d2 = orient(q1, q2, p2);
    let d3 = orient(p1, p2, q1);
    let d4 = orient(p1, p2, q2);
    (d1 > 0.0) != (d2 > 0.0) && (d3 > 0.0) != (d4 > 0.0)
}
