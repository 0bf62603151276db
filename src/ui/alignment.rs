//! Smart alignment for box dragging.
//!
//! While a box is dragged, its left/center/right and top/center/bottom
//! reference lines are compared against the same references of every other
//! visible box. The smallest difference under a fixed on-screen threshold
//! wins per axis; the dragged box is corrected by that offset and a dashed
//! guide is drawn through the aligned line. All math is in world space, with
//! the threshold scaled by zoom so the feel is constant on screen.

use crate::constants::ALIGNMENT_THRESHOLD;
use eframe::egui;

/// A guide segment in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    pub start: egui::Pos2,
    pub end: egui::Pos2,
}

/// A winning alignment on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisMatch {
    /// World-space correction to add to the dragged box on this axis.
    pub offset: f32,
    /// Guide segment spanning the aligned extent of both boxes.
    pub guide: GuideLine,
}

/// Per-axis alignment result for one pointer move.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub x: Option<AxisMatch>,
    pub y: Option<AxisMatch>,
}

impl Alignment {
    /// The combined correction vector (zero on unmatched axes).
    pub fn correction(&self) -> egui::Vec2 {
        egui::vec2(
            self.x.map_or(0.0, |m| m.offset),
            self.y.map_or(0.0, |m| m.offset),
        )
    }

    /// Guide segments to draw, at most one per axis.
    pub fn guides(&self) -> Vec<GuideLine> {
        self.x
            .iter()
            .chain(self.y.iter())
            .map(|m| m.guide)
            .collect()
    }
}

fn refs_x(rect: &egui::Rect) -> [f32; 3] {
    [rect.min.x, rect.center().x, rect.max.x]
}

fn refs_y(rect: &egui::Rect) -> [f32; 3] {
    [rect.min.y, rect.center().y, rect.max.y]
}

/// Best (offset, aligned coordinate, matched rect) on one axis, or None if
/// nothing falls under the threshold. Earlier candidates win ties.
fn best_on_axis(
    mine: [f32; 3],
    others: &[egui::Rect],
    refs: fn(&egui::Rect) -> [f32; 3],
    threshold_world: f32,
) -> Option<(f32, f32, egui::Rect)> {
    let mut best: Option<(f32, f32, egui::Rect)> = None;
    for other in others {
        for theirs in refs(other) {
            for m in mine {
                let diff = theirs - m;
                if diff.abs() < threshold_world
                    && best.map_or(true, |(b, _, _)| diff.abs() < b.abs())
                {
                    best = Some((diff, theirs, *other));
                }
            }
        }
    }
    best
}

/// Computes the per-axis alignment of a dragged box against other boxes.
///
/// `dragged` is the box rect at the raw (unsnapped) pointer position;
/// `others` are the world rects of every other visible box. Guides span the
/// union of the corrected dragged rect and the matched box on the
/// perpendicular axis.
pub fn compute(dragged: egui::Rect, others: &[egui::Rect], zoom: f32) -> Alignment {
    if zoom <= 0.0 {
        return Alignment::default();
    }
    let threshold_world = ALIGNMENT_THRESHOLD / zoom;

    let best_x = best_on_axis(refs_x(&dragged), others, refs_x, threshold_world);
    let best_y = best_on_axis(refs_y(&dragged), others, refs_y, threshold_world);

    let corrected = dragged.translate(egui::vec2(
        best_x.map_or(0.0, |(d, _, _)| d),
        best_y.map_or(0.0, |(d, _, _)| d),
    ));

    Alignment {
        x: best_x.map(|(offset, line, other)| AxisMatch {
            offset,
            guide: GuideLine {
                start: egui::pos2(line, corrected.min.y.min(other.min.y)),
                end: egui::pos2(line, corrected.max.y.max(other.max.y)),
            },
        }),
        y: best_y.map(|(offset, line, other)| AxisMatch {
            offset,
            guide: GuideLine {
                start: egui::pos2(corrected.min.x.min(other.min.x), line),
                end: egui::pos2(corrected.max.x.max(other.max.x), line),
            },
        }),
    }
}
