//! Conversions between canvas pixels and world coordinates.
//!
//! Pointer positions arrive in canvas space: logical pixels relative to the
//! canvas rect's top-left corner. Box geometry lives in world space. The
//! camera maps between the two as `canvas = world * zoom + pan`.

use egui::{Pos2, Rect, Vec2};

use crate::constants::{MAX_ZOOM, MIN_ZOOM};
use crate::types::{Document, Pan};

/// The camera: a pan offset in canvas pixels plus a zoom factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Canvas-pixel position of the world origin.
    pub pan: Pan,
    /// Scale from world units to canvas pixels.
    pub zoom: f32,
}

impl ViewTransform {
    /// Creates a transform from explicit camera parameters.
    pub fn new(pan: Pan, zoom: f32) -> Self {
        Self { pan, zoom }
    }

    /// Reads the camera out of a document.
    pub fn of(doc: &Document) -> Self {
        Self {
            pan: doc.pan,
            zoom: doc.zoom,
        }
    }

    /// Writes the camera back into a document.
    pub fn apply_to(&self, doc: &mut Document) {
        doc.pan = self.pan;
        doc.zoom = self.zoom;
    }

    /// Maps a canvas-space point to world space.
    pub fn to_world(&self, canvas_pos: Pos2) -> Pos2 {
        Pos2::new(
            (canvas_pos.x - self.pan.x) / self.zoom,
            (canvas_pos.y - self.pan.y) / self.zoom,
        )
    }

    /// Maps a world-space point to canvas space.
    pub fn to_canvas(&self, world_pos: Pos2) -> Pos2 {
        Pos2::new(
            world_pos.x * self.zoom + self.pan.x,
            world_pos.y * self.zoom + self.pan.y,
        )
    }

    /// Maps a world-space rect to canvas space.
    pub fn rect_to_canvas(&self, world: Rect) -> Rect {
        Rect::from_min_max(self.to_canvas(world.min), self.to_canvas(world.max))
    }

    /// The world-space rect visible through a canvas of the given size.
    pub fn visible_world_rect(&self, canvas_size: Vec2) -> Rect {
        Rect::from_min_max(
            self.to_world(Pos2::ZERO),
            self.to_world(canvas_size.to_pos2()),
        )
    }

    /// Multiplies zoom by `factor`, clamped to the allowed range, keeping the
    /// world point under `canvas_pos` stationary on screen.
    pub fn zoom_about(&mut self, canvas_pos: Pos2, factor: f32) {
        let world = self.to_world(canvas_pos);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = Pan::new(
            canvas_pos.x - world.x * self.zoom,
            canvas_pos.y - world.y * self.zoom,
        );
    }
}

/// The screen rect a canvas occupies plus the size its content was laid out
/// at. Under egui the two always match, but an embedding that paints the
/// canvas scaled reports a layout size different from its on-screen rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    /// Screen-space rect the canvas occupies.
    pub rect: Rect,
    /// Logical size the canvas content was laid out at.
    pub layout_size: Vec2,
}

impl CanvasBounds {
    /// Bounds for a canvas drawn at its laid-out size.
    pub fn unscaled(rect: Rect) -> Self {
        Self {
            rect,
            layout_size: rect.size(),
        }
    }

    /// Maps a screen-space pointer position into canvas space, correcting
    /// for any difference between the laid-out and on-screen size.
    pub fn to_canvas_local(&self, pointer: Pos2) -> Pos2 {
        let rel = pointer - self.rect.min.to_vec2();
        let sx = if self.rect.width() > 0.0 {
            self.layout_size.x / self.rect.width()
        } else {
            1.0
        };
        let sy = if self.rect.height() > 0.0 {
            self.layout_size.y / self.rect.height()
        } else {
            1.0
        };
        Pos2::new(rel.x * sx, rel.y * sy)
    }
}

/// Converts a screen-space pointer position into canvas space for a canvas
/// drawn at its laid-out size.
pub fn canvas_pos(pointer: Pos2, canvas_rect: Rect) -> Pos2 {
    CanvasBounds::unscaled(canvas_rect).to_canvas_local(pointer)
}

/// Rounds a value to the nearest grid multiple. Identity when the grid is off.
pub fn snap_to_grid(value: f32, grid_size: f32) -> f32 {
    if grid_size <= 0.0 {
        value
    } else {
        (value / grid_size).round() * grid_size
    }
}
