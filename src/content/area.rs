//! The image-area conditioning editor.
//!
//! Shows the target image as an aspect-fit outline with the conditioning
//! region drawn inside it. The region can be dragged to move, dragged from
//! its corner handle to resize, or redrawn by dragging on empty image space.
//! Exact values are edited through the number inputs around the preview.

use egui::{Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};

use super::{BoxEditor, EditorContext, EditorResponse};
use crate::types::BoxKind;

const HANDLE_RADIUS: f32 = 6.0;
const REGION_FILL: Color32 = Color32::from_rgba_premultiplied(50, 75, 128, 128);
const REGION_STROKE: Color32 = Color32::from_rgb(100, 150, 255);

#[derive(Clone, Copy)]
enum DragMode {
    New,
    Move,
    Resize,
}

struct RegionDrag {
    mode: DragMode,
    /// Pointer position at press, in image pixels.
    start: Pos2,
    /// Region at press: (x, y, width, height) in image pixels.
    initial: (f32, f32, f32, f32),
}

/// Content editor for [`BoxKind::Area`].
#[derive(Default)]
pub struct AreaEditor {
    drag: Option<RegionDrag>,
}

impl BoxEditor for AreaEditor {
    fn show(
        &mut self,
        ui: &mut egui::Ui,
        data: &mut crate::types::BoxData,
        ctx: &EditorContext,
    ) -> EditorResponse {
        let edit_id = egui::Id::new(("area_content", data.id.as_str()));
        let BoxKind::Area {
            content,
            image_width,
            image_height,
            area_x,
            area_y,
            area_width,
            area_height,
            strength,
        } = &mut data.kind
        else {
            return EditorResponse::default();
        };
        let mut resp = EditorResponse::default();

        ui.visuals_mut().override_text_color = Some(ctx.palette.text);

        ui.horizontal(|ui| {
            ui.label("Image:");
            if ui
                .add(egui::DragValue::new(image_width).speed(8.0).range(1.0..=8192.0))
                .changed()
            {
                resp.changed = true;
            }
            ui.label("x");
            if ui
                .add(egui::DragValue::new(image_height).speed(8.0).range(1.0..=8192.0))
                .changed()
            {
                resp.changed = true;
            }
        });

        // Split the rest between the preview and the prompt text.
        let text_height = (ui.available_height() * 0.3).max(40.0);
        let preview_size = Vec2::new(
            ui.available_width(),
            (ui.available_height() - text_height - 24.0).max(40.0),
        );
        let (preview_rect, preview_response) =
            ui.allocate_exact_size(preview_size, Sense::click_and_drag());

        // Degenerate image sizes would make the fit math meaningless.
        if ui.is_rect_visible(preview_rect) && *image_width > 0.0 && *image_height > 0.0 {
            let painter = ui.painter_at(preview_rect);

            // Aspect-fit the image outline into the preview.
            let preview_aspect = preview_rect.width() / preview_rect.height();
            let image_aspect = *image_width / *image_height;
            let (draw_w, draw_h) = if preview_aspect > image_aspect {
                (preview_rect.height() * image_aspect, preview_rect.height())
            } else {
                (preview_rect.width(), preview_rect.width() / image_aspect)
            };
            let image_rect = Rect::from_min_size(
                preview_rect.min
                    + Vec2::new(
                        (preview_rect.width() - draw_w) / 2.0,
                        (preview_rect.height() - draw_h) / 2.0,
                    ),
                Vec2::new(draw_w, draw_h),
            );
            let scale = draw_w / *image_width;
            let to_image = |p: Pos2| (p - image_rect.min) / scale;

            painter.rect_stroke(
                image_rect,
                0.0,
                Stroke::new(2.0, ctx.palette.text),
                StrokeKind::Inside,
            );
            let region_rect = Rect::from_min_size(
                image_rect.min + Vec2::new(*area_x, *area_y) * scale,
                Vec2::new(*area_width, *area_height) * scale,
            );
            painter.rect(
                region_rect,
                0.0,
                REGION_FILL,
                Stroke::new(1.0, REGION_STROKE),
                StrokeKind::Inside,
            );
            let handle_center = region_rect.max;
            painter.circle_filled(handle_center, HANDLE_RADIUS, REGION_STROKE);

            if preview_response.drag_started() {
                if let Some(pos) = preview_response.interact_pointer_pos() {
                    let mode = if pos.distance(handle_center) <= HANDLE_RADIUS * 2.0 {
                        DragMode::Resize
                    } else if region_rect.contains(pos) {
                        DragMode::Move
                    } else {
                        DragMode::New
                    };
                    let start = to_image(pos).to_pos2();
                    if let DragMode::New = mode {
                        *area_x = start.x;
                        *area_y = start.y;
                        *area_width = 0.0;
                        *area_height = 0.0;
                    }
                    self.drag = Some(RegionDrag {
                        mode,
                        start,
                        initial: (*area_x, *area_y, *area_width, *area_height),
                    });
                }
            }
            if preview_response.dragged() {
                if let (Some(drag), Some(pos)) =
                    (&self.drag, preview_response.interact_pointer_pos())
                {
                    let mouse = to_image(pos).to_pos2();
                    let dx = mouse.x - drag.start.x;
                    let dy = mouse.y - drag.start.y;
                    let (ix, iy, iw, ih) = drag.initial;
                    let (mut x, mut y, mut w, mut h) = match drag.mode {
                        DragMode::New => (
                            if dx > 0.0 { drag.start.x } else { mouse.x },
                            if dy > 0.0 { drag.start.y } else { mouse.y },
                            dx.abs(),
                            dy.abs(),
                        ),
                        DragMode::Move => (ix + dx, iy + dy, iw, ih),
                        DragMode::Resize => (ix, iy, iw + dx, ih + dy),
                    };
                    x = x.max(0.0);
                    y = y.max(0.0);
                    w = w.max(0.0);
                    h = h.max(0.0);
                    if x + w > *image_width {
                        x = *image_width - w;
                    }
                    if y + h > *image_height {
                        y = *image_height - h;
                    }
                    *area_x = x.round();
                    *area_y = y.round();
                    *area_width = w.round();
                    *area_height = h.round();
                }
            }
            if preview_response.drag_stopped() && self.drag.take().is_some() {
                resp.changed = true;
            }
        }

        ui.horizontal(|ui| {
            for (label, value) in [
                ("X:", &mut *area_x),
                ("Y:", &mut *area_y),
                ("W:", &mut *area_width),
                ("H:", &mut *area_height),
            ] {
                ui.label(label);
                if ui
                    .add(egui::DragValue::new(value).speed(4.0).range(0.0..=8192.0))
                    .changed()
                {
                    resp.changed = true;
                }
            }
            ui.label("S:");
            if ui
                .add(
                    egui::DragValue::new(strength)
                        .speed(0.1)
                        .range(0.0..=10.0)
                        .fixed_decimals(1),
                )
                .changed()
            {
                resp.changed = true;
            }
        });

        super::style_text_area(ui, ctx.palette);
        let text = ui.add(
            egui::TextEdit::multiline(content)
                .id(edit_id)
                .font(FontId::new(
                    ctx.palette.font_size,
                    ctx.palette.font_family.clone(),
                ))
                .desired_width(f32::INFINITY)
                .min_size(ui.available_size()),
        );
        if text.changed() {
            resp.changed = true;
        }
        if text.has_focus() {
            resp.text_focused = true;
        }

        resp
    }
}
