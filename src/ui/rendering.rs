//! Canvas painting: grid, box frames, alignment guides, the marquee overlay,
//! the minimap and the creation menu.
//!
//! Chrome geometry (headers, buttons, resize handles) is computed here and
//! shared with the gesture module so hit-testing and painting always agree.
//! Box content is not painted directly; each box embeds a child `Ui` and
//! hands it to the content editor registered for its kind.

use eframe::egui;
use eframe::epaint::StrokeKind;

use crate::constants::{
    GRID_FADE_THRESHOLD, MINIMAP_HEIGHT, MINIMAP_MARGIN, MINIMAP_PADDING, MINIMAP_WIDTH,
    RESIZE_HANDLE_SIZE, TITLE_HEIGHT,
};
use crate::content::EditorContext;
use crate::registry;
use crate::theme::Palette;
use crate::transform::ViewTransform;
use crate::types::{BoxData, DisplayState, Document};
use crate::ui::state::{ActiveOperation, PromptBoardApp};

/// Screen-space geometry of one box's frame and chrome.
pub(crate) struct BoxChrome {
    /// The whole visible extent. For a minimized box this is just the header
    /// strip; for a maximized one it is the entire canvas.
    pub frame: egui::Rect,
    /// Title strip along the top of the frame.
    pub header: egui::Rect,
    pub minimize: egui::Rect,
    pub maximize: egui::Rect,
    pub close: egui::Rect,
    /// Bottom-right resize handle; only normal boxes have one.
    pub resize: Option<egui::Rect>,
    /// Frame minus header. Zero-height when minimized.
    pub content: egui::Rect,
    /// Screen pixels per world unit for this box: the camera zoom, except a
    /// maximized box which renders viewport-locked at 1:1.
    pub scale: f32,
}

/// Computes a box's on-screen chrome for the current camera.
pub(crate) fn box_chrome(
    data: &BoxData,
    transform: &ViewTransform,
    canvas_rect: egui::Rect,
) -> BoxChrome {
    let (frame, scale) = match data.display_state {
        DisplayState::Maximized => (canvas_rect, 1.0),
        DisplayState::Minimized => {
            let world = egui::Rect::from_min_size(
                egui::pos2(data.x, data.y),
                egui::vec2(data.width, TITLE_HEIGHT),
            );
            (
                world_to_screen_rect(transform, canvas_rect, world),
                transform.zoom,
            )
        }
        DisplayState::Normal => {
            let world = egui::Rect::from_min_size(
                egui::pos2(data.x, data.y),
                egui::vec2(data.width, data.height),
            );
            (
                world_to_screen_rect(transform, canvas_rect, world),
                transform.zoom,
            )
        }
    };

    let header_height = (TITLE_HEIGHT * scale).min(frame.height());
    let header = egui::Rect::from_min_size(frame.min, egui::vec2(frame.width(), header_height));

    // Square buttons right-aligned in the header: minimize, maximize, close.
    let pad = 4.0 * scale;
    let side = (header_height - 2.0 * pad).max(0.0);
    let button = |slot: usize| {
        let right = header.max.x - pad - slot as f32 * (side + pad);
        egui::Rect::from_min_size(
            egui::pos2(right - side, header.min.y + pad),
            egui::vec2(side, side),
        )
    };
    let close = button(0);
    let maximize = button(1);
    let minimize = button(2);

    let resize = (data.display_state == DisplayState::Normal).then(|| {
        let side = RESIZE_HANDLE_SIZE * scale;
        egui::Rect::from_min_size(frame.max - egui::vec2(side, side), egui::vec2(side, side))
    });

    let content = egui::Rect::from_min_max(egui::pos2(frame.min.x, header.max.y), frame.max);

    BoxChrome {
        frame,
        header,
        minimize,
        maximize,
        close,
        resize,
        content,
        scale,
    }
}

fn world_to_screen_rect(
    transform: &ViewTransform,
    canvas_rect: egui::Rect,
    world: egui::Rect,
) -> egui::Rect {
    transform
        .rect_to_canvas(world)
        .translate(canvas_rect.min.to_vec2())
}

/// The minimap panel rect, anchored to the canvas bottom-right corner.
pub(crate) fn minimap_rect(canvas_rect: egui::Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(
            canvas_rect.max.x - MINIMAP_MARGIN - MINIMAP_WIDTH,
            canvas_rect.max.y - MINIMAP_MARGIN - MINIMAP_HEIGHT,
        ),
        egui::vec2(MINIMAP_WIDTH, MINIMAP_HEIGHT),
    )
}

/// Mapping between world space and minimap-panel pixels.
pub(crate) struct MinimapView {
    /// The panel rect in screen space.
    pub rect: egui::Rect,
    /// World bounds shown: content plus padding.
    pub bounds: egui::Rect,
    scale: f32,
    origin: egui::Pos2,
}

impl MinimapView {
    pub fn to_minimap(&self, world: egui::Pos2) -> egui::Pos2 {
        self.origin + (world - self.bounds.min) * self.scale
    }

    pub fn to_world(&self, pos: egui::Pos2) -> egui::Pos2 {
        self.bounds.min + (pos - self.origin) / self.scale
    }

    fn rect_to_minimap(&self, world: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(self.to_minimap(world.min), self.to_minimap(world.max))
    }
}

/// Builds the minimap mapping: all boxes plus padding, fitted into the panel
/// at uniform scale and centered. None when there is nothing to map.
pub(crate) fn minimap_view(doc: &Document, canvas_rect: egui::Rect) -> Option<MinimapView> {
    let mut bounds: Option<egui::Rect> = None;
    for b in &doc.boxes {
        let r = minimap_world_rect(b);
        bounds = Some(bounds.map_or(r, |acc| acc.union(r)));
    }
    let bounds = bounds?.expand(MINIMAP_PADDING);

    let rect = minimap_rect(canvas_rect);
    let scale = (rect.width() / bounds.width()).min(rect.height() / bounds.height());
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let origin = rect.center() - bounds.size() * scale / 2.0;
    Some(MinimapView {
        rect,
        bounds,
        scale,
        origin,
    })
}

fn minimap_world_rect(data: &BoxData) -> egui::Rect {
    let height = match data.display_state {
        DisplayState::Minimized => TITLE_HEIGHT,
        _ => data.height,
    };
    egui::Rect::from_min_size(egui::pos2(data.x, data.y), egui::vec2(data.width, height))
}

impl PromptBoardApp {
    /// Paints the whole canvas for one frame. Gestures have already run, so
    /// box positions reflect any in-flight drag.
    pub(crate) fn draw_canvas_contents(
        &mut self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        canvas_rect: egui::Rect,
    ) {
        let palette = Palette::resolve(&self.store.doc.theme);
        let transform = ViewTransform::of(&self.store.doc);

        painter.rect_filled(canvas_rect, 0.0, palette.background);
        if self.store.doc.show_grid {
            draw_grid(
                painter,
                canvas_rect,
                &transform,
                self.store.doc.grid_size as f32,
                palette.grid,
            );
        }

        // No box appears or vanishes mid-gesture, so while an operation is
        // active the frame is paint-only and the table sync is skipped.
        if self.interaction.active_op.is_none() {
            self.sync_editor_instances();
        }

        for index in 0..self.store.doc.boxes.len() {
            self.draw_box(ui, painter, index, transform, canvas_rect, &palette);
        }

        self.draw_drag_guides(painter, &transform, canvas_rect, &palette);
        self.draw_marquee(painter, &transform, canvas_rect);
        if self.store.doc.show_minimap && self.store.doc.maximized_box().is_none() {
            self.draw_minimap(painter, canvas_rect, &palette);
        }
        self.draw_creation_menu(ui, canvas_rect);
    }

    /// Creates content editors for boxes that appeared and tears down the
    /// ones whose boxes are gone. Kinds with no registered editor simply get
    /// no instance.
    fn sync_editor_instances(&mut self) {
        for b in &self.store.doc.boxes {
            if !self.editors.contains_key(&b.id) {
                if let Some(editor) = registry::make_editor(b.kind.tag()) {
                    self.editors.insert(b.id.clone(), editor);
                }
            }
        }
        let doc = &self.store.doc;
        self.editors.retain(|id, editor| {
            if doc.box_by_id(id).is_some() {
                true
            } else {
                editor.teardown();
                false
            }
        });
    }

    fn draw_box(
        &mut self,
        ui: &mut egui::Ui,
        painter: &egui::Painter,
        index: usize,
        transform: ViewTransform,
        canvas_rect: egui::Rect,
        palette: &Palette,
    ) {
        let Some(data) = self.store.doc.boxes.get(index) else {
            return;
        };
        let id = data.id.clone();
        let display_state = data.display_state;
        let kind_tag = data.kind.tag();
        let title = data.title.clone();
        let chrome = box_chrome(data, &transform, canvas_rect);

        // Offscreen boxes keep their editor instance but cost nothing.
        if !canvas_rect.intersects(chrome.frame) {
            return;
        }

        let selected = self.store.doc.selected_box_id.as_deref() == Some(id.as_str());
        let radius = 3.0 * chrome.scale;

        if display_state != DisplayState::Maximized {
            painter.rect_filled(
                chrome.frame.translate(egui::vec2(3.0, 3.0) * chrome.scale),
                radius,
                palette.box_shadow,
            );
        }
        painter.rect_filled(chrome.frame, radius, palette.box_background);
        painter.rect_filled(chrome.header, radius, palette.header_background);
        painter.rect_stroke(
            chrome.frame,
            radius,
            egui::Stroke::new(1.0, palette.box_border),
            StrokeKind::Inside,
        );
        if selected {
            painter.rect_stroke(
                chrome.frame,
                radius,
                egui::Stroke::new(2.0, palette.accent),
                StrokeKind::Outside,
            );
        }

        if self.interaction.renaming_box.as_deref() == Some(id.as_str()) {
            self.draw_rename_editor(ui, &chrome, &id, palette);
        } else {
            let font_size = (palette.font_size * chrome.scale).clamp(6.0, 48.0);
            let title_clip = egui::Rect::from_min_max(
                chrome.header.min,
                egui::pos2(
                    chrome.minimize.min.x - 4.0 * chrome.scale,
                    chrome.header.max.y,
                ),
            );
            painter.with_clip_rect(title_clip).text(
                egui::pos2(
                    chrome.header.min.x + 8.0 * chrome.scale,
                    chrome.header.center().y,
                ),
                egui::Align2::LEFT_CENTER,
                &title,
                egui::FontId::new(font_size, palette.font_family.clone()),
                palette.header_text,
            );
        }

        draw_header_buttons(painter, &chrome, palette);

        if let Some(handle) = chrome.resize {
            let stroke = egui::Stroke::new(1.0, palette.box_border);
            painter.line_segment(
                [
                    egui::pos2(handle.min.x + handle.width() * 0.35, handle.max.y - 2.0),
                    egui::pos2(handle.max.x - 2.0, handle.min.y + handle.height() * 0.35),
                ],
                stroke,
            );
            painter.line_segment(
                [
                    egui::pos2(handle.min.x + handle.width() * 0.7, handle.max.y - 2.0),
                    egui::pos2(handle.max.x - 2.0, handle.min.y + handle.height() * 0.7),
                ],
                stroke,
            );
        }

        if display_state == DisplayState::Minimized || chrome.content.height() < 4.0 {
            return;
        }

        if !self.editors.contains_key(&id) {
            painter.text(
                chrome.content.center(),
                egui::Align2::CENTER_CENTER,
                format!("No editor for \"{}\" content", kind_tag),
                egui::FontId::new(
                    (palette.font_size * chrome.scale).clamp(6.0, 48.0),
                    palette.font_family.clone(),
                ),
                palette.text.gamma_multiply(0.6),
            );
            return;
        }

        let mut content_rect = chrome.content.shrink(4.0 * chrome.scale);
        if chrome.resize.is_some() {
            // Keep the editor clear of the resize handle, which would
            // otherwise swallow presses in the corner.
            content_rect.max.y -= (RESIZE_HANDLE_SIZE - 4.0) * chrome.scale;
        }
        let response = {
            #[cfg(not(target_arch = "wasm32"))]
            let names = self.wildcards.get_or_load(|| {
                crate::files::list_wildcard_names(std::path::Path::new(
                    crate::files::WILDCARDS_DIR,
                ))
            });
            #[cfg(target_arch = "wasm32")]
            let names: &[String] = &[];

            let Some(editor) = self.editors.get_mut(&id) else {
                return;
            };
            let Some(data) = self.store.doc.boxes.get_mut(index) else {
                return;
            };
            let context = EditorContext {
                palette,
                zoom: chrome.scale,
                lora_names: names,
            };
            let mut child = ui.new_child(
                egui::UiBuilder::new()
                    .max_rect(content_rect)
                    .layout(egui::Layout::top_down(egui::Align::Min)),
            );
            child.set_clip_rect(content_rect.intersect(canvas_rect));
            editor.show(&mut child, data, &context)
        };

        if response.changed {
            self.store.save_debounced(self.now);
        }
        if response.text_focused {
            self.interaction.last_active_text_box = Some(id.clone());
            self.select_box(Some(id));
        }
    }

    /// The in-place title editor for the box currently being renamed. Focus
    /// and select-all happen once, on the frame the rename starts; losing
    /// focus (including via Enter) commits.
    fn draw_rename_editor(
        &mut self,
        ui: &mut egui::Ui,
        chrome: &BoxChrome,
        id: &str,
        palette: &Palette,
    ) {
        let edit_rect = egui::Rect::from_min_max(
            egui::pos2(
                chrome.header.min.x + 4.0 * chrome.scale,
                chrome.header.min.y + 2.0 * chrome.scale,
            ),
            egui::pos2(
                chrome.minimize.min.x - 4.0 * chrome.scale,
                chrome.header.max.y - 2.0 * chrome.scale,
            ),
        );
        let mut child = ui.new_child(
            egui::UiBuilder::new()
                .max_rect(edit_rect)
                .layout(egui::Layout::top_down(egui::Align::Min)),
        );
        let font_size = (palette.font_size * chrome.scale).clamp(6.0, 48.0);
        let output = egui::TextEdit::singleline(&mut self.interaction.rename_buffer)
            .font(egui::FontId::new(font_size, palette.font_family.clone()))
            .desired_width(edit_rect.width())
            .show(&mut child);

        if self.interaction.rename_focus_requested {
            self.interaction.rename_focus_requested = false;
            output.response.request_focus();
            let mut state = output.state;
            state
                .cursor
                .set_char_range(Some(egui::text::CCursorRange::two(
                    egui::text::CCursor::new(0),
                    egui::text::CCursor::new(self.interaction.rename_buffer.chars().count()),
                )));
            state.store(ui.ctx(), output.response.id);
            return;
        }

        let committed =
            output.response.lost_focus() || ui.input(|i| i.key_pressed(egui::Key::Enter));
        if committed {
            self.interaction.renaming_box = None;
            let title = self.interaction.rename_buffer.trim().to_string();
            if !title.is_empty() {
                self.store.rename_box(id, &title, self.now);
            }
        }
    }

    fn draw_drag_guides(
        &self,
        painter: &egui::Painter,
        transform: &ViewTransform,
        canvas_rect: egui::Rect,
        palette: &Palette,
    ) {
        for guide in self.interaction.drag_alignment.guides() {
            let a = canvas_rect.min + transform.to_canvas(guide.start).to_vec2();
            let b = canvas_rect.min + transform.to_canvas(guide.end).to_vec2();
            painter.extend(egui::Shape::dashed_line(
                &[a, b],
                egui::Stroke::new(1.0, palette.accent),
                6.0,
                4.0,
            ));
        }
    }

    fn draw_marquee(
        &self,
        painter: &egui::Painter,
        transform: &ViewTransform,
        canvas_rect: egui::Rect,
    ) {
        let Some(ActiveOperation::Marquee {
            start_world,
            current_world,
        }) = &self.interaction.active_op
        else {
            return;
        };
        let a = canvas_rect.min + transform.to_canvas(*start_world).to_vec2();
        let b = canvas_rect.min + transform.to_canvas(*current_world).to_vec2();
        let rect = egui::Rect::from_two_pos(a, b);
        painter.rect_filled(rect, 0.0, egui::Color32::from_white_alpha(10));
        painter.extend(egui::Shape::dashed_line(
            &[
                rect.left_top(),
                rect.right_top(),
                rect.right_bottom(),
                rect.left_bottom(),
                rect.left_top(),
            ],
            egui::Stroke::new(1.0, egui::Color32::from_white_alpha(140)),
            5.0,
            3.0,
        ));
    }

    fn draw_minimap(&self, painter: &egui::Painter, canvas_rect: egui::Rect, palette: &Palette) {
        let rect = minimap_rect(canvas_rect);
        painter.rect_filled(rect, 4.0, palette.toolbar_background);
        painter.rect_stroke(
            rect,
            4.0,
            egui::Stroke::new(1.0, palette.box_border),
            StrokeKind::Inside,
        );

        let Some(view) = minimap_view(&self.store.doc, canvas_rect) else {
            return;
        };
        let clipped = painter.with_clip_rect(rect);
        for b in &self.store.doc.boxes {
            let fill = if self.store.doc.selected_box_id.as_deref() == Some(b.id.as_str()) {
                palette.accent
            } else {
                palette.header_background
            };
            clipped.rect_filled(view.rect_to_minimap(minimap_world_rect(b)), 1.0, fill);
        }

        let transform = ViewTransform::of(&self.store.doc);
        let visible = transform.visible_world_rect(canvas_rect.size());
        clipped.rect_stroke(
            view.rect_to_minimap(visible),
            1.0,
            egui::Stroke::new(1.0, palette.accent),
            StrokeKind::Inside,
        );
    }

    /// The box-creation popup opened by double-clicking empty canvas. Each
    /// entry creates a box of that kind at the double-clicked world position
    /// and makes the kind the default for the next marquee-create.
    fn draw_creation_menu(&mut self, ui: &mut egui::Ui, canvas_rect: egui::Rect) {
        if !self.creation_menu.show {
            return;
        }
        let ctx = ui.ctx().clone();
        let screen_pos = canvas_rect.min + self.creation_menu.canvas_pos.to_vec2();
        let area = egui::Area::new(egui::Id::new("box_creation_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen_pos);
        let response = area.show(&ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_min_width(140.0);
                for ty in registry::all() {
                    if ui.button(format!("Create {} Box", ty.label)).clicked() {
                        let world = self.creation_menu.world_pos;
                        self.store.doc.last_selected_box_type = ty.tag.to_string();
                        self.store
                            .create_box(ty.tag, world.x, world.y, None, None, self.now);
                        self.creation_menu.show = false;
                    }
                }
            });
        });

        // Any press outside the menu dismisses it, except on the frame it
        // was opened.
        if self.creation_menu.just_opened {
            self.creation_menu.just_opened = false;
        } else if ctx.input(|i| i.pointer.any_pressed()) && !response.response.contains_pointer() {
            self.creation_menu.show = false;
        }
    }
}

/// Paints the three header buttons with primitive strokes so no icon font is
/// needed at tiny sizes.
fn draw_header_buttons(painter: &egui::Painter, chrome: &BoxChrome, palette: &Palette) {
    let stroke = egui::Stroke::new(1.5, palette.button_text);
    for (rect, glyph) in [
        (chrome.minimize, ButtonGlyph::Minus),
        (chrome.maximize, ButtonGlyph::Square),
        (chrome.close, ButtonGlyph::Cross),
    ] {
        if rect.width() < 3.0 {
            continue;
        }
        painter.rect_filled(rect, 2.0, palette.button_background);
        let inner = rect.shrink(rect.width() * 0.28);
        match glyph {
            ButtonGlyph::Minus => {
                painter.line_segment(
                    [
                        egui::pos2(inner.min.x, inner.center().y),
                        egui::pos2(inner.max.x, inner.center().y),
                    ],
                    stroke,
                );
            }
            ButtonGlyph::Square => {
                painter.rect_stroke(inner, 0.0, stroke, StrokeKind::Inside);
            }
            ButtonGlyph::Cross => {
                painter.line_segment([inner.min, inner.max], stroke);
                painter.line_segment(
                    [
                        egui::pos2(inner.min.x, inner.max.y),
                        egui::pos2(inner.max.x, inner.min.y),
                    ],
                    stroke,
                );
            }
        }
    }
}

enum ButtonGlyph {
    Minus,
    Square,
    Cross,
}

/// Grid lines over the visible world range. Skipped entirely when lines
/// would sit closer than the fade threshold on screen.
fn draw_grid(
    painter: &egui::Painter,
    canvas_rect: egui::Rect,
    transform: &ViewTransform,
    grid_size: f32,
    color: egui::Color32,
) {
    if grid_size <= 0.0 {
        return;
    }
    let screen_spacing = grid_size * transform.zoom;
    if screen_spacing < GRID_FADE_THRESHOLD {
        return;
    }
    let stroke = egui::Stroke::new(1.0, color);

    let top_left = transform.to_world(egui::Pos2::ZERO);
    let bottom_right = transform.to_world(canvas_rect.size().to_pos2());
    let start_x = (top_left.x / grid_size).floor() * grid_size;
    let end_x = (bottom_right.x / grid_size).ceil() * grid_size;
    let start_y = (top_left.y / grid_size).floor() * grid_size;
    let end_y = (bottom_right.y / grid_size).ceil() * grid_size;

    let mut x = start_x;
    while x <= end_x {
        let screen_x = canvas_rect.min.x + transform.to_canvas(egui::pos2(x, 0.0)).x;
        painter.line_segment(
            [
                egui::pos2(screen_x, canvas_rect.min.y),
                egui::pos2(screen_x, canvas_rect.max.y),
            ],
            stroke,
        );
        x += grid_size;
    }

    let mut y = start_y;
    while y <= end_y {
        let screen_y = canvas_rect.min.y + transform.to_canvas(egui::pos2(0.0, y)).y;
        painter.line_segment(
            [
                egui::pos2(canvas_rect.min.x, screen_y),
                egui::pos2(canvas_rect.max.x, screen_y),
            ],
            stroke,
        );
        y += grid_size;
    }
}
