//! Pointer and keyboard gesture routing for the canvas.
//!
//! One gesture owns the pointer at a time: the single [`ActiveOperation`]
//! slot is claimed on press, advanced while a button is held and resolved on
//! release. Presses that egui routes to box content widgets (text editors,
//! scroll areas) never reach this module, so content editing and canvas
//! gestures cannot fight over the same pointer.

use eframe::egui;

use crate::constants::{DRAG_THRESHOLD, MIN_CREATE_SIZE, TITLE_HEIGHT, WHEEL_ZOOM_RATE};
use crate::transform::{canvas_pos, snap_to_grid, ViewTransform};
use crate::types::{BoxData, DisplayState, Pan};
use crate::ui::alignment::{self, Alignment};
use crate::ui::rendering;
use crate::ui::state::{ActiveOperation, PromptBoardApp};

/// What a press on the canvas landed on. Boxes hit-test topmost first, and
/// header chrome wins over the header itself.
pub(crate) enum HitTarget {
    Minimize(String),
    Maximize(String),
    Close(String),
    Resize(String),
    Header(String),
    Body(String),
}

/// The rect other boxes align against while one is dragged: the full frame
/// for a normal box, just the header strip for a minimized one. A maximized
/// box is a viewport overlay and takes no part in alignment.
fn alignment_rect(data: &BoxData) -> Option<egui::Rect> {
    let size = match data.display_state {
        DisplayState::Normal => egui::vec2(data.width, data.height),
        DisplayState::Minimized => egui::vec2(data.width, TITLE_HEIGHT),
        DisplayState::Maximized => return None,
    };
    Some(egui::Rect::from_min_size(egui::pos2(data.x, data.y), size))
}

impl PromptBoardApp {
    /// Runs all canvas pointer handling for one frame. Called before the
    /// canvas is painted so gesture results are visible the same frame.
    ///
    /// # Arguments
    ///
    /// * `response` - The response of the canvas widget itself
    /// * `canvas_rect` - The canvas area in screen coordinates
    pub(crate) fn handle_canvas_gestures(
        &mut self,
        ui: &mut egui::Ui,
        response: &egui::Response,
        canvas_rect: egui::Rect,
    ) {
        self.handle_wheel_zoom(ui, response, canvas_rect);
        self.handle_double_clicks(response, canvas_rect);

        let pointer = response
            .interact_pointer_pos()
            .or_else(|| ui.input(|i| i.pointer.hover_pos()));

        if self.interaction.active_op.is_none() {
            // interact_pointer_pos is Some only for presses that started on
            // the canvas itself, which keeps toolbar and content-editor
            // presses from starting gestures here.
            if let Some(pos) = response.interact_pointer_pos() {
                if ui.input(|i| i.pointer.any_pressed()) {
                    self.begin_operation(ui, pos, canvas_rect);
                }
            }
        } else if ui.input(|i| i.pointer.any_down()) {
            if let Some(pos) = pointer {
                self.continue_operation(pos, canvas_rect);
            }
        } else {
            self.finish_operation(pointer, canvas_rect);
        }
    }

    /// Scroll-wheel zoom about the pointer. Ceded to whatever widget sits
    /// under the pointer when that widget is scrollable itself, and disabled
    /// entirely while a box is maximized.
    fn handle_wheel_zoom(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        canvas_rect: egui::Rect,
    ) {
        if !response.hovered() || self.store.doc.maximized_box().is_some() {
            return;
        }
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }
        let Some(pointer) = ui.input(|i| i.pointer.hover_pos()) else {
            return;
        };
        if !canvas_rect.contains(pointer) {
            return;
        }

        // Fast flicks can report large deltas; keep the factor positive.
        let factor = (1.0 + scroll_delta * WHEEL_ZOOM_RATE).max(0.2);
        let mut view = ViewTransform::of(&self.store.doc);
        view.zoom_about(canvas_pos(pointer, canvas_rect), factor);
        view.apply_to(&mut self.store.doc);
        self.store.save_debounced(self.now);
    }

    /// Background double-click opens the creation menu; title double-click
    /// starts a rename.
    fn handle_double_clicks(&mut self, response: &egui::Response, canvas_rect: egui::Rect) {
        if !response.double_clicked() {
            return;
        }
        let Some(pointer) = response.interact_pointer_pos() else {
            return;
        };
        let transform = ViewTransform::of(&self.store.doc);
        match self.hit_test(pointer, &transform, canvas_rect) {
            Some(HitTarget::Header(id)) => self.begin_rename(&id),
            None => {
                let at = canvas_pos(pointer, canvas_rect);
                self.creation_menu.show = true;
                self.creation_menu.canvas_pos = at;
                self.creation_menu.world_pos = transform.to_world(at);
                self.creation_menu.just_opened = true;
            }
            _ => {}
        }
    }

    /// Keyboard shortcuts that act on the selected box. Suppressed whenever
    /// a text input has keyboard focus so typing never deletes boxes.
    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (delete, rename) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::F2),
            )
        });
        if !delete && !rename {
            return;
        }
        let Some(id) = self.store.doc.selected_box_id.clone() else {
            return;
        };
        if delete {
            self.remove_box(&id);
        } else if rename {
            self.begin_rename(&id);
        }
    }

    /// Routes a fresh press to the gesture it starts.
    fn begin_operation(&mut self, ui: &egui::Ui, pointer: egui::Pos2, canvas_rect: egui::Rect) {
        let transform = ViewTransform::of(&self.store.doc);
        let (primary, pan_button, pan_modifier) = ui.input(|i| {
            (
                i.pointer.button_pressed(egui::PointerButton::Primary),
                i.pointer.button_pressed(egui::PointerButton::Middle)
                    || i.pointer.button_pressed(egui::PointerButton::Secondary),
                i.key_down(egui::Key::Space) || i.modifiers.command,
            )
        });
        if !primary && !pan_button {
            return;
        }

        // A press anywhere on the canvas dismisses the creation menu and
        // does nothing else.
        if self.creation_menu.show {
            self.creation_menu.show = false;
            return;
        }

        let maximized = self.store.doc.maximized_box().is_some();

        if primary && !maximized && self.store.doc.show_minimap {
            if rendering::minimap_rect(canvas_rect).contains(pointer) {
                self.interaction.active_op = Some(ActiveOperation::Minimap);
                self.jump_to_minimap_point(pointer, canvas_rect);
                return;
            }
        }

        // Middle/right drag always pans; left drag pans while Space or
        // Cmd/Ctrl is held (Cmd on macOS, Ctrl elsewhere).
        let pan_mode = pan_modifier && !ui.ctx().wants_keyboard_input();
        if (pan_button || (primary && pan_mode)) && !maximized {
            self.interaction.active_op = Some(ActiveOperation::Pan {
                start_pointer: pointer,
                start_pan: self.store.doc.pan,
            });
            return;
        }
        if !primary {
            return;
        }

        match self.hit_test(pointer, &transform, canvas_rect) {
            // Header buttons act on press, short-circuiting drag initiation.
            Some(HitTarget::Minimize(id)) => self.store.toggle_minimized(&id, self.now),
            Some(HitTarget::Maximize(id)) => self.store.toggle_maximized(&id, self.now),
            Some(HitTarget::Close(id)) => self.remove_box(&id),
            Some(HitTarget::Resize(id)) => {
                self.select_box(Some(id.clone()));
                if let Some(b) = self.store.doc.box_by_id(&id) {
                    self.interaction.active_op = Some(ActiveOperation::Resize {
                        start_pointer: pointer,
                        start_size: egui::vec2(b.width, b.height),
                        box_id: id,
                    });
                }
            }
            Some(HitTarget::Header(id)) => {
                self.select_box(Some(id.clone()));
                let renaming = self.interaction.renaming_box.as_deref() == Some(id.as_str());
                let Some(b) = self.store.doc.box_by_id(&id) else {
                    return;
                };
                if renaming || b.display_state == DisplayState::Maximized {
                    return;
                }
                let world = transform.to_world(canvas_pos(pointer, canvas_rect));
                self.interaction.active_op = Some(ActiveOperation::Drag {
                    grab_offset: world - egui::pos2(b.x, b.y),
                    start_pointer: pointer,
                    live: false,
                    box_id: id,
                });
            }
            Some(HitTarget::Body(id)) => self.select_box(Some(id)),
            None => {
                self.select_box(None);
                let world = transform.to_world(canvas_pos(pointer, canvas_rect));
                self.interaction.active_op = Some(ActiveOperation::Marquee {
                    start_world: world,
                    current_world: world,
                });
            }
        }
    }

    /// Advances the active gesture to the current pointer position.
    fn continue_operation(&mut self, pointer: egui::Pos2, canvas_rect: egui::Rect) {
        let transform = ViewTransform::of(&self.store.doc);
        let Some(mut op) = self.interaction.active_op.take() else {
            return;
        };
        match &mut op {
            ActiveOperation::Pan {
                start_pointer,
                start_pan,
            } => {
                let delta = pointer - *start_pointer;
                self.store.doc.pan = Pan::new(start_pan.x + delta.x, start_pan.y + delta.y);
            }
            ActiveOperation::Drag {
                box_id,
                start_pointer,
                grab_offset,
                live,
            } => {
                if !*live && (pointer - *start_pointer).length() > DRAG_THRESHOLD {
                    *live = true;
                    self.store.bring_to_front(box_id);
                }
                if *live {
                    let raw = transform.to_world(canvas_pos(pointer, canvas_rect)) - *grab_offset;
                    let align = self.compute_drag_alignment(box_id, raw, transform.zoom);
                    self.interaction.drag_alignment = align;
                    let corrected = raw + align.correction();
                    if let Some(b) = self.store.doc.box_by_id_mut(box_id) {
                        b.x = corrected.x;
                        b.y = corrected.y;
                    }
                }
            }
            ActiveOperation::Resize {
                box_id,
                start_pointer,
                start_size,
            } => {
                // Live size is unsnapped; the grid applies on release.
                let delta = (pointer - *start_pointer) / transform.zoom;
                if let Some(b) = self.store.doc.box_by_id_mut(box_id) {
                    let (min_w, min_h) = b.min_size();
                    b.width = (start_size.x + delta.x).max(min_w);
                    b.height = (start_size.y + delta.y).max(min_h);
                }
            }
            ActiveOperation::Marquee { current_world, .. } => {
                *current_world = transform.to_world(canvas_pos(pointer, canvas_rect));
            }
            ActiveOperation::Minimap => self.jump_to_minimap_point(pointer, canvas_rect),
        }
        self.interaction.active_op = Some(op);
    }

    /// Resolves the active gesture on release. `pointer` may be None when
    /// the release arrives without a position; gestures then settle from
    /// their last live state.
    fn finish_operation(&mut self, pointer: Option<egui::Pos2>, canvas_rect: egui::Rect) {
        let transform = ViewTransform::of(&self.store.doc);
        let Some(op) = self.interaction.active_op.take() else {
            return;
        };
        let last_alignment = std::mem::take(&mut self.interaction.drag_alignment);

        match op {
            ActiveOperation::Pan { .. } | ActiveOperation::Minimap => {
                self.store.save(false, self.now);
            }
            ActiveOperation::Drag {
                box_id,
                grab_offset,
                live,
                ..
            } => {
                if !live {
                    // Never crossed the threshold: a click, already handled
                    // as a selection on press.
                    return;
                }
                // Per axis: an active alignment wins, otherwise the grid.
                let (x, y) = match pointer {
                    Some(p) => {
                        let raw = transform.to_world(canvas_pos(p, canvas_rect)) - grab_offset;
                        let align = self.compute_drag_alignment(&box_id, raw, transform.zoom);
                        (
                            align.x.map_or_else(|| self.store.snap(raw.x), |m| raw.x + m.offset),
                            align.y.map_or_else(|| self.store.snap(raw.y), |m| raw.y + m.offset),
                        )
                    }
                    None => {
                        let Some(b) = self.store.doc.box_by_id(&box_id) else {
                            return;
                        };
                        (
                            if last_alignment.x.is_some() { b.x } else { self.store.snap(b.x) },
                            if last_alignment.y.is_some() { b.y } else { self.store.snap(b.y) },
                        )
                    }
                };
                if let Some(b) = self.store.doc.box_by_id_mut(&box_id) {
                    b.x = x;
                    b.y = y;
                }
                self.store.save(false, self.now);
            }
            ActiveOperation::Resize { box_id, .. } => {
                let grid = self.store.doc.grid_size as f32;
                if let Some(b) = self.store.doc.box_by_id_mut(&box_id) {
                    let (min_w, min_h) = b.min_size();
                    b.width = snap_to_grid(b.width, grid).max(min_w);
                    b.height = snap_to_grid(b.height, grid).max(min_h);
                }
                self.store.save(false, self.now);
            }
            ActiveOperation::Marquee {
                start_world,
                current_world,
            } => {
                let end = match pointer {
                    Some(p) => transform.to_world(canvas_pos(p, canvas_rect)),
                    None => current_world,
                };
                let rect = egui::Rect::from_two_pos(start_world, end);
                if rect.width() >= MIN_CREATE_SIZE && rect.height() >= MIN_CREATE_SIZE {
                    let kind = self.store.doc.last_selected_box_type.clone();
                    self.store.create_box(
                        &kind,
                        rect.min.x,
                        rect.min.y,
                        Some(rect.width()),
                        Some(rect.height()),
                        self.now,
                    );
                }
            }
        }
    }

    /// Alignment of a would-be box position against every other box.
    fn compute_drag_alignment(&self, box_id: &str, raw: egui::Pos2, zoom: f32) -> Alignment {
        let doc = &self.store.doc;
        let Some(b) = doc.box_by_id(box_id) else {
            return Alignment::default();
        };
        let dragged = egui::Rect::from_min_size(raw, egui::vec2(b.width, b.height));
        let others: Vec<egui::Rect> = doc
            .boxes
            .iter()
            .filter(|o| o.id != box_id)
            .filter_map(alignment_rect)
            .collect();
        alignment::compute(dragged, &others, zoom)
    }

    /// Centers the camera on the world point under a minimap-local pointer.
    fn jump_to_minimap_point(&mut self, pointer: egui::Pos2, canvas_rect: egui::Rect) {
        let Some(view) = rendering::minimap_view(&self.store.doc, canvas_rect) else {
            return;
        };
        let world = view.to_world(view.rect.clamp(pointer));
        let zoom = self.store.doc.zoom;
        self.store.doc.pan = Pan::new(
            canvas_rect.width() / 2.0 - world.x * zoom,
            canvas_rect.height() / 2.0 - world.y * zoom,
        );
    }

    /// Finds the topmost box part under a screen position.
    pub(crate) fn hit_test(
        &self,
        pointer: egui::Pos2,
        transform: &ViewTransform,
        canvas_rect: egui::Rect,
    ) -> Option<HitTarget> {
        for data in self.store.doc.boxes.iter().rev() {
            let chrome = rendering::box_chrome(data, transform, canvas_rect);
            if !chrome.frame.contains(pointer) {
                continue;
            }
            let id = data.id.clone();
            return Some(if chrome.close.contains(pointer) {
                HitTarget::Close(id)
            } else if chrome.maximize.contains(pointer) {
                HitTarget::Maximize(id)
            } else if chrome.minimize.contains(pointer) {
                HitTarget::Minimize(id)
            } else if chrome.resize.is_some_and(|r| r.contains(pointer)) {
                HitTarget::Resize(id)
            } else if chrome.header.contains(pointer) {
                HitTarget::Header(id)
            } else {
                HitTarget::Body(id)
            });
        }
        None
    }

    /// Changes the selection, scheduling a save when it actually changed.
    pub(crate) fn select_box(&mut self, id: Option<String>) {
        if self.store.doc.selected_box_id != id {
            self.store.doc.selected_box_id = id;
            self.store.save_debounced(self.now);
        }
    }

    /// Puts a box title into rename mode with the current title preloaded.
    pub(crate) fn begin_rename(&mut self, id: &str) {
        let Some(b) = self.store.doc.box_by_id(id) else {
            return;
        };
        self.interaction.rename_buffer = b.title.clone();
        self.interaction.renaming_box = Some(id.to_string());
        self.interaction.rename_focus_requested = true;
    }

    /// Deletes a box along with every piece of UI state that points at it.
    pub(crate) fn remove_box(&mut self, id: &str) {
        if let Some(mut editor) = self.editors.remove(id) {
            editor.teardown();
        }
        if self.interaction.renaming_box.as_deref() == Some(id) {
            self.interaction.renaming_box = None;
        }
        if self.interaction.last_active_text_box.as_deref() == Some(id) {
            self.interaction.last_active_text_box = None;
        }
        self.store.delete_box(id, self.now);
    }
}
