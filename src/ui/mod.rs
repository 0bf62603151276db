//! User interface components and rendering for the prompt board.
//!
//! This module contains all the UI-related code including the main application
//! struct, canvas rendering, the pointer operation machinery, and the
//! auxiliary panels.
//!
//! # Module Organization
//!
//! - `state` - Application state structures and the main PromptBoardApp
//! - `canvas` - The canvas panel entry point
//! - `gestures` - Pointer and keyboard dispatch for canvas operations
//! - `alignment` - Smart alignment matching for dragged boxes
//! - `rendering` - Drawing boxes, grid, guides, and the minimap
//! - `toolbar` - The top control strip
//! - `theme_editor` - The floating theme window
//! - `file_ops` - Async snippet, theme, and document transfer

mod alignment;
mod canvas;
mod file_ops;
mod gestures;
mod rendering;
mod state;
mod theme_editor;
mod toolbar;

#[cfg(test)]
mod tests;

pub use state::PromptBoardApp;

use crate::constants::TOOLBAR_HEIGHT;
use crate::theme::Palette;
use eframe::egui;

impl eframe::App for PromptBoardApp {
    /// Persists the document between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.store.save(true, self.now);
        if let Some(json) = self.cell.value() {
            storage.set_string(state::STORAGE_KEY, json);
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.now = ctx.input(|i| i.time);

        // Window chrome follows the board theme.
        let palette = Palette::resolve(&self.store.doc.theme);
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = palette.toolbar_background;
        visuals.window_fill = palette.toolbar_background;
        visuals.override_text_color = Some(palette.text);
        ctx.set_visuals(visuals);

        self.handle_pending_operations(ctx);
        self.store.pump(self.now);
        if self.store.poll_external(self.now) {
            // The document changed under us; drop any gesture in progress
            // and rebuild editors against the new boxes.
            self.interaction = Default::default();
            self.creation_menu = Default::default();
            for editor in self.editors.values_mut() {
                editor.teardown();
            }
            self.editors.clear();
        }
        self.handle_keyboard(ctx);

        egui::TopBottomPanel::top("top_toolbar")
            .exact_height(TOOLBAR_HEIGHT)
            .show(ctx, |ui| {
                self.draw_toolbar(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_canvas(ui);
            });

        self.draw_theme_editor(ctx);
        self.draw_modals(ctx);

        // A queued save must still land once input goes quiet.
        if self.store.has_pending_save() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
