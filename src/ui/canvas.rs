//! Canvas panel entry point.
//!
//! Allocates the paintable region that fills the space below the toolbar and
//! hands the frame off to gesture handling and rendering. All coordinate math
//! lives in [`crate::transform`]; this module only wires the pieces together.

use super::state::PromptBoardApp;
use eframe::egui;

impl PromptBoardApp {
    /// Draws the board canvas and processes pointer interaction for this frame.
    ///
    /// Gestures are handled before drawing so the camera and box geometry
    /// painted below already reflect any movement from the current frame.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let size = ui.available_size();
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let canvas_rect = response.rect;

        self.handle_canvas_gestures(ui, &response, canvas_rect);
        self.draw_canvas_contents(ui, &painter, canvas_rect);
    }
}
