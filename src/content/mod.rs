//! Pluggable per-kind content editors.
//!
//! Each box kind ships an editor implementing [`BoxEditor`]. The renderer
//! creates one instance per live box through the registry and keeps it for
//! the box's lifetime, so editors may carry UI state (open popups, drag
//! progress) across frames. Editors mutate their slice of the box data
//! directly and report changes through [`EditorResponse`]; the caller turns
//! that into a store save.

mod area;
mod controls;
mod list;
mod text;

pub use area::AreaEditor;
pub use controls::ControlsEditor;
pub use list::ListEditor;
pub use text::{TextEditor, WildcardCache};

use crate::theme::Palette;
use crate::types::BoxData;

/// Read-only surroundings handed to an editor each frame.
pub struct EditorContext<'a> {
    /// Resolved theme colors and fonts.
    pub palette: &'a Palette,
    /// Current camera zoom factor.
    pub zoom: f32,
    /// Extension-stripped wildcard file names, for `lora(...)` autocomplete.
    pub lora_names: &'a [String],
}

/// What happened inside an editor this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct EditorResponse {
    /// Persisted box data changed; the caller should schedule a save.
    pub changed: bool,
    /// The editor's main text input has keyboard focus. Tracked so the
    /// toolbar's content save/load knows which box to target.
    pub text_focused: bool,
}

impl EditorResponse {
    /// Response reporting a data change.
    pub fn changed() -> Self {
        Self {
            changed: true,
            text_focused: false,
        }
    }
}

/// The content-editor lifecycle every box kind satisfies.
pub trait BoxEditor {
    /// Paints the content area for one frame.
    fn show(&mut self, ui: &mut egui::Ui, data: &mut BoxData, ctx: &EditorContext)
        -> EditorResponse;

    /// Releases anything held outside the content area (open popups, cached
    /// layout). Called once, right before the instance is dropped.
    fn teardown(&mut self) {}
}

/// Applies the shared text-area styling before building a text editor widget.
pub(crate) fn style_text_area(ui: &mut egui::Ui, palette: &Palette) {
    let visuals = ui.visuals_mut();
    visuals.extreme_bg_color = palette.textarea_background;
    visuals.override_text_color = Some(palette.text);
}
