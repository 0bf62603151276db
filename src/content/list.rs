//! The line-separated list editor.
//!
//! List boxes hold one item per line and are addressed by their title from
//! the host's prompt composer, so the editor itself is a plain text area.

use egui::FontId;

use super::{BoxEditor, EditorContext, EditorResponse};
use crate::types::BoxKind;

/// Content editor for [`BoxKind::List`].
#[derive(Default)]
pub struct ListEditor;

impl BoxEditor for ListEditor {
    fn show(
        &mut self,
        ui: &mut egui::Ui,
        data: &mut crate::types::BoxData,
        ctx: &EditorContext,
    ) -> EditorResponse {
        let edit_id = egui::Id::new(("list_content", data.id.as_str()));
        let BoxKind::List { content, .. } = &mut data.kind else {
            return EditorResponse::default();
        };

        super::style_text_area(ui, ctx.palette);
        let response = ui.add(
            egui::TextEdit::multiline(content)
                .id(edit_id)
                .font(FontId::new(
                    ctx.palette.font_size,
                    ctx.palette.font_family.clone(),
                ))
                .hint_text("item 1\nitem 2\nitem 3...")
                .desired_width(f32::INFINITY)
                .min_size(ui.available_size()),
        );

        EditorResponse {
            changed: response.changed(),
            text_focused: response.has_focus(),
        }
    }
}
