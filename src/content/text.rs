//! The free-text prompt editor with `lora(...)` autocomplete.

use egui::text::{CCursor, CCursorRange};
use egui::FontId;

use super::{BoxEditor, EditorContext, EditorResponse};
use crate::types::BoxKind;

/// Lazily loaded, extension-stripped names offered by the autocomplete.
///
/// The loader runs at most once until [`WildcardCache::invalidate`] is
/// called, e.g. after a new wildcard file is written.
#[derive(Default)]
pub struct WildcardCache {
    names: Option<Vec<String>>,
}

impl WildcardCache {
    /// Returns the cached names, running `load` first if the cache is cold.
    pub fn get_or_load(&mut self, load: impl FnOnce() -> Vec<String>) -> &[String] {
        if self.names.is_none() {
            self.names = Some(load());
        }
        match &self.names {
            Some(names) => names,
            None => &[],
        }
    }

    /// Drops the cached names so the next lookup reloads them.
    pub fn invalidate(&mut self) {
        self.names = None;
    }
}

/// Content editor for [`BoxKind::Text`].
#[derive(Default)]
pub struct TextEditor;

impl BoxEditor for TextEditor {
    fn show(
        &mut self,
        ui: &mut egui::Ui,
        data: &mut crate::types::BoxData,
        ctx: &EditorContext,
    ) -> EditorResponse {
        let edit_id = egui::Id::new(("text_content", data.id.as_str()));
        let BoxKind::Text { content } = &mut data.kind else {
            return EditorResponse::default();
        };
        let mut resp = EditorResponse::default();

        super::style_text_area(ui, ctx.palette);
        let output = egui::TextEdit::multiline(content)
            .id(edit_id)
            .font(FontId::new(
                ctx.palette.font_size,
                ctx.palette.font_family.clone(),
            ))
            .desired_width(f32::INFINITY)
            .min_size(ui.available_size())
            .show(ui);

        if output.response.changed() {
            resp.changed = true;
        }
        if output.response.has_focus() {
            resp.text_focused = true;

            let char_cursor = output
                .state
                .cursor
                .char_range()
                .map(|r| r.primary.index)
                .unwrap_or(0);
            let cursor = byte_index(content, char_cursor);
            if let Some((start, prefix)) = lora_query(content, cursor) {
                let needle = prefix.to_lowercase();
                let matches: Vec<&String> = ctx
                    .lora_names
                    .iter()
                    .filter(|n| n.to_lowercase().contains(&needle))
                    .take(20)
                    .collect();
                if !matches.is_empty() {
                    let mut picked = None;
                    egui::Area::new(edit_id.with("lora_suggestions"))
                        .order(egui::Order::Foreground)
                        .fixed_pos(output.response.rect.left_bottom())
                        .show(ui.ctx(), |ui| {
                            egui::Frame::popup(ui.style()).show(ui, |ui| {
                                for name in matches {
                                    if ui.button(name).clicked() {
                                        picked = Some(name.clone());
                                    }
                                }
                            });
                        });
                    if let Some(name) = picked {
                        let insert = format!("lora({}:1.0)", name);
                        let mut new_text =
                            String::with_capacity(content.len() + insert.len());
                        new_text.push_str(&content[..start]);
                        new_text.push_str(&insert);
                        new_text.push_str(&content[cursor..]);
                        let new_cursor =
                            content[..start].chars().count() + insert.chars().count();
                        *content = new_text;

                        let mut state = output.state;
                        state
                            .cursor
                            .set_char_range(Some(CCursorRange::one(CCursor::new(new_cursor))));
                        state.store(ui.ctx(), output.response.id);
                        output.response.request_focus();
                        resp.changed = true;
                    }
                }
            }
        }
        resp
    }
}

/// Finds an unfinished `lora(` call ending at the cursor.
///
/// Returns the byte offset where `lora(` starts and the typed name prefix
/// (leading whitespace stripped). A word boundary before `lora` is required
/// and the text between `(` and the cursor may only contain name characters.
fn lora_query(text: &str, cursor: usize) -> Option<(usize, String)> {
    let head = &text[..cursor];
    let bytes = head.as_bytes();
    if bytes.len() < 5 {
        return None;
    }
    let mut found = None;
    for i in 0..=bytes.len() - 5 {
        if !bytes[i..i + 5].eq_ignore_ascii_case(b"lora(") {
            continue;
        }
        let boundary_ok = head[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric() && c != '_');
        let tail = &head[i + 5..];
        if boundary_ok && tail.chars().all(is_name_char) {
            found = Some((i, tail.trim_start().to_string()));
        }
    }
    found
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '\\' || c.is_whitespace()
}

/// Converts a char index (as stored by the text edit state) to a byte index.
fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
