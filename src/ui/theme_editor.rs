//! Floating theme editor window.
//!
//! One row per style variable: color keys get a picker plus a hex field,
//! everything else a plain text field. Edits apply immediately as sparse
//! overrides on the document theme, so the canvas restyles live behind the
//! window. The footer saves and loads named presets through the async file
//! plumbing.

use crate::theme::{self, DEFAULT_THEME};
use crate::ui::state::{PendingFileOp, PromptBoardApp};
use eframe::egui;

impl PromptBoardApp {
    /// Renders the theme editor window when it is open.
    pub(crate) fn draw_theme_editor(&mut self, ctx: &egui::Context) {
        if !self.theme_editor.open {
            return;
        }
        let mut open = true;
        egui::Window::new("Theme Editor")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                if self.theme_editor.save_name.is_some() {
                    self.draw_theme_save_prompt(ui);
                } else if self.theme_editor.presets.is_some() {
                    self.draw_theme_presets(ui);
                } else {
                    self.draw_theme_rows(ui);
                    ui.separator();
                    self.draw_theme_footer(ui);
                }
            });
        if !open {
            self.theme_editor = Default::default();
        }
    }

    fn draw_theme_rows(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("theme_editor_rows")
            .num_columns(3)
            .striped(true)
            .spacing([10.0, 4.0])
            .show(ui, |ui| {
                for (key, default) in DEFAULT_THEME {
                    let current = self
                        .store
                        .doc
                        .theme
                        .get(key)
                        .cloned()
                        .unwrap_or_else(|| default.to_string());

                    ui.label(display_label(key));

                    if theme::is_color_key(key) {
                        ui.horizontal(|ui| {
                            let fallback =
                                theme::parse_color(default).unwrap_or(egui::Color32::BLACK);
                            let mut color = theme::parse_color(&current).unwrap_or(fallback);
                            if ui.color_edit_button_srgba(&mut color).changed() {
                                self.store.set_theme_value(
                                    key,
                                    theme::color_to_hex(color),
                                    self.now,
                                );
                            }
                            let mut hex = current;
                            let edit = egui::TextEdit::singleline(&mut hex).desired_width(80.0);
                            if ui.add(edit).changed() {
                                self.store.set_theme_value(key, hex, self.now);
                            }
                        });
                    } else {
                        let mut value = current;
                        let edit = egui::TextEdit::singleline(&mut value).desired_width(110.0);
                        if ui.add(edit).changed() {
                            self.store.set_theme_value(key, value, self.now);
                        }
                    }

                    // Per-key reset, only shown while the key is overridden.
                    if self.store.doc.theme.contains_key(key) {
                        if ui.small_button("⟲").on_hover_text("Reset to default").clicked() {
                            self.store.clear_theme_value(key, self.now);
                        }
                    } else {
                        ui.label("");
                    }
                    ui.end_row();
                }
            });
    }

    fn draw_theme_footer(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Reset").clicked() {
                self.store.reset_theme(self.now);
            }
            ui.add_enabled_ui(!self.files.loading, |ui| {
                if ui.button("Load").clicked() {
                    self.files.pending = Some(PendingFileOp::ListThemes);
                }
                if ui.button("Save").clicked() {
                    self.theme_editor.save_name = Some(String::new());
                }
                if ui.button("Default").clicked() {
                    self.files.pending = Some(PendingFileOp::SetDefaultTheme {
                        theme: self.store.doc.theme.clone(),
                    });
                }
            });
        });
    }

    fn draw_theme_save_prompt(&mut self, ui: &mut egui::Ui) {
        ui.label("Theme Name:");
        if let Some(name) = &mut self.theme_editor.save_name {
            ui.text_edit_singleline(name);
        }
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                if let Some(name) = self.theme_editor.save_name.take() {
                    let name = name.trim().to_string();
                    if !name.is_empty() {
                        let name = if name.ends_with(".json") {
                            name
                        } else {
                            format!("{}.json", name)
                        };
                        self.files.pending = Some(PendingFileOp::SaveTheme {
                            name,
                            theme: self.store.doc.theme.clone(),
                        });
                    }
                }
            }
            if ui.button("Cancel").clicked() {
                self.theme_editor.save_name = None;
            }
        });
    }

    fn draw_theme_presets(&mut self, ui: &mut egui::Ui) {
        if ui.button("← Back to Editor").clicked() {
            self.theme_editor.presets = None;
            return;
        }
        ui.separator();
        let names = self.theme_editor.presets.clone().unwrap_or_default();
        if names.is_empty() {
            ui.label("No saved themes found.");
            return;
        }
        egui::ScrollArea::vertical()
            .id_salt("theme_preset_list")
            .max_height(300.0)
            .show(ui, |ui| {
                for name in names {
                    let shown = name.trim_end_matches(".json").to_string();
                    if ui.button(shown).clicked() {
                        self.files.pending = Some(PendingFileOp::LoadTheme { name: name.clone() });
                        self.theme_editor.presets = None;
                    }
                }
            });
    }
}

/// Human form of a style variable key, e.g. `--tb-bg-color` to `BG COLOR`.
fn display_label(key: &str) -> String {
    key.trim_start_matches("--tb-").replace('-', " ").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_strips_prefix() {
        assert_eq!(display_label("--tb-bg-color"), "BG COLOR");
        assert_eq!(display_label("--tb-font-family"), "FONT FAMILY");
    }
}
