//! Top toolbar: box creation, snippet and document transfer, and view options.
//!
//! Every control is a thin shim over a store operation or a pending file op;
//! the toolbar owns no state of its own.

use crate::constants::{DEFAULT_BOX_HEIGHT, DEFAULT_BOX_WIDTH, GRID_SIZE_OPTIONS, TOOLBAR_HEIGHT};
use crate::registry;
use crate::transform::ViewTransform;
use crate::types::BoxKind;
use crate::ui::state::{Modal, PendingFileOp, PromptBoardApp};
use eframe::egui;

impl PromptBoardApp {
    /// Renders the toolbar row at the top of the window.
    pub(crate) fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_centered(|ui| {
            for ty in registry::all() {
                if ui.button(format!("+ {}", ty.label)).clicked() {
                    self.add_box_at_view_center(ui.ctx(), ty.tag);
                }
            }

            ui.separator();

            // File operations are disabled while one is already in flight.
            ui.add_enabled_ui(!self.files.loading, |ui| {
                if ui.button("Save").clicked() {
                    self.begin_snippet_save();
                }
                if ui.button("Load").clicked() {
                    self.begin_snippet_load();
                }
                if ui.button("Export").clicked() {
                    self.files.pending = Some(PendingFileOp::ExportDocument);
                }
                if ui.button("Import").clicked() {
                    self.files.pending = Some(PendingFileOp::ImportDocument);
                }
            });

            ui.separator();

            if ui.button("Fit View").clicked() {
                let (view_w, view_h) = canvas_dimensions(ui.ctx());
                self.store.fit_view(view_w, view_h, self.now);
            }
            if ui.button("Theme").clicked() {
                self.theme_editor.open = !self.theme_editor.open;
            }

            let period_label = if self.store.doc.period_is_break {
                "Periods = BREAK"
            } else {
                "Periods = ."
            };
            if ui.button(period_label).clicked() {
                self.store.toggle_period_is_break(self.now);
            }

            let map_label = if self.store.doc.show_minimap {
                "Hide Map"
            } else {
                "Show Map"
            };
            if ui.button(map_label).clicked() {
                self.store.toggle_minimap(self.now);
            }

            ui.separator();

            ui.label("Grid:");
            let mut grid = self.store.doc.grid_size;
            egui::ComboBox::from_id_salt("grid_size_select")
                .selected_text(grid_label(grid))
                .show_ui(ui, |ui| {
                    for size in GRID_SIZE_OPTIONS {
                        ui.selectable_value(&mut grid, size, grid_label(size));
                    }
                });
            if grid != self.store.doc.grid_size {
                self.store.set_grid_size(grid, self.now);
            }

            let grid_toggle = if self.store.doc.show_grid {
                "Hide Grid"
            } else {
                "Show Grid"
            };
            if ui.button(grid_toggle).clicked() {
                self.store.toggle_show_grid(self.now);
            }

            // Run counter lives at the far right.
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Reset").clicked() {
                    self.store.reset_iterator(self.now);
                }
                ui.label(format!("Run: {}", self.store.doc.iterator));
                if ui.button("Run").clicked() {
                    self.store.bump_iterator(self.now);
                }
            });
        });
    }

    /// Creates a box of the given kind centered in the current view.
    pub(crate) fn add_box_at_view_center(&mut self, ctx: &egui::Context, tag: &str) {
        let (view_w, view_h) = canvas_dimensions(ctx);
        let view = ViewTransform::of(&self.store.doc);
        let center = view.to_world(egui::pos2(view_w / 2.0, view_h / 2.0));
        self.store.doc.last_selected_box_type = tag.to_string();
        self.store.create_box(
            tag,
            center.x - DEFAULT_BOX_WIDTH / 2.0,
            center.y - DEFAULT_BOX_HEIGHT / 2.0,
            None,
            None,
            self.now,
        );
    }

    /// Opens the save-filename prompt for the last active text box.
    pub(crate) fn begin_snippet_save(&mut self) {
        let Some((target, wildcard)) = self.snippet_target() else {
            self.show_error(
                "Save Error",
                "Click inside a text, list, or area box to choose what to save.",
            );
            return;
        };
        self.files.modal = Some(Modal::SaveSnippet {
            target_box: target,
            filename: String::new(),
            wildcard,
        });
    }

    /// Requests the snippet listing for the last active text box.
    fn begin_snippet_load(&mut self) {
        let Some((target, _)) = self.snippet_target() else {
            self.show_error(
                "Load Error",
                "Click inside a text, list, or area box to choose where to load.",
            );
            return;
        };
        self.files.pending = Some(PendingFileOp::ListSnippets { target_box: target });
    }

    /// The box snippet operations act on, if a usable one is active.
    ///
    /// Returns the box id and whether its content belongs to the wildcard
    /// store (list boxes).
    fn snippet_target(&self) -> Option<(String, bool)> {
        let id = self.interaction.last_active_text_box.as_ref()?;
        let data = self.store.doc.box_by_id(id)?;
        data.kind.content_text()?;
        Some((id.clone(), matches!(data.kind, BoxKind::List { .. })))
    }
}

/// The canvas size below the toolbar, for view fitting and centering.
fn canvas_dimensions(ctx: &egui::Context) -> (f32, f32) {
    let screen = ctx.screen_rect();
    (screen.width(), (screen.height() - TOOLBAR_HEIGHT).max(0.0))
}

fn grid_label(size: u32) -> String {
    if size == 0 {
        "Off".to_string()
    } else {
        format!("{}px", size)
    }
}
