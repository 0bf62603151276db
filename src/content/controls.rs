//! The variable-controls editor.
//!
//! Each row manages one [`Variable`]: an editable name, an update behavior
//! and the current value. Variables advance when the host bumps the run
//! counter, not from here.

use super::{BoxEditor, EditorContext, EditorResponse};
use crate::types::{BoxKind, Variable, VariableBehavior};

const BEHAVIORS: [(VariableBehavior, &str); 4] = [
    (VariableBehavior::Increment, "Increment"),
    (VariableBehavior::Decrement, "Decrement"),
    (VariableBehavior::Randomize, "Randomize"),
    (VariableBehavior::Fixed, "Fixed"),
];

/// Content editor for [`BoxKind::Controls`].
#[derive(Default)]
pub struct ControlsEditor;

impl BoxEditor for ControlsEditor {
    fn show(
        &mut self,
        ui: &mut egui::Ui,
        data: &mut crate::types::BoxData,
        ctx: &EditorContext,
    ) -> EditorResponse {
        let row_id = egui::Id::new(("controls_rows", data.id.as_str()));
        let BoxKind::Controls { variables } = &mut data.kind else {
            return EditorResponse::default();
        };
        let mut resp = EditorResponse::default();

        ui.visuals_mut().override_text_color = Some(ctx.palette.text);
        egui::ScrollArea::vertical()
            .id_salt(row_id)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let mut remove = None;
                for (index, var) in variables.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        let name_edit = ui.add(
                            egui::TextEdit::singleline(&mut var.name)
                                .hint_text("variable_name")
                                .desired_width(110.0),
                        );
                        if name_edit.changed() {
                            resp.changed = true;
                        }
                        if name_edit.lost_focus() {
                            let normalized = Variable::normalize_name(&var.name);
                            if normalized != var.name {
                                var.name = normalized;
                                resp.changed = true;
                            }
                        }

                        let mut behavior = var.behavior;
                        egui::ComboBox::from_id_salt(row_id.with(&var.id))
                            .selected_text(behavior_label(behavior))
                            .show_ui(ui, |ui| {
                                for (value, label) in BEHAVIORS {
                                    ui.selectable_value(&mut behavior, value, label);
                                }
                            });
                        if behavior != var.behavior {
                            var.behavior = behavior;
                            resp.changed = true;
                        }

                        if ui
                            .add(egui::DragValue::new(&mut var.value).speed(1.0))
                            .changed()
                        {
                            resp.changed = true;
                        }

                        if ui.button("✕").clicked() {
                            remove = Some(index);
                        }
                    });
                }
                if let Some(index) = remove {
                    variables.remove(index);
                    resp.changed = true;
                }

                if ui.button("+ Add Variable").clicked() {
                    variables.push(Variable::new(variables.len() + 1));
                    resp.changed = true;
                }
            });
        resp
    }
}

fn behavior_label(behavior: VariableBehavior) -> &'static str {
    match BEHAVIORS.iter().find(|(b, _)| *b == behavior) {
        Some((_, label)) => label,
        None => "Increment",
    }
}
