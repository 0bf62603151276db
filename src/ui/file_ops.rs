//! Async file operations: document transfer, snippets, and theme presets.
//!
//! Operations run on a background runtime (native) or the browser microtask
//! queue (wasm). Results come back over a channel and are applied at the top
//! of the next frame, so the UI thread never blocks on a dialog or the disk.

use std::sync::mpsc::Sender;

use super::state::{FileOpResult, Modal, PendingFileOp, PromptBoardApp, SnippetEntry};
use crate::files;
use crate::types::{BoxKind, Document};
use eframe::egui;

impl PromptBoardApp {
    /// Applies completed file operations and initiates newly requested ones.
    pub(crate) fn handle_pending_operations(&mut self, ctx: &egui::Context) {
        let mut results = Vec::new();
        if let Some(receiver) = &self.files.receiver {
            while let Ok(result) = receiver.try_recv() {
                results.push(result);
            }
        }
        for result in results {
            self.files.loading = false;
            self.apply_result(result);
        }

        if let Some(op) = self.files.pending.take() {
            self.initiate(op, ctx);
        }
    }

    fn apply_result(&mut self, result: FileOpResult) {
        match result {
            FileOpResult::DocumentExported(path) => {
                println!("Document exported to {}", path);
            }
            FileOpResult::DocumentLoaded(raw) => match Document::from_json(&raw) {
                Ok(doc) => {
                    self.store.doc = doc;
                    self.store.save(true, self.now);
                    self.interaction = Default::default();
                    self.creation_menu = Default::default();
                    for editor in self.editors.values_mut() {
                        editor.teardown();
                    }
                    self.editors.clear();
                }
                Err(e) => {
                    self.show_error("Import Failed", format!("Not a valid document: {}", e));
                }
            },
            FileOpResult::SnippetList {
                target_box,
                entries,
            } => {
                if entries.is_empty() {
                    let is_list = self
                        .store
                        .doc
                        .box_by_id(&target_box)
                        .is_some_and(|b| matches!(b.kind, BoxKind::List { .. }));
                    let message = if is_list {
                        "No files found in 'user/textfiles' or 'user/wildcards'."
                    } else {
                        "No text files found in the 'user/textfiles' folder."
                    };
                    self.show_error("Load", message);
                } else {
                    self.files.modal = Some(Modal::SnippetList {
                        target_box,
                        entries,
                    });
                }
            }
            FileOpResult::SnippetLoaded {
                target_box,
                content,
            } => {
                let mut loaded = false;
                if let Some(text) = self
                    .store
                    .doc
                    .box_by_id_mut(&target_box)
                    .and_then(|b| b.kind.content_text_mut())
                {
                    *text = content;
                    loaded = true;
                }
                if loaded {
                    self.store.save_debounced(self.now);
                }
                self.files.modal = None;
            }
            FileOpResult::SnippetSaved { wildcard } => {
                if wildcard {
                    self.wildcards.invalidate();
                }
                self.files.modal = None;
            }
            FileOpResult::ThemeList(names) => {
                if self.theme_editor.open {
                    self.theme_editor.presets = Some(names);
                }
            }
            FileOpResult::ThemeLoaded(theme) => {
                self.store.set_theme_map(theme, self.now);
            }
            FileOpResult::ThemeSaved | FileOpResult::DefaultThemeSet => {}
            FileOpResult::Cancelled => {}
            FileOpResult::Failed(message) => {
                self.show_error("File Operation Failed", message);
            }
        }
    }

    fn initiate(&mut self, op: PendingFileOp, ctx: &egui::Context) {
        let Some(sender) = self.files.sender.clone() else {
            return;
        };
        self.files.loading = true;

        #[cfg(not(target_arch = "wasm32"))]
        self.spawn_native(op, sender, ctx.clone());

        #[cfg(target_arch = "wasm32")]
        spawn_wasm(op, sender, ctx.clone());
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn spawn_native(&mut self, op: PendingFileOp, sender: Sender<FileOpResult>, ctx: egui::Context) {
        use std::path::Path;

        // Serialization happens up front so a broken document never reaches a
        // spawned task.
        let document_json = if matches!(op, PendingFileOp::ExportDocument) {
            match self.store.doc.to_json() {
                Ok(json) => Some(json),
                Err(e) => {
                    self.files.loading = false;
                    self.show_error(
                        "Export Failed",
                        format!("Failed to serialize document: {}", e),
                    );
                    return;
                }
            }
        } else {
            None
        };

        let Some(runtime) = &self.files.runtime else {
            self.files.loading = false;
            self.show_error(
                "File Operation Failed",
                "No async runtime is available for file operations.",
            );
            return;
        };

        match op {
            PendingFileOp::ExportDocument => {
                let json = document_json.unwrap_or_default();
                runtime.spawn(async move {
                    let result = match rfd::AsyncFileDialog::new()
                        .add_filter("JSON", &["json"])
                        .set_file_name("prompt_board.json")
                        .save_file()
                        .await
                    {
                        Some(handle) => match std::fs::write(handle.path(), json) {
                            Ok(()) => {
                                FileOpResult::DocumentExported(handle.path().display().to_string())
                            }
                            Err(e) => FileOpResult::Failed(format!("Failed to save file: {}", e)),
                        },
                        None => FileOpResult::Cancelled,
                    };
                    let _ = sender.send(result);
                    ctx.request_repaint();
                });
            }
            PendingFileOp::ImportDocument => {
                runtime.spawn(async move {
                    let result = match rfd::AsyncFileDialog::new()
                        .add_filter("JSON", &["json"])
                        .pick_file()
                        .await
                    {
                        Some(handle) => match std::fs::read_to_string(handle.path()) {
                            Ok(json) => FileOpResult::DocumentLoaded(json),
                            Err(e) => FileOpResult::Failed(format!("Failed to read file: {}", e)),
                        },
                        None => FileOpResult::Cancelled,
                    };
                    let _ = sender.send(result);
                    ctx.request_repaint();
                });
            }
            PendingFileOp::ListSnippets { target_box } => {
                let include_wildcards = self
                    .store
                    .doc
                    .box_by_id(&target_box)
                    .is_some_and(|b| matches!(b.kind, BoxKind::List { .. }));
                runtime.spawn(async move {
                    let _ = sender.send(list_snippets(target_box, include_wildcards));
                    ctx.request_repaint();
                });
            }
            PendingFileOp::LoadSnippet {
                target_box,
                name,
                wildcard,
            } => {
                runtime.spawn(async move {
                    let dir = if wildcard {
                        files::WILDCARDS_DIR
                    } else {
                        files::TEXTFILES_DIR
                    };
                    let result = match files::read_file(Path::new(dir), &name, ".txt") {
                        Ok(content) => FileOpResult::SnippetLoaded {
                            target_box,
                            content,
                        },
                        Err(e) => FileOpResult::Failed(e),
                    };
                    let _ = sender.send(result);
                    ctx.request_repaint();
                });
            }
            PendingFileOp::SaveSnippet {
                name,
                content,
                wildcard,
            } => {
                runtime.spawn(async move {
                    let dir = if wildcard {
                        files::WILDCARDS_DIR
                    } else {
                        files::TEXTFILES_DIR
                    };
                    let result = match files::write_file(Path::new(dir), &name, ".txt", &content) {
                        Ok(()) => FileOpResult::SnippetSaved { wildcard },
                        Err(e) => FileOpResult::Failed(e),
                    };
                    let _ = sender.send(result);
                    ctx.request_repaint();
                });
            }
            PendingFileOp::ListThemes => {
                runtime.spawn(async move {
                    let result = match files::list_files(Path::new(files::THEMES_DIR), ".json") {
                        Ok(names) => FileOpResult::ThemeList(names),
                        Err(e) => FileOpResult::Failed(e),
                    };
                    let _ = sender.send(result);
                    ctx.request_repaint();
                });
            }
            PendingFileOp::LoadTheme { name } => {
                runtime.spawn(async move {
                    let result = match files::read_theme(Path::new(files::THEMES_DIR), &name) {
                        Ok(theme) => FileOpResult::ThemeLoaded(theme),
                        Err(e) => FileOpResult::Failed(e),
                    };
                    let _ = sender.send(result);
                    ctx.request_repaint();
                });
            }
            PendingFileOp::SaveTheme { name, theme } => {
                runtime.spawn(async move {
                    let result = match files::write_theme(Path::new(files::THEMES_DIR), &name, &theme)
                    {
                        Ok(()) => FileOpResult::ThemeSaved,
                        Err(e) => FileOpResult::Failed(e),
                    };
                    let _ = sender.send(result);
                    ctx.request_repaint();
                });
            }
            PendingFileOp::SetDefaultTheme { theme } => {
                runtime.spawn(async move {
                    let result = match files::write_theme(
                        Path::new(files::THEMES_DIR),
                        files::DEFAULT_THEME_FILE,
                        &theme,
                    ) {
                        Ok(()) => FileOpResult::DefaultThemeSet,
                        Err(e) => FileOpResult::Failed(e),
                    };
                    let _ = sender.send(result);
                    ctx.request_repaint();
                });
            }
        }
    }

    /// Renders whichever blocking dialog is open.
    pub(crate) fn draw_modals(&mut self, ctx: &egui::Context) {
        let Some(modal) = self.files.modal.take() else {
            return;
        };
        match modal {
            Modal::Error { title, message } => self.draw_error_modal(ctx, title, message),
            Modal::SaveSnippet {
                target_box,
                filename,
                wildcard,
            } => self.draw_save_snippet_modal(ctx, target_box, filename, wildcard),
            Modal::SnippetList {
                target_box,
                entries,
            } => self.draw_snippet_list_modal(ctx, target_box, entries),
        }
    }

    fn draw_error_modal(&mut self, ctx: &egui::Context, title: String, message: String) {
        let mut open = true;
        egui::Window::new(&title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(&message);
                if ui.button("OK").clicked() {
                    open = false;
                }
            });
        if open {
            self.files.modal = Some(Modal::Error { title, message });
        }
    }

    fn draw_save_snippet_modal(
        &mut self,
        ctx: &egui::Context,
        target_box: String,
        mut filename: String,
        wildcard: bool,
    ) {
        let title = if wildcard {
            "Save Content to user/wildcards"
        } else {
            "Save Content to user/textfiles"
        };
        let mut keep_open = true;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                let hint = if wildcard {
                    "my_wildcard.txt"
                } else {
                    "my_file.txt"
                };
                ui.add(egui::TextEdit::singleline(&mut filename).hint_text(hint));
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        let name = filename.trim().to_string();
                        match files::validate_filename(&name, ".txt") {
                            Ok(()) => {
                                let content = self
                                    .store
                                    .doc
                                    .box_by_id(&target_box)
                                    .and_then(|b| b.kind.content_text())
                                    .unwrap_or_default()
                                    .to_string();
                                self.files.pending = Some(PendingFileOp::SaveSnippet {
                                    name,
                                    content,
                                    wildcard,
                                });
                                keep_open = false;
                            }
                            Err(e) => {
                                // The error dialog replaces the prompt.
                                self.files.modal = Some(Modal::Error {
                                    title: "Validation Error".to_string(),
                                    message: e,
                                });
                                keep_open = false;
                            }
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        keep_open = false;
                    }
                });
            });
        if keep_open {
            self.files.modal = Some(Modal::SaveSnippet {
                target_box,
                filename,
                wildcard,
            });
        }
    }

    fn draw_snippet_list_modal(
        &mut self,
        ctx: &egui::Context,
        target_box: String,
        entries: Vec<SnippetEntry>,
    ) {
        let mut keep_open = true;
        egui::Window::new("Load Content from File")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("snippet_file_list")
                    .max_height(300.0)
                    .show(ui, |ui| {
                        // Wildcards list first, matching the listing order.
                        let mut last_wildcard = None;
                        for entry in &entries {
                            if last_wildcard != Some(entry.wildcard) {
                                ui.label(if entry.wildcard {
                                    "Wildcards (user/wildcards)"
                                } else {
                                    "Text Files (user/textfiles)"
                                });
                                last_wildcard = Some(entry.wildcard);
                            }
                            if ui.button(&entry.name).clicked() {
                                self.files.pending = Some(PendingFileOp::LoadSnippet {
                                    target_box: target_box.clone(),
                                    name: entry.name.clone(),
                                    wildcard: entry.wildcard,
                                });
                                keep_open = false;
                            }
                        }
                    });
                ui.separator();
                if ui.button("Cancel").clicked() {
                    keep_open = false;
                }
            });
        if keep_open {
            self.files.modal = Some(Modal::SnippetList {
                target_box,
                entries,
            });
        }
    }
}

/// Builds the snippet listing for a box, wildcards first for list boxes.
#[cfg(not(target_arch = "wasm32"))]
fn list_snippets(target_box: String, include_wildcards: bool) -> FileOpResult {
    use std::path::Path;

    let mut entries = Vec::new();
    if include_wildcards {
        match files::list_files(Path::new(files::WILDCARDS_DIR), ".txt") {
            Ok(names) => entries.extend(names.into_iter().map(|name| SnippetEntry {
                name,
                wildcard: true,
            })),
            Err(e) => return FileOpResult::Failed(e),
        }
    }
    match files::list_files(Path::new(files::TEXTFILES_DIR), ".txt") {
        Ok(names) => entries.extend(names.into_iter().map(|name| SnippetEntry {
            name,
            wildcard: false,
        })),
        Err(e) => return FileOpResult::Failed(e),
    }
    FileOpResult::SnippetList {
        target_box,
        entries,
    }
}

/// Browser builds only support picking a document to import; the directory
/// stores live on the native filesystem.
#[cfg(target_arch = "wasm32")]
fn spawn_wasm(op: PendingFileOp, sender: Sender<FileOpResult>, ctx: egui::Context) {
    match op {
        PendingFileOp::ImportDocument => {
            wasm_bindgen_futures::spawn_local(async move {
                let result = match rfd::AsyncFileDialog::new()
                    .add_filter("JSON", &["json"])
                    .pick_file()
                    .await
                {
                    Some(handle) => match String::from_utf8(handle.read().await) {
                        Ok(json) => FileOpResult::DocumentLoaded(json),
                        Err(_) => FileOpResult::Failed("File is not valid UTF-8".to_string()),
                    },
                    None => FileOpResult::Cancelled,
                };
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }
        _ => {
            let _ = sender.send(FileOpResult::Failed(
                "This operation is not supported in the browser build".to_string(),
            ));
            ctx.request_repaint();
        }
    }
}
