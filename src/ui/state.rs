//! Application state structures.
//!
//! The document itself lives in the [`StateStore`]; everything here is
//! runtime-only UI state: the in-flight pointer gesture, rename buffers,
//! the creation menu, async file-operation plumbing, and the per-box
//! editor instances.

use crate::content::{BoxEditor, WildcardCache};
use crate::store::{MemoryCell, StateStore};
use crate::types::Pan;
use crate::ui::alignment::Alignment;
use eframe::egui;
use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Storage key for the persisted document in eframe storage.
pub const STORAGE_KEY: &str = "app_state";

/// One in-flight pointer gesture. At most one exists at any time; starting a
/// new gesture requires the slot to be empty.
pub enum ActiveOperation {
    /// Camera pan via middle/right button, or left button in pan mode.
    Pan {
        /// Pointer position when the pan started.
        start_pointer: egui::Pos2,
        /// Pan offset when the gesture started.
        start_pan: Pan,
    },
    /// Moving a box by its header.
    Drag {
        /// Target box; may vanish mid-gesture, in which case the op no-ops.
        box_id: String,
        /// Pointer position at press, for the live threshold.
        start_pointer: egui::Pos2,
        /// World offset from the box origin to the grab point.
        grab_offset: egui::Vec2,
        /// False until the movement threshold is crossed; a press-and-release
        /// below the threshold is a click, not a drag.
        live: bool,
    },
    /// Resizing a box from its corner handle.
    Resize {
        box_id: String,
        start_pointer: egui::Pos2,
        /// Box size when the gesture started.
        start_size: egui::Vec2,
    },
    /// Growing a creation rectangle on empty canvas.
    Marquee {
        start_world: egui::Pos2,
        current_world: egui::Pos2,
    },
    /// Navigating by dragging inside the minimap.
    Minimap,
}

/// Pointer/keyboard interaction state.
#[derive(Default)]
pub struct InteractionState {
    /// The single active-gesture slot.
    pub active_op: Option<ActiveOperation>,
    /// Alignment result for the current drag, cleared on release.
    pub drag_alignment: Alignment,
    /// Box whose title is currently being renamed.
    pub renaming_box: Option<String>,
    /// Title text while renaming.
    pub rename_buffer: String,
    /// Whether focus was already requested for the current rename.
    pub rename_focus_requested: bool,
    /// The box whose content editor most recently held text focus; target
    /// for the toolbar's snippet save/load.
    pub last_active_text_box: Option<String>,
}

/// Creation menu shown on background double-click.
#[derive(Default)]
pub struct CreationMenuState {
    /// Whether the menu is currently visible.
    pub show: bool,
    /// Canvas-local position where the menu appears.
    pub canvas_pos: egui::Pos2,
    /// World position where a chosen box will be created.
    pub world_pos: egui::Pos2,
    /// Prevents the menu from closing on the click that opened it.
    pub just_opened: bool,
}

/// One entry in the snippet-load picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetEntry {
    /// Filename as stored on disk.
    pub name: String,
    /// True if the file lives in the wildcard store.
    pub wildcard: bool,
}

/// A file operation scheduled for the next frame.
#[derive(Debug)]
pub enum PendingFileOp {
    /// Export the document through a save dialog.
    ExportDocument,
    /// Import a document through an open dialog.
    ImportDocument,
    /// List snippet files for the picker.
    ListSnippets {
        /// Box whose content the picked snippet will replace. List boxes
        /// also see the wildcard store.
        target_box: String,
    },
    /// Read one snippet into a box.
    LoadSnippet {
        target_box: String,
        name: String,
        wildcard: bool,
    },
    /// Write box content under a validated filename.
    SaveSnippet {
        name: String,
        content: String,
        wildcard: bool,
    },
    /// List theme presets.
    ListThemes,
    /// Read one theme preset.
    LoadTheme { name: String },
    /// Write the current theme as a named preset.
    SaveTheme {
        name: String,
        theme: BTreeMap<String, String>,
    },
    /// Make the current theme the startup default.
    SetDefaultTheme { theme: BTreeMap<String, String> },
}

/// Messages sent from async file operations back to the main app.
#[derive(Debug)]
pub enum FileOpResult {
    /// Document export finished, with the path written.
    DocumentExported(String),
    /// Document import finished, with the raw JSON read.
    DocumentLoaded(String),
    /// Snippet listing finished.
    SnippetList {
        target_box: String,
        entries: Vec<SnippetEntry>,
    },
    /// Snippet content read.
    SnippetLoaded {
        target_box: String,
        content: String,
    },
    /// Snippet written.
    SnippetSaved {
        /// True if it went to the wildcard store, which invalidates the
        /// autocomplete cache.
        wildcard: bool,
    },
    /// Theme preset listing finished.
    ThemeList(Vec<String>),
    /// Theme preset read.
    ThemeLoaded(BTreeMap<String, String>),
    /// Theme preset written.
    ThemeSaved,
    /// Startup default theme written.
    DefaultThemeSet,
    /// Dialog dismissed without choosing a file.
    Cancelled,
    /// Operation failed with an error message.
    Failed(String),
}

/// A blocking dialog in front of the canvas.
pub enum Modal {
    /// Error message with a dismiss button.
    Error { title: String, message: String },
    /// Filename prompt for saving box content.
    SaveSnippet {
        target_box: String,
        /// Input buffer for the filename.
        filename: String,
        wildcard: bool,
    },
    /// File picker fed by a completed listing.
    SnippetList {
        target_box: String,
        entries: Vec<SnippetEntry>,
    },
}

/// Async file-operation plumbing.
pub struct FilesState {
    /// Channel for receiving results from spawned tasks.
    pub sender: Option<Sender<FileOpResult>>,
    pub receiver: Option<Receiver<FileOpResult>>,
    /// Operation to initiate on the next frame.
    pub pending: Option<PendingFileOp>,
    /// Runtime for spawning dialog and disk tasks off the UI thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub runtime: Option<tokio::runtime::Runtime>,
    /// Currently shown dialog, if any.
    pub modal: Option<Modal>,
    /// True while an operation is in flight; blocks re-entry.
    pub loading: bool,
}

impl Default for FilesState {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender: Some(sender),
            receiver: Some(receiver),
            pending: None,
            #[cfg(not(target_arch = "wasm32"))]
            runtime: tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .ok(),
            modal: None,
            loading: false,
        }
    }
}

/// Theme editor window state.
#[derive(Default)]
pub struct ThemeEditorState {
    /// Whether the window is open.
    pub open: bool,
    /// When set, the window shows this preset list instead of the editor.
    pub presets: Option<Vec<String>>,
    /// When set, the window shows a save-name prompt with this buffer.
    pub save_name: Option<String>,
}

/// The main application: the document store plus all runtime UI state.
///
/// Implements `eframe::App`; the document is bridged to eframe storage
/// through the store's value cell.
pub struct PromptBoardApp {
    /// Source of truth for the document, with write-back to the cell.
    pub store: StateStore,
    /// Shared handle to the same cell the store writes, read at shutdown
    /// and on the host tick.
    pub cell: MemoryCell,
    /// Pointer/keyboard interaction state.
    pub interaction: InteractionState,
    /// Creation menu state.
    pub creation_menu: CreationMenuState,
    /// Async file-operation state.
    pub files: FilesState,
    /// Theme editor window state.
    pub theme_editor: ThemeEditorState,
    /// Live content-editor instances, keyed by box id.
    pub editors: HashMap<String, Box<dyn BoxEditor>>,
    /// Cached wildcard names for autocomplete.
    pub wildcards: WildcardCache,
    /// Clock sample for the current frame, in seconds.
    pub now: f64,
}

impl Default for PromptBoardApp {
    fn default() -> Self {
        let cell = MemoryCell::default();
        let mut store = StateStore::new(Box::new(cell.clone()));
        store.load(0.0);
        Self {
            store,
            cell,
            interaction: InteractionState::default(),
            creation_menu: CreationMenuState::default(),
            files: FilesState::default(),
            theme_editor: ThemeEditorState::default(),
            editors: HashMap::new(),
            wildcards: WildcardCache::default(),
            now: 0.0,
        }
    }
}

impl PromptBoardApp {
    /// Builds the app, restoring the document from eframe storage if present.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self::default();
        if let Some(json) = cc.storage.and_then(|s| s.get_string(STORAGE_KEY)) {
            app.cell.replace(Some(json));
            app.store.load(0.0);
        }

        // An empty theme falls back to the saved startup default, if any.
        #[cfg(not(target_arch = "wasm32"))]
        if app.store.doc.theme.is_empty() {
            if let Some(theme) =
                crate::files::read_default_theme(std::path::Path::new(crate::files::THEMES_DIR))
            {
                app.store.set_theme_map(theme, 0.0);
            }
        }
        app
    }

    /// Shows an error dialog, replacing any open dialog.
    pub fn show_error(&mut self, title: &str, message: impl Into<String>) {
        self.files.modal = Some(Modal::Error {
            title: title.to_string(),
            message: message.into(),
        });
    }
}
