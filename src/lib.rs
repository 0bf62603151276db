//! # Prompt Board
//!
//! A pannable, zoomable canvas of prompt-building boxes for node-based
//! image-generation frontends. Four box kinds cover the host workflow:
//! - **Text**: free-form prompt text with wildcard autocomplete
//! - **List**: newline-separated entries addressable by box title
//! - **Controls**: named variables stepped on every run
//! - **Area**: a regional prompt with image-space placement
//!
//! ## Features
//! - Marquee box creation, dragging, resizing and alignment guides
//! - Grid snapping with configurable spacing
//! - Maximize/minimize per box, plus a navigable minimap
//! - Rate-limited write-back of the whole board to a host value cell
//! - Themes with per-key overrides, presets on disk, and a startup default

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod constants;
mod content;
mod files;
mod registry;
mod store;
mod theme;
mod transform;
mod types;
mod ui;

// Re-export the surface consumed by hosts.
pub use store::{MemoryCell, StateStore, ValueCell};
pub use types::*;
pub use ui::PromptBoardApp;

/// Runs the prompt board as a standalone application.
///
/// Initializes the egui window and starts the main event loop; board state
/// persists through eframe storage between runs.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     prompt_board::run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Prompt Board",
        options,
        Box::new(|cc| Ok(Box::new(PromptBoardApp::new(cc)))),
    )
}
