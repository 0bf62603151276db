//! Shared application-wide constants.
//! Centralizes tweakable values used across the store, gestures and rendering.

// View limits
/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.1;
/// Largest allowed zoom factor.
pub const MAX_ZOOM: f32 = 5.0;
/// Zoom factor change per unit of wheel scroll delta (`1 - delta * RATE`).
pub const WHEEL_ZOOM_RATE: f32 = 0.001;

// Chrome geometry (canvas pixels, pre-zoom)
/// Height of the toolbar strip across the top of the widget.
pub const TOOLBAR_HEIGHT: f32 = 30.0;
/// Height of a box header (title row). A minimized box collapses to this.
pub const TITLE_HEIGHT: f32 = 26.0;
/// Side length of the square resize handle in a box's bottom-right corner.
pub const RESIZE_HANDLE_SIZE: f32 = 14.0;

// Grid
/// Grid spacing (world units) a fresh document starts with.
pub const DEFAULT_GRID_SIZE: u32 = 100;
/// Grid spacings offered by the toolbar selector. Zero disables snapping.
pub const GRID_SIZE_OPTIONS: [u32; 7] = [0, 10, 20, 50, 100, 200, 400];
/// Grid lines closer together than this on screen are not drawn.
pub const GRID_FADE_THRESHOLD: f32 = 2.0;

// Gestures
/// Distance (canvas pixels) the pointer must travel before a press on a box
/// becomes a drag rather than a click.
pub const DRAG_THRESHOLD: f32 = 3.0;
/// Minimum marquee size (world units per axis) that creates a box on release.
pub const MIN_CREATE_SIZE: f32 = 20.0;
/// Maximum distance (canvas pixels) at which an edge of a dragged box snaps
/// to an alignment guide from another box.
pub const ALIGNMENT_THRESHOLD: f32 = 15.0;

// Box defaults
/// Width (world units) of a box created from the menu without an explicit size.
pub const DEFAULT_BOX_WIDTH: f32 = 300.0;
/// Height (world units) of a box created from the menu without an explicit size.
pub const DEFAULT_BOX_HEIGHT: f32 = 200.0;

// Persistence timing (seconds, matching egui's input clock)
/// Minimum interval between consecutive write-backs of the document.
pub const MIN_SAVE_INTERVAL: f64 = 0.25;
/// Trailing-edge delay for debounced saves issued by continuous gestures.
pub const DEBOUNCED_SAVE_DELAY: f64 = 0.5;

// Fit view
/// Margin (canvas pixels) kept around the content when fitting the view.
pub const FIT_VIEW_PADDING: f32 = 50.0;
/// Fit-to-view never zooms in beyond this factor.
pub const FIT_VIEW_MAX_ZOOM: f32 = 1.5;

// Minimap
/// Width of the minimap overlay in canvas pixels.
pub const MINIMAP_WIDTH: f32 = 180.0;
/// Height of the minimap overlay in canvas pixels.
pub const MINIMAP_HEIGHT: f32 = 120.0;
/// Margin between the minimap and the canvas corner.
pub const MINIMAP_MARGIN: f32 = 12.0;
/// Padding (world units) added around the content bounds inside the minimap.
pub const MINIMAP_PADDING: f32 = 40.0;
