//! Core data types for the prompt board document.
//!
//! This module defines the persisted document structure: the camera (pan and
//! zoom), grid settings, theme overrides and the ordered list of boxes placed
//! on the canvas. The wire format is camelCase JSON so documents round-trip
//! with the host's node-graph data model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::constants::DEFAULT_GRID_SIZE;

/// Id of the box every fresh document starts with.
pub const DEFAULT_OUTPUT_BOX_ID: &str = "default-output-box";

/// World-to-canvas translation offset, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pan {
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
}

impl Pan {
    /// Creates a pan offset from its components.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Camera snapshot remembered while a box is maximized, restored on exit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedView {
    /// Pan offset at the time of maximizing.
    pub pan: Pan,
    /// Zoom factor at the time of maximizing.
    pub zoom: f32,
}

/// World-space geometry snapshot taken when a box leaves its normal state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedGeometry {
    /// Top-left x coordinate.
    pub x: f32,
    /// Top-left y coordinate.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
}

/// How a box is currently presented on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayState {
    /// Regular box at its own position and size.
    #[default]
    Normal,
    /// Collapsed to a header-only strip.
    Minimized,
    /// Fills the viewport below the toolbar, ignoring its own geometry.
    Maximized,
}

/// What a controls-box variable does each time the run counter advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableBehavior {
    /// Add one to the value.
    #[default]
    Increment,
    /// Subtract one from the value.
    Decrement,
    /// Replace the value with a fresh non-negative integer below 10^16.
    Randomize,
    /// Leave the value untouched.
    Fixed,
}

/// A named value managed by a controls box and exposed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Stable identifier, assigned at creation.
    pub id: String,
    /// Variable name; normalized to lowercase with underscores for spaces.
    pub name: String,
    /// Per-run update behavior.
    #[serde(default)]
    pub behavior: VariableBehavior,
    /// Current numeric value.
    #[serde(default)]
    pub value: f64,
}

impl Variable {
    /// Creates a fresh variable named `var_{ordinal}` that increments per run.
    pub fn new(ordinal: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: format!("var_{}", ordinal),
            behavior: VariableBehavior::Increment,
            value: 0.0,
        }
    }

    /// Normalizes a user-typed name: lowercase, whitespace runs become `_`.
    pub fn normalize_name(raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut in_space = false;
        for ch in raw.trim().chars() {
            if ch.is_whitespace() {
                in_space = true;
            } else {
                if in_space {
                    out.push('_');
                    in_space = false;
                }
                for lower in ch.to_lowercase() {
                    out.push(lower);
                }
            }
        }
        out
    }

    /// Applies this variable's behavior once (one run-counter advance).
    pub fn apply_behavior(&mut self) {
        match self.behavior {
            VariableBehavior::Increment => self.value += 1.0,
            VariableBehavior::Decrement => self.value -= 1.0,
            VariableBehavior::Randomize => self.value = fresh_seed(),
            VariableBehavior::Fixed => {}
        }
    }
}

/// Draws a non-negative integer uniformly below 10^16, as an f64.
///
/// Uses the v4 uuid generator as the entropy source so randomized variables
/// share the same backing as box ids on every platform.
fn fresh_seed() -> f64 {
    (Uuid::new_v4().as_u128() % 10_000_000_000_000_000u128) as f64
}

fn default_image_dim() -> f32 {
    512.0
}

fn default_area_offset() -> f32 {
    64.0
}

fn default_area_size() -> f32 {
    256.0
}

fn default_strength() -> f32 {
    1.0
}

/// The per-kind payload of a box, tagged on the wire by its `type` key.
///
/// Unrecognized tags deserialize to [`BoxKind::Unknown`] so a document written
/// by a newer build still loads; such boxes render as a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BoxKind {
    /// Free-form prompt text with wildcard autocomplete.
    Text {
        /// The prompt text.
        #[serde(default)]
        content: String,
    },
    /// Newline-separated list items, addressable by box title.
    List {
        /// One item per line.
        #[serde(default)]
        content: String,
        /// Opaque per-item annotations carried for wire compatibility.
        #[serde(default, rename = "commandLinks")]
        command_links: serde_json::Map<String, serde_json::Value>,
    },
    /// A set of host-visible variables updated on each run.
    Controls {
        /// The managed variables, in display order.
        #[serde(default)]
        variables: Vec<Variable>,
    },
    /// A conditioning region within an image, plus its prompt text.
    #[serde(rename_all = "camelCase")]
    Area {
        /// The prompt text for the region.
        #[serde(default)]
        content: String,
        /// Target image width in pixels.
        #[serde(default = "default_image_dim")]
        image_width: f32,
        /// Target image height in pixels.
        #[serde(default = "default_image_dim")]
        image_height: f32,
        /// Region left edge within the image.
        #[serde(default = "default_area_offset")]
        area_x: f32,
        /// Region top edge within the image.
        #[serde(default = "default_area_offset")]
        area_y: f32,
        /// Region width.
        #[serde(default = "default_area_size")]
        area_width: f32,
        /// Region height.
        #[serde(default = "default_area_size")]
        area_height: f32,
        /// Conditioning strength applied to the region.
        #[serde(default = "default_strength")]
        strength: f32,
    },
    /// A tag this build does not recognize.
    #[serde(other)]
    Unknown,
}

impl BoxKind {
    /// The wire tag for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            BoxKind::Text { .. } => "text",
            BoxKind::List { .. } => "list",
            BoxKind::Controls { .. } => "controls",
            BoxKind::Area { .. } => "area",
            BoxKind::Unknown => "unknown",
        }
    }

    /// Smallest (width, height) a box of this kind may be resized to.
    pub fn min_size(&self) -> (f32, f32) {
        match self {
            BoxKind::Area { .. } => (500.0, 500.0),
            BoxKind::Controls { .. } => (300.0, 200.0),
            BoxKind::Text { .. } | BoxKind::List { .. } | BoxKind::Unknown => (200.0, 100.0),
        }
    }

    /// The editable text payload, for kinds that carry one.
    pub fn content_text(&self) -> Option<&str> {
        match self {
            BoxKind::Text { content }
            | BoxKind::List { content, .. }
            | BoxKind::Area { content, .. } => Some(content),
            BoxKind::Controls { .. } | BoxKind::Unknown => None,
        }
    }

    /// Mutable access to the editable text payload.
    pub fn content_text_mut(&mut self) -> Option<&mut String> {
        match self {
            BoxKind::Text { content }
            | BoxKind::List { content, .. }
            | BoxKind::Area { content, .. } => Some(content),
            BoxKind::Controls { .. } | BoxKind::Unknown => None,
        }
    }
}

fn default_box_width() -> f32 {
    300.0
}

fn default_box_height() -> f32 {
    200.0
}

/// A single box placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxData {
    /// Stable identifier, unique within the document.
    pub id: String,
    /// User-editable title shown in the header.
    #[serde(default)]
    pub title: String,
    /// World-space left edge.
    #[serde(default)]
    pub x: f32,
    /// World-space top edge.
    #[serde(default)]
    pub y: f32,
    /// World-space width.
    #[serde(default = "default_box_width")]
    pub width: f32,
    /// World-space height.
    #[serde(default = "default_box_height")]
    pub height: f32,
    /// Current presentation of the box.
    #[serde(default)]
    pub display_state: DisplayState,
    /// Geometry to restore when leaving the maximized state. Present only
    /// while the box is maximized from a normal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<SavedGeometry>,
    /// Kind-specific payload, flattened into the box object on the wire.
    #[serde(flatten)]
    pub kind: BoxKind,
}

impl BoxData {
    /// Smallest (width, height) this box may be resized to.
    pub fn min_size(&self) -> (f32, f32) {
        self.kind.min_size()
    }
}

/// The whole persisted state of one prompt board.
///
/// Boxes are kept in z-order: the last entry draws on top and hit-tests
/// first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    /// All boxes on the canvas, bottom to top.
    pub boxes: Vec<BoxData>,
    /// Camera translation in canvas pixels.
    pub pan: Pan,
    /// Camera zoom factor.
    pub zoom: f32,
    /// Grid spacing in world units; zero disables snapping.
    pub grid_size: u32,
    /// Whether grid lines are drawn.
    pub show_grid: bool,
    /// Camera snapshot taken when a box was maximized, if one is.
    pub saved_view: Option<SavedView>,
    /// The currently selected box, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_box_id: Option<String>,
    /// Kind used for the next marquee-created box.
    pub last_selected_box_type: String,
    /// Host-driven run counter.
    pub iterator: u64,
    /// Sparse style overrides; unset keys fall back to built-in defaults.
    pub theme: BTreeMap<String, String>,
    /// Whether the host's prompt composer treats periods as break markers.
    pub period_is_break: bool,
    /// Whether the minimap overlay is drawn.
    pub show_minimap: bool,
}

impl Default for Document {
    /// Creates the default document: one empty output text box at (100, 100).
    fn default() -> Self {
        Self {
            boxes: vec![BoxData {
                id: DEFAULT_OUTPUT_BOX_ID.to_string(),
                title: "output".to_string(),
                x: 100.0,
                y: 100.0,
                width: 400.0,
                height: 300.0,
                display_state: DisplayState::Normal,
                old: None,
                kind: BoxKind::Text {
                    content: String::new(),
                },
            }],
            pan: Pan::default(),
            zoom: 1.0,
            grid_size: DEFAULT_GRID_SIZE,
            show_grid: true,
            saved_view: None,
            selected_box_id: None,
            last_selected_box_type: "text".to_string(),
            iterator: 0,
            theme: BTreeMap::new(),
            period_is_break: true,
            show_minimap: false,
        }
    }
}

impl Document {
    /// Creates the default document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the document to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from a JSON string.
    ///
    /// Missing fields backfill from the defaults, and boxes written by older
    /// builds are migrated in place before parsing.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut value: serde_json::Value = serde_json::from_str(json)?;
        migrate_legacy_boxes(&mut value);
        serde_json::from_value(value)
    }

    /// Looks up a box by id.
    pub fn box_by_id(&self, id: &str) -> Option<&BoxData> {
        self.boxes.iter().find(|b| b.id == id)
    }

    /// Looks up a box by id for mutation.
    pub fn box_by_id_mut(&mut self, id: &str) -> Option<&mut BoxData> {
        self.boxes.iter_mut().find(|b| b.id == id)
    }

    /// The currently maximized box, if any.
    pub fn maximized_box(&self) -> Option<&BoxData> {
        self.boxes
            .iter()
            .find(|b| b.display_state == DisplayState::Maximized)
    }
}

/// Rewrites boxes using the legacy display-state keys into the current shape.
///
/// Older documents stored `isMaximized: bool` and `minimized: bool` instead
/// of `displayState`, and text boxes predating the kind tag carry no `type`
/// key at all.
fn migrate_legacy_boxes(doc: &mut serde_json::Value) {
    let Some(boxes) = doc.get_mut("boxes").and_then(|b| b.as_array_mut()) else {
        return;
    };
    for entry in boxes {
        let Some(map) = entry.as_object_mut() else {
            continue;
        };
        if !map.contains_key("type") {
            map.insert("type".to_string(), serde_json::Value::from("text"));
        }
        let maximized = map.remove("isMaximized");
        let minimized = map.remove("minimized");
        if (maximized.is_some() || minimized.is_some()) && !map.contains_key("displayState") {
            let state = if maximized.and_then(|v| v.as_bool()) == Some(true) {
                "maximized"
            } else if minimized.and_then(|v| v.as_bool()) == Some(true) {
                "minimized"
            } else {
                "normal"
            };
            map.insert("displayState".to_string(), serde_json::Value::from(state));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_has_output_box() {
        let doc = Document::default();
        assert_eq!(doc.boxes.len(), 1);
        assert_eq!(doc.boxes[0].id, DEFAULT_OUTPUT_BOX_ID);
        assert_eq!(doc.boxes[0].title, "output");
        assert_eq!(doc.zoom, 1.0);
        assert_eq!(doc.grid_size, 100);
        assert!(doc.show_grid);
        assert!(doc.period_is_break);
        assert!(doc.saved_view.is_none());
    }

    #[test]
    fn test_box_kind_wire_tags() {
        let doc = Document::default();
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"type\": \"text\""));
        assert!(json.contains("\"displayState\": \"normal\""));
        // Absent snapshots stay off the wire entirely.
        assert!(!json.contains("\"old\""));
    }

    #[test]
    fn test_round_trip_preserves_kinds() {
        let mut doc = Document::default();
        doc.boxes.push(BoxData {
            id: Uuid::new_v4().to_string(),
            title: "lora stack".to_string(),
            x: 600.0,
            y: -50.0,
            width: 300.0,
            height: 200.0,
            display_state: DisplayState::Minimized,
            old: None,
            kind: BoxKind::List {
                content: "item 1\nitem 2".to_string(),
                command_links: serde_json::Map::new(),
            },
        });
        doc.boxes.push(BoxData {
            id: Uuid::new_v4().to_string(),
            title: "Area".to_string(),
            x: 0.0,
            y: 0.0,
            width: 500.0,
            height: 500.0,
            display_state: DisplayState::Normal,
            old: None,
            kind: BoxKind::Area {
                content: String::new(),
                image_width: 1024.0,
                image_height: 512.0,
                area_x: 64.0,
                area_y: 64.0,
                area_width: 256.0,
                area_height: 256.0,
                strength: 0.8,
            },
        });

        let json = doc.to_json().unwrap();
        let restored = Document::from_json(&json).unwrap();
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_missing_fields_backfill_from_defaults() {
        let doc = Document::from_json("{\"zoom\": 2.0}").unwrap();
        assert_eq!(doc.zoom, 2.0);
        assert_eq!(doc.grid_size, 100);
        assert_eq!(doc.boxes.len(), 1);
        assert!(doc.show_grid);
    }

    #[test]
    fn test_box_without_type_is_text() {
        let json = r#"{
            "boxes": [{"id": "a", "title": "old", "x": 0, "y": 0,
                       "width": 200, "height": 100, "content": "hi"}]
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(
            doc.boxes[0].kind,
            BoxKind::Text {
                content: "hi".to_string()
            }
        );
    }

    #[test]
    fn test_legacy_display_state_migrates() {
        let json = r#"{
            "boxes": [
                {"id": "a", "type": "text", "isMaximized": true, "minimized": false},
                {"id": "b", "type": "text", "isMaximized": false, "minimized": true},
                {"id": "c", "type": "text", "isMaximized": false, "minimized": false}
            ]
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.boxes[0].display_state, DisplayState::Maximized);
        assert_eq!(doc.boxes[1].display_state, DisplayState::Minimized);
        assert_eq!(doc.boxes[2].display_state, DisplayState::Normal);
    }

    #[test]
    fn test_unknown_type_is_tolerated() {
        let json = r#"{
            "boxes": [{"id": "a", "type": "hologram", "x": 1, "y": 2,
                       "width": 300, "height": 200}]
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.boxes[0].kind, BoxKind::Unknown);
        assert_eq!(doc.boxes[0].kind.tag(), "unknown");
        // Unknown boxes still re-serialize without erroring.
        assert!(doc.to_json().is_ok());
    }

    #[test]
    fn test_min_sizes_per_kind() {
        assert_eq!(
            BoxKind::Text {
                content: String::new()
            }
            .min_size(),
            (200.0, 100.0)
        );
        assert_eq!(
            BoxKind::Controls {
                variables: Vec::new()
            }
            .min_size(),
            (300.0, 200.0)
        );
        assert_eq!(
            BoxKind::Area {
                content: String::new(),
                image_width: 512.0,
                image_height: 512.0,
                area_x: 64.0,
                area_y: 64.0,
                area_width: 256.0,
                area_height: 256.0,
                strength: 1.0,
            }
            .min_size(),
            (500.0, 500.0)
        );
    }

    #[test]
    fn test_variable_behaviors() {
        let mut var = Variable::new(1);
        assert_eq!(var.name, "var_1");
        assert_eq!(var.behavior, VariableBehavior::Increment);

        var.apply_behavior();
        assert_eq!(var.value, 1.0);

        var.behavior = VariableBehavior::Decrement;
        var.apply_behavior();
        var.apply_behavior();
        assert_eq!(var.value, -1.0);

        var.behavior = VariableBehavior::Fixed;
        var.apply_behavior();
        assert_eq!(var.value, -1.0);

        var.behavior = VariableBehavior::Randomize;
        var.apply_behavior();
        assert!(var.value >= 0.0);
        assert!(var.value < 1e16);
        assert_eq!(var.value.fract(), 0.0);
    }

    #[test]
    fn test_variable_name_normalization() {
        assert_eq!(Variable::normalize_name("Steps Total"), "steps_total");
        assert_eq!(Variable::normalize_name("  CFG  Scale "), "cfg_scale");
        assert_eq!(Variable::normalize_name("seed"), "seed");
    }
}
