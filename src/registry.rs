//! The box-type registry.
//!
//! One entry per known kind, resolved at startup: the creation menu lists
//! the entries in order, the store uses the default-state factory when
//! creating boxes, and the renderer uses the editor constructor when a box
//! first becomes visible. Unknown tags simply miss, which callers treat as
//! "tolerate and move on".

use crate::content::{AreaEditor, BoxEditor, ControlsEditor, ListEditor, TextEditor};
use crate::types::BoxKind;

/// A registered box kind.
pub struct BoxType {
    /// The wire tag.
    pub tag: &'static str,
    /// Human-readable name shown in the creation menu and toolbar.
    pub label: &'static str,
    default_state: fn() -> (String, BoxKind),
    make_editor: fn() -> Box<dyn BoxEditor>,
}

static BOX_TYPES: [BoxType; 4] = [
    BoxType {
        tag: "text",
        label: "Text",
        default_state: || {
            (
                "New Box".to_string(),
                BoxKind::Text {
                    content: String::new(),
                },
            )
        },
        make_editor: || Box::new(TextEditor::default()),
    },
    BoxType {
        tag: "list",
        label: "List",
        default_state: || {
            (
                "new_list".to_string(),
                BoxKind::List {
                    content: "item 1\nitem 2\nitem 3".to_string(),
                    command_links: serde_json::Map::new(),
                },
            )
        },
        make_editor: || Box::new(ListEditor::default()),
    },
    BoxType {
        tag: "controls",
        label: "Controls",
        default_state: || {
            (
                "Controls".to_string(),
                BoxKind::Controls {
                    variables: Vec::new(),
                },
            )
        },
        make_editor: || Box::new(ControlsEditor::default()),
    },
    BoxType {
        tag: "area",
        label: "Area",
        default_state: || {
            (
                "Area".to_string(),
                BoxKind::Area {
                    content: String::new(),
                    image_width: 512.0,
                    image_height: 512.0,
                    area_x: 64.0,
                    area_y: 64.0,
                    area_width: 256.0,
                    area_height: 256.0,
                    strength: 1.0,
                },
            )
        },
        make_editor: || Box::new(AreaEditor::default()),
    },
];

/// All registered kinds, in creation-menu order.
pub fn all() -> &'static [BoxType] {
    &BOX_TYPES
}

/// Finds a registered kind by tag.
pub fn lookup(tag: &str) -> Option<&'static BoxType> {
    BOX_TYPES.iter().find(|t| t.tag == tag)
}

/// The default title and payload for a kind, if the tag is registered.
pub fn default_state(tag: &str) -> Option<(String, BoxKind)> {
    lookup(tag).map(|t| (t.default_state)())
}

/// Builds a fresh editor instance for a kind, if the tag is registered.
pub fn make_editor(tag: &str) -> Option<Box<dyn BoxEditor>> {
    lookup(tag).map(|t| (t.make_editor)())
}
