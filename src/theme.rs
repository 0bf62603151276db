//! Built-in style defaults and resolution of per-document theme overrides.
//!
//! Themes are sparse string maps keyed by style-variable names. The key set
//! is shared with documents written by older builds, so a themed document
//! keeps its look when it round-trips through the host.

use std::collections::BTreeMap;

use egui::{Color32, FontFamily};

/// Every known style variable with its built-in default value.
pub const DEFAULT_THEME: [(&str, &str); 15] = [
    ("--tb-font-family", "sans-serif"),
    ("--tb-font-size", "14px"),
    ("--tb-bg-color", "#222"),
    ("--tb-grid-color", "#404040"),
    ("--tb-toolbar-bg-color", "#353535"),
    ("--tb-box-bg-color", "#353535"),
    ("--tb-box-border-color", "#555"),
    ("--tb-box-shadow-color", "rgba(0,0,0,0.5)"),
    ("--tb-header-bg-color", "#4a4a4a"),
    ("--tb-header-text-color", "#ddd"),
    ("--tb-text-color", "#ccc"),
    ("--tb-textarea-bg-color", "#282828"),
    ("--tb-button-bg-color", "#444"),
    ("--tb-button-text-color", "#ddd"),
    ("--tb-accent-color", "#5c5"),
];

/// The built-in default for a style variable, if the key is known.
pub fn default_value(key: &str) -> Option<&'static str> {
    DEFAULT_THEME
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
}

/// Whether a style variable holds a color (edited with a color picker).
pub fn is_color_key(key: &str) -> bool {
    key.contains("color")
}

/// Colors and font settings resolved from a document's theme overrides.
///
/// Unknown keys and unparseable values fall back to the defaults, never an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Canvas background fill.
    pub background: Color32,
    /// Grid line color.
    pub grid: Color32,
    /// Toolbar strip fill.
    pub toolbar_background: Color32,
    /// Box body fill.
    pub box_background: Color32,
    /// Box outline color.
    pub box_border: Color32,
    /// Drop shadow behind boxes.
    pub box_shadow: Color32,
    /// Box header fill.
    pub header_background: Color32,
    /// Box title text color.
    pub header_text: Color32,
    /// General text color.
    pub text: Color32,
    /// Fill behind editable text areas.
    pub textarea_background: Color32,
    /// Button fill.
    pub button_background: Color32,
    /// Button label color.
    pub button_text: Color32,
    /// Highlight color for selection and alignment guides.
    pub accent: Color32,
    /// Base font size in points.
    pub font_size: f32,
    /// Font family used for box content.
    pub font_family: FontFamily,
}

impl Palette {
    /// Resolves a theme map into concrete colors and fonts.
    pub fn resolve(theme: &BTreeMap<String, String>) -> Self {
        let color = |key: &str| -> Color32 {
            let fallback = default_value(key).and_then(parse_color).unwrap_or(Color32::GRAY);
            theme
                .get(key)
                .and_then(|v| parse_color(v))
                .unwrap_or(fallback)
        };
        let font_size = raw(theme, "--tb-font-size")
            .trim()
            .trim_end_matches("px")
            .parse::<f32>()
            .unwrap_or(14.0)
            .clamp(6.0, 48.0);
        let font_family = if raw(theme, "--tb-font-family").to_lowercase().contains("mono") {
            FontFamily::Monospace
        } else {
            FontFamily::Proportional
        };

        Self {
            background: color("--tb-bg-color"),
            grid: color("--tb-grid-color"),
            toolbar_background: color("--tb-toolbar-bg-color"),
            box_background: color("--tb-box-bg-color"),
            box_border: color("--tb-box-border-color"),
            box_shadow: color("--tb-box-shadow-color"),
            header_background: color("--tb-header-bg-color"),
            header_text: color("--tb-header-text-color"),
            text: color("--tb-text-color"),
            textarea_background: color("--tb-textarea-bg-color"),
            button_background: color("--tb-button-bg-color"),
            button_text: color("--tb-button-text-color"),
            accent: color("--tb-accent-color"),
            font_size,
            font_family,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::resolve(&BTreeMap::new())
    }
}

/// The effective value for a style variable: the override, else the default.
fn raw<'a>(theme: &'a BTreeMap<String, String>, key: &str) -> &'a str {
    theme
        .get(key)
        .map(String::as_str)
        .or_else(|| default_value(key))
        .unwrap_or("")
}

/// Parses `#rgb`, `#rrggbb`, `rgb(...)` or `rgba(...)` color strings.
pub fn parse_color(value: &str) -> Option<Color32> {
    let v = value.trim();
    if let Some(hex) = v.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(body) = v
        .strip_prefix("rgba(")
        .or_else(|| v.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            return None;
        }
        let r = parts[0].parse::<f32>().ok()?;
        let g = parts[1].parse::<f32>().ok()?;
        let b = parts[2].parse::<f32>().ok()?;
        let a = if parts.len() > 3 {
            parts[3].parse::<f32>().ok()?
        } else {
            1.0
        };
        return Some(Color32::from_rgba_unmultiplied(
            r.clamp(0.0, 255.0) as u8,
            g.clamp(0.0, 255.0) as u8,
            b.clamp(0.0, 255.0) as u8,
            (a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ));
    }
    None
}

fn parse_hex(hex: &str) -> Option<Color32> {
    let expanded: String;
    let digits = match hex.len() {
        3 => {
            expanded = hex.chars().flat_map(|c| [c, c]).collect();
            expanded.as_str()
        }
        6 => hex,
        _ => return None,
    };
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

/// Formats a color as a `#rrggbb` hex string (alpha dropped).
pub fn color_to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
