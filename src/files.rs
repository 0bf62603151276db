//! Directory-backed stores for snippets, wildcards, and theme presets.
//!
//! Native builds only. Text and area boxes save their content as snippets
//! under `user/textfiles`, list boxes double as wildcard sources under
//! `user/wildcards`, and the theme editor keeps named presets under
//! `user/themes`. Every entry point that accepts a user-supplied filename
//! validates it before touching the filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Snippet storage for text and area boxes.
pub const TEXTFILES_DIR: &str = "user/textfiles";
/// Wildcard storage fed by list boxes.
pub const WILDCARDS_DIR: &str = "user/wildcards";
/// Named theme presets.
pub const THEMES_DIR: &str = "user/themes";

/// The preset applied at startup when the document carries no overrides.
pub const DEFAULT_THEME_FILE: &str = "default.json";

/// Checks a user-supplied filename before any I/O.
///
/// Rejects path separators, shell-hostile characters, and parent traversal,
/// and requires the given extension.
pub fn validate_filename(name: &str, extension: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Filename must not be empty".to_string());
    }
    let invalid = |c: char| matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|');
    if name.contains("..") || name.chars().any(invalid) {
        return Err("Filename contains invalid characters".to_string());
    }
    if !name.ends_with(extension) {
        return Err(format!("Filename must end with {}", extension));
    }
    Ok(())
}

/// Lists filenames with the given extension in `dir`, sorted.
///
/// A missing directory is an empty store, not an error.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<String>, String> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let entries =
        fs::read_dir(dir).map_err(|e| format!("Failed to list {}: {}", dir.display(), e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to list {}: {}", dir.display(), e))?;
        if let Ok(name) = entry.file_name().into_string() {
            if name.ends_with(extension) {
                names.push(name);
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Reads a named file from `dir` after validating the name.
pub fn read_file(dir: &Path, name: &str, extension: &str) -> Result<String, String> {
    validate_filename(name, extension)?;
    fs::read_to_string(dir.join(name)).map_err(|e| format!("Failed to read {}: {}", name, e))
}

/// Writes a named file into `dir` after validating the name, creating the
/// directory if needed.
pub fn write_file(dir: &Path, name: &str, extension: &str, content: &str) -> Result<(), String> {
    validate_filename(name, extension)?;
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
    fs::write(dir.join(name), content).map_err(|e| format!("Failed to save {}: {}", name, e))
}

/// Lowercased, extension-stripped names of every wildcard file.
///
/// Feeds the text editor's autocomplete. Errors degrade to an empty list so
/// a broken store never blocks typing.
pub fn list_wildcard_names(dir: &Path) -> Vec<String> {
    match list_files(dir, ".txt") {
        Ok(files) => {
            let mut names: Vec<String> = files
                .iter()
                .map(|f| f.trim_end_matches(".txt").to_lowercase())
                .collect();
            names.sort();
            names
        }
        Err(e) => {
            eprintln!("Error loading wildcards: {}", e);
            Vec::new()
        }
    }
}

/// Reads a theme preset as a style-variable map.
pub fn read_theme(dir: &Path, name: &str) -> Result<BTreeMap<String, String>, String> {
    let raw = read_file(dir, name, ".json")?;
    serde_json::from_str(&raw).map_err(|e| format!("Failed to parse {}: {}", name, e))
}

/// Writes a theme preset under a validated name.
pub fn write_theme(dir: &Path, name: &str, theme: &BTreeMap<String, String>) -> Result<(), String> {
    let json = serde_json::to_string_pretty(theme)
        .map_err(|e| format!("Failed to serialize theme: {}", e))?;
    write_file(dir, name, ".json", &json)
}

/// The startup default theme, if one has been set.
///
/// A corrupt file is logged and treated as absent.
pub fn read_default_theme(dir: &Path) -> Option<BTreeMap<String, String>> {
    if !dir.join(DEFAULT_THEME_FILE).exists() {
        return None;
    }
    match read_theme(dir, DEFAULT_THEME_FILE) {
        Ok(theme) => Some(theme),
        Err(e) => {
            eprintln!("{}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    /// A unique scratch directory, removed on drop.
    struct Scratch(PathBuf);

    impl Scratch {
        fn new() -> Self {
            Scratch(std::env::temp_dir().join(format!("prompt_board_test_{}", Uuid::new_v4())))
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_filename_validation() {
        assert!(validate_filename("notes.txt", ".txt").is_ok());
        assert!(validate_filename("my file.txt", ".txt").is_ok());
        assert!(validate_filename("wild-card_2.txt", ".txt").is_ok());

        assert!(validate_filename("", ".txt").is_err());
        assert!(validate_filename("notes", ".txt").is_err());
        assert!(validate_filename("notes.text", ".txt").is_err());
        assert!(validate_filename("a/b.txt", ".txt").is_err());
        assert!(validate_filename("a\\b.txt", ".txt").is_err());
        assert!(validate_filename("con:.txt", ".txt").is_err());
        assert!(validate_filename("a*.txt", ".txt").is_err());
        assert!(validate_filename("q?.txt", ".txt").is_err());
        assert!(validate_filename("a\"b.txt", ".txt").is_err());
        assert!(validate_filename("a<b>.txt", ".txt").is_err());
        assert!(validate_filename("a|b.txt", ".txt").is_err());
        assert!(validate_filename("..hidden.txt", ".txt").is_err());
        assert!(validate_filename("up/../side.txt", ".txt").is_err());
    }

    #[test]
    fn test_snippet_round_trip() {
        let scratch = Scratch::new();
        write_file(scratch.path(), "poem.txt", ".txt", "roses are red").unwrap();
        assert_eq!(
            read_file(scratch.path(), "poem.txt", ".txt").unwrap(),
            "roses are red"
        );
        assert_eq!(list_files(scratch.path(), ".txt").unwrap(), ["poem.txt"]);
    }

    #[test]
    fn test_list_is_sorted_and_filtered() {
        let scratch = Scratch::new();
        write_file(scratch.path(), "zebra.txt", ".txt", "z").unwrap();
        write_file(scratch.path(), "apple.txt", ".txt", "a").unwrap();
        write_file(scratch.path(), "theme.json", ".json", "{}").unwrap();
        assert_eq!(
            list_files(scratch.path(), ".txt").unwrap(),
            ["apple.txt", "zebra.txt"]
        );
    }

    #[test]
    fn test_missing_dir_lists_empty() {
        let scratch = Scratch::new();
        assert!(list_files(scratch.path(), ".txt").unwrap().is_empty());
        assert!(list_wildcard_names(scratch.path()).is_empty());
    }

    #[test]
    fn test_read_missing_file_errors() {
        let scratch = Scratch::new();
        assert!(read_file(scratch.path(), "nope.txt", ".txt").is_err());
    }

    #[test]
    fn test_wildcard_names_lowercased_and_stripped() {
        let scratch = Scratch::new();
        write_file(scratch.path(), "Fantasy.txt", ".txt", "elf").unwrap();
        write_file(scratch.path(), "animals.txt", ".txt", "cat").unwrap();
        assert_eq!(list_wildcard_names(scratch.path()), ["animals", "fantasy"]);
    }

    #[test]
    fn test_theme_round_trip_and_default() {
        let scratch = Scratch::new();
        let mut theme = BTreeMap::new();
        theme.insert("--tb-bg-color".to_string(), "#123456".to_string());

        assert!(write_theme(scratch.path(), "night.txt", &theme).is_err());
        write_theme(scratch.path(), "night.json", &theme).unwrap();
        assert_eq!(read_theme(scratch.path(), "night.json").unwrap(), theme);

        assert!(read_default_theme(scratch.path()).is_none());
        write_theme(scratch.path(), DEFAULT_THEME_FILE, &theme).unwrap();
        assert_eq!(read_default_theme(scratch.path()).unwrap(), theme);
    }

    #[test]
    fn test_corrupt_default_theme_is_absent() {
        let scratch = Scratch::new();
        write_file(scratch.path(), DEFAULT_THEME_FILE, ".json", "not json").unwrap();
        assert!(read_default_theme(scratch.path()).is_none());
    }
}
