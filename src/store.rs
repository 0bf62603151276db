//! The persisted-state store.
//!
//! Owns the single source-of-truth [`Document`] and writes it back to a
//! host-provided value cell with rate limiting, so continuous gestures never
//! produce write storms. All timing is expressed as `f64` seconds (the UI
//! passes egui's input clock), which keeps the scheduling logic portable and
//! directly testable with a synthetic clock.

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::{
    DEBOUNCED_SAVE_DELAY, DEFAULT_BOX_HEIGHT, DEFAULT_BOX_WIDTH, FIT_VIEW_MAX_ZOOM,
    FIT_VIEW_PADDING, MIN_SAVE_INTERVAL, MIN_ZOOM,
};
use crate::registry;
use crate::theme::DEFAULT_THEME;
use crate::transform::snap_to_grid;
use crate::types::{BoxData, BoxKind, DisplayState, Document, SavedGeometry, SavedView};

/// The externally owned slot the serialized document is read from and
/// written to. In the host this is a node widget's value; standalone it is
/// backed by the application's persistence layer.
pub trait ValueCell {
    /// Reads the current serialized document, if any.
    fn get(&self) -> Option<String>;
    /// Replaces the serialized document.
    fn set(&mut self, value: String);
}

/// A [`ValueCell`] backed by process memory. Clones share the same slot, so
/// the application can keep a handle for bridging to its persistence layer
/// while the store owns another.
#[derive(Clone, Default)]
pub struct MemoryCell {
    value: Rc<RefCell<Option<String>>>,
}

impl MemoryCell {
    /// The current contents of the slot.
    pub fn value(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    /// Overwrites the slot from outside the store.
    pub fn replace(&self, value: Option<String>) {
        *self.value.borrow_mut() = value;
    }
}

impl ValueCell for MemoryCell {
    fn get(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    fn set(&mut self, value: String) {
        *self.value.borrow_mut() = Some(value);
    }
}

/// Owns the document and schedules write-backs to the value cell.
///
/// At most one write-back is ever scheduled: rate-limited saves and debounced
/// saves share the single pending slot, so whichever was requested last wins.
/// A commit always serializes the document as it is at commit time, never a
/// stale snapshot.
pub struct StateStore {
    /// The live document. Gesture handlers mutate this directly and then ask
    /// the store to save.
    pub doc: Document,
    cell: Box<dyn ValueCell>,
    last_known_value: Option<String>,
    last_commit_at: Option<f64>,
    pending_at: Option<f64>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(Box::new(MemoryCell::default()))
    }
}

impl StateStore {
    /// Creates a store over the given cell with the default document. Call
    /// [`StateStore::load`] to pick up whatever the cell already holds.
    pub fn new(cell: Box<dyn ValueCell>) -> Self {
        Self {
            doc: Document::default(),
            cell,
            last_known_value: None,
            last_commit_at: None,
            pending_at: None,
        }
    }

    /// Parses the cell contents into the document, falling back to the
    /// default document when the cell is empty or unparseable, then commits
    /// the normalized form straight back.
    pub fn load(&mut self, now: f64) {
        self.doc = match self.cell.get() {
            Some(raw) if !raw.trim().is_empty() => match Document::from_json(&raw) {
                Ok(doc) => doc,
                Err(e) => {
                    eprintln!("Failed to parse stored document, starting fresh: {}", e);
                    Document::default()
                }
            },
            _ => Document::default(),
        };
        self.pending_at = None;
        self.save(true, now);
    }

    /// Reloads if the cell was overwritten from outside the store. Returns
    /// whether a reload happened.
    pub fn poll_external(&mut self, now: f64) -> bool {
        if self.cell.get() != self.last_known_value {
            self.load(now);
            true
        } else {
            false
        }
    }

    /// Requests a write-back.
    ///
    /// Forced saves commit immediately and cancel anything scheduled. A
    /// non-forced save commits immediately when the minimum interval has
    /// elapsed since the last commit; otherwise one commit is scheduled at
    /// the end of the cooldown. If a write-back is already scheduled the
    /// request is satisfied by that one.
    pub fn save(&mut self, force: bool, now: f64) {
        if force {
            self.pending_at = None;
            self.commit(now);
            return;
        }
        if self.pending_at.is_some() {
            return;
        }
        match self.last_commit_at {
            Some(t) if now - t < MIN_SAVE_INTERVAL => {
                self.pending_at = Some(t + MIN_SAVE_INTERVAL);
            }
            _ => self.commit(now),
        }
    }

    /// Schedules a trailing-edge write-back, resetting any earlier schedule.
    /// Used by high-frequency continuous gestures where only the state after
    /// a pause matters.
    pub fn save_debounced(&mut self, now: f64) {
        self.pending_at = Some(now + DEBOUNCED_SAVE_DELAY);
    }

    /// Fires the scheduled write-back once its deadline has passed. Call once
    /// per frame.
    pub fn pump(&mut self, now: f64) {
        if let Some(deadline) = self.pending_at {
            if now >= deadline {
                self.pending_at = None;
                self.commit(now);
            }
        }
    }

    /// Whether a write-back is scheduled but has not fired yet.
    pub fn has_pending_save(&self) -> bool {
        self.pending_at.is_some()
    }

    fn commit(&mut self, now: f64) {
        self.last_commit_at = Some(now);
        match self.doc.to_json() {
            Ok(json) => {
                self.cell.set(json.clone());
                self.last_known_value = Some(json);
            }
            Err(e) => eprintln!("Failed to serialize document: {}", e),
        }
    }

    /// Rounds a value to the document's active grid. Identity when off.
    pub fn snap(&self, value: f32) -> f32 {
        snap_to_grid(value, self.doc.grid_size as f32)
    }

    /// Creates a box of the given kind at a world position, snapped to the
    /// grid, on top of the stack. Unknown kinds are ignored. Returns the new
    /// box id.
    pub fn create_box(
        &mut self,
        tag: &str,
        world_x: f32,
        world_y: f32,
        width: Option<f32>,
        height: Option<f32>,
        now: f64,
    ) -> Option<String> {
        let (title, kind) = registry::default_state(tag)?;
        let data = BoxData {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            x: self.snap(world_x),
            y: self.snap(world_y),
            width: self.snap(width.unwrap_or(DEFAULT_BOX_WIDTH)),
            height: self.snap(height.unwrap_or(DEFAULT_BOX_HEIGHT)),
            display_state: DisplayState::Normal,
            old: None,
            kind,
        };
        let id = data.id.clone();
        self.doc.boxes.push(data);
        self.save(true, now);
        Some(id)
    }

    /// Deletes a box, restoring the saved view first when it was maximized.
    pub fn delete_box(&mut self, id: &str, now: f64) {
        let maximized = self
            .doc
            .box_by_id(id)
            .is_some_and(|b| b.display_state == DisplayState::Maximized);
        if maximized {
            if let Some(view) = self.doc.saved_view.take() {
                self.doc.pan = view.pan;
                self.doc.zoom = view.zoom;
            }
        }
        self.doc.boxes.retain(|b| b.id != id);
        if self.doc.selected_box_id.as_deref() == Some(id) {
            self.doc.selected_box_id = None;
        }
        self.save(true, now);
    }

    /// Moves a box to the top of the z-order. Does not save; callers save at
    /// the end of their gesture.
    pub fn bring_to_front(&mut self, id: &str) {
        if let Some(index) = self.doc.boxes.iter().position(|b| b.id == id) {
            if index + 1 < self.doc.boxes.len() {
                let item = self.doc.boxes.remove(index);
                self.doc.boxes.push(item);
            }
        }
    }

    /// Toggles a box between maximized and its previous state. Maximizing
    /// snapshots the geometry (when normal) and the camera (when no snapshot
    /// exists yet); any other maximized box is restored first.
    pub fn toggle_maximized(&mut self, id: &str, now: f64) {
        self.bring_to_front(id);
        let state = match self.doc.box_by_id(id) {
            Some(b) => b.display_state,
            None => return,
        };
        if state == DisplayState::Maximized {
            self.unmaximize(id);
        } else {
            if let Some(other) = self.doc.maximized_box().map(|b| b.id.clone()) {
                self.unmaximize(&other);
            }
            let saved_view = self.doc.saved_view;
            let (pan, zoom) = (self.doc.pan, self.doc.zoom);
            if let Some(b) = self.doc.box_by_id_mut(id) {
                if b.display_state == DisplayState::Normal {
                    b.old = Some(SavedGeometry {
                        x: b.x,
                        y: b.y,
                        width: b.width,
                        height: b.height,
                    });
                }
                b.display_state = DisplayState::Maximized;
                if saved_view.is_none() {
                    self.doc.saved_view = Some(SavedView { pan, zoom });
                }
            }
        }
        self.save(false, now);
    }

    /// Toggles a box between minimized and normal. A maximized box is
    /// restored first, then minimized.
    pub fn toggle_minimized(&mut self, id: &str, now: f64) {
        self.bring_to_front(id);
        let state = match self.doc.box_by_id(id) {
            Some(b) => b.display_state,
            None => return,
        };
        match state {
            DisplayState::Minimized => {
                if let Some(b) = self.doc.box_by_id_mut(id) {
                    b.display_state = DisplayState::Normal;
                }
            }
            DisplayState::Maximized => {
                self.unmaximize(id);
                if let Some(b) = self.doc.box_by_id_mut(id) {
                    b.display_state = DisplayState::Minimized;
                }
            }
            DisplayState::Normal => {
                if let Some(b) = self.doc.box_by_id_mut(id) {
                    b.display_state = DisplayState::Minimized;
                }
            }
        }
        self.save(false, now);
    }

    /// Returns a maximized box to normal, restoring its stored geometry and
    /// the camera snapshot. No-op for boxes in other states.
    fn unmaximize(&mut self, id: &str) {
        let Some(b) = self.doc.box_by_id_mut(id) else {
            return;
        };
        if b.display_state != DisplayState::Maximized {
            return;
        }
        if let Some(old) = b.old.take() {
            b.x = old.x;
            b.y = old.y;
            b.width = old.width;
            b.height = old.height;
        }
        b.display_state = DisplayState::Normal;
        if let Some(view) = self.doc.saved_view.take() {
            self.doc.pan = view.pan;
            self.doc.zoom = view.zoom;
        }
    }

    /// Renames a box if the title actually changed.
    pub fn rename_box(&mut self, id: &str, title: &str, now: f64) {
        if let Some(b) = self.doc.box_by_id_mut(id) {
            if b.title != title {
                b.title = title.to_string();
                self.save(false, now);
            }
        }
    }

    /// Centers and zooms the camera so every normal box is visible with a
    /// margin. Empty or degenerate content leaves the camera untouched.
    pub fn fit_view(&mut self, view_w: f32, view_h: f32, now: f64) {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        let mut any = false;
        for b in &self.doc.boxes {
            if b.display_state != DisplayState::Normal {
                continue;
            }
            any = true;
            let (min_w, min_h) = b.min_size();
            let w = b.width.max(min_w);
            let h = b.height.max(min_h);
            min_x = min_x.min(b.x);
            min_y = min_y.min(b.y);
            max_x = max_x.max(b.x + w);
            max_y = max_y.max(b.y + h);
        }
        let content_w = max_x - min_x;
        let content_h = max_y - min_y;
        if !any || content_w <= 0.0 || content_h <= 0.0 {
            return;
        }

        let zoom = ((view_w - FIT_VIEW_PADDING * 2.0) / content_w)
            .min((view_h - FIT_VIEW_PADDING * 2.0) / content_h)
            .min(FIT_VIEW_MAX_ZOOM)
            .max(MIN_ZOOM);
        self.doc.zoom = zoom;
        self.doc.pan.x = -min_x * zoom + (view_w - content_w * zoom) / 2.0;
        self.doc.pan.y = -min_y * zoom + (view_h - content_h * zoom) / 2.0;
        self.save(false, now);
    }

    /// Advances the run counter and applies every controls variable's
    /// behavior once.
    pub fn bump_iterator(&mut self, now: f64) {
        self.doc.iterator += 1;
        for b in &mut self.doc.boxes {
            if let BoxKind::Controls { variables } = &mut b.kind {
                for var in variables {
                    var.apply_behavior();
                }
            }
        }
        self.save(true, now);
    }

    /// Resets the run counter to zero.
    pub fn reset_iterator(&mut self, now: f64) {
        self.doc.iterator = 0;
        self.save(false, now);
    }

    /// Changes the grid spacing.
    pub fn set_grid_size(&mut self, size: u32, now: f64) {
        self.doc.grid_size = size;
        self.save(false, now);
    }

    /// Toggles grid line drawing.
    pub fn toggle_show_grid(&mut self, now: f64) {
        self.doc.show_grid = !self.doc.show_grid;
        self.save(false, now);
    }

    /// Toggles the minimap overlay.
    pub fn toggle_minimap(&mut self, now: f64) {
        self.doc.show_minimap = !self.doc.show_minimap;
        self.save(false, now);
    }

    /// Toggles how the host's composer treats periods.
    pub fn toggle_period_is_break(&mut self, now: f64) {
        self.doc.period_is_break = !self.doc.period_is_break;
        self.save(false, now);
    }

    /// Sets one theme override.
    pub fn set_theme_value(&mut self, key: &str, value: String, now: f64) {
        self.doc.theme.insert(key.to_string(), value);
        self.save(false, now);
    }

    /// Removes one theme override, restoring that key's built-in default.
    pub fn clear_theme_value(&mut self, key: &str, now: f64) {
        if self.doc.theme.remove(key).is_some() {
            self.save(false, now);
        }
    }

    /// Replaces the whole theme map, e.g. from a loaded preset.
    pub fn set_theme_map(
        &mut self,
        theme: std::collections::BTreeMap<String, String>,
        now: f64,
    ) {
        self.doc.theme = theme;
        self.save(false, now);
    }

    /// Resets the theme to the full built-in default map.
    pub fn reset_theme(&mut self, now: f64) {
        self.doc.theme = DEFAULT_THEME
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.save(false, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Pan, Variable, VariableBehavior};
    use std::cell::Cell;

    /// A cell that logs every write so tests can count commits.
    #[derive(Clone, Default)]
    struct TestCell {
        value: Rc<RefCell<Option<String>>>,
        writes: Rc<Cell<usize>>,
    }

    impl ValueCell for TestCell {
        fn get(&self) -> Option<String> {
            self.value.borrow().clone()
        }

        fn set(&mut self, value: String) {
            *self.value.borrow_mut() = Some(value);
            self.writes.set(self.writes.get() + 1);
        }
    }

    fn store_with_cell() -> (StateStore, TestCell) {
        let cell = TestCell::default();
        let mut store = StateStore::new(Box::new(cell.clone()));
        store.load(0.0);
        (store, cell)
    }

    #[test]
    fn test_load_empty_cell_gives_default_and_commits() {
        let (store, cell) = store_with_cell();
        assert_eq!(store.doc.boxes.len(), 1);
        assert_eq!(cell.writes.get(), 1);
        let written = cell.get().unwrap();
        assert!(written.contains("default-output-box"));
    }

    #[test]
    fn test_load_corrupt_cell_resets_to_default() {
        let cell = TestCell::default();
        *cell.value.borrow_mut() = Some("{not json".to_string());
        let mut store = StateStore::new(Box::new(cell.clone()));
        store.load(0.0);
        assert_eq!(store.doc, Document::default());
        // The normalized default was written back.
        assert!(cell.get().unwrap().contains("default-output-box"));
    }

    #[test]
    fn test_load_merges_partial_document() {
        let cell = TestCell::default();
        *cell.value.borrow_mut() = Some("{\"zoom\": 3.0, \"showGrid\": false}".to_string());
        let mut store = StateStore::new(Box::new(cell.clone()));
        store.load(0.0);
        assert_eq!(store.doc.zoom, 3.0);
        assert!(!store.doc.show_grid);
        assert_eq!(store.doc.grid_size, 100);
    }

    #[test]
    fn test_rapid_saves_rate_limited_to_one_scheduled_commit() {
        let (mut store, cell) = store_with_cell();
        assert_eq!(cell.writes.get(), 1);

        // Within the cooldown of the load commit: nothing immediate.
        store.doc.zoom = 1.5;
        store.save(false, 0.1);
        store.doc.zoom = 2.0;
        store.save(false, 0.15);
        store.save(false, 0.2);
        assert_eq!(cell.writes.get(), 1);
        assert!(store.has_pending_save());

        // Deadline is load time + cooldown; the commit carries the latest doc.
        store.pump(0.24);
        assert_eq!(cell.writes.get(), 1);
        store.pump(0.25);
        assert_eq!(cell.writes.get(), 2);
        assert!(cell.get().unwrap().contains("\"zoom\": 2.0"));
        assert!(!store.has_pending_save());
    }

    #[test]
    fn test_save_after_cooldown_commits_immediately() {
        let (mut store, cell) = store_with_cell();
        store.doc.zoom = 1.2;
        store.save(false, 0.3);
        assert_eq!(cell.writes.get(), 2);
        assert!(!store.has_pending_save());
    }

    #[test]
    fn test_forced_save_bypasses_cooldown_and_clears_pending() {
        let (mut store, cell) = store_with_cell();
        store.save(false, 0.1);
        assert!(store.has_pending_save());

        store.doc.zoom = 4.0;
        store.save(true, 0.11);
        assert_eq!(cell.writes.get(), 2);
        assert!(!store.has_pending_save());

        // Nothing left to fire.
        store.pump(10.0);
        assert_eq!(cell.writes.get(), 2);
    }

    #[test]
    fn test_debounce_resets_on_each_call() {
        let (mut store, cell) = store_with_cell();
        store.save_debounced(1.0);
        store.save_debounced(1.3);
        store.save_debounced(1.6);

        store.pump(2.0);
        assert_eq!(cell.writes.get(), 1);
        store.pump(2.1);
        assert_eq!(cell.writes.get(), 2);
    }

    #[test]
    fn test_debounce_and_rate_limit_share_one_slot() {
        let (mut store, cell) = store_with_cell();
        store.save_debounced(1.0);
        // A plain save while the debounce is pending defers to it.
        store.save(false, 1.1);
        assert_eq!(cell.writes.get(), 1);
        store.pump(1.5);
        assert_eq!(cell.writes.get(), 2);
    }

    #[test]
    fn test_external_overwrite_triggers_reload() {
        let (mut store, cell) = store_with_cell();
        assert!(!store.poll_external(0.5));

        let mut other = Document::default();
        other.zoom = 2.5;
        *cell.value.borrow_mut() = Some(other.to_json().unwrap());
        assert!(store.poll_external(0.6));
        assert_eq!(store.doc.zoom, 2.5);
    }

    #[test]
    fn test_create_box_snaps_and_commits() {
        let (mut store, cell) = store_with_cell();
        let writes_before = cell.writes.get();

        let id = store
            .create_box("text", 149.0, 251.0, None, None, 1.0)
            .unwrap();
        let created = store.doc.box_by_id(&id).unwrap().clone();
        assert_eq!(created.x, 100.0);
        assert_eq!(created.y, 300.0);
        assert_eq!(created.width, 300.0);
        assert_eq!(created.height, 200.0);
        assert_eq!(created.title, "New Box");
        // New boxes land on top.
        assert_eq!(store.doc.boxes.last().map(|b| b.id.clone()), Some(id));
        assert_eq!(cell.writes.get(), writes_before + 1);
    }

    #[test]
    fn test_create_box_unknown_kind_is_ignored() {
        let (mut store, cell) = store_with_cell();
        let writes_before = cell.writes.get();
        assert!(store
            .create_box("hologram", 0.0, 0.0, None, None, 1.0)
            .is_none());
        assert_eq!(store.doc.boxes.len(), 1);
        assert_eq!(cell.writes.get(), writes_before);
    }

    #[test]
    fn test_create_box_grid_off_keeps_exact_position() {
        let (mut store, _cell) = store_with_cell();
        store.doc.grid_size = 0;
        let id = store
            .create_box("list", 123.4, 567.8, Some(250.0), Some(120.0), 1.0)
            .unwrap();
        let b = store.doc.box_by_id(&id).unwrap();
        assert_eq!(b.x, 123.4);
        assert_eq!(b.y, 567.8);
        assert_eq!(b.width, 250.0);
        assert_eq!(b.height, 120.0);
    }

    #[test]
    fn test_maximize_round_trip_restores_geometry_and_view() {
        let (mut store, _cell) = store_with_cell();
        store.doc.pan = Pan::new(40.0, -20.0);
        store.doc.zoom = 1.5;
        let id = store.doc.boxes[0].id.clone();

        store.toggle_maximized(&id, 1.0);
        {
            let b = store.doc.box_by_id(&id).unwrap();
            assert_eq!(b.display_state, DisplayState::Maximized);
            assert!(b.old.is_some());
        }
        assert_eq!(
            store.doc.saved_view,
            Some(SavedView {
                pan: Pan::new(40.0, -20.0),
                zoom: 1.5
            })
        );

        // Camera moves while maximized are discarded on restore.
        store.doc.pan = Pan::new(999.0, 999.0);
        store.toggle_maximized(&id, 2.0);
        let b = store.doc.box_by_id(&id).unwrap();
        assert_eq!(b.display_state, DisplayState::Normal);
        assert!(b.old.is_none());
        assert_eq!(b.x, 100.0);
        assert_eq!(b.width, 400.0);
        assert_eq!(store.doc.pan, Pan::new(40.0, -20.0));
        assert_eq!(store.doc.zoom, 1.5);
        assert!(store.doc.saved_view.is_none());
    }

    #[test]
    fn test_maximizing_second_box_restores_first() {
        let (mut store, _cell) = store_with_cell();
        let a = store.doc.boxes[0].id.clone();
        let b = store
            .create_box("text", 700.0, 700.0, None, None, 0.5)
            .unwrap();

        store.toggle_maximized(&a, 1.0);
        store.toggle_maximized(&b, 2.0);

        assert_eq!(
            store.doc.box_by_id(&a).unwrap().display_state,
            DisplayState::Normal
        );
        assert_eq!(
            store.doc.box_by_id(&b).unwrap().display_state,
            DisplayState::Maximized
        );
        assert!(store.doc.saved_view.is_some());
        assert_eq!(store.doc.maximized_box().map(|m| m.id.clone()), Some(b));
    }

    #[test]
    fn test_minimize_toggle_and_from_maximized() {
        let (mut store, _cell) = store_with_cell();
        let id = store.doc.boxes[0].id.clone();

        store.toggle_minimized(&id, 1.0);
        assert_eq!(
            store.doc.box_by_id(&id).unwrap().display_state,
            DisplayState::Minimized
        );
        store.toggle_minimized(&id, 2.0);
        assert_eq!(
            store.doc.box_by_id(&id).unwrap().display_state,
            DisplayState::Normal
        );

        store.doc.pan = Pan::new(10.0, 10.0);
        store.toggle_maximized(&id, 3.0);
        store.doc.pan = Pan::new(500.0, 500.0);
        store.toggle_minimized(&id, 4.0);
        let b = store.doc.box_by_id(&id).unwrap();
        assert_eq!(b.display_state, DisplayState::Minimized);
        assert!(b.old.is_none());
        assert!(store.doc.saved_view.is_none());
        assert_eq!(store.doc.pan, Pan::new(10.0, 10.0));
    }

    #[test]
    fn test_delete_while_maximized_restores_view() {
        let (mut store, _cell) = store_with_cell();
        store.doc.pan = Pan::new(-30.0, 60.0);
        store.doc.zoom = 0.8;
        let id = store.doc.boxes[0].id.clone();

        store.toggle_maximized(&id, 1.0);
        store.doc.pan = Pan::new(0.0, 0.0);
        store.doc.zoom = 1.0;
        store.delete_box(&id, 2.0);

        assert!(store.doc.boxes.is_empty());
        assert!(store.doc.saved_view.is_none());
        assert_eq!(store.doc.pan, Pan::new(-30.0, 60.0));
        assert_eq!(store.doc.zoom, 0.8);
    }

    #[test]
    fn test_delete_clears_selection() {
        let (mut store, _cell) = store_with_cell();
        let id = store.doc.boxes[0].id.clone();
        store.doc.selected_box_id = Some(id.clone());
        store.delete_box(&id, 1.0);
        assert!(store.doc.selected_box_id.is_none());
    }

    #[test]
    fn test_bring_to_front_reorders_without_saving() {
        let (mut store, cell) = store_with_cell();
        let a = store.doc.boxes[0].id.clone();
        let b = store
            .create_box("text", 700.0, 0.0, None, None, 0.5)
            .unwrap();
        let writes = cell.writes.get();

        store.bring_to_front(&a);
        assert_eq!(store.doc.boxes.last().map(|x| x.id.clone()), Some(a));
        assert_eq!(store.doc.boxes.first().map(|x| x.id.clone()), Some(b));
        assert_eq!(cell.writes.get(), writes);
    }

    #[test]
    fn test_bump_iterator_applies_behaviors() {
        let (mut store, _cell) = store_with_cell();
        let id = store
            .create_box("controls", 0.0, 0.0, None, None, 0.5)
            .unwrap();
        if let Some(b) = store.doc.box_by_id_mut(&id) {
            if let BoxKind::Controls { variables } = &mut b.kind {
                variables.push(Variable::new(1));
                let mut fixed = Variable::new(2);
                fixed.behavior = VariableBehavior::Fixed;
                fixed.value = 7.0;
                variables.push(fixed);
            }
        }

        store.bump_iterator(1.0);
        store.bump_iterator(2.0);

        assert_eq!(store.doc.iterator, 2);
        let b = store.doc.box_by_id(&id).unwrap();
        if let BoxKind::Controls { variables } = &b.kind {
            assert_eq!(variables[0].value, 2.0);
            assert_eq!(variables[1].value, 7.0);
        } else {
            panic!("expected controls box");
        }
    }

    #[test]
    fn test_fit_view_centers_content() {
        let (mut store, _cell) = store_with_cell();
        // One normal 400x300 box at (100, 100); its text minimum is smaller.
        store.fit_view(800.0, 600.0, 1.0);

        // Content 400x300 in an 800x600 view with 50px padding on each side:
        // zoom = min(700/400, 500/300, 1.5) = 1.5.
        assert_eq!(store.doc.zoom, 1.5);
        // Content is centered: pan = -minX*zoom + (view - content*zoom) / 2.
        assert_eq!(store.doc.pan.x, -100.0 * 1.5 + (800.0 - 400.0 * 1.5) / 2.0);
        assert_eq!(store.doc.pan.y, -100.0 * 1.5 + (600.0 - 300.0 * 1.5) / 2.0);
    }

    #[test]
    fn test_fit_view_without_normal_boxes_is_noop() {
        let (mut store, _cell) = store_with_cell();
        let id = store.doc.boxes[0].id.clone();
        store.toggle_minimized(&id, 0.5);
        let pan_before = store.doc.pan;
        let zoom_before = store.doc.zoom;

        store.fit_view(800.0, 600.0, 1.0);
        assert_eq!(store.doc.pan, pan_before);
        assert_eq!(store.doc.zoom, zoom_before);
    }

    #[test]
    fn test_fit_view_respects_type_minimums() {
        let (mut store, _cell) = store_with_cell();
        store.doc.boxes.clear();
        store.doc.grid_size = 0;
        let id = store
            .create_box("area", 0.0, 0.0, Some(100.0), Some(100.0), 0.5)
            .unwrap();
        // Area boxes are treated as at least 500x500 when fitting.
        store.fit_view(800.0, 600.0, 1.0);
        assert!(store.doc.box_by_id(&id).is_some());
        assert_eq!(store.doc.zoom, (600.0 - 100.0) / 500.0);
    }

    #[test]
    fn test_reset_theme_fills_all_defaults() {
        let (mut store, _cell) = store_with_cell();
        store.set_theme_value("--tb-bg-color", "#000".to_string(), 1.0);
        store.reset_theme(2.0);
        assert_eq!(store.doc.theme.len(), DEFAULT_THEME.len());
        assert_eq!(
            store.doc.theme.get("--tb-bg-color").map(String::as_str),
            Some("#222")
        );
    }
}
