use super::*;
use super::gestures::HitTarget;
use super::state::Modal;
use crate::constants::TOOLBAR_HEIGHT;
use crate::transform::ViewTransform;
use crate::types::{BoxData, BoxKind, DisplayState, Pan};
use eframe::egui;

/// Runs a single headless egui frame with the provided input events and closure.
fn run_ui_with(events: Vec<egui::Event>, mut f: impl FnMut(&egui::Context)) -> egui::FullOutput {
    let ctx = egui::Context::default();
    run_frame(&ctx, events, egui::Modifiers::default(), &mut f)
}

/// Runs one frame on a shared context, so gesture state carries over between
/// frames the way it does for a real pointer.
fn run_frame(
    ctx: &egui::Context,
    events: Vec<egui::Event>,
    modifiers: egui::Modifiers,
    f: &mut impl FnMut(&egui::Context),
) -> egui::FullOutput {
    let mut raw = egui::RawInput::default();
    raw.screen_rect = Some(egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(1200.0, 800.0),
    ));
    raw.modifiers = modifiers;
    raw.events = events;
    ctx.run(raw, |ctx| {
        ctx.set_visuals(egui::Visuals::dark());
        f(ctx);
    })
}

/// Draws one canvas frame the way `update` does. With no toolbar panel and no
/// window frame, screen coordinates equal canvas coordinates, and with the
/// default camera they equal world coordinates too.
fn canvas_frame(ctx: &egui::Context, app: &mut PromptBoardApp, events: Vec<egui::Event>) {
    canvas_frame_with(ctx, app, events, egui::Modifiers::default());
}

fn canvas_frame_with(
    ctx: &egui::Context,
    app: &mut PromptBoardApp,
    events: Vec<egui::Event>,
    modifiers: egui::Modifiers,
) {
    let _ = run_frame(ctx, events, modifiers, &mut |ctx| {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                app.draw_canvas(ui);
            });
    });
}

fn moved_to(pos: egui::Pos2) -> Vec<egui::Event> {
    vec![egui::Event::PointerMoved(pos)]
}

fn pressed_at(pos: egui::Pos2, button: egui::PointerButton) -> Vec<egui::Event> {
    vec![
        egui::Event::PointerMoved(pos),
        egui::Event::PointerButton {
            pos,
            button,
            pressed: true,
            modifiers: egui::Modifiers::default(),
        },
    ]
}

fn released_at(pos: egui::Pos2, button: egui::PointerButton) -> Vec<egui::Event> {
    vec![egui::Event::PointerButton {
        pos,
        button,
        pressed: false,
        modifiers: egui::Modifiers::default(),
    }]
}

fn key_event(key: egui::Key, pressed: bool) -> egui::Event {
    egui::Event::Key {
        key,
        physical_key: Some(key),
        pressed,
        repeat: false,
        modifiers: egui::Modifiers::default(),
    }
}

/// Hover, press, release at one position, each on its own frame.
fn click(ctx: &egui::Context, app: &mut PromptBoardApp, at: egui::Pos2) {
    for events in [
        moved_to(at),
        pressed_at(at, egui::PointerButton::Primary),
        released_at(at, egui::PointerButton::Primary),
    ] {
        canvas_frame(ctx, app, events);
    }
}

fn test_box(id: &str, x: f32, y: f32, width: f32, height: f32) -> BoxData {
    BoxData {
        id: id.to_string(),
        title: id.to_string(),
        x,
        y,
        width,
        height,
        display_state: DisplayState::Normal,
        old: None,
        kind: BoxKind::Text {
            content: String::new(),
        },
    }
}

fn screen() -> egui::Rect {
    egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1200.0, 800.0))
}

fn chrome_of(app: &PromptBoardApp, id: &str) -> rendering::BoxChrome {
    let transform = ViewTransform::of(&app.store.doc);
    let data = app.store.doc.box_by_id(id).expect("box exists");
    rendering::box_chrome(data, &transform, screen())
}

fn state_of(app: &PromptBoardApp, id: &str) -> DisplayState {
    app.store.doc.box_by_id(id).expect("box exists").display_state
}

#[test]
fn canvas_paints_shapes() {
    let mut app = PromptBoardApp::default();
    // A kind with no registered editor renders a placeholder instead.
    app.store.doc.boxes.push(BoxData {
        kind: BoxKind::Unknown,
        ..test_box("mystery", 600.0, 450.0, 250.0, 150.0)
    });
    let out = run_ui_with(vec![], |ctx| {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| app.draw_canvas(ui));
    });
    assert!(!out.shapes.is_empty());
}

#[test]
fn toolbar_renders() {
    let mut app = PromptBoardApp::default();
    let out = run_ui_with(vec![], |ctx| {
        egui::TopBottomPanel::top("top_toolbar")
            .exact_height(TOOLBAR_HEIGHT)
            .show(ctx, |ui| app.draw_toolbar(ui));
    });
    assert!(!out.shapes.is_empty());
}

#[test]
fn middle_button_drag_pans_camera() {
    let mut app = PromptBoardApp::default();
    let ctx = egui::Context::default();
    for events in [
        moved_to(egui::pos2(600.0, 500.0)),
        pressed_at(egui::pos2(600.0, 500.0), egui::PointerButton::Middle),
        moved_to(egui::pos2(660.0, 545.0)),
        released_at(egui::pos2(660.0, 545.0), egui::PointerButton::Middle),
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    assert_eq!(app.store.doc.pan, Pan::new(60.0, 45.0));
    assert!(app.interaction.active_op.is_none());
    assert_eq!(app.store.doc.boxes.len(), 1);
}

#[test]
fn command_primary_drag_pans() {
    let mut app = PromptBoardApp::default();
    let held = egui::Modifiers {
        command: true,
        ..Default::default()
    };
    let ctx = egui::Context::default();
    for (events, modifiers) in [
        (moved_to(egui::pos2(600.0, 500.0)), held),
        (
            pressed_at(egui::pos2(600.0, 500.0), egui::PointerButton::Primary),
            held,
        ),
        (moved_to(egui::pos2(700.0, 560.0)), held),
        (
            released_at(egui::pos2(700.0, 560.0), egui::PointerButton::Primary),
            egui::Modifiers::default(),
        ),
    ] {
        canvas_frame_with(&ctx, &mut app, events, modifiers);
    }
    assert_eq!(app.store.doc.pan, Pan::new(100.0, 60.0));
    // A modified press over empty canvas pans instead of starting a marquee.
    assert_eq!(app.store.doc.boxes.len(), 1);
}

#[test]
fn space_primary_drag_pans() {
    let mut app = PromptBoardApp::default();
    let at = egui::pos2(600.0, 500.0);
    let ctx = egui::Context::default();
    for events in [
        vec![
            egui::Event::PointerMoved(at),
            key_event(egui::Key::Space, true),
        ],
        pressed_at(at, egui::PointerButton::Primary),
        moved_to(egui::pos2(640.0, 470.0)),
        vec![
            egui::Event::PointerButton {
                pos: egui::pos2(640.0, 470.0),
                button: egui::PointerButton::Primary,
                pressed: false,
                modifiers: egui::Modifiers::default(),
            },
            key_event(egui::Key::Space, false),
        ],
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    assert_eq!(app.store.doc.pan, Pan::new(40.0, -30.0));
    assert_eq!(app.store.doc.boxes.len(), 1);
}

#[test]
fn pan_ignored_while_a_box_is_maximized() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    app.store.toggle_maximized(&id, 0.0);

    // Middle drag starts on the maximized header strip, which routes to the
    // canvas rather than the content editor.
    let ctx = egui::Context::default();
    for events in [
        moved_to(egui::pos2(600.0, 13.0)),
        pressed_at(egui::pos2(600.0, 13.0), egui::PointerButton::Middle),
        moved_to(egui::pos2(700.0, 120.0)),
        released_at(egui::pos2(700.0, 120.0), egui::PointerButton::Middle),
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    assert_eq!(app.store.doc.pan, Pan::new(0.0, 0.0));
    assert!(app.interaction.active_op.is_none());

    // A primary press on the header selects but never starts a drag.
    for events in [
        pressed_at(egui::pos2(600.0, 13.0), egui::PointerButton::Primary),
        released_at(egui::pos2(600.0, 13.0), egui::PointerButton::Primary),
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    assert_eq!(app.store.doc.selected_box_id, Some(id.clone()));
    assert_eq!(state_of(&app, &id), DisplayState::Maximized);
}

#[test]
fn marquee_release_creates_box_of_last_selected_kind() {
    let mut app = PromptBoardApp::default();
    app.store.doc.grid_size = 10;
    let ctx = egui::Context::default();
    for events in [
        moved_to(egui::pos2(600.0, 500.0)),
        pressed_at(egui::pos2(600.0, 500.0), egui::PointerButton::Primary),
        moved_to(egui::pos2(750.0, 620.0)),
        released_at(egui::pos2(750.0, 620.0), egui::PointerButton::Primary),
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    assert_eq!(app.store.doc.boxes.len(), 2);
    let created = &app.store.doc.boxes[1];
    assert_eq!(created.kind.tag(), "text");
    assert_eq!((created.x, created.y), (600.0, 500.0));
    assert_eq!((created.width, created.height), (150.0, 120.0));
    // Marquee creation leaves the selection alone.
    assert_eq!(app.store.doc.selected_box_id, None);
}

#[test]
fn small_marquee_creates_nothing() {
    let mut app = PromptBoardApp::default();
    let ctx = egui::Context::default();
    // Tall enough but too narrow; one axis under the minimum is not enough.
    for events in [
        moved_to(egui::pos2(600.0, 500.0)),
        pressed_at(egui::pos2(600.0, 500.0), egui::PointerButton::Primary),
        moved_to(egui::pos2(615.0, 530.0)),
        released_at(egui::pos2(615.0, 530.0), egui::PointerButton::Primary),
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    assert_eq!(app.store.doc.boxes.len(), 1);
}

#[test]
fn press_selects_box_and_background_press_clears() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    let ctx = egui::Context::default();

    // The margin between the content editor and the frame belongs to the
    // canvas, so a press there routes to box selection.
    click(&ctx, &mut app, egui::pos2(300.0, 398.0));
    assert_eq!(app.store.doc.selected_box_id, Some(id));
    assert!(app.store.has_pending_save());

    click(&ctx, &mut app, egui::pos2(800.0, 600.0));
    assert_eq!(app.store.doc.selected_box_id, None);
    assert_eq!(app.store.doc.boxes.len(), 1);
}

#[test]
fn click_without_movement_leaves_box_in_place() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    let ctx = egui::Context::default();
    for events in [
        moved_to(egui::pos2(150.0, 110.0)),
        pressed_at(egui::pos2(150.0, 110.0), egui::PointerButton::Primary),
        moved_to(egui::pos2(151.0, 111.0)),
        released_at(egui::pos2(151.0, 111.0), egui::PointerButton::Primary),
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    let b = app.store.doc.box_by_id(&id).expect("box exists");
    assert_eq!((b.x, b.y), (100.0, 100.0));
    assert_eq!(app.store.doc.selected_box_id, Some(id));
}

#[test]
fn header_drag_moves_box_and_snaps_to_grid() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    let ctx = egui::Context::default();
    for events in [
        moved_to(egui::pos2(150.0, 110.0)),
        pressed_at(egui::pos2(150.0, 110.0), egui::PointerButton::Primary),
        moved_to(egui::pos2(375.0, 263.0)),
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    // While live the box tracks the pointer unsnapped.
    let b = app.store.doc.box_by_id(&id).expect("box exists");
    assert_eq!((b.x, b.y), (325.0, 253.0));

    canvas_frame(
        &ctx,
        &mut app,
        released_at(egui::pos2(375.0, 263.0), egui::PointerButton::Primary),
    );
    let b = app.store.doc.box_by_id(&id).expect("box exists");
    assert_eq!((b.x, b.y), (300.0, 300.0));
    assert!(app.interaction.active_op.is_none());
}

#[test]
fn drag_release_aligns_with_neighbor_edge() {
    let mut app = PromptBoardApp::default();
    app.store.doc.boxes = vec![
        test_box("a", 100.0, 100.0, 200.0, 100.0),
        test_box("b", 107.0, 300.0, 200.0, 100.0),
    ];
    let ctx = egui::Context::default();
    for events in [
        moved_to(egui::pos2(150.0, 110.0)),
        pressed_at(egui::pos2(150.0, 110.0), egui::PointerButton::Primary),
        moved_to(egui::pos2(153.0, 160.0)),
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    // Mid-drag the x axis is corrected to the neighbor's left edge while the
    // y axis stays raw.
    assert!(app.interaction.drag_alignment.x.is_some());
    assert!(app.interaction.drag_alignment.y.is_none());
    let a = app.store.doc.box_by_id("a").expect("box exists");
    assert_eq!((a.x, a.y), (107.0, 150.0));
    // Crossing the drag threshold raised the box to the top of the z-order.
    assert_eq!(
        app.store.doc.boxes.last().map(|b| b.id.as_str()),
        Some("a")
    );

    canvas_frame(
        &ctx,
        &mut app,
        released_at(egui::pos2(153.0, 160.0), egui::PointerButton::Primary),
    );
    // On release the aligned axis keeps the exact match and the free axis
    // falls back to the grid.
    let a = app.store.doc.box_by_id("a").expect("box exists");
    assert_eq!((a.x, a.y), (107.0, 200.0));
    assert!(app.interaction.drag_alignment.x.is_none());
    assert!(app.interaction.drag_alignment.y.is_none());
}

#[test]
fn resize_clamps_to_content_minimum() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    let ctx = egui::Context::default();
    for events in [
        moved_to(egui::pos2(493.0, 393.0)),
        pressed_at(egui::pos2(493.0, 393.0), egui::PointerButton::Primary),
        moved_to(egui::pos2(250.0, 200.0)),
        released_at(egui::pos2(250.0, 200.0), egui::PointerButton::Primary),
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    let b = app.store.doc.box_by_id(&id).expect("box exists");
    assert_eq!((b.width, b.height), (200.0, 100.0));
    // The top-left corner never moves during a resize.
    assert_eq!((b.x, b.y), (100.0, 100.0));
    assert_eq!(app.store.doc.selected_box_id, Some(id));
}

#[test]
fn resize_is_unsnapped_until_release() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    let ctx = egui::Context::default();
    for events in [
        moved_to(egui::pos2(493.0, 393.0)),
        pressed_at(egui::pos2(493.0, 393.0), egui::PointerButton::Primary),
        moved_to(egui::pos2(550.0, 407.0)),
    ] {
        canvas_frame(&ctx, &mut app, events);
    }
    let b = app.store.doc.box_by_id(&id).expect("box exists");
    assert_eq!((b.width, b.height), (457.0, 314.0));

    canvas_frame(
        &ctx,
        &mut app,
        released_at(egui::pos2(550.0, 407.0), egui::PointerButton::Primary),
    );
    let b = app.store.doc.box_by_id(&id).expect("box exists");
    assert_eq!((b.width, b.height), (500.0, 300.0));
}

#[test]
fn header_buttons_toggle_display_state() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    let ctx = egui::Context::default();

    let at = chrome_of(&app, &id).minimize.center();
    click(&ctx, &mut app, at);
    assert_eq!(state_of(&app, &id), DisplayState::Minimized);

    let at = chrome_of(&app, &id).minimize.center();
    click(&ctx, &mut app, at);
    assert_eq!(state_of(&app, &id), DisplayState::Normal);

    let at = chrome_of(&app, &id).maximize.center();
    click(&ctx, &mut app, at);
    assert_eq!(state_of(&app, &id), DisplayState::Maximized);
    assert!(app.store.doc.saved_view.is_some());
    assert_eq!(chrome_of(&app, &id).frame, screen());

    let at = chrome_of(&app, &id).maximize.center();
    click(&ctx, &mut app, at);
    assert_eq!(state_of(&app, &id), DisplayState::Normal);
    assert!(app.store.doc.saved_view.is_none());
}

#[test]
fn close_button_removes_box() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    let ctx = egui::Context::default();
    let at = chrome_of(&app, &id).close.center();
    click(&ctx, &mut app, at);
    assert!(app.store.doc.boxes.is_empty());
    assert!(app.editors.is_empty());
}

#[test]
fn hit_test_routes_chrome_and_prefers_topmost() {
    let mut app = PromptBoardApp::default();
    app.store.doc.boxes = vec![
        test_box("under", 100.0, 100.0, 300.0, 200.0),
        test_box("over", 250.0, 150.0, 300.0, 200.0),
    ];
    let transform = ViewTransform::of(&app.store.doc);
    let canvas = screen();
    let over = chrome_of(&app, "over");

    assert!(matches!(
        app.hit_test(over.close.center(), &transform, canvas),
        Some(HitTarget::Close(id)) if id == "over"
    ));
    assert!(matches!(
        app.hit_test(over.maximize.center(), &transform, canvas),
        Some(HitTarget::Maximize(_))
    ));
    assert!(matches!(
        app.hit_test(over.minimize.center(), &transform, canvas),
        Some(HitTarget::Minimize(_))
    ));
    assert!(matches!(
        app.hit_test(over.resize.expect("normal box").center(), &transform, canvas),
        Some(HitTarget::Resize(_))
    ));
    // Header strip, left of the buttons.
    assert!(matches!(
        app.hit_test(egui::pos2(270.0, 160.0), &transform, canvas),
        Some(HitTarget::Header(id)) if id == "over"
    ));
    // The overlap region belongs to the box drawn on top.
    assert!(matches!(
        app.hit_test(egui::pos2(300.0, 250.0), &transform, canvas),
        Some(HitTarget::Body(id)) if id == "over"
    ));
    assert!(matches!(
        app.hit_test(egui::pos2(150.0, 250.0), &transform, canvas),
        Some(HitTarget::Body(id)) if id == "under"
    ));
    assert!(app
        .hit_test(egui::pos2(900.0, 700.0), &transform, canvas)
        .is_none());
}

#[test]
fn delete_key_removes_selected_box() {
    for key in [egui::Key::Delete, egui::Key::Backspace] {
        let mut app = PromptBoardApp::default();
        let id = app.store.doc.boxes[0].id.clone();
        app.store.doc.selected_box_id = Some(id);
        let _ = run_ui_with(vec![key_event(key, true)], |ctx| app.handle_keyboard(ctx));
        assert!(app.store.doc.boxes.is_empty());
        assert_eq!(app.store.doc.selected_box_id, None);
    }
}

#[test]
fn delete_key_without_selection_is_ignored() {
    let mut app = PromptBoardApp::default();
    let _ = run_ui_with(vec![key_event(egui::Key::Delete, true)], |ctx| {
        app.handle_keyboard(ctx)
    });
    assert_eq!(app.store.doc.boxes.len(), 1);
}

#[test]
fn delete_key_ignored_while_editing_text() {
    let mut app = PromptBoardApp::default();
    app.store.doc.selected_box_id = Some(app.store.doc.boxes[0].id.clone());
    let ctx = egui::Context::default();
    let mut text = String::new();

    run_frame(&ctx, vec![], egui::Modifiers::default(), &mut |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.text_edit_singleline(&mut text).request_focus();
        });
    });
    run_frame(
        &ctx,
        vec![key_event(egui::Key::Delete, true)],
        egui::Modifiers::default(),
        &mut |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.text_edit_singleline(&mut text);
            });
            app.handle_keyboard(ctx);
        },
    );
    assert_eq!(app.store.doc.boxes.len(), 1);
}

#[test]
fn f2_starts_rename_of_selected_box() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    app.store.doc.selected_box_id = Some(id.clone());
    let _ = run_ui_with(vec![key_event(egui::Key::F2, true)], |ctx| {
        app.handle_keyboard(ctx)
    });
    assert_eq!(app.interaction.renaming_box, Some(id));
    assert_eq!(app.interaction.rename_buffer, "output");
    assert!(app.interaction.rename_focus_requested);
}

#[test]
fn rename_commits_on_enter() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    app.begin_rename(&id);
    let ctx = egui::Context::default();

    // First frame focuses the title editor; then the user replaces the text
    // and hits Enter.
    canvas_frame(&ctx, &mut app, vec![]);
    app.interaction.rename_buffer = "cover art".to_string();
    canvas_frame(&ctx, &mut app, vec![key_event(egui::Key::Enter, true)]);

    assert_eq!(app.interaction.renaming_box, None);
    assert_eq!(app.store.doc.boxes[0].title, "cover art");
}

#[test]
fn double_click_background_opens_creation_menu() {
    let mut app = PromptBoardApp::default();
    let at = egui::pos2(700.0, 300.0);
    let ctx = egui::Context::default();
    // Explicit times keep the two clicks inside the double-click window.
    let frames: [(f64, Vec<egui::Event>); 5] = [
        (0.00, moved_to(at)),
        (0.05, pressed_at(at, egui::PointerButton::Primary)),
        (0.10, released_at(at, egui::PointerButton::Primary)),
        (0.15, pressed_at(at, egui::PointerButton::Primary)),
        (0.20, released_at(at, egui::PointerButton::Primary)),
    ];
    for (time, events) in frames {
        let mut raw = egui::RawInput::default();
        raw.screen_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(1200.0, 800.0),
        ));
        raw.time = Some(time);
        raw.events = events;
        ctx.run(raw, |ctx| {
            ctx.set_visuals(egui::Visuals::dark());
            egui::CentralPanel::default()
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| app.draw_canvas(ui));
        });
    }
    assert!(app.creation_menu.show);
    assert_eq!(app.creation_menu.world_pos, at);
    // The two zero-size marquees created nothing.
    assert_eq!(app.store.doc.boxes.len(), 1);
}

#[test]
fn press_dismisses_creation_menu_without_marquee() {
    let mut app = PromptBoardApp::default();
    app.creation_menu.show = true;
    app.creation_menu.just_opened = false;
    let ctx = egui::Context::default();
    click(&ctx, &mut app, egui::pos2(800.0, 600.0));
    assert!(!app.creation_menu.show);
    assert!(app.interaction.active_op.is_none());
    assert_eq!(app.store.doc.boxes.len(), 1);
}

#[test]
fn minimap_click_recenters_camera() {
    let mut app = PromptBoardApp::default();
    app.store.doc.show_minimap = true;
    let ctx = egui::Context::default();
    // The minimap centers the content bounds in its panel, so clicking the
    // panel center recenters the camera on the box.
    let at = rendering::minimap_rect(screen()).center();
    click(&ctx, &mut app, at);
    let pan = app.store.doc.pan;
    assert!(
        (pan.x - 300.0).abs() < 0.1 && (pan.y - 150.0).abs() < 0.1,
        "pan = {:?}",
        pan
    );
    assert!(app.interaction.active_op.is_none());
}

#[test]
fn toolbar_add_button_creates_box_at_view_center() {
    let mut app = PromptBoardApp::default();
    let _ = run_ui_with(vec![], |ctx| app.add_box_at_view_center(ctx, "controls"));
    assert_eq!(app.store.doc.boxes.len(), 2);
    let b = &app.store.doc.boxes[1];
    assert_eq!(b.kind.tag(), "controls");
    // Centered under the toolbar, then snapped to the default grid.
    assert_eq!((b.x, b.y), (500.0, 300.0));
    assert_eq!((b.width, b.height), (300.0, 200.0));
    assert_eq!(app.store.doc.last_selected_box_type, "controls");
}

#[test]
fn snippet_save_without_target_shows_error() {
    let mut app = PromptBoardApp::default();
    app.begin_snippet_save();
    assert!(matches!(app.files.modal, Some(Modal::Error { .. })));
}

#[test]
fn snippet_save_targets_last_active_text_box() {
    let mut app = PromptBoardApp::default();
    let id = app.store.doc.boxes[0].id.clone();
    app.interaction.last_active_text_box = Some(id.clone());
    app.begin_snippet_save();
    match &app.files.modal {
        Some(Modal::SaveSnippet {
            target_box,
            wildcard,
            ..
        }) => {
            assert_eq!(target_box, &id);
            assert!(!wildcard);
        }
        _ => panic!("expected a save prompt"),
    }

    // List content saves into the wildcard store instead.
    app.files.modal = None;
    app.store.doc.boxes[0].kind = BoxKind::List {
        content: "red\nblue".to_string(),
        command_links: Default::default(),
    };
    app.begin_snippet_save();
    match &app.files.modal {
        Some(Modal::SaveSnippet { wildcard, .. }) => assert!(*wildcard),
        _ => panic!("expected a save prompt"),
    }
}
