mod support;

use note_canvas::config::{Color, ShapeKind};
use note_canvas::geometry::Point;
use note_canvas::surface::{Rgba, Surface};
use note_canvas::ToolKind;
use support::{engine_with_mocks, tracked_move, MemoryStore};

const RED: Rgba = Rgba::rgba(200, 30, 30, 255);

#[test]
fn buffered_moves_apply_only_the_latest_position() {
    let (mut engine, _dialogs, _sink) = engine_with_mocks(200, 100);
    engine.select_tool(ToolKind::Pen);

    engine.pointer_down(Point::new(10.0, 10.0));
    engine.pointer_moved(Point::new(20.0, 10.0));
    engine.pointer_moved(Point::new(60.0, 10.0));
    engine.frame();

    // The stroke reached the newest buffered position in a single frame.
    assert_eq!(engine.surface().pixel(60, 10), Rgba::BLACK);
    assert_eq!(engine.surface().pixel(35, 10), Rgba::BLACK);

    // The hover preview ring sits around it on the overlay.
    assert_eq!(engine.overlay().pixel(62, 10), Rgba::BLACK);
}

#[test]
fn release_discards_the_buffered_move() {
    let (mut engine, _dialogs, sink) = engine_with_mocks(200, 100);
    engine.select_tool(ToolKind::Pen);

    engine.pointer_down(Point::new(10.0, 10.0));
    engine.pointer_moved(Point::new(40.0, 10.0));
    engine.pointer_up(Point::new(10.0, 10.0));
    engine.frame();

    assert_eq!(engine.surface().pixel(25, 10), Rgba::TRANSPARENT);
    assert_eq!(engine.surface().pixel(40, 10), Rgba::TRANSPARENT);
    assert_eq!(engine.history().len(), 2);
    assert_eq!(sink.surface_saves(), 1);
}

#[test]
fn eraser_clears_along_the_tracked_path() {
    let (mut engine, _dialogs, sink) = engine_with_mocks(100, 50);
    engine.select_tool(ToolKind::Pen);
    engine.pointer_down(Point::new(10.0, 20.0));
    tracked_move(&mut engine, Point::new(50.0, 20.0));
    engine.pointer_up(Point::new(50.0, 20.0));

    engine.select_tool(ToolKind::Eraser);
    engine.pointer_down(Point::new(30.0, 20.0));
    assert_eq!(engine.surface().pixel(30, 20), Rgba::TRANSPARENT);
    assert_eq!(engine.surface().pixel(12, 20), Rgba::BLACK);
    assert_eq!(engine.surface().pixel(45, 20), Rgba::BLACK);

    tracked_move(&mut engine, Point::new(40.0, 20.0));
    assert_eq!(engine.surface().pixel(45, 20), Rgba::TRANSPARENT);

    // Eraser preview ring is drawn in black on the overlay.
    assert_eq!(engine.overlay().pixel(50, 20), Rgba::BLACK);

    engine.pointer_up(Point::new(40.0, 20.0));
    assert_eq!(engine.history().len(), 3);
    assert_eq!(sink.surface_saves(), 2);
}

#[test]
fn shape_commit_uses_the_release_position_and_always_pushes() {
    let (mut engine, _dialogs, sink) = engine_with_mocks(200, 150);
    engine.select_tool(ToolKind::Shape);

    engine.pointer_down(Point::new(10.0, 10.0));
    tracked_move(&mut engine, Point::new(100.0, 100.0));
    assert_eq!(engine.overlay().pixel(50, 50), Rgba::BLACK);

    engine.pointer_up(Point::new(40.0, 30.0));
    assert_eq!(engine.surface().pixel(39, 29), Rgba::BLACK);
    assert_eq!(engine.surface().pixel(45, 45), Rgba::TRANSPARENT);
    assert_eq!(engine.surface().pixel(99, 99), Rgba::TRANSPARENT);
    assert_eq!(engine.history().len(), 2);
    assert_eq!(sink.surface_saves(), 1);

    // A no-motion drag still commits an (unchanged) entry.
    engine.pointer_down(Point::new(60.0, 60.0));
    engine.pointer_up(Point::new(60.0, 60.0));
    assert_eq!(engine.surface().pixel(60, 60), Rgba::TRANSPARENT);
    assert_eq!(engine.history().len(), 3);
    assert_eq!(sink.surface_saves(), 2);
}

#[test]
fn shape_commit_drops_the_preview() {
    let (mut engine, _dialogs, _sink) = engine_with_mocks(100, 100);
    engine.select_tool(ToolKind::Shape);

    engine.pointer_down(Point::new(10.0, 10.0));
    tracked_move(&mut engine, Point::new(40.0, 40.0));
    assert!(!engine.overlay().is_blank());

    engine.pointer_up(Point::new(40.0, 40.0));
    assert!(engine.overlay().is_blank());
    assert_eq!(engine.surface().pixel(20, 20), Rgba::BLACK);
}

#[test]
fn shift_constrains_rectangle_spans_with_sign_kept() {
    let (mut engine, _dialogs, _sink) = engine_with_mocks(200, 100);
    engine.select_tool(ToolKind::Shape);
    engine.set_shift_held(true);

    engine.pointer_down(Point::new(10.0, 10.0));
    engine.pointer_up(Point::new(40.0, 20.0));
    assert_eq!(engine.surface().pixel(39, 39), Rgba::BLACK);
    assert_eq!(engine.surface().pixel(12, 35), Rgba::BLACK);
    assert_eq!(engine.surface().pixel(45, 12), Rgba::TRANSPARENT);

    // A leftward drag with a taller height flips to the right: the signed
    // larger span wins.
    engine.pointer_down(Point::new(100.0, 10.0));
    engine.pointer_up(Point::new(95.0, 40.0));
    assert_eq!(engine.surface().pixel(125, 35), Rgba::BLACK);
    assert_eq!(engine.surface().pixel(96, 35), Rgba::TRANSPARENT);
}

#[test]
fn circle_and_triangle_rasterize_from_the_anchor() {
    let (mut engine, _dialogs, _sink) = engine_with_mocks(300, 200);

    engine.set_shape_kind(ShapeKind::Circle);
    assert_eq!(engine.tool_kind(), Some(ToolKind::Shape));
    engine.pointer_down(Point::new(100.0, 100.0));
    engine.pointer_up(Point::new(130.0, 100.0));
    assert_eq!(engine.surface().pixel(100, 100), Rgba::BLACK);
    assert_eq!(engine.surface().pixel(75, 100), Rgba::BLACK);
    assert_eq!(engine.surface().pixel(135, 100), Rgba::TRANSPARENT);

    engine.set_shape_kind(ShapeKind::Triangle);
    engine.pointer_down(Point::new(200.0, 50.0));
    engine.pointer_up(Point::new(230.0, 110.0));
    // Apex at the anchor, base mirrored across its x at the release height.
    assert_eq!(engine.surface().pixel(200, 90), Rgba::BLACK);
    assert_eq!(engine.surface().pixel(200, 55), Rgba::BLACK);
    assert_eq!(engine.surface().pixel(240, 100), Rgba::TRANSPARENT);
}

#[test]
fn reselecting_the_tool_toggles_it_off() {
    let (mut engine, _dialogs, sink) = engine_with_mocks(100, 100);
    engine.select_tool(ToolKind::Pen);
    tracked_move(&mut engine, Point::new(50.0, 50.0));
    assert!(!engine.overlay().is_blank());

    engine.select_tool(ToolKind::Pen);
    assert_eq!(engine.tool_kind(), None);
    assert!(engine.overlay().is_blank());

    engine.pointer_down(Point::new(60.0, 60.0));
    assert!(engine.surface().is_blank());
    assert_eq!(engine.history().len(), 1);
    assert_eq!(sink.surface_saves(), 0);
}

#[test]
fn switching_tools_drops_the_stale_preview() {
    let (mut engine, _dialogs, _sink) = engine_with_mocks(100, 100);
    engine.select_tool(ToolKind::Pen);
    tracked_move(&mut engine, Point::new(50.0, 50.0));
    assert!(!engine.overlay().is_blank());

    engine.select_tool(ToolKind::Shape);
    assert!(engine.overlay().is_blank());
    assert_eq!(engine.tool_kind(), Some(ToolKind::Shape));
}

#[test]
fn text_tool_without_a_font_is_inert() {
    let (mut engine, dialogs, sink) = engine_with_mocks(100, 100);
    engine.select_tool(ToolKind::Text);

    engine.pointer_down(Point::new(50.0, 50.0));

    assert!(dialogs.prompts().is_empty());
    assert!(engine.surface().is_blank());
    assert_eq!(engine.history().len(), 1);
    assert_eq!(sink.surface_saves(), 0);
}

#[test]
fn image_tool_stamps_the_picked_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let stamp_path = dir.path().join("stamp.png");
    let stamp = Surface::new(4, 4, RED);
    std::fs::write(&stamp_path, stamp.encode_png().expect("encode stamp")).expect("write stamp");

    let (mut engine, dialogs, sink) = engine_with_mocks(100, 100);
    dialogs.answer_image_pick(Some(stamp_path));
    engine.select_tool(ToolKind::Image);

    engine.pointer_down(Point::new(10.0, 10.0));
    assert_eq!(engine.surface().pixel(10, 10), RED);
    assert_eq!(engine.surface().pixel(13, 13), RED);
    assert_eq!(engine.surface().pixel(14, 14), Rgba::TRANSPARENT);
    assert_eq!(engine.history().len(), 2);
    assert_eq!(sink.surface_saves(), 1);

    tracked_move(&mut engine, Point::new(30.0, 30.0));
    assert_eq!(engine.overlay().pixel(31, 31), RED);
    assert_eq!(engine.overlay().pixel(10, 10), Rgba::TRANSPARENT);
}

#[test]
fn image_tool_with_a_cancelled_pick_is_inert() {
    let (mut engine, dialogs, sink) = engine_with_mocks(100, 100);
    dialogs.answer_image_pick(None);
    engine.select_tool(ToolKind::Image);

    engine.pointer_down(Point::new(10.0, 10.0));
    tracked_move(&mut engine, Point::new(30.0, 30.0));

    assert!(engine.surface().is_blank());
    assert!(engine.overlay().is_blank());
    assert_eq!(engine.history().len(), 1);
    assert_eq!(sink.surface_saves(), 0);
}

#[test]
fn hydrate_restores_the_stored_png_as_baseline() {
    let green = Rgba::rgba(0, 160, 0, 255);
    let mut stored = Surface::new(50, 40, Rgba::TRANSPARENT);
    stored.set_pixel(5, 5, green);

    let store = MemoryStore::default();
    *store.stored.lock().unwrap() = Some(stored.encode_png().expect("encode stored canvas"));

    let (mut engine, _dialogs, sink) = engine_with_mocks(100, 80);
    let mut done_calls = 0;
    engine.hydrate(&store, || done_calls += 1);

    assert_eq!(done_calls, 1);
    assert_eq!(engine.surface().pixel(5, 5), green);
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.history().cursor(), 0);
    assert_eq!(sink.surface_saves(), 0);

    // The loaded state is the baseline, not an undoable step.
    engine.undo();
    assert_eq!(engine.surface().pixel(5, 5), green);
}

#[test]
fn hydrate_miss_failure_and_corrupt_payload_keep_blank_baseline() {
    for store in [
        MemoryStore::default(),
        MemoryStore {
            fail_fetch: true,
            ..Default::default()
        },
    ] {
        let (mut engine, _dialogs, _sink) = engine_with_mocks(60, 60);
        let mut done_calls = 0;
        engine.hydrate(&store, || done_calls += 1);

        assert_eq!(done_calls, 1);
        assert!(engine.surface().is_blank());
        assert_eq!(engine.history().len(), 1);

        // Drawing afterwards lands on the second entry, with undo back to
        // blank available.
        engine.select_tool(ToolKind::Pen);
        engine.pointer_down(Point::new(10.0, 10.0));
        engine.pointer_up(Point::new(10.0, 10.0));
        assert_eq!(engine.history().len(), 2);
        assert_eq!(engine.history().cursor(), 1);
    }

    let store = MemoryStore::default();
    *store.stored.lock().unwrap() = Some(b"not a png".to_vec());
    let (mut engine, _dialogs, _sink) = engine_with_mocks(60, 60);
    let mut done_calls = 0;
    engine.hydrate(&store, || done_calls += 1);
    assert_eq!(done_calls, 1);
    assert!(engine.surface().is_blank());
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn zoom_steps_are_multiplicative_and_unbounded() {
    let (mut engine, _dialogs, _sink) = engine_with_mocks(10, 10);

    engine.zoom_in();
    assert!((engine.zoom() - 1.1).abs() < 1e-6);
    engine.zoom_in();
    assert!((engine.zoom() - 1.21).abs() < 1e-6);
    engine.zoom_out();
    assert!((engine.zoom() - 1.089).abs() < 1e-6);
}

#[test]
fn pointer_leave_drops_preview_and_pending_move() {
    let (mut engine, _dialogs, _sink) = engine_with_mocks(100, 100);
    engine.select_tool(ToolKind::Pen);

    tracked_move(&mut engine, Point::new(50.0, 50.0));
    assert!(!engine.overlay().is_blank());

    engine.pointer_moved(Point::new(80.0, 80.0));
    engine.pointer_left();
    engine.frame();

    assert!(engine.overlay().is_blank());
}

#[test]
fn changing_shape_kind_resets_an_active_drag() {
    let (mut engine, _dialogs, sink) = engine_with_mocks(100, 100);
    engine.select_tool(ToolKind::Shape);

    engine.pointer_down(Point::new(10.0, 10.0));
    engine.set_shape_kind(ShapeKind::Circle);
    engine.pointer_up(Point::new(50.0, 50.0));

    assert!(engine.surface().is_blank());
    assert_eq!(engine.history().len(), 1);
    assert_eq!(sink.surface_saves(), 0);
}

#[test]
fn background_change_is_submitted_right_away() {
    let (mut engine, _dialogs, sink) = engine_with_mocks(10, 10);
    let teal = Color { r: 0, g: 128, b: 128 };

    engine.set_background_color(teal);

    assert_eq!(engine.config().background_color, teal);
    assert_eq!(sink.background_saves(), 1);
    assert_eq!(*sink.backgrounds.lock().unwrap(), vec![teal]);
    assert_eq!(sink.surface_saves(), 0);
}
