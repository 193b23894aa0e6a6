//! End-to-end editing sessions driven through the public editor API.

use kurbo::{Point, Vec2};
use pagecraft_core::{
    Block, BlockId, Command, Container, Document, Editor, EditorConfig, Modifiers, SnapLines,
};

/// A(10,10) and B(50,10), both 30x20, in an 800x600 container.
fn side_by_side() -> (Editor, BlockId, BlockId) {
    let a = Block::new("text", 10.0, 10.0).with_size(30.0, 20.0);
    let b = Block::new("text", 50.0, 10.0).with_size(30.0, 20.0);
    let (a_id, b_id) = (a.id, b.id);
    let doc = Document::new(Container::new(800.0, 600.0))
        .with_block(a)
        .with_block(b);
    (Editor::new(doc), a_id, b_id)
}

fn left_of(editor: &Editor, id: BlockId) -> f64 {
    editor.document().block(id).map(|b| b.left).unwrap_or(f64::NAN)
}

/// Press on A at (15,15), move the pointer by `dx` and report the guides.
fn drag_a_by(editor: &mut Editor, dx: f64) -> SnapLines {
    editor.pointer_down(Point::new(15.0, 15.0), Modifiers::NONE);
    editor.pointer_move(Point::new(15.0 + dx, 15.0));
    editor.snap_lines()
}

#[test]
fn test_drag_snaps_to_sibling_then_undo_redo() {
    let (mut editor, a, _) = side_by_side();

    let lines = drag_a_by(&mut editor, 40.0);
    assert_eq!(lines.x, Some(50.0));
    assert_eq!(left_of(&editor, a), 50.0);
    editor.pointer_up(Point::new(55.0, 15.0));

    assert_eq!(editor.history().undo_names(), vec!["move"]);
    assert!(editor.undo());
    assert_eq!(left_of(&editor, a), 10.0);
    assert!(editor.redo());
    assert_eq!(left_of(&editor, a), 50.0);
}

#[test]
fn test_snap_inside_tolerance() {
    let (mut editor, a, _) = side_by_side();
    // Candidate left 47 is 3px from B's left edge.
    let lines = drag_a_by(&mut editor, 37.0);
    assert_eq!(lines.x, Some(50.0));
    assert_eq!(left_of(&editor, a), 50.0);
}

#[test]
fn test_no_snap_at_or_beyond_tolerance() {
    let (mut editor, a, _) = side_by_side();

    // Exactly 5px away does not snap.
    let lines = drag_a_by(&mut editor, 35.0);
    assert_eq!(lines.x, None);
    assert_eq!(left_of(&editor, a), 45.0);

    let lines = {
        editor.pointer_move(Point::new(49.0, 15.0));
        editor.snap_lines()
    };
    assert_eq!(lines.x, None);
    assert_eq!(left_of(&editor, a), 44.0);
}

#[test]
fn test_snap_disabled_by_config() {
    let a = Block::new("text", 10.0, 10.0).with_size(30.0, 20.0);
    let b = Block::new("text", 50.0, 10.0).with_size(30.0, 20.0);
    let a_id = a.id;
    let config = EditorConfig {
        snap_enabled: false,
        ..EditorConfig::default()
    };
    let mut editor = Editor::with_config(Document::default().with_block(a).with_block(b), config);

    let lines = drag_a_by(&mut editor, 37.0);
    assert_eq!(lines, SnapLines::none());
    assert_eq!(left_of(&editor, a_id), 47.0);
}

#[test]
fn test_zero_displacement_drag_records_nothing() {
    let (mut editor, _, _) = side_by_side();

    editor.pointer_down(Point::new(15.0, 15.0), Modifiers::NONE);
    editor.pointer_up(Point::new(15.0, 15.0));
    assert!(!editor.can_undo());

    // Wandering off and coming back is still no net move.
    editor.pointer_down(Point::new(15.0, 15.0), Modifiers::NONE);
    editor.pointer_move(Point::new(120.0, 200.0));
    editor.pointer_move(Point::new(15.0, 15.0));
    editor.pointer_up(Point::new(15.0, 15.0));
    assert!(!editor.can_undo());
}

#[test]
fn test_undo_is_inverse_of_each_command() {
    let (mut editor, a, b) = side_by_side();
    editor.select(a);
    let c = Block::new("image", 200.0, 200.0);

    let commands = vec![
        Command::Move { ids: vec![a, b], dx: 7.0, dy: -3.0 },
        Command::Delete { ids: vec![b] },
        Command::PlaceTop { ids: vec![a] },
        Command::PlaceBottom { ids: vec![b] },
        Command::UpdateBlock { id: a, block: Block::new("button", 1.0, 2.0) },
        Command::UpdateContainer { document: Document::default() },
        Command::Insert { block: c },
    ];

    for command in commands {
        let before = editor.document().clone();
        let name = command.name();
        assert!(editor.execute(command).unwrap(), "{name} should change the document");
        assert_ne!(editor.document(), &before);

        assert!(editor.undo());
        assert_eq!(editor.document(), &before, "undo of {name}");

        let after_redo = {
            assert!(editor.redo());
            editor.document().clone()
        };
        assert!(editor.undo());
        assert!(editor.redo());
        assert_eq!(editor.document(), &after_redo, "redo of {name}");
        assert!(editor.undo());
    }
}

#[test]
fn test_new_command_after_undo_clears_redo() {
    let (mut editor, a, _) = side_by_side();
    editor.move_blocks(vec![a], Vec2::new(5.0, 0.0)).unwrap();
    editor.move_blocks(vec![a], Vec2::new(5.0, 0.0)).unwrap();

    assert!(editor.undo());
    assert!(editor.can_redo());

    editor.move_blocks(vec![a], Vec2::new(0.0, 5.0)).unwrap();
    assert!(!editor.can_redo());
    assert!(!editor.redo());
    assert_eq!(editor.history().undo_names(), vec!["move", "move"]);
}

#[test]
fn test_stale_ids_record_nothing() {
    let (mut editor, _, _) = side_by_side();
    let ghost = uuid::Uuid::new_v4();

    assert!(!editor.move_blocks(vec![ghost], Vec2::new(5.0, 5.0)).unwrap());
    assert!(!editor.execute(Command::Delete { ids: vec![ghost] }).unwrap());
    assert!(!editor.execute(Command::PlaceTop { ids: vec![ghost] }).unwrap());
    assert!(!editor.can_undo());
}

#[test]
fn test_place_top_and_bottom_reach_the_extremes() {
    let mut a = Block::new("text", 0.0, 0.0);
    a.z_index = 5;
    let b = Block::new("text", 10.0, 0.0);
    let mut c = Block::new("text", 20.0, 0.0);
    c.z_index = 3;
    let (a_id, b_id, c_id) = (a.id, b.id, c.id);
    let mut editor = Editor::new(Document::default().with_block(a).with_block(b).with_block(c));

    editor.select(a_id);
    editor.toggle_selection(c_id);
    assert!(editor.place_top());

    let z = |editor: &Editor, id| editor.document().block(id).map(|b| b.z_index);
    // Relative order among the moved blocks is kept.
    assert_eq!(z(&editor, c_id), Some(6));
    assert_eq!(z(&editor, a_id), Some(7));
    assert_eq!(z(&editor, b_id), Some(1));

    editor.select(b_id);
    assert!(editor.place_top());
    assert_eq!(z(&editor, b_id), Some(8));

    editor.select(a_id);
    assert!(editor.place_bottom());
    assert_eq!(z(&editor, a_id), Some(5));
    let others = [b_id, c_id].map(|id| z(&editor, id).unwrap_or(i64::MIN));
    assert!(others.iter().all(|&other| other > 5));
}

#[test]
fn test_delete_then_single_undo_restores_focus() {
    let (mut editor, a, b) = side_by_side();
    editor.select(a);
    editor.toggle_selection(b);

    assert!(editor.delete());
    assert!(editor.document().is_empty());

    assert!(editor.undo());
    assert_eq!(editor.selected_ids(), vec![a, b]);
    assert_eq!(editor.history().redo_names(), vec!["delete"]);
}

#[test]
fn test_multi_drag_keeps_relative_offsets() {
    let (mut editor, a, b) = side_by_side();
    editor.pointer_down(Point::new(15.0, 15.0), Modifiers::NONE);
    editor.pointer_up(Point::new(15.0, 15.0));
    editor.pointer_down(Point::new(55.0, 15.0), Modifiers::shift());
    editor.pointer_move(Point::new(155.0, 115.0));
    editor.pointer_up(Point::new(155.0, 115.0));

    let offset = left_of(&editor, b) - left_of(&editor, a);
    assert_eq!(offset, 40.0);
    assert_eq!(editor.history().undo_names(), vec!["move"]);
}

#[test]
fn test_history_replays_to_exported_document() {
    let (mut editor, a, b) = side_by_side();
    let initial = editor.document().clone();

    drag_a_by(&mut editor, 100.0);
    editor.pointer_up(Point::new(115.0, 15.0));
    editor.select(b);
    editor.place_top();
    editor.delete();

    let replayed = editor.history().replay(&initial);
    assert_eq!(replayed.to_json().unwrap(), editor.export_json().unwrap());
    assert!(replayed.contains(a));
    assert!(!replayed.contains(b));
}

#[test]
fn test_history_limit_drops_oldest() {
    let a = Block::new("text", 0.0, 0.0);
    let a_id = a.id;
    let config = EditorConfig {
        history_limit: Some(2),
        ..EditorConfig::default()
    };
    let mut editor = Editor::with_config(Document::default().with_block(a), config);

    for _ in 0..3 {
        editor.move_blocks(vec![a_id], Vec2::new(10.0, 0.0)).unwrap();
    }
    assert!(editor.undo());
    assert!(editor.undo());
    assert!(!editor.undo());
    assert_eq!(left_of(&editor, a_id), 10.0);
}
