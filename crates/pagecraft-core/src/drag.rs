//! Block drag gestures.
//!
//! A drag is two-phase: while the pointer moves, the live document is
//! updated in place for feedback and the gesture is marked dirty; when the
//! gesture ends, the whole displacement becomes a single [`Command::Move`]
//! for the history, paired with the snapshot taken when the drag began.

use crate::command::Command;
use crate::config::EditorConfig;
use crate::document::{BlockId, Document};
use crate::history::HistoryEntry;
use crate::snap::{SnapGuides, SnapLines};
use kurbo::{Point, Size, Vec2};
use std::sync::Arc;

/// State of an in-progress drag of one or more blocks.
#[derive(Debug, Clone)]
pub struct DragState {
    /// Pointer position when the drag began.
    pub start_point: Point,
    /// Latest pointer position.
    pub current_point: Point,
    /// Block that snapping is computed for.
    pub primary: BlockId,
    /// Dragged blocks with their top-left corner at drag start.
    pub origins: Vec<(BlockId, Point)>,
    /// Document snapshot from before the gesture.
    before: Arc<Document>,
    guides: SnapGuides,
    /// Displacement currently applied to the live document.
    applied: Vec2,
    /// Whether the live document has been touched by this gesture.
    dirty: bool,
}

impl DragState {
    /// Raw pointer displacement.
    pub fn pointer_delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Displacement applied to the blocks after snapping and clamping.
    pub fn delta(&self) -> Vec2 {
        self.applied
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The block ids being moved.
    pub fn block_ids(&self) -> Vec<BlockId> {
        self.origins.iter().map(|(id, _)| *id).collect()
    }

    fn primary_origin(&self) -> Point {
        self.origins
            .iter()
            .find(|(id, _)| *id == self.primary)
            .map(|(_, origin)| *origin)
            .unwrap_or(Point::ZERO)
    }
}

/// A finished gesture ready to be recorded in history.
#[derive(Debug, Clone)]
pub struct DragCommit {
    pub command: Command,
    pub before: Arc<Document>,
}

impl DragCommit {
    /// Pair with the live document the gesture left behind.
    pub fn into_entry(self, after: Arc<Document>) -> HistoryEntry {
        HistoryEntry {
            command: self.command,
            before: self.before,
            after,
        }
    }
}

/// Outcome of [`DragEngine::begin_drag`].
#[derive(Debug, Clone, Default)]
pub struct DragBegin {
    /// Whether a new gesture started.
    pub started: bool,
    /// The gesture that was still active and got ended implicitly.
    pub previous: Option<DragCommit>,
}

/// Drives block drags and the snap guides shown while dragging.
#[derive(Debug, Clone, Default)]
pub struct DragEngine {
    state: Option<DragState>,
    snap_lines: SnapLines,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    /// Guides to draw for the current move tick.
    pub fn snap_lines(&self) -> SnapLines {
        self.snap_lines
    }

    /// Start dragging the focused blocks from `point`.
    ///
    /// Nothing starts when no block is focused or the editor is in a
    /// read-only mode. A gesture still in progress is ended first and
    /// handed back for committing.
    pub fn begin_drag(
        &mut self,
        point: Point,
        doc: &Arc<Document>,
        primary: Option<BlockId>,
        read_only: bool,
        config: &EditorConfig,
    ) -> DragBegin {
        let previous = self.end_drag();
        if read_only {
            return DragBegin { started: false, previous };
        }

        let origins: Vec<(BlockId, Point)> = doc
            .blocks
            .iter()
            .filter(|b| b.focus)
            .map(|b| (b.id, b.position()))
            .collect();
        let Some(&(first, _)) = origins.first() else {
            return DragBegin { started: false, previous };
        };
        let primary = primary
            .filter(|id| origins.iter().any(|(o, _)| o == id))
            .unwrap_or(first);

        let guides = if config.snap_enabled {
            let size = doc
                .block(primary)
                .map(|b| Size::new(b.width, b.height))
                .unwrap_or(Size::ZERO);
            let siblings = doc.blocks.iter().filter(|b| !b.focus).map(|b| b.bounds());
            let container = config.snap_to_container.then(|| doc.container.bounds());
            SnapGuides::collect(size, siblings.chain(container))
        } else {
            SnapGuides::default()
        };

        log::debug!("drag start: {} block(s) at {:?}", origins.len(), point);
        self.state = Some(DragState {
            start_point: point,
            current_point: point,
            primary,
            origins,
            before: Arc::clone(doc),
            guides,
            applied: Vec2::ZERO,
            dirty: false,
        });
        DragBegin { started: true, previous }
    }

    /// Follow the pointer: move every dragged block by the (snapped)
    /// displacement in the live document and return the guides to draw.
    pub fn on_drag_move(
        &mut self,
        point: Point,
        doc: &mut Arc<Document>,
        config: &EditorConfig,
    ) -> SnapLines {
        let Some(state) = self.state.as_mut() else {
            return SnapLines::none();
        };
        state.current_point = point;

        let origin = state.primary_origin();
        let snapped = state
            .guides
            .snap(origin + state.pointer_delta(), config.snap_tolerance);
        let mut delta = snapped.point - origin;
        let mut lines = snapped.lines;

        // No dragged block may leave the positive quadrant.
        let min_left = state.origins.iter().map(|(_, p)| p.x).fold(f64::INFINITY, f64::min);
        let min_top = state.origins.iter().map(|(_, p)| p.y).fold(f64::INFINITY, f64::min);
        if delta.x < -min_left {
            delta.x = -min_left;
            lines.x = None;
        }
        if delta.y < -min_top {
            delta.y = -min_top;
            lines.y = None;
        }

        let live = Arc::make_mut(doc);
        for (id, origin) in &state.origins {
            if let Some(block) = live.block_mut(*id) {
                block.left = origin.x + delta.x;
                block.top = origin.y + delta.y;
            }
        }
        state.applied = delta;
        state.dirty = true;

        self.snap_lines = lines;
        lines
    }

    /// Finish the gesture. Returns the move to record, or `None` if there
    /// was no gesture or its net displacement is zero.
    pub fn end_drag(&mut self) -> Option<DragCommit> {
        self.snap_lines = SnapLines::none();
        let state = self.state.take()?;
        if !state.dirty || state.applied == Vec2::ZERO {
            log::debug!("drag end: no displacement");
            return None;
        }

        log::debug!("drag end: moved by {:?}", state.applied);
        Some(DragCommit {
            command: Command::Move {
                ids: state.block_ids(),
                dx: state.applied.x,
                dy: state.applied.y,
            },
            before: state.before,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Block;

    fn setup(first_focused: bool) -> (Arc<Document>, BlockId, BlockId) {
        let mut a = Block::new("text", 10.0, 10.0).with_size(30.0, 20.0);
        let b = Block::new("text", 50.0, 100.0).with_size(30.0, 20.0);
        a.focus = first_focused;
        let (a_id, b_id) = (a.id, b.id);
        let doc = Document::default().with_block(a).with_block(b);
        (Arc::new(doc), a_id, b_id)
    }

    fn no_container() -> EditorConfig {
        EditorConfig {
            snap_to_container: false,
            ..EditorConfig::default()
        }
    }

    #[test]
    fn test_begin_without_focus_is_noop() {
        let (doc, _, _) = setup(false);
        let mut engine = DragEngine::new();
        let begin = engine.begin_drag(Point::ZERO, &doc, None, false, &EditorConfig::default());
        assert!(!begin.started);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_begin_in_read_only_is_noop() {
        let (doc, a, _) = setup(true);
        let mut engine = DragEngine::new();
        let begin = engine.begin_drag(Point::ZERO, &doc, Some(a), true, &EditorConfig::default());
        assert!(!begin.started);
        assert!(!engine.is_dragging());
    }

    #[test]
    fn test_move_updates_live_document_without_commit() {
        let (mut doc, a, _) = setup(true);
        let before = Arc::clone(&doc);
        let mut engine = DragEngine::new();
        let config = no_container();

        engine.begin_drag(Point::new(15.0, 15.0), &doc, Some(a), false, &config);
        let lines = engine.on_drag_move(Point::new(115.0, 215.0), &mut doc, &config);

        assert_eq!(lines, SnapLines::none());
        assert_eq!(doc.block(a).unwrap().position(), Point::new(110.0, 210.0));
        // Snapshot from drag start is untouched.
        assert_eq!(before.block(a).unwrap().position(), Point::new(10.0, 10.0));
        assert!(engine.state().unwrap().is_dirty());
    }

    #[test]
    fn test_snap_onto_sibling_left_edge() {
        let (mut doc, a, _) = setup(true);
        let mut engine = DragEngine::new();
        let config = no_container();

        engine.begin_drag(Point::new(10.0, 10.0), &doc, Some(a), false, &config);
        let lines = engine.on_drag_move(Point::new(48.0, 10.0), &mut doc, &config);

        assert_eq!(doc.block(a).unwrap().left, 50.0);
        assert_eq!(lines.x, Some(50.0));
        assert_eq!(lines.y, None);
        assert_eq!(engine.snap_lines(), lines);

        let commit = engine.end_drag().unwrap();
        assert_eq!(
            commit.command,
            Command::Move { ids: vec![a], dx: 40.0, dy: 0.0 }
        );
        assert_eq!(engine.snap_lines(), SnapLines::none());
    }

    #[test]
    fn test_snap_to_container_edge() {
        let (mut doc, a, _) = setup(true);
        let mut engine = DragEngine::new();
        let config = EditorConfig::default();

        engine.begin_drag(Point::new(10.0, 10.0), &doc, Some(a), false, &config);
        // Right edge lands 2px short of the 800px container edge.
        let lines = engine.on_drag_move(Point::new(768.0, 300.0), &mut doc, &config);
        assert_eq!(doc.block(a).unwrap().left, 770.0);
        assert_eq!(lines.x, Some(800.0));
    }

    #[test]
    fn test_zero_displacement_commits_nothing() {
        let (mut doc, a, _) = setup(true);
        let mut engine = DragEngine::new();
        let config = EditorConfig::default();

        engine.begin_drag(Point::new(20.0, 20.0), &doc, Some(a), false, &config);
        assert!(engine.end_drag().is_none());

        engine.begin_drag(Point::new(20.0, 20.0), &doc, Some(a), false, &config);
        engine.on_drag_move(Point::new(90.0, 20.0), &mut doc, &config);
        engine.on_drag_move(Point::new(20.0, 20.0), &mut doc, &config);
        assert!(engine.end_drag().is_none());
        assert_eq!(doc.block(a).unwrap().position(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_multi_drag_preserves_offsets() {
        let (doc, a, b) = setup(true);
        let mut doc = Arc::new({
            let mut d = doc.as_ref().clone();
            d.block_mut(b).unwrap().focus = true;
            d
        });
        let mut engine = DragEngine::new();
        let config = EditorConfig {
            snap_enabled: false,
            ..EditorConfig::default()
        };

        engine.begin_drag(Point::ZERO, &doc, Some(b), false, &config);
        engine.on_drag_move(Point::new(7.0, 3.0), &mut doc, &config);

        assert_eq!(doc.block(a).unwrap().position(), Point::new(17.0, 13.0));
        assert_eq!(doc.block(b).unwrap().position(), Point::new(57.0, 103.0));
        let commit = engine.end_drag().unwrap();
        assert_eq!(commit.command, Command::Move { ids: vec![a, b], dx: 7.0, dy: 3.0 });
    }

    #[test]
    fn test_drag_clamped_at_origin() {
        let (mut doc, a, _) = setup(true);
        let mut engine = DragEngine::new();
        let config = no_container();

        engine.begin_drag(Point::new(100.0, 100.0), &doc, Some(a), false, &config);
        engine.on_drag_move(Point::new(40.0, 60.0), &mut doc, &config);
        assert_eq!(doc.block(a).unwrap().position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_begin_while_dragging_ends_previous() {
        let (mut doc, a, _) = setup(true);
        let mut engine = DragEngine::new();
        let config = no_container();

        engine.begin_drag(Point::ZERO, &doc, Some(a), false, &config);
        engine.on_drag_move(Point::new(200.0, 200.0), &mut doc, &config);

        let begin = engine.begin_drag(Point::ZERO, &doc, Some(a), false, &config);
        assert!(begin.started);
        let previous = begin.previous.unwrap();
        assert_eq!(previous.command.name(), "move");
        assert_eq!(previous.before.block(a).unwrap().left, 10.0);
    }
}
