//! PageCraft Core Library
//!
//! Editing engine for a drag-and-drop page layout editor: the document
//! model, selection, block dragging with snap guides, and undo/redo history.
//! Rendering is left to the host; this crate only consumes pointer and key
//! events in container coordinates and hands back documents.

pub mod command;
pub mod config;
pub mod document;
pub mod drag;
pub mod editor;
pub mod focus;
pub mod history;
pub mod input;
pub mod registry;
pub mod shortcuts;
pub mod snap;

pub use command::Command;
pub use config::EditorConfig;
pub use document::{Block, BlockId, Container, Document, DocumentError, DocumentResult};
pub use drag::{DragBegin, DragCommit, DragEngine, DragState};
pub use editor::{ChangeListener, Editor, EditorError, EditorMode, EditorResult};
pub use focus::FocusManager;
pub use history::{History, HistoryEntry};
pub use input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use registry::{ComponentDescriptor, ComponentRegistry};
pub use shortcuts::{EditorAction, Shortcut, ShortcutRegistry};
pub use snap::{Guide, GuideKind, SnapGuides, SnapLines, SnapResult, SNAP_TOLERANCE};
