pub mod drawing;
pub mod editing;
pub mod editor;
pub mod mode;
pub mod models;

// Re-export key types for easier usage
pub use drawing::{CanvasChange, FrameScheduler, PointerEvent, PointerId, StrokeEngine};
pub use editing::{BlockDocument, Cmd, Key, KeyOutcome, Patch, format_snapshot};
pub use editor::{Editor, EditorObserver};
pub use mode::{DrawTool, EditorMode, ModeController};
