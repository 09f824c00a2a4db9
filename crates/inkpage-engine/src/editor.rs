//! The editor surface: both engines behind one mode switch

use crate::drawing::{
    CanvasChange, DrawContext, FrameScheduler, PointerEvent, StrokeEngine, StrokeView,
};
use crate::editing::{BlockDocument, Cmd, EmbedKind, FormatKind, FormatState, Key, KeyOutcome, Patch};
use crate::mode::{DrawTool, EditorMode, ModeController};
use crate::models::{BlockId, StrokeTool, Timestamp, ToolPalette, ToolSettings};

/// Callbacks for the chrome around the editor. Every method defaults to a
/// no-op so hosts implement only what they render.
pub trait EditorObserver {
    /// Focus moved or the focused block's formatting changed
    fn on_selection_change(&mut self, _format: FormatState) {}

    /// The canvas grew while drawing
    fn on_expand(&mut self, _new_height: f64) {}

    /// An erase gesture finished; `content_max_y` is the lowest remaining ink
    fn on_check_resize(&mut self, _content_max_y: f64) {}

    /// The canvas shrank after erasing
    fn on_canvas_resize(&mut self, _height: f64) {}
}

impl EditorObserver for () {}

/// Owns the block document, the ink engine and the mode switch, and routes
/// input to whichever engine is live.
pub struct Editor<O: EditorObserver = (), S: FrameScheduler = ()> {
    modes: ModeController,
    document: BlockDocument,
    strokes: StrokeEngine,
    observer: O,
    scheduler: S,
    viewport_height: f64,
    last_selection: (Option<BlockId>, FormatState),
}

impl Editor {
    /// Editor with no observer that expects `on_frame` to be polled
    pub fn headless(palette: ToolPalette, viewport_height: f64) -> Self {
        Self::new(palette, viewport_height, (), ())
    }
}

impl<O: EditorObserver, S: FrameScheduler> Editor<O, S> {
    pub fn new(palette: ToolPalette, viewport_height: f64, observer: O, scheduler: S) -> Self {
        let document = BlockDocument::new();
        let last_selection = (
            document.focus().map(|caret| caret.block_id),
            document.current_format_state(),
        );
        Self {
            modes: ModeController::new(palette),
            document,
            strokes: StrokeEngine::new(),
            observer,
            scheduler,
            viewport_height,
            last_selection,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.modes.mode()
    }

    pub fn tool(&self) -> DrawTool {
        self.modes.tool()
    }

    pub fn palette(&self) -> &ToolPalette {
        self.modes.palette()
    }

    pub fn document(&self) -> &BlockDocument {
        &self.document
    }

    pub fn strokes(&self) -> &StrokeEngine {
        &self.strokes
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, viewport_height: f64) {
        self.viewport_height = viewport_height;
    }

    pub fn set_mode(&mut self, mode: EditorMode, now: Timestamp) -> bool {
        let changed = self.modes.set_mode(mode);
        self.sync_tool(now);
        changed
    }

    /// Pick a draw tool; this also enters draw mode
    pub fn set_tool(&mut self, tool: DrawTool, now: Timestamp) -> bool {
        let changed = self.modes.set_tool(tool);
        self.sync_tool(now);
        changed
    }

    /// Applies to strokes drawn from now on
    pub fn set_tool_settings(&mut self, tool: StrokeTool, settings: ToolSettings) {
        self.modes.set_tool_settings(tool, settings);
    }

    /// Format button. In draw mode the press only returns to text mode.
    pub fn format(&mut self, kind: FormatKind, now: Timestamp) -> Patch {
        match self.modes.request_format(kind) {
            Some(kind) => self.apply(Cmd::ToggleFormat { kind }),
            None => {
                self.sync_tool(now);
                self.unchanged()
            }
        }
    }

    pub fn insert_embed(&mut self, kind: EmbedKind, value: Option<String>) -> Patch {
        self.apply(Cmd::InsertEmbed { kind, value })
    }

    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let patch = self.document.apply(cmd);
        self.notify_selection();
        patch
    }

    /// Keyboard input. Only text mode edits the document.
    pub fn key(&mut self, id: BlockId, key: Key, caret_offset: usize) -> KeyOutcome {
        if self.modes.mode() != EditorMode::Text {
            return KeyOutcome::PassThrough;
        }
        let outcome = self.document.handle_key(id, key, caret_offset);
        self.notify_selection();
        outcome
    }

    pub fn pointer_down(&mut self, event: PointerEvent, now: Timestamp) -> Option<CanvasChange> {
        let ctx = draw_context(&self.modes, self.viewport_height, now);
        let change = self.strokes.pointer_down(event, &ctx);
        self.relay(change)
    }

    pub fn pointer_move(&mut self, event: PointerEvent, now: Timestamp) -> Option<CanvasChange> {
        let ctx = draw_context(&self.modes, self.viewport_height, now);
        let change = self.strokes.pointer_move(event, &ctx);
        self.relay(change)
    }

    pub fn pointer_up(&mut self, event: PointerEvent, now: Timestamp) -> Option<CanvasChange> {
        let ctx = draw_context(&self.modes, self.viewport_height, now);
        let change = self.strokes.pointer_up(event, &ctx);
        self.relay(change)
    }

    pub fn pointer_leave(&mut self, event: PointerEvent, now: Timestamp) -> Option<CanvasChange> {
        let ctx = draw_context(&self.modes, self.viewport_height, now);
        let change = self.strokes.pointer_leave(event, &ctx);
        self.relay(change)
    }

    /// One scheduled frame. Returns true while fades are still running.
    pub fn on_frame(&mut self, now: Timestamp) -> bool {
        self.strokes.fade_tick(now, &mut self.scheduler)
    }

    pub fn strokes_view(&self, now: Timestamp) -> Vec<StrokeView<'_>> {
        self.strokes.strokes_view(now)
    }

    /// Leaving draw mode ends any gesture still holding the capture before
    /// the highlighter state is synced
    fn sync_tool(&mut self, now: Timestamp) {
        if self.modes.mode() != EditorMode::Draw && self.strokes.capture().is_active() {
            log::debug!("Left draw mode mid-gesture, releasing capture");
            let change = self.strokes.release_capture(self.viewport_height, now);
            self.relay(change);
        }
        self.strokes
            .sync_tool(self.modes.is_highlighting(), now, &mut self.scheduler);
    }

    fn relay(&mut self, change: Option<CanvasChange>) -> Option<CanvasChange> {
        match change {
            Some(CanvasChange::Expanded { height }) => self.observer.on_expand(height),
            Some(CanvasChange::EraseSettled {
                content_max_y,
                shrunk_to,
            }) => {
                self.observer.on_check_resize(content_max_y);
                if let Some(height) = shrunk_to {
                    self.observer.on_canvas_resize(height);
                }
            }
            None => {}
        }
        self.strokes.schedule_if_needed(&mut self.scheduler);
        change
    }

    fn notify_selection(&mut self) {
        let current = (
            self.document.focus().map(|caret| caret.block_id),
            self.document.current_format_state(),
        );
        if current != self.last_selection {
            self.last_selection = current;
            self.observer.on_selection_change(current.1);
        }
    }

    fn unchanged(&self) -> Patch {
        Patch {
            changed: false,
            selection: self.document.focus(),
            version: self.document.version(),
        }
    }
}

fn draw_context(modes: &ModeController, viewport_height: f64, now: Timestamp) -> DrawContext<'_> {
    DrawContext {
        mode: modes.mode(),
        tool: modes.tool(),
        palette: modes.palette(),
        viewport_height,
        now,
    }
}
