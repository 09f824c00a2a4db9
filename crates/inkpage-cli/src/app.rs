use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use inkpage_engine::drawing::{FrameScheduler, PointerEvent, PointerId};
use inkpage_engine::editing::{Cmd, EmbedKind, FormatKind, FormatState};
use inkpage_engine::models::{Alignment, BlockId, HeadingType, Point, Timestamp, ToolPalette};
use inkpage_engine::{DrawTool, Editor, EditorMode, EditorObserver, Key, KeyOutcome};
use ratatui::layout::Rect;

/// Canvas units per terminal cell. Terminal cells are roughly twice as
/// tall as they are wide.
pub const CELL_WIDTH: f64 = 8.0;
pub const CELL_HEIGHT: f64 = 16.0;

const MOUSE: PointerId = PointerId(0);
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Frame requests from the fade loop become a faster input poll
#[derive(Debug, Default)]
pub struct TerminalFrames {
    active: bool,
}

impl TerminalFrames {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl FrameScheduler for TerminalFrames {
    fn request_frames(&mut self) {
        self.active = true;
    }

    fn cancel_frames(&mut self) {
        self.active = false;
    }
}

/// What the status bar shows
#[derive(Debug, Default)]
pub struct StatusLine {
    pub format: FormatState,
    pub message: Option<String>,
}

impl EditorObserver for StatusLine {
    fn on_selection_change(&mut self, format: FormatState) {
        self.format = format;
    }

    fn on_expand(&mut self, new_height: f64) {
        log::info!("Canvas expanded to {new_height}");
        self.message = Some(format!("canvas grew to {} rows", rows_for(new_height)));
    }

    fn on_canvas_resize(&mut self, height: f64) {
        log::info!("Canvas shrank to {height}");
        self.message = Some(format!("canvas shrank to {} rows", rows_for(height)));
    }
}

/// Where a block landed in the rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub id: BlockId,
    pub first_row: u16,
    /// Columns taken by the heading or code gutter before the content
    pub prefix: u16,
}

pub struct App {
    pub editor: Editor<StatusLine, TerminalFrames>,
    pub scroll_rows: u16,
    pub surface: Rect,
    pub layout: Vec<BlockLayout>,
    pub should_quit: bool,
    started: Instant,
}

impl App {
    pub fn new(palette: ToolPalette) -> Self {
        let mut editor = Editor::new(palette, 0.0, StatusLine::default(), TerminalFrames::default());
        let first = editor.document().blocks()[0].id();
        editor.apply(Cmd::Focus {
            id: first,
            offset: 0,
        });
        Self {
            editor,
            scroll_rows: 0,
            surface: Rect::default(),
            layout: Vec::new(),
            should_quit: false,
            started: Instant::now(),
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::from_duration(self.started.elapsed())
    }

    /// How long the main loop may block waiting for input
    pub fn poll_timeout(&self) -> Duration {
        if self.editor.scheduler().is_active() {
            FRAME_INTERVAL
        } else {
            IDLE_POLL_INTERVAL
        }
    }

    pub fn on_tick(&mut self) {
        if self.editor.scheduler().is_active() {
            let now = self.now();
            self.editor.on_frame(now);
        }
    }

    /// Called by the renderer with the area the document is drawn into
    pub fn set_surface(&mut self, surface: Rect) {
        if surface != self.surface {
            self.surface = surface;
            self.editor
                .set_viewport_height(f64::from(surface.height) * CELL_HEIGHT);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let now = self.now();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Tab => {
                let next = match self.editor.mode() {
                    EditorMode::Text => EditorMode::Draw,
                    EditorMode::Draw => EditorMode::Text,
                };
                self.editor.set_mode(next, now);
            }
            KeyCode::Char(c) if alt => self.on_command_key(c, now),
            KeyCode::PageUp => self.scroll_by(-i32::from(self.surface.height / 2)),
            KeyCode::PageDown => self.scroll_by(i32::from(self.surface.height / 2)),
            _ => match self.editor.mode() {
                EditorMode::Text => self.on_text_key(key),
                EditorMode::Draw => self.on_draw_key(key, now),
            },
        }
    }

    /// Alt shortcuts standing in for the floating command surface
    fn on_command_key(&mut self, c: char, now: Timestamp) {
        let format = match c {
            'b' => Some(FormatKind::Bold),
            'i' => Some(FormatKind::Italic),
            'u' => Some(FormatKind::Underline),
            _ => None,
        };
        if let Some(kind) = format {
            self.editor.format(kind, now);
            return;
        }
        if self.editor.mode() != EditorMode::Text {
            return;
        }
        let cmd = match c {
            '0' => Cmd::SetHeading {
                level: HeadingType::Normal,
            },
            '1' => Cmd::SetHeading {
                level: HeadingType::H1,
            },
            '2' => Cmd::SetHeading {
                level: HeadingType::H2,
            },
            '3' => Cmd::SetHeading {
                level: HeadingType::H3,
            },
            'l' => Cmd::SetAlignment {
                alignment: Alignment::Left,
            },
            'c' => Cmd::SetAlignment {
                alignment: Alignment::Center,
            },
            'r' => Cmd::SetAlignment {
                alignment: Alignment::Right,
            },
            'k' => {
                self.editor.insert_embed(EmbedKind::Code, None);
                return;
            }
            'j' => return self.move_focused_block(1),
            'h' => return self.move_focused_block(-1),
            _ => return,
        };
        self.editor.apply(cmd);
    }

    fn on_text_key(&mut self, key: KeyEvent) {
        let Some(caret) = self.editor.document().focus() else {
            if let Some(first) = self.editor.document().blocks().first().map(|b| b.id()) {
                self.editor.apply(Cmd::Focus {
                    id: first,
                    offset: 0,
                });
            }
            return;
        };
        let (id, offset) = (caret.block_id, caret.offset);

        match key.code {
            KeyCode::Char(c) => self.edit_focused(|content, at| {
                content.insert(at, c);
                Some(1)
            }),
            KeyCode::Enter => {
                self.editor.key(id, Key::Enter, offset);
            }
            KeyCode::Backspace if offset > 0 => self.edit_focused(|content, at| {
                let previous = content[..at].chars().next_back()?;
                content.remove(at - previous.len_utf8());
                Some(-1)
            }),
            KeyCode::Backspace => {
                if let KeyOutcome::PassThrough = self.editor.key(id, Key::Backspace, offset) {
                    log::debug!("Backspace at start of non-empty block ignored");
                }
            }
            KeyCode::Up => {
                self.editor.key(id, Key::ArrowUp, offset);
            }
            KeyCode::Down => {
                self.editor.key(id, Key::ArrowDown, offset);
            }
            KeyCode::Left => {
                self.editor.apply(Cmd::Focus {
                    id,
                    offset: offset.saturating_sub(1),
                });
            }
            KeyCode::Right => {
                self.editor.apply(Cmd::Focus {
                    id,
                    offset: offset + 1,
                });
            }
            KeyCode::Esc => {
                self.editor.apply(Cmd::Blur);
            }
            _ => {}
        }
    }

    fn on_draw_key(&mut self, key: KeyEvent, now: Timestamp) {
        let tool = match key.code {
            KeyCode::Char('p') => DrawTool::Pen,
            KeyCode::Char('h') => DrawTool::Highlighter,
            KeyCode::Char('e') => DrawTool::Eraser,
            KeyCode::Esc => {
                self.editor.set_mode(EditorMode::Text, now);
                return;
            }
            _ => return,
        };
        self.editor.set_tool(tool, now);
    }

    /// Edit the focused block's content at the caret. `edit` gets the
    /// content and the caret's byte index and returns how far the caret moves.
    fn edit_focused(&mut self, edit: impl FnOnce(&mut String, usize) -> Option<isize>) {
        let Some(caret) = self.editor.document().focus() else {
            return;
        };
        let Some(block) = self.editor.document().block(caret.block_id) else {
            return;
        };
        let mut content = block.content().to_string();
        let at = content
            .char_indices()
            .nth(caret.offset)
            .map_or(content.len(), |(byte, _)| byte);
        let Some(delta) = edit(&mut content, at) else {
            return;
        };

        self.editor.apply(Cmd::UpdateContent {
            id: caret.block_id,
            text: content,
        });
        // An emptied block may have been removed, and focus handed on
        if self.editor.document().block(caret.block_id).is_some() {
            self.editor.apply(Cmd::Focus {
                id: caret.block_id,
                offset: caret.offset.saturating_add_signed(delta),
            });
        }
    }

    fn move_focused_block(&mut self, step: isize) {
        let Some(from) = self
            .editor
            .document()
            .focus()
            .and_then(|caret| self.editor.document().index_of(caret.block_id))
        else {
            return;
        };
        if let Some(to) = from.checked_add_signed(step) {
            self.editor.apply(Cmd::Reorder { from, to });
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let now = self.now();
        match mouse.kind {
            MouseEventKind::ScrollUp => return self.scroll_by(-1),
            MouseEventKind::ScrollDown => return self.scroll_by(1),
            _ => {}
        }

        let inside = self.contains(mouse.column, mouse.row);
        let event = self.pointer_event(mouse.column, mouse.row);

        // Releases reach the engine in any mode so a capture never outlives
        // its gesture
        match (self.editor.mode(), mouse.kind) {
            _ if !inside => {
                self.editor.pointer_leave(event, now);
            }
            (_, MouseEventKind::Up(MouseButton::Left)) => {
                self.editor.pointer_up(event, now);
            }
            (EditorMode::Draw, MouseEventKind::Down(MouseButton::Left)) => {
                self.editor.pointer_down(event, now);
            }
            (EditorMode::Draw, MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved) => {
                self.editor.pointer_move(event, now);
            }
            (EditorMode::Text, MouseEventKind::Down(MouseButton::Left)) if inside => {
                self.focus_at(mouse.column, mouse.row);
            }
            _ => {}
        }
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        let s = self.surface;
        column >= s.x && column < s.x + s.width && row >= s.y && row < s.y + s.height
    }

    /// Map a terminal cell to canvas space, accounting for scroll
    fn pointer_event(&self, column: u16, row: u16) -> PointerEvent {
        let client = Point::new(
            f64::from(column) * CELL_WIDTH + CELL_WIDTH / 2.0,
            (f64::from(row) + f64::from(self.scroll_rows)) * CELL_HEIGHT + CELL_HEIGHT / 2.0,
        );
        let origin = Point::new(
            f64::from(self.surface.x) * CELL_WIDTH,
            f64::from(self.surface.y) * CELL_HEIGHT,
        );
        PointerEvent::from_client(MOUSE, client, origin)
    }

    /// Click in text mode: focus the block under the cell
    fn focus_at(&mut self, column: u16, row: u16) {
        let doc_row = row - self.surface.y + self.scroll_rows;
        let Some(block) = self
            .layout
            .iter()
            .rev()
            .find(|block| block.first_row <= doc_row)
            .copied()
        else {
            return;
        };
        let Some(content) = self.editor.document().block(block.id).map(|b| b.content()) else {
            return;
        };
        let col = usize::from((column - self.surface.x).saturating_sub(block.prefix));
        let line = usize::from(doc_row - block.first_row);
        let offset = offset_at(content, line, col);
        self.editor.apply(Cmd::Focus {
            id: block.id,
            offset,
        });
    }

    fn scroll_by(&mut self, rows: i32) {
        let height = self
            .editor
            .strokes()
            .canvas_height()
            .unwrap_or(self.editor.viewport_height());
        let max = rows_for(height).saturating_sub(self.surface.height);
        let target = (i32::from(self.scroll_rows) + rows).clamp(0, i32::from(max));
        self.scroll_rows = u16::try_from(target).unwrap_or(max);
    }
}

/// Char offset of (`line`, `col`) in multi-line content, clamped
pub fn offset_at(content: &str, line: usize, col: usize) -> usize {
    let mut offset = 0;
    for (index, text) in content.split('\n').enumerate() {
        let len = text.chars().count();
        if index == line {
            return offset + col.min(len);
        }
        offset += len + 1;
    }
    content.chars().count()
}

/// Terminal rows needed for a canvas height
pub fn rows_for(height: f64) -> u16 {
    (height / CELL_HEIGHT).ceil() as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        let mut app = App::new(ToolPalette::default());
        app.set_surface(Rect::new(1, 1, 40, 20));
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
        app.on_mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn contents(app: &App) -> Vec<String> {
        app.editor
            .document()
            .blocks()
            .iter()
            .map(|b| b.content().to_string())
            .collect()
    }

    #[test]
    fn test_typing_and_enter() {
        let mut app = app();
        type_text(&mut app, "Hello World");
        for _ in 0..6 {
            press(&mut app, KeyCode::Left);
        }
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "Big");

        assert_eq!(contents(&app), ["Hello", "Big World", ""]);
    }

    #[test]
    fn test_backspace_deletes_multibyte_char() {
        let mut app = app();
        type_text(&mut app, "café");
        press(&mut app, KeyCode::Backspace);

        assert_eq!(contents(&app), ["caf", ""]);
        assert_eq!(app.editor.document().focus().unwrap().offset, 3);
    }

    #[test]
    fn test_slash_code_converts_block() {
        let mut app = app();
        type_text(&mut app, "/code");

        assert!(app.editor.document().blocks()[0].is_code());
        assert_eq!(contents(&app), ["", ""]);
    }

    #[test]
    fn test_alt_format_in_draw_mode_returns_to_text() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.editor.mode(), EditorMode::Draw);

        app.on_key(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::ALT));

        assert_eq!(app.editor.mode(), EditorMode::Text);
        assert!(!app.editor.observer().format.is_bold);
    }

    #[test]
    fn test_mouse_drag_draws_stroke() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 2, 2);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, 2);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, 2);

        let strokes = app.editor.strokes().strokes();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].points()[0], Point::new(12.0, 24.0));
    }

    #[test]
    fn test_dragging_off_surface_commits() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 2, 2);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 3, 3);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 60, 3);

        assert_eq!(app.editor.strokes().strokes().len(), 1);
        assert!(app.editor.strokes().active_stroke().is_none());
    }

    #[test]
    fn test_tab_mid_drag_does_not_join_next_stroke() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 2, 2);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 5, 2);
        press(&mut app, KeyCode::Tab);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 5, 2);
        press(&mut app, KeyCode::Tab);
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 10, 10);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 12, 10);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 12, 10);

        let strokes = app.editor.strokes().strokes();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].points().len(), 2);
        assert_eq!(strokes[1].points().len(), 2);
    }

    #[test]
    fn test_draw_tool_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.editor.tool(), DrawTool::Eraser);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.editor.mode(), EditorMode::Text);
    }

    #[test]
    fn test_ctrl_q_quits() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        key.kind = KeyEventKind::Press;
        app.on_key(key);
        assert!(app.should_quit);
    }

    #[test]
    fn test_offset_at() {
        assert_eq!(offset_at("ab\ncdef", 0, 5), 2);
        assert_eq!(offset_at("ab\ncdef", 1, 2), 5);
        assert_eq!(offset_at("ab\ncdef", 4, 0), 7);
    }
}
