//! Editor modes and the active draw tool

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::editing::{CommandParseError, FormatKind};
use crate::models::{StrokeTool, ToolPalette, ToolSettings};

/// Which engine receives input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    /// Keyboard goes to the block document
    #[default]
    Text,
    /// Pointer goes to the stroke engine
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawTool {
    #[default]
    Pen,
    Highlighter,
    Eraser,
}

impl DrawTool {
    /// The ink tool behind this draw tool, `None` for the eraser
    pub fn stroke_tool(self) -> Option<StrokeTool> {
        match self {
            DrawTool::Pen => Some(StrokeTool::Pen),
            DrawTool::Highlighter => Some(StrokeTool::Highlighter),
            DrawTool::Eraser => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrawTool::Pen => "pen",
            DrawTool::Highlighter => "highlighter",
            DrawTool::Eraser => "eraser",
        }
    }
}

impl FromStr for EditorMode {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(EditorMode::Text),
            "draw" => Ok(EditorMode::Draw),
            other => Err(CommandParseError::UnknownMode(other.to_string())),
        }
    }
}

impl FromStr for DrawTool {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pen" => Ok(DrawTool::Pen),
            "highlighter" => Ok(DrawTool::Highlighter),
            "eraser" => Ok(DrawTool::Eraser),
            other => Err(CommandParseError::UnknownTool(other.to_string())),
        }
    }
}

/// Mode switch, active tool and per-tool settings
///
/// Mirrors the floating menubar: picking a draw tool drops the user into
/// draw mode, and pressing a format button while drawing only brings the
/// user back to text mode (there is no selection to format yet).
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: EditorMode,
    tool: DrawTool,
    palette: ToolPalette,
}

impl ModeController {
    pub fn new(palette: ToolPalette) -> Self {
        Self {
            mode: EditorMode::Text,
            tool: DrawTool::Pen,
            palette,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn tool(&self) -> DrawTool {
        self.tool
    }

    pub fn palette(&self) -> &ToolPalette {
        &self.palette
    }

    pub fn set_mode(&mut self, mode: EditorMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Select a draw tool, switching to draw mode if needed
    pub fn set_tool(&mut self, tool: DrawTool) -> bool {
        let changed = self.tool != tool || self.mode != EditorMode::Draw;
        self.tool = tool;
        self.mode = EditorMode::Draw;
        changed
    }

    pub fn set_tool_settings(&mut self, tool: StrokeTool, settings: ToolSettings) {
        *self.palette.settings_for_mut(tool) = settings;
    }

    /// Format button pressed. Returns the format to apply, or `None` when
    /// the press only switched back to text mode.
    pub fn request_format(&mut self, kind: FormatKind) -> Option<FormatKind> {
        match self.mode {
            EditorMode::Text => Some(kind),
            EditorMode::Draw => {
                self.mode = EditorMode::Text;
                None
            }
        }
    }

    /// Drawing with the highlighter right now
    pub fn is_highlighting(&self) -> bool {
        self.mode == EditorMode::Draw && self.tool == DrawTool::Highlighter
    }
}
