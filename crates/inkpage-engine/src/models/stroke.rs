use serde::{Deserialize, Serialize};

use crate::drawing::fade;
use crate::models::{Point, Timestamp, path_data};

/// The tools that leave ink behind. The eraser is not one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    Pen,
    Highlighter,
}

/// Colour and width for one ink tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// CSS-style colour string, passed through to the renderer untouched
    pub color: String,
    pub width: f64,
}

impl ToolSettings {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

/// Per-tool settings for every ink tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPalette {
    pub pen: ToolSettings,
    pub highlighter: ToolSettings,
}

impl Default for ToolPalette {
    fn default() -> Self {
        Self {
            pen: ToolSettings::new("#000000", 2.0),
            highlighter: ToolSettings::new("#ffeb3b", 20.0),
        }
    }
}

impl ToolPalette {
    pub fn settings_for(&self, tool: StrokeTool) -> &ToolSettings {
        match tool {
            StrokeTool::Pen => &self.pen,
            StrokeTool::Highlighter => &self.highlighter,
        }
    }

    pub fn settings_for_mut(&mut self, tool: StrokeTool) -> &mut ToolSettings {
        match tool {
            StrokeTool::Pen => &mut self.pen,
            StrokeTool::Highlighter => &mut self.highlighter,
        }
    }
}

/// One freehand ink path.
///
/// Points are only appended while the stroke is in progress; once the
/// engine commits it the list is frozen. `fade_start` is the only field
/// that changes afterwards and it is set at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    color: String,
    width: f64,
    tool: StrokeTool,
    fade_start: Option<Timestamp>,
}

impl Stroke {
    pub(crate) fn begin(tool: StrokeTool, settings: &ToolSettings, first: Point) -> Self {
        Self {
            points: vec![first],
            color: settings.color.clone(),
            width: settings.width,
            tool,
            fade_start: None,
        }
    }

    pub(crate) fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Stamp the fade start. Later calls keep the first timestamp.
    pub(crate) fn start_fade(&mut self, now: Timestamp) -> bool {
        if self.fade_start.is_some() {
            return false;
        }
        self.fade_start = Some(now);
        true
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn tool(&self) -> StrokeTool {
        self.tool
    }

    pub fn fade_start(&self) -> Option<Timestamp> {
        self.fade_start
    }

    pub fn is_fading(&self) -> bool {
        self.fade_start.is_some()
    }

    pub fn path_data(&self) -> String {
        path_data(&self.points)
    }

    pub fn opacity(&self, now: Timestamp) -> f64 {
        fade::opacity(self.tool, self.fade_start, now)
    }

    /// True if any point lies within `radius` of `at`
    pub fn is_hit(&self, at: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.distance_to(at) <= radius)
    }

    pub fn max_y(&self) -> f64 {
        self.points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max)
    }
}
