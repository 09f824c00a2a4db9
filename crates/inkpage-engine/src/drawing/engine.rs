use crate::drawing::canvas::CanvasGeometry;
use crate::drawing::capture::{Capture, PointerEvent, PointerId};
use crate::drawing::fade::{self, FadeLoop, FrameScheduler};
use crate::mode::{DrawTool, EditorMode};
use crate::models::{Point, Stroke, StrokeTool, Timestamp, ToolPalette};

/// Eraser reach in canvas units
pub const ERASER_HIT_RADIUS: f64 = 10.0;
/// Opacity of the stroke still being drawn
pub const IN_PROGRESS_OPACITY: f64 = 0.6;

/// Inputs the chrome owns and hands over with every pointer event
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub mode: EditorMode,
    pub tool: DrawTool,
    pub palette: &'a ToolPalette,
    pub viewport_height: f64,
    pub now: Timestamp,
}

/// Canvas geometry requests for the scroll container owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasChange {
    /// Drawing reached the lower region and the canvas grew
    Expanded { height: f64 },
    /// An erase gesture was released. `shrunk_to` is set when the canvas
    /// got smaller as a result.
    EraseSettled {
        content_max_y: f64,
        shrunk_to: Option<f64>,
    },
}

/// One stroke as the renderer draws it. `path` suits SVG hosts, `points`
/// suits hosts that plot segments themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeView<'a> {
    pub path: String,
    pub points: &'a [Point],
    pub color: &'a str,
    pub width: f64,
    pub opacity: f64,
}

/// Freehand ink state machine
///
/// Owns the committed strokes, the stroke being drawn, the pointer capture
/// and the canvas height. Mode and tool are not owned here; they arrive with
/// each call through [`DrawContext`] and `sync_tool`.
///
/// ## Gesture lifecycle
///
/// ```text
/// Idle ──down(pen|highlighter)──▶ Drawing ──up/leave──▶ Idle (commit)
///   └────down(eraser)──────────▶ Erasing ──up/leave──▶ Idle (shrink check)
/// ```
///
/// Events from any pointer other than the one holding the capture are
/// ignored until it is released.
#[derive(Debug, Clone, Default)]
pub struct StrokeEngine {
    strokes: Vec<Stroke>,
    active: Option<Stroke>,
    capture: Capture,
    cursor: Option<Point>,
    canvas: CanvasGeometry,
    fade_loop: FadeLoop,
    highlighting: bool,
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active.as_ref()
    }

    pub fn capture(&self) -> Capture {
        self.capture
    }

    /// Last pointer position over the surface, for the tool cursor
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn cursor_radius(&self, tool: DrawTool, palette: &ToolPalette) -> f64 {
        match tool.stroke_tool() {
            Some(ink) => palette.settings_for(ink).width / 2.0,
            None => ERASER_HIT_RADIUS,
        }
    }

    /// `None` until the first expansion: fit the viewport
    pub fn canvas_height(&self) -> Option<f64> {
        self.canvas.height()
    }

    pub fn is_fade_loop_running(&self) -> bool {
        self.fade_loop.is_running()
    }

    /// Lowest ink on the canvas, 0 when there is none
    pub fn content_max_y(&self) -> f64 {
        self.strokes.iter().map(Stroke::max_y).fold(0.0, f64::max)
    }

    /// Open a stroke with the tool's current colour and width. Refused
    /// outside draw mode, for the eraser, and while another gesture holds
    /// the capture.
    pub fn begin_stroke(&mut self, pointer_id: PointerId, ctx: &DrawContext<'_>, point: Point) -> bool {
        if ctx.mode != EditorMode::Draw || self.capture.is_active() {
            return false;
        }
        let Some(tool) = ctx.tool.stroke_tool() else {
            return false;
        };
        self.active = Some(Stroke::begin(tool, ctx.palette.settings_for(tool), point));
        self.capture = Capture::Drawing { pointer_id };
        self.cursor = Some(point);
        true
    }

    pub fn extend_stroke(&mut self, point: Point) {
        self.cursor = Some(point);
        if let Some(stroke) = self.active.as_mut() {
            stroke.push(point);
        }
    }

    /// Close the in-progress stroke. Strokes with fewer than two points are
    /// dropped. A highlighter stroke committed after highlighting has ended
    /// starts fading at `now`. Returns true if a stroke was committed.
    pub fn commit_stroke(&mut self, now: Timestamp) -> bool {
        if matches!(self.capture, Capture::Drawing { .. }) {
            self.capture = Capture::Idle;
        }
        match self.active.take() {
            Some(mut stroke) if stroke.points().len() > 1 => {
                if stroke.tool() == StrokeTool::Highlighter && !self.highlighting {
                    stroke.start_fade(now);
                }
                log::debug!(
                    "Committed {:?} stroke with {} points",
                    stroke.tool(),
                    stroke.points().len()
                );
                self.strokes.push(stroke);
                true
            }
            Some(_) => {
                log::trace!("Discarded single-point stroke");
                false
            }
            None => false,
        }
    }

    /// Delete every committed stroke with a point within the hit radius.
    /// Returns how many were removed.
    pub fn erase_at(&mut self, point: Point) -> usize {
        let before = self.strokes.len();
        self.strokes.retain(|stroke| !stroke.is_hit(point, ERASER_HIT_RADIUS));
        let removed = before - self.strokes.len();
        if removed > 0 {
            log::debug!("Erased {removed} strokes at ({}, {})", point.x, point.y);
        }
        removed
    }

    /// React to a mode or tool change. `highlighting` is whether the
    /// highlighter is now live. Leaving highlighter drawing starts the fade
    /// on every committed highlighter stroke that isn't fading yet.
    pub fn sync_tool<S: FrameScheduler + ?Sized>(
        &mut self,
        highlighting: bool,
        now: Timestamp,
        scheduler: &mut S,
    ) {
        if self.highlighting && !highlighting {
            let started = self
                .strokes
                .iter_mut()
                .filter(|stroke| stroke.tool() == StrokeTool::Highlighter)
                .map(|stroke| stroke.start_fade(now))
                .filter(|started| *started)
                .count();
            log::debug!("Started fading {started} highlighter strokes");
        }
        self.highlighting = highlighting;
        self.schedule_if_needed(scheduler);
    }

    /// Advance fades to `now`, dropping strokes that have fully faded.
    /// Returns true while anything is still fading.
    pub fn fade_tick<S: FrameScheduler + ?Sized>(&mut self, now: Timestamp, scheduler: &mut S) -> bool {
        let before = self.strokes.len();
        self.strokes
            .retain(|stroke| !fade::is_expired(stroke.fade_start(), now));
        let expired = before - self.strokes.len();
        if expired > 0 {
            log::debug!("Removed {expired} faded strokes");
        }
        self.schedule_if_needed(scheduler);
        self.has_fading_strokes()
    }

    /// Start the host frame loop if something is fading, stop it if not
    pub fn schedule_if_needed<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        let needed = self.has_fading_strokes();
        self.fade_loop.sync(needed, scheduler);
    }

    pub fn has_fading_strokes(&self) -> bool {
        self.strokes.iter().any(Stroke::is_fading)
    }

    pub fn maybe_expand(&mut self, point: Point, viewport_height: f64) -> Option<f64> {
        self.canvas.maybe_expand(point, viewport_height)
    }

    pub fn maybe_shrink(&mut self, content_max_y: f64, viewport_height: f64) -> Option<f64> {
        self.canvas.maybe_shrink(content_max_y, viewport_height)
    }

    pub fn pointer_down(&mut self, event: PointerEvent, ctx: &DrawContext<'_>) -> Option<CanvasChange> {
        if ctx.mode != EditorMode::Draw || self.capture.is_active() {
            return None;
        }
        let point = event.position;
        self.cursor = Some(point);
        match ctx.tool {
            DrawTool::Eraser => {
                self.capture = Capture::Erasing {
                    pointer_id: event.pointer_id,
                };
                self.erase_at(point);
                None
            }
            DrawTool::Pen | DrawTool::Highlighter => {
                self.begin_stroke(event.pointer_id, ctx, point);
                self.maybe_expand(point, ctx.viewport_height)
                    .map(|height| CanvasChange::Expanded { height })
            }
        }
    }

    pub fn pointer_move(&mut self, event: PointerEvent, ctx: &DrawContext<'_>) -> Option<CanvasChange> {
        let point = event.position;
        match self.capture {
            Capture::Drawing { pointer_id } if pointer_id == event.pointer_id => {
                self.extend_stroke(point);
                self.maybe_expand(point, ctx.viewport_height)
                    .map(|height| CanvasChange::Expanded { height })
            }
            Capture::Erasing { pointer_id } if pointer_id == event.pointer_id => {
                self.cursor = Some(point);
                self.erase_at(point);
                None
            }
            Capture::Idle => {
                self.cursor = Some(point);
                None
            }
            _ => None,
        }
    }

    pub fn pointer_up(&mut self, event: PointerEvent, ctx: &DrawContext<'_>) -> Option<CanvasChange> {
        if !self.capture.owns(event.pointer_id) {
            return None;
        }
        self.release_capture(ctx.viewport_height, ctx.now)
    }

    /// Leaving the surface mid-gesture releases it like a pointer-up
    pub fn pointer_leave(&mut self, event: PointerEvent, ctx: &DrawContext<'_>) -> Option<CanvasChange> {
        let change = self.pointer_up(event, ctx);
        if !self.capture.is_active() {
            self.cursor = None;
        }
        change
    }

    /// End whatever gesture holds the capture: commit the stroke, or run
    /// the shrink check after erasing
    pub fn release_capture(&mut self, viewport_height: f64, now: Timestamp) -> Option<CanvasChange> {
        match self.capture {
            Capture::Idle => None,
            Capture::Drawing { .. } => {
                self.commit_stroke(now);
                None
            }
            Capture::Erasing { .. } => {
                self.capture = Capture::Idle;
                let content_max_y = self.content_max_y();
                let shrunk_to = self.maybe_shrink(content_max_y, viewport_height);
                Some(CanvasChange::EraseSettled {
                    content_max_y,
                    shrunk_to,
                })
            }
        }
    }

    /// Everything to draw this frame, in stacking order. The in-progress
    /// stroke comes last.
    pub fn strokes_view(&self, now: Timestamp) -> Vec<StrokeView<'_>> {
        let committed = self.strokes.iter().map(|stroke| StrokeView {
            path: stroke.path_data(),
            points: stroke.points(),
            color: stroke.color(),
            width: stroke.width(),
            opacity: stroke.opacity(now),
        });
        let active = self.active.iter().map(|stroke| StrokeView {
            path: stroke.path_data(),
            points: stroke.points(),
            color: stroke.color(),
            width: stroke.width(),
            opacity: IN_PROGRESS_OPACITY,
        });
        committed.chain(active).collect()
    }
}
