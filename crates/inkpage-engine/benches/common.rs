// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
use inkpage_engine::drawing::{DrawContext, PointerEvent, PointerId, StrokeEngine};
use inkpage_engine::editing::{BlockDocument, Cmd};
use inkpage_engine::models::{Point, Timestamp, ToolPalette};
use inkpage_engine::{DrawTool, EditorMode};

/// A page of `rows` horizontal pen strokes, 40 points each, 30 units apart
#[allow(dead_code)]
pub fn ruled_page(rows: usize) -> StrokeEngine {
    let palette = ToolPalette::default();
    let ctx = DrawContext {
        mode: EditorMode::Draw,
        tool: DrawTool::Pen,
        palette: &palette,
        viewport_height: 800.0,
        now: Timestamp::ZERO,
    };
    let mut engine = StrokeEngine::new();
    let pointer = PointerId(1);
    for row in 0..rows {
        let y = row as f64 * 30.0;
        engine.pointer_down(PointerEvent::new(pointer, Point::new(0.0, y)), &ctx);
        for step in 1..40 {
            let at = Point::new(step as f64 * 10.0, y);
            engine.pointer_move(PointerEvent::new(pointer, at), &ctx);
        }
        engine.pointer_up(PointerEvent::new(pointer, Point::new(390.0, y)), &ctx);
    }
    engine
}

/// A document of `count` paragraphs followed by the sentinel
#[allow(dead_code)]
pub fn paragraphs(count: usize) -> BlockDocument {
    let mut doc = BlockDocument::new();
    for i in 0..count {
        let Some(sentinel) = doc.blocks().last().map(|b| b.id()) else {
            break;
        };
        doc.apply(Cmd::UpdateContent {
            id: sentinel,
            text: format!("Paragraph {i} with some text in it."),
        });
    }
    doc
}
