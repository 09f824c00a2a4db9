use std::str::FromStr;

use inkpage_engine::editing::{DocumentSnapshot, RenderBlockKind};
use inkpage_engine::models::{Alignment as TextAlignment, HeadingType, Point, TextProperties};
use inkpage_engine::{DrawTool, EditorMode};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Circle, Line as Segment, Points},
    },
};

use crate::app::{App, BlockLayout, CELL_HEIGHT, CELL_WIDTH, rows_for};

const CODE_GUTTER: &str = "│ ";

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(f.area());

    let mode = match app.editor.mode() {
        EditorMode::Text => "text".to_string(),
        EditorMode::Draw => format!("draw: {}", app.editor.tool().as_str()),
    };
    let page = Block::default()
        .borders(Borders::ALL)
        .title(format!("inkpage [{mode}]"));
    let surface = page.inner(chunks[0]);
    f.render_widget(page, chunks[0]);
    app.set_surface(surface);

    let snapshot = app.editor.document().snapshot();
    let rendered = render_document(&snapshot, surface.width);
    app.layout = rendered.layout;

    let document = Paragraph::new(rendered.lines).scroll((app.scroll_rows, 0));
    f.render_widget(document, surface);

    render_ink(f, app, surface);

    if app.editor.mode() == EditorMode::Text
        && let Some((row, col)) = rendered.caret
        && let Some(row) = row.checked_sub(app.scroll_rows)
        && row < surface.height
    {
        f.set_cursor_position((surface.x + col.min(surface.width.saturating_sub(1)), surface.y + row));
    }

    render_status(f, app, chunks[1]);
}

/// Document lines plus where each block and the caret landed
struct RenderedDocument {
    lines: Vec<Line<'static>>,
    layout: Vec<BlockLayout>,
    caret: Option<(u16, u16)>,
}

fn render_document(snapshot: &DocumentSnapshot, width: u16) -> RenderedDocument {
    let mut lines = Vec::new();
    let mut layout = Vec::new();
    let mut caret = None;

    for block in &snapshot.blocks {
        let first_row = cells(lines.len());
        let caret_offset = snapshot
            .focus
            .filter(|_| block.is_focused)
            .map(|caret| caret.offset);

        match &block.kind {
            RenderBlockKind::Text { properties } => {
                let prefix = heading_prefix(properties.heading_type);
                let text = format!("{prefix}{}", block.content);
                let line_width = cells(text.chars().count());
                let alignment = line_alignment(properties.alignment);
                lines.push(
                    Line::from(Span::styled(text, text_style(properties))).alignment(alignment),
                );
                if let Some(offset) = caret_offset {
                    let start = match alignment {
                        Alignment::Left => 0,
                        Alignment::Center => width.saturating_sub(line_width) / 2,
                        Alignment::Right => width.saturating_sub(line_width),
                    };
                    let col = cells(prefix.chars().count()).saturating_add(cells(offset));
                    caret = Some((first_row, start.saturating_add(col)));
                }
                layout.push(BlockLayout {
                    id: block.id,
                    first_row,
                    prefix: cells(prefix.chars().count()),
                });
            }
            RenderBlockKind::Code { language } => {
                let gutter = Style::default().fg(Color::DarkGray);
                if let Some(language) = language {
                    lines.push(Line::from(Span::styled(format!("┌ {language}"), gutter)));
                }
                let content_row = cells(lines.len());
                for text in block.content.split('\n') {
                    lines.push(Line::from(vec![
                        Span::styled(CODE_GUTTER, gutter),
                        Span::styled(text.to_string(), Style::default().fg(Color::Cyan)),
                    ]));
                }
                if let Some(offset) = caret_offset {
                    let (row, col) = row_col(&block.content, offset);
                    caret = Some((
                        content_row.saturating_add(row),
                        cells(CODE_GUTTER.chars().count()).saturating_add(col),
                    ));
                }
                layout.push(BlockLayout {
                    id: block.id,
                    first_row: content_row,
                    prefix: cells(CODE_GUTTER.chars().count()),
                });
            }
        }
    }

    RenderedDocument {
        lines,
        layout,
        caret,
    }
}

fn heading_prefix(heading: HeadingType) -> &'static str {
    match heading {
        HeadingType::Normal => "",
        HeadingType::H1 => "# ",
        HeadingType::H2 => "## ",
        HeadingType::H3 => "### ",
    }
}

fn text_style(properties: &TextProperties) -> Style {
    let mut style = Style::default();
    if properties.is_bold || properties.heading_type != HeadingType::Normal {
        style = style.add_modifier(Modifier::BOLD);
    }
    if properties.is_italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if properties.is_underline {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

fn line_alignment(alignment: TextAlignment) -> Alignment {
    match alignment {
        TextAlignment::Left => Alignment::Left,
        TextAlignment::Center => Alignment::Center,
        TextAlignment::Right => Alignment::Right,
    }
}

/// Row and column of a char offset in multi-line content
fn row_col(content: &str, offset: usize) -> (u16, u16) {
    let before: String = content.chars().take(offset).collect();
    let row = before.matches('\n').count();
    let col = before.rsplit('\n').next().map_or(0, |line| line.chars().count());
    (cells(row), cells(col))
}

/// Terminal cell count, pinned at the largest a frame can address
fn cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Strokes over the document, in canvas units with the y axis flipped for
/// ratatui's bottom-up canvas
fn render_ink(f: &mut Frame, app: &App, surface: Rect) {
    let now = app.now();
    let width = f64::from(surface.width) * CELL_WIDTH;
    let height = f64::from(surface.height) * CELL_HEIGHT;
    let top = f64::from(app.scroll_rows) * CELL_HEIGHT;
    let flip = move |p: &Point| (p.x, height - (p.y - top));

    let strokes = app.editor.strokes_view(now);
    let engine = app.editor.strokes();
    let cursor = (app.editor.mode() == EditorMode::Draw)
        .then(|| engine.cursor())
        .flatten()
        .map(|point| {
            let radius = engine.cursor_radius(app.editor.tool(), app.editor.palette());
            (flip(&point), radius.max(CELL_WIDTH / 2.0))
        });

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            for stroke in &strokes {
                let color = ink_color(stroke.color, stroke.opacity);
                match stroke.points {
                    [single] => ctx.draw(&Points {
                        coords: &[flip(single)],
                        color,
                    }),
                    points => {
                        for pair in points.windows(2) {
                            let (x1, y1) = flip(&pair[0]);
                            let (x2, y2) = flip(&pair[1]);
                            ctx.draw(&Segment {
                                x1,
                                y1,
                                x2,
                                y2,
                                color,
                            });
                        }
                    }
                }
            }
            if let Some(((x, y), radius)) = cursor {
                ctx.draw(&Circle {
                    x,
                    y,
                    radius,
                    color: Color::DarkGray,
                });
            }
        });
    f.render_widget(canvas, surface);
}

/// Terminal colour for a stroke. Black, the default page ink, maps to the
/// terminal's foreground. Opacity darkens the colour.
fn ink_color(css: &str, opacity: f64) -> Color {
    match Color::from_str(css) {
        Ok(Color::Rgb(0, 0, 0)) | Err(_) => Color::Reset,
        Ok(Color::Rgb(r, g, b)) => {
            let scale = |c: u8| (f64::from(c) * opacity.clamp(0.0, 1.0)).round() as u8;
            Color::Rgb(scale(r), scale(g), scale(b))
        }
        Ok(other) => other,
    }
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let status = app.editor.observer();
    let format = status.format;
    let flag = |on: bool, label: &'static str| {
        if on {
            Span::styled(label, Style::default().bg(Color::Yellow).fg(Color::Black))
        } else {
            Span::raw(label)
        }
    };
    let canvas_rows = app
        .editor
        .strokes()
        .canvas_height()
        .map_or("fit".to_string(), |h| format!("{} rows", rows_for(h)));

    let mut toolbar = vec![
        flag(format.is_bold, " B "),
        flag(format.is_italic, " I "),
        flag(format.is_underline, " U "),
        Span::raw(format!(" {} ", format.heading_type.as_str())),
        Span::raw(format!("{} ", format.alignment.as_str())),
        Span::raw("| "),
    ];
    for tool in [DrawTool::Pen, DrawTool::Highlighter, DrawTool::Eraser] {
        let active = app.editor.mode() == EditorMode::Draw && app.editor.tool() == tool;
        toolbar.push(flag(active, tool.as_str()));
        toolbar.push(Span::raw(" "));
    }
    toolbar.push(Span::raw(format!("| canvas {canvas_rows}")));
    if let Some(message) = &status.message {
        toolbar.push(Span::raw(format!(" | {message}")));
    }

    let help = match app.editor.mode() {
        EditorMode::Text => {
            "Tab: draw | Alt+b/i/u: format | Alt+0-3: heading | Alt+l/c/r: align | Alt+k: code | Alt+h/j: move block | Ctrl+q: quit"
        }
        EditorMode::Draw => {
            "Tab/Esc: text | p: pen | h: highlighter | e: eraser | PgUp/PgDn: scroll | Ctrl+q: quit"
        }
    };

    let status = Paragraph::new(vec![
        Line::from(toolbar),
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
    ]);
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpage_engine::editing::{BlockDocument, Cmd};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_caret_position_in_heading() {
        let mut doc = BlockDocument::new();
        let id = doc.blocks()[0].id();
        doc.apply(Cmd::UpdateContent {
            id,
            text: "Title".to_string(),
        });
        doc.apply(Cmd::Focus { id, offset: 3 });
        doc.apply(Cmd::SetHeading {
            level: HeadingType::H2,
        });

        let rendered = render_document(&doc.snapshot(), 40);

        assert_eq!(rendered.caret, Some((0, 6)));
        assert_eq!(rendered.layout[0].prefix, 3);
        assert_eq!(rendered.layout[1].first_row, 1);
    }

    #[test]
    fn test_caret_position_in_code_block() {
        let mut doc = BlockDocument::new();
        doc.insert_code_block("ab\ncd");

        let rendered = render_document(&doc.snapshot(), 40);

        assert_eq!(rendered.caret, Some((1, 4)));
        assert_eq!(rendered.lines.len(), 3);
    }

    #[test]
    fn test_caret_past_cell_range_saturates() {
        let mut doc = BlockDocument::new();
        let id = doc.blocks()[0].id();
        let long = "x".repeat(70_000);
        doc.apply(Cmd::UpdateContent { id, text: long });
        doc.apply(Cmd::Focus { id, offset: 70_000 });

        let rendered = render_document(&doc.snapshot(), 40);

        assert_eq!(rendered.caret, Some((0, u16::MAX)));
        assert_eq!(row_col(&"y".repeat(66_000), 66_000), (0, u16::MAX));
    }

    #[test]
    fn test_ink_color() {
        assert_eq!(ink_color("#000000", 1.0), Color::Reset);
        assert_eq!(ink_color("#ffeb3b", 0.5), Color::Rgb(128, 118, 30));
        assert_eq!(ink_color("not a colour", 1.0), Color::Reset);
    }
}
