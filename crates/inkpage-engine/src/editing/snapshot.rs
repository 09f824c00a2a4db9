use serde::Serialize;

use crate::editing::Caret;
use crate::models::{Alignment, Block, BlockId, HeadingType, TextProperties};

/// Active formatting shown by the floating command surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FormatState {
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underline: bool,
    pub heading_type: HeadingType,
    pub alignment: Alignment,
}

impl From<&TextProperties> for FormatState {
    fn from(properties: &TextProperties) -> Self {
        Self {
            is_bold: properties.is_bold,
            is_italic: properties.is_italic,
            is_underline: properties.is_underline,
            heading_type: properties.heading_type,
            alignment: properties.alignment,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderBlockKind {
    Text { properties: TextProperties },
    Code { language: Option<String> },
}

/// One block as the renderer sees it
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBlock {
    pub id: BlockId,
    pub kind: RenderBlockKind,
    pub content: String,
    pub is_focused: bool,
}

impl RenderBlock {
    pub(crate) fn from_block(block: &Block, is_focused: bool) -> Self {
        let kind = match block {
            Block::Text(text) => RenderBlockKind::Text {
                properties: text.properties,
            },
            Block::Code(code) => RenderBlockKind::Code {
                language: code.language.clone(),
            },
        };
        Self {
            id: block.id(),
            kind,
            content: block.content().to_string(),
            is_focused,
        }
    }
}

/// Immutable view of the document for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub version: u64,
    pub blocks: Vec<RenderBlock>,
    pub focus: Option<Caret>,
}

/// Format a snapshot as a readable outline for snapshot testing.
///
/// Ids are left out so outlines are stable across runs.
pub fn format_snapshot(snapshot: &DocumentSnapshot) -> String {
    let mut result = String::new();
    for block in &snapshot.blocks {
        match &block.kind {
            RenderBlockKind::Text { properties } => {
                result.push_str("text");
                let tags = text_tags(properties);
                if !tags.is_empty() {
                    result.push_str(&format!("[{}]", tags.join(" ")));
                }
            }
            RenderBlockKind::Code { language } => {
                result.push_str("code");
                if let Some(language) = language {
                    result.push_str(&format!("({language})"));
                }
            }
        }
        result.push_str(&format!(" {:?}", block.content));
        if block.is_focused
            && let Some(caret) = snapshot.focus
        {
            result.push_str(&format!(" <caret {}>", caret.offset));
        }
        result.push('\n');
    }
    result
}

fn text_tags(properties: &TextProperties) -> Vec<&'static str> {
    let mut tags = Vec::new();
    if properties.heading_type != HeadingType::Normal {
        tags.push(properties.heading_type.as_str());
    }
    if properties.is_bold {
        tags.push("bold");
    }
    if properties.is_italic {
        tags.push("italic");
    }
    if properties.is_underline {
        tags.push("underline");
    }
    if properties.alignment != Alignment::Left {
        tags.push(properties.alignment.as_str());
    }
    tags
}
