use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a block.
///
/// Ids survive reorders and splits and are never handed out twice, so a
/// deleted block's id can't come back attached to different content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub Uuid);

impl BlockId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingType {
    #[default]
    Normal,
    H1,
    H2,
    H3,
}

impl HeadingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingType::Normal => "normal",
            HeadingType::H1 => "h1",
            HeadingType::H2 => "h2",
            HeadingType::H3 => "h3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Block-level formatting of a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextProperties {
    pub heading_type: HeadingType,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underline: bool,
    pub alignment: Alignment,
}

/// Paragraph or heading
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub id: BlockId,
    pub content: String,
    pub properties: TextProperties,
}

impl TextBlock {
    pub fn new(content: impl Into<String>, properties: TextProperties) -> Self {
        Self {
            id: BlockId::new(),
            content: content.into(),
            properties,
        }
    }

    /// Fresh empty block with default properties (the sentinel shape)
    pub fn empty() -> Self {
        Self::new(String::new(), TextProperties::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub id: BlockId,
    pub content: String,
    pub language: Option<String>,
}

impl CodeBlock {
    pub fn new(content: impl Into<String>, language: Option<String>) -> Self {
        Self {
            id: BlockId::new(),
            content: content.into(),
            language,
        }
    }
}

/// One addressable unit of document content
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Code(CodeBlock),
}

impl Block {
    pub fn id(&self) -> BlockId {
        match self {
            Block::Text(text) => text.id,
            Block::Code(code) => code.id,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Block::Text(text) => &text.content,
            Block::Code(code) => &code.content,
        }
    }

    pub(crate) fn set_content(&mut self, content: String) {
        match self {
            Block::Text(text) => text.content = content,
            Block::Code(code) => code.content = content,
        }
    }

    /// Length of the content in chars, the unit of every caret offset
    pub fn char_len(&self) -> usize {
        self.content().chars().count()
    }

    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            Block::Text(text) => Some(text),
            Block::Code(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextBlock> {
        match self {
            Block::Text(text) => Some(text),
            Block::Code(_) => None,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Block::Code(_))
    }

    /// True for the shape the trailing sentinel must have
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Block::Text(text) if text.content.is_empty())
    }
}

impl From<TextBlock> for Block {
    fn from(block: TextBlock) -> Self {
        Block::Text(block)
    }
}

impl From<CodeBlock> for Block {
    fn from(block: CodeBlock) -> Self {
        Block::Code(block)
    }
}
