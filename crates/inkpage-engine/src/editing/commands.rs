use std::str::FromStr;

use crate::editing::Patch;
use crate::models::{Alignment, BlockId, HeadingType};

/// Errors raised when the chrome hands the engine a command name it doesn't know
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("Unknown format kind: {0}")]
    UnknownFormat(String),
    #[error("Unknown embed kind: {0}")]
    UnknownEmbed(String),
    #[error("Unknown heading type: {0}")]
    UnknownHeading(String),
    #[error("Unknown alignment: {0}")]
    UnknownAlignment(String),
    #[error("Unknown editor mode: {0}")]
    UnknownMode(String),
    #[error("Unknown draw tool: {0}")]
    UnknownTool(String),
}

/// Inline format flags that toggle on a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
}

/// Things the command surface can embed into the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedKind {
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

/// Keys the block model reacts to. Everything else is `Other` and passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Backspace,
    ArrowUp,
    ArrowDown,
    Other,
}

/// What happened to a key routed to the block model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The model consumed the key; the host must suppress its default action
    Handled(Patch),
    /// Let the host's native text input handle it
    PassThrough,
}

/// Edit commands understood by [`crate::editing::BlockDocument::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    UpdateContent { id: BlockId, text: String },
    SplitOnEnter { id: BlockId, at: usize },
    BackspaceOnEmpty { id: BlockId },
    Navigate { id: BlockId, direction: Direction },
    Reorder { from: usize, to: usize },
    ToggleFormat { kind: FormatKind },
    SetHeading { level: HeadingType },
    SetAlignment { alignment: Alignment },
    InsertEmbed { kind: EmbedKind, value: Option<String> },
    Focus { id: BlockId, offset: usize },
    Blur,
}

impl FromStr for FormatKind {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" => Ok(FormatKind::Bold),
            "italic" => Ok(FormatKind::Italic),
            "underline" => Ok(FormatKind::Underline),
            other => Err(CommandParseError::UnknownFormat(other.to_string())),
        }
    }
}

impl FromStr for EmbedKind {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(EmbedKind::Code),
            other => Err(CommandParseError::UnknownEmbed(other.to_string())),
        }
    }
}

impl FromStr for HeadingType {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(HeadingType::Normal),
            "h1" => Ok(HeadingType::H1),
            "h2" => Ok(HeadingType::H2),
            "h3" => Ok(HeadingType::H3),
            other => Err(CommandParseError::UnknownHeading(other.to_string())),
        }
    }
}

impl FromStr for Alignment {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Alignment::Left),
            "center" => Ok(Alignment::Center),
            "right" => Ok(Alignment::Right),
            other => Err(CommandParseError::UnknownAlignment(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bold", FormatKind::Bold)]
    #[case("italic", FormatKind::Italic)]
    #[case("underline", FormatKind::Underline)]
    fn test_parse_format_kind(#[case] input: &str, #[case] expected: FormatKind) {
        assert_eq!(input.parse::<FormatKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_format_kind_is_typed_error() {
        let err = "strike".parse::<FormatKind>().unwrap_err();
        assert_eq!(err, CommandParseError::UnknownFormat("strike".to_string()));
        assert_eq!(err.to_string(), "Unknown format kind: strike");
    }

    #[test]
    fn test_heading_and_alignment_names_round_trip() {
        for level in [
            HeadingType::Normal,
            HeadingType::H1,
            HeadingType::H2,
            HeadingType::H3,
        ] {
            assert_eq!(level.as_str().parse::<HeadingType>().unwrap(), level);
        }
        for alignment in [Alignment::Left, Alignment::Center, Alignment::Right] {
            assert_eq!(alignment.as_str().parse::<Alignment>().unwrap(), alignment);
        }
    }

    #[test]
    fn test_parse_embed_kind() {
        assert_eq!("code".parse::<EmbedKind>().unwrap(), EmbedKind::Code);
        assert!("image".parse::<EmbedKind>().is_err());
    }
}
