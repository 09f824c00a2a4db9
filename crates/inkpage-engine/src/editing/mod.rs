/*!
 * # Block Editing Core
 *
 * The text half of the editor surface: an ordered sequence of content
 * blocks (paragraphs, headings, code) with caret-accurate edit operations.
 *
 * ## Architecture Overview
 *
 * ### 1. One owner
 * - `BlockDocument` owns the block sequence and the focus caret
 * - The chrome never mutates blocks directly; it sends commands and reads snapshots
 *
 * ### 2. Command-Based Editing
 * - Every edit is a method on `BlockDocument`, and also a `Cmd` value for
 *   hosts that queue or replay input
 * - Each command returns a `Patch`: whether anything changed, the new caret,
 *   and the document version
 *
 * ### 3. Logical carets
 * - Offsets count chars into a block's content, never bytes or pixels
 * - The rendering layer maps them to and from its native selection API
 * - Out-of-range offsets are clamped
 *
 * ### 4. Sentinel block
 * - The sequence always ends in an empty text block so there's always an
 *   insertion point below the content
 * - Every command restores this before returning
 *
 * ### 5. Read API: Immutable Snapshots
 * - `snapshot()` produces `RenderBlock`s with stable ids
 * - `current_format_state()` drives the active-format buttons
 *
 * ## Usage Pattern
 *
 * ```rust
 * use inkpage_engine::editing::*;
 * use inkpage_engine::models::HeadingType;
 *
 * let mut doc = BlockDocument::new();
 * let id = doc.blocks()[0].id();
 *
 * doc.apply(Cmd::UpdateContent { id, text: "Notes".to_string() });
 * doc.apply(Cmd::Focus { id, offset: 5 });
 * doc.apply(Cmd::SetHeading { level: HeadingType::H1 });
 *
 * assert_eq!(doc.current_format_state().heading_type, HeadingType::H1);
 * assert_eq!(doc.snapshot().blocks.len(), 2);
 * ```
 */

pub mod commands;
pub mod document;
pub mod patch;
pub mod snapshot;

pub use commands::{Cmd, CommandParseError, Direction, EmbedKind, FormatKind, Key, KeyOutcome};
pub use document::BlockDocument;
pub use patch::{Caret, Patch};
pub use snapshot::{DocumentSnapshot, FormatState, RenderBlock, RenderBlockKind, format_snapshot};
