use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::editing::commands::{Cmd, Direction, EmbedKind, FormatKind, Key, KeyOutcome};
use crate::editing::snapshot::{DocumentSnapshot, FormatState, RenderBlock};
use crate::editing::{Caret, Patch};
use crate::models::{Alignment, Block, BlockId, CodeBlock, HeadingType, TextBlock};

/// Ordered block sequence with focus tracking
///
/// The sequence always ends in an empty text block, the *sentinel*, so the
/// user always has somewhere to type below the last piece of content. Every
/// mutating operation restores that shape before it returns:
///
/// - the sequence is never empty
/// - the last block is a `TextBlock` whose content is `""`
/// - block ids are unique
///
/// Operations addressed to ids that aren't in the document, or to a block
/// kind they don't apply to, are silent no-ops. They report `changed: false`
/// in their [`Patch`] and leave the version untouched.
///
/// ```rust
/// # use inkpage_engine::editing::BlockDocument;
/// let mut doc = BlockDocument::new();
/// let first = doc.blocks()[0].id();
///
/// doc.update_content(first, "Hello World");
/// let patch = doc.split_on_enter(first, 5);
///
/// let contents: Vec<_> = doc.blocks().iter().map(|b| b.content()).collect();
/// assert_eq!(contents, ["Hello", " World", ""]);
/// assert_eq!(patch.selection.unwrap().offset, 0);
/// ```
#[derive(Debug, Clone)]
pub struct BlockDocument {
    blocks: Vec<Block>,
    focus: Option<Caret>,
    version: u64,
}

impl Default for BlockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockDocument {
    /// A document holding just the sentinel
    pub fn new() -> Self {
        Self {
            blocks: vec![TextBlock::empty().into()],
            focus: None,
            version: 0,
        }
    }

    /// Build a document from existing blocks, appending a sentinel if the
    /// sequence doesn't already end in one. Ids are expected to be unique.
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        let mut doc = Self {
            blocks: blocks.into_iter().collect(),
            focus: None,
            version: 0,
        };
        doc.ensure_sentinel();
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn focus(&self) -> Option<Caret> {
        self.focus
    }

    pub fn index_of(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn focused_block(&self) -> Option<&Block> {
        self.focus.and_then(|caret| self.block(caret.block_id))
    }

    /// Apply command to document
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        match cmd {
            Cmd::UpdateContent { id, text } => self.update_content(id, text),
            Cmd::SplitOnEnter { id, at } => self.split_on_enter(id, at),
            Cmd::BackspaceOnEmpty { id } => self.backspace_on_empty(id),
            Cmd::Navigate { id, direction } => self.navigate(id, direction),
            Cmd::Reorder { from, to } => self.reorder(from, to),
            Cmd::ToggleFormat { kind } => self.toggle_format(kind),
            Cmd::SetHeading { level } => self.set_heading(level),
            Cmd::SetAlignment { alignment } => self.set_alignment(alignment),
            Cmd::InsertEmbed { kind, value } => self.insert_embed(kind, value),
            Cmd::Focus { id, offset } => self.focus_block(id, offset),
            Cmd::Blur => self.blur(),
        }
    }

    /// Replace a block's content.
    ///
    /// A block other than the last one that is emptied disappears. Text
    /// starting with `/code` turns a text block into a code block holding
    /// the trimmed remainder.
    pub fn update_content(&mut self, id: BlockId, text: impl Into<String>) -> Patch {
        let text = text.into();
        let Some(index) = self.index_of(id) else {
            return self.finish(false);
        };
        let is_last = index == self.blocks.len() - 1;
        let emptied = text.is_empty();
        let mut changed = false;

        if let Some(rest) = slash_code_remainder(&self.blocks[index], &text) {
            log::debug!("Converting block {id} to code via slash command");
            self.blocks[index] = Block::Code(CodeBlock {
                id,
                content: rest,
                language: None,
            });
            changed = true;
        } else if self.blocks[index].content() != text {
            self.blocks[index].set_content(text);
            changed = true;
        }

        if emptied && !is_last {
            log::debug!("Collapsing emptied block {id} at index {index}");
            self.remove_at(index);
            changed = true;
        } else if let Some(caret) = self.focus
            && caret.block_id == id
        {
            self.focus = Some(Caret::new(id, caret.offset.min(self.blocks[index].char_len())));
        }

        changed |= self.ensure_sentinel();
        self.finish(changed)
    }

    /// Enter key. Text blocks split at the caret and the new block inherits
    /// the split block's properties. Code blocks get a line break instead.
    pub fn split_on_enter(&mut self, id: BlockId, caret_offset: usize) -> Patch {
        let Some(index) = self.index_of(id) else {
            return self.finish(false);
        };

        match &mut self.blocks[index] {
            Block::Text(text) => {
                let at = char_to_byte(&text.content, caret_offset);
                let after = text.content.split_off(at);
                let new_block = TextBlock::new(after, text.properties);
                log::debug!("Split block {id} at byte {at} into {}", new_block.id);
                self.focus = Some(Caret::new(new_block.id, 0));
                self.blocks.insert(index + 1, new_block.into());
            }
            Block::Code(code) => {
                let offset = caret_offset.min(code.content.chars().count());
                let at = char_to_byte(&code.content, offset);
                code.content.insert(at, '\n');
                self.focus = Some(Caret::new(id, offset + 1));
            }
        }

        self.ensure_sentinel();
        self.finish(true)
    }

    /// Backspace in an empty text block removes it and moves focus to the
    /// end of the previous block. The sentinel and the first block stay put.
    pub fn backspace_on_empty(&mut self, id: BlockId) -> Patch {
        let Some(index) = self.index_of(id) else {
            return self.finish(false);
        };
        if !self.blocks[index].is_empty_text() || index == 0 || index == self.blocks.len() - 1 {
            return self.finish(false);
        }

        self.blocks.remove(index);
        let previous = &self.blocks[index - 1];
        self.focus = Some(Caret::new(previous.id(), previous.char_len()));
        log::debug!("Backspace removed empty block {id}");
        self.finish(true)
    }

    /// Move focus to the neighbouring block: the end of the previous one
    /// going up, the start of the next one going down
    pub fn navigate(&mut self, id: BlockId, direction: Direction) -> Patch {
        let Some(index) = self.index_of(id) else {
            return self.finish(false);
        };
        let target = match direction {
            Direction::Up => index.checked_sub(1).map(|i| {
                let block = &self.blocks[i];
                Caret::new(block.id(), block.char_len())
            }),
            Direction::Down => self.blocks.get(index + 1).map(|b| Caret::new(b.id(), 0)),
        };
        match target {
            Some(caret) => self.set_focus(caret),
            None => self.finish(false),
        }
    }

    /// Move the block at `from_index` so it ends up at `to_index`.
    ///
    /// The sentinel can't be dragged and nothing can be dropped below it;
    /// a drop on the sentinel's slot lands just above it instead.
    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> Patch {
        let last = self.blocks.len() - 1;
        if from_index == to_index || from_index >= last || to_index > last {
            return self.finish(false);
        }
        let to_index = to_index.min(last - 1);
        if from_index == to_index {
            return self.finish(false);
        }

        let block = self.blocks.remove(from_index);
        log::debug!("Reorder block {} from {from_index} to {to_index}", block.id());
        self.blocks.insert(to_index, block);
        self.finish(true)
    }

    pub fn toggle_format(&mut self, kind: FormatKind) -> Patch {
        let Some(text) = self.focused_text_mut() else {
            return self.finish(false);
        };
        let flag = match kind {
            FormatKind::Bold => &mut text.properties.is_bold,
            FormatKind::Italic => &mut text.properties.is_italic,
            FormatKind::Underline => &mut text.properties.is_underline,
        };
        *flag = !*flag;
        self.finish(true)
    }

    pub fn set_heading(&mut self, level: HeadingType) -> Patch {
        let changed = match self.focused_text_mut() {
            Some(text) if text.properties.heading_type != level => {
                text.properties.heading_type = level;
                true
            }
            _ => false,
        };
        self.finish(changed)
    }

    pub fn set_alignment(&mut self, alignment: Alignment) -> Patch {
        let changed = match self.focused_text_mut() {
            Some(text) if text.properties.alignment != alignment => {
                text.properties.alignment = alignment;
                true
            }
            _ => false,
        };
        self.finish(changed)
    }

    pub fn insert_embed(&mut self, kind: EmbedKind, value: Option<String>) -> Patch {
        match kind {
            EmbedKind::Code => self.insert_code_block(value.unwrap_or_default()),
        }
    }

    /// Insert a code block after the focused block, or just above the
    /// sentinel when nothing has focus. The new block takes focus.
    pub fn insert_code_block(&mut self, initial_content: impl Into<String>) -> Patch {
        let position = self
            .focus
            .and_then(|caret| self.index_of(caret.block_id))
            .map(|index| index + 1)
            .unwrap_or(self.blocks.len() - 1);

        let code = CodeBlock::new(initial_content, None);
        let caret = Caret::new(code.id, code.content.chars().count());
        log::debug!("Inserting code block {} at index {position}", code.id);
        self.blocks.insert(position, code.into());
        self.focus = Some(caret);
        self.ensure_sentinel();
        self.finish(true)
    }

    /// Host reports that a block gained focus. The offset is clamped.
    pub fn focus_block(&mut self, id: BlockId, offset: usize) -> Patch {
        match self.block(id) {
            Some(block) => {
                let caret = Caret::new(id, offset.min(block.char_len()));
                self.set_focus(caret)
            }
            None => self.finish(false),
        }
    }

    pub fn blur(&mut self) -> Patch {
        let changed = self.focus.take().is_some();
        self.finish(changed)
    }

    /// Route one of the keys the model owns. Anything else, and Backspace
    /// inside a non-empty block, is left to the host's native editing.
    pub fn handle_key(&mut self, id: BlockId, key: Key, caret_offset: usize) -> KeyOutcome {
        let Some(is_empty_text) = self.block(id).map(Block::is_empty_text) else {
            return KeyOutcome::PassThrough;
        };
        match key {
            Key::Enter => KeyOutcome::Handled(self.split_on_enter(id, caret_offset)),
            Key::Backspace if is_empty_text => {
                KeyOutcome::Handled(self.backspace_on_empty(id))
            }
            Key::ArrowUp => KeyOutcome::Handled(self.navigate(id, Direction::Up)),
            Key::ArrowDown => KeyOutcome::Handled(self.navigate(id, Direction::Down)),
            Key::Backspace | Key::Other => KeyOutcome::PassThrough,
        }
    }

    /// Active formatting of the focused block, neutral when nothing
    /// (or a code block) has focus
    pub fn current_format_state(&self) -> FormatState {
        self.focused_block()
            .and_then(Block::as_text)
            .map(|text| FormatState::from(&text.properties))
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        let focused = self.focus.map(|caret| caret.block_id);
        DocumentSnapshot {
            version: self.version,
            focus: self.focus,
            blocks: self
                .blocks
                .iter()
                .map(|block| RenderBlock::from_block(block, focused == Some(block.id())))
                .collect(),
        }
    }

    /// Check the sequence invariants; used by tests and debug assertions
    pub fn invariants_hold(&self) -> bool {
        let sentinel_ok = self.blocks.last().is_some_and(Block::is_empty_text);
        let mut seen = HashSet::with_capacity(self.blocks.len());
        let ids_unique = self.blocks.iter().all(|b| seen.insert(b.id()));
        sentinel_ok && ids_unique
    }

    fn focused_text_mut(&mut self) -> Option<&mut TextBlock> {
        let id = self.focus?.block_id;
        self.blocks
            .iter_mut()
            .find(|b| b.id() == id)
            .and_then(Block::as_text_mut)
    }

    fn set_focus(&mut self, caret: Caret) -> Patch {
        let changed = self.focus != Some(caret);
        self.focus = Some(caret);
        self.finish(changed)
    }

    /// Remove a block, handing focus to a neighbour if it had it
    fn remove_at(&mut self, index: usize) -> Block {
        let removed = self.blocks.remove(index);
        if self.focus.is_some_and(|caret| caret.block_id == removed.id()) {
            self.focus = match index.checked_sub(1) {
                Some(previous) => {
                    let block = &self.blocks[previous];
                    Some(Caret::new(block.id(), block.char_len()))
                }
                None => self.blocks.first().map(|b| Caret::new(b.id(), 0)),
            };
        }
        removed
    }

    /// Append a fresh sentinel if the last block isn't an empty text block
    fn ensure_sentinel(&mut self) -> bool {
        if self.blocks.last().is_some_and(Block::is_empty_text) {
            return false;
        }
        log::trace!("Appending sentinel block");
        self.blocks.push(TextBlock::empty().into());
        true
    }

    fn finish(&mut self, changed: bool) -> Patch {
        if changed {
            self.version += 1;
        }
        debug_assert!(self.invariants_hold(), "block invariants violated");
        Patch {
            changed,
            selection: self.focus,
            version: self.version,
        }
    }
}

/// Remainder of `/code...` typed into a text block, trimmed
fn slash_code_remainder(block: &Block, text: &str) -> Option<String> {
    static SLASH_CODE: OnceLock<Regex> = OnceLock::new();
    if block.is_code() {
        return None;
    }
    let regex =
        SLASH_CODE.get_or_init(|| Regex::new(r"(?s)^/code(.*)$").expect("Invalid slash regex"));
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|rest| rest.as_str().trim().to_string())
}

/// Byte index of the `offset`-th char, clamped to the end of `s`
fn char_to_byte(s: &str, offset: usize) -> usize {
    s.char_indices().nth(offset).map_or(s.len(), |(byte, _)| byte)
}
