use crate::models::BlockId;

/// Logical caret: a block and a char offset into its content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caret {
    pub block_id: BlockId,
    pub offset: usize,
}

impl Caret {
    pub fn new(block_id: BlockId, offset: usize) -> Self {
        Self { block_id, offset }
    }
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// False when the command left the document untouched; hosts skip re-rendering
    pub changed: bool,
    /// Focus after the command
    pub selection: Option<Caret>,
    pub version: u64,
}
