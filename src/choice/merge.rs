// =============================================================================
// MERGE — Flatten consecutive "show choices" commands into one list
//
// The host reserves `stride` branch values per block (4 choices + cancel), so
// block n's choice i answers with `n * stride + i` and every slot stays
// globally unique after merging.
// =============================================================================

use crate::command::{CommandKind, EventCommand};

/// Cancel setting of a single block, as authored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CancelType {
    Disallow,
    /// 0-based choice that cancel selects.
    Choice(usize),
    /// The block's own "when cancel" branch.
    Branch,
}

impl CancelType {
    /// Decode the host parameter: 0 disallow, 1..=4 a choice, 5 branch.
    pub fn from_param(param: u32) -> Self {
        match param {
            0 => Self::Disallow,
            1..=4 => Self::Choice(param as usize - 1),
            _ => Self::Branch,
        }
    }
}

/// One "show choices" command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawChoiceBlock {
    pub choices: Vec<String>,
    pub cancel: CancelType,
}

impl RawChoiceBlock {
    pub fn new<S: Into<String>>(choices: impl IntoIterator<Item = S>, cancel: CancelType) -> Self {
        Self { choices: choices.into_iter().map(Into::into).collect(), cancel }
    }
}

/// Where cancel leads after merging.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CancelSlot {
    /// Cancel picks the entry with this slot.
    Choice(usize),
    /// Cancel resolves with this value (a block's cancel branch).
    Branch(usize),
}

/// A choice before filtering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEntry {
    pub slot: usize,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergedChoiceSet {
    pub entries: Vec<RawEntry>,
    pub cancel: Option<CancelSlot>,
    pub stride: usize,
    pub block_count: usize,
}

impl MergedChoiceSet {
    /// Map a resolved value back to `(block, local)`. `local == stride - 1`
    /// is that block's cancel branch.
    pub fn locate(&self, slot: usize) -> Option<(usize, usize)> {
        if self.stride == 0 {
            return None;
        }
        let (block, local) = (slot / self.stride, slot % self.stride);
        (block < self.block_count).then_some((block, local))
    }
}

/// Merge blocks in order; block `n` is offset by `n * stride`. The last block
/// whose cancel setting is not `Disallow` decides cancel.
pub fn merge_blocks(blocks: &[RawChoiceBlock], stride: usize) -> MergedChoiceSet {
    let mut entries = Vec::new();
    let mut cancel = None;

    for (n, block) in blocks.iter().enumerate() {
        let depth = n * stride;
        entries.extend(block.choices.iter().enumerate().map(|(i, text)| RawEntry {
            slot: depth + i,
            text: text.clone(),
        }));
        match block.cancel {
            CancelType::Disallow => {}
            CancelType::Choice(i) => cancel = Some(CancelSlot::Choice(depth + i)),
            // The branch answers with the last value reserved for its block.
            CancelType::Branch => cancel = Some(CancelSlot::Branch(depth + stride.saturating_sub(1))),
        }
    }

    tracing::debug!(blocks = blocks.len(), entries = entries.len(), ?cancel, "choice blocks merged");
    MergedChoiceSet { entries, cancel, stride, block_count: blocks.len() }
}

/// Gather the "show choices" block at `start` and every block that directly
/// follows its branch end at the same indent.
pub fn collect_choice_blocks(commands: &[EventCommand], start: usize) -> Vec<RawChoiceBlock> {
    let mut blocks = Vec::new();
    let mut index = start;

    while let Some(cmd) = commands.get(index) {
        let CommandKind::ShowChoices { choices, cancel_type } = &cmd.kind else {
            break;
        };
        blocks.push(RawChoiceBlock {
            choices: choices.clone(),
            cancel: CancelType::from_param(*cancel_type),
        });

        let indent = cmd.indent;
        let end = commands[index + 1..]
            .iter()
            .position(|c| c.indent == indent && c.kind == CommandKind::BranchEnd);
        match end {
            Some(offset) => index += offset + 2,
            None => {
                tracing::warn!(start = index, "choice block has no branch end");
                break;
            }
        }
    }

    blocks
}
