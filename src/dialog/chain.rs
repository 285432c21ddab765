//! Reading a message, and any messages chained onto it, out of an event's
//! command list.

use super::escape::{has_bubble_directive, has_chain_directive};
use crate::command::{CommandKind, EventCommand};

/// Input command that runs right after the message closes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FollowUp {
    /// Index of a "show choices" command.
    Choices(usize),
    NumberInput(usize),
    ItemSelect(usize),
}

impl FollowUp {
    fn at(commands: &[EventCommand], index: usize) -> Option<Self> {
        match commands.get(index)?.kind {
            CommandKind::ShowChoices { .. } => Some(Self::Choices(index)),
            CommandKind::InputNumber => Some(Self::NumberInput(index)),
            CommandKind::SelectItem => Some(Self::ItemSelect(index)),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match *self {
            Self::Choices(i) | Self::NumberInput(i) | Self::ItemSelect(i) => i,
        }
    }
}

/// One message window's worth of text and where the interpreter resumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectedMessage {
    pub face_name: String,
    pub face_index: u32,
    pub background: u8,
    pub position: u8,
    pub lines: Vec<String>,
    /// Several "show text" commands were folded into this one.
    pub chained: bool,
    pub follow_up: Option<FollowUp>,
    /// First command not consumed by the message (the follow-up included).
    pub next: usize,
}

/// Lines of the "show text" at `start` and the index just past them.
fn text_lines(commands: &[EventCommand], start: usize) -> (Vec<String>, usize) {
    let lines: Vec<String> = commands[start + 1..]
        .iter()
        .map_while(|c| c.text_line().map(str::to_string))
        .collect();
    let end = start + 1 + lines.len();
    (lines, end)
}

/// Collect the message starting at `start`, which must be a "show text".
///
/// When its lines contain `\BMC[`, directly following "show text" commands
/// join the same window until one carries a bubble directive of its own.
/// An input command between two chained messages is stepped over; one after
/// the last message becomes the follow-up.
pub fn collect_message(commands: &[EventCommand], start: usize) -> Option<CollectedMessage> {
    let CommandKind::ShowText { face_name, face_index, background, position } = &commands.get(start)?.kind else {
        return None;
    };

    let (first, mut index) = text_lines(commands, start);
    let chained = has_chain_directive(&first.concat());
    let mut lines = first;
    let mut count = 1;

    if chained {
        loop {
            let after_input = index + usize::from(FollowUp::at(commands, index).is_some());
            let Some(CommandKind::ShowText { .. }) = commands.get(after_input).map(|c| &c.kind) else {
                break;
            };
            let (more, end) = text_lines(commands, after_input);
            if has_bubble_directive(&more.concat()) {
                break;
            }
            if after_input != index {
                tracing::debug!(index, "input command inside a message chain skipped");
            }
            lines.extend(more);
            index = end;
            count += 1;
        }
        tracing::debug!(start, messages = count, "chained messages collected");
    }

    let follow_up = FollowUp::at(commands, index);
    let next = follow_up.map_or(index, |f| f.index() + 1);

    Some(CollectedMessage {
        face_name: face_name.clone(),
        face_index: *face_index,
        background: *background,
        position: *position,
        lines,
        chained: count > 1,
        follow_up,
        next,
    })
}
