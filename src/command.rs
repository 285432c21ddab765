//! Host event commands, reduced to what message and choice handling reads.

/// What an event command does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandKind {
    /// Code 101: header of a message; its lines follow as [`CommandKind::TextLine`].
    ShowText {
        face_name: String,
        face_index: u32,
        background: u8,
        position: u8,
    },
    /// Code 401.
    TextLine(String),
    /// Code 102. `cancel_type`: 0 disallow, 1..=4 a choice, 5 own branch.
    ShowChoices { choices: Vec<String>, cancel_type: u32 },
    /// Code 402: "when choice n".
    ChoiceBranch(u32),
    /// Code 403: "when cancel".
    CancelBranch,
    /// Code 404.
    BranchEnd,
    /// Code 103.
    InputNumber,
    /// Code 104.
    SelectItem,
    /// Anything else, by host code.
    Other(u16),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventCommand {
    pub indent: u32,
    pub kind: CommandKind,
}

impl EventCommand {
    pub fn new(indent: u32, kind: CommandKind) -> Self {
        Self { indent, kind }
    }

    pub fn code(&self) -> u16 {
        match self.kind {
            CommandKind::ShowText { .. } => 101,
            CommandKind::TextLine(_) => 401,
            CommandKind::ShowChoices { .. } => 102,
            CommandKind::ChoiceBranch(_) => 402,
            CommandKind::CancelBranch => 403,
            CommandKind::BranchEnd => 404,
            CommandKind::InputNumber => 103,
            CommandKind::SelectItem => 104,
            CommandKind::Other(code) => code,
        }
    }

    pub fn text_line(&self) -> Option<&str> {
        match &self.kind {
            CommandKind::TextLine(s) => Some(s),
            _ => None,
        }
    }
}
