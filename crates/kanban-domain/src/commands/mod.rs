use kanban_core::{KanbanError, KanbanResult};

use crate::document::BoardDocument;

pub mod board_commands;
pub mod card_commands;
pub mod column_commands;

pub use board_commands::*;
pub use card_commands::*;
pub use column_commands::*;

/// A mutation of one board document.
///
/// Commands validate before they touch anything, so a failed command leaves
/// the document as it was.
pub trait Command: Send + Sync {
    fn execute(&self, context: &mut CommandContext) -> KanbanResult<()>;

    /// Human-readable description of what this command does
    fn description(&self) -> String;
}

pub struct CommandContext<'a> {
    pub document: &'a mut BoardDocument,
}

impl<'a> CommandContext<'a> {
    pub fn new(document: &'a mut BoardDocument) -> Self {
        Self { document }
    }
}

pub(crate) fn require_title(title: &str, what: &str) -> KanbanResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(KanbanError::Validation(format!("{} title must not be empty", what)));
    }
    Ok(trimmed.to_string())
}
