use super::{require_title, Command, CommandContext};
use crate::card::{Card, CardId, CardUpdate, NewCard};
use crate::column::ColumnId;
use kanban_core::{KanbanError, KanbanResult};

/// Create a card at the end of a column.
pub struct CreateCard {
    pub card_id: CardId,
    pub column_id: ColumnId,
    pub card: NewCard,
}

impl Command for CreateCard {
    fn execute(&self, context: &mut CommandContext) -> KanbanResult<()> {
        let title = require_title(&self.card.title, "card")?;
        let doc = &mut context.document;
        if doc.column(self.column_id).is_none() {
            return Err(KanbanError::NotFound(format!("list {}", self.column_id)));
        }

        let position = doc.next_card_position(self.column_id);
        let mut card = Card::new(doc.id(), self.column_id, title, position);
        card.id = self.card_id;
        card.description = self.card.description.clone();
        card.labels = self.card.labels.clone();
        card.assignees = self.card.assignees.clone();
        card.due_date = self.card.due_date;
        doc.push_card(card);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create card: '{}'", self.card.title)
    }
}

/// Edit a card's payload. Never changes its column or position.
pub struct UpdateCard {
    pub card_id: CardId,
    pub updates: CardUpdate,
}

impl Command for UpdateCard {
    fn execute(&self, context: &mut CommandContext) -> KanbanResult<()> {
        let mut updates = self.updates.clone();
        if let Some(title) = updates.title.as_deref() {
            updates.title = Some(require_title(title, "card")?);
        }
        let card = context
            .document
            .card_mut(self.card_id)
            .ok_or_else(|| KanbanError::NotFound(format!("card {}", self.card_id)))?;
        card.update(updates);
        Ok(())
    }

    fn description(&self) -> String {
        "Update card".to_string()
    }
}

/// Delete a card. Siblings keep their positions.
pub struct DeleteCard {
    pub card_id: CardId,
}

impl Command for DeleteCard {
    fn execute(&self, context: &mut CommandContext) -> KanbanResult<()> {
        context
            .document
            .remove_card(self.card_id)
            .map(|_| ())
            .ok_or_else(|| KanbanError::NotFound(format!("card {}", self.card_id)))
    }

    fn description(&self) -> String {
        format!("Delete card {}", self.card_id)
    }
}
