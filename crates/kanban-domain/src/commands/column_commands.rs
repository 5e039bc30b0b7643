use super::{require_title, Command, CommandContext};
use crate::column::{Column, ColumnId};
use chrono::Utc;
use kanban_core::{KanbanError, KanbanResult};
use std::collections::HashSet;

/// Append a column after the existing ones.
pub struct CreateColumn {
    pub column_id: ColumnId,
    pub title: String,
}

impl Command for CreateColumn {
    fn execute(&self, context: &mut CommandContext) -> KanbanResult<()> {
        let title = require_title(&self.title, "list")?;
        let doc = &mut context.document;
        if doc.column(self.column_id).is_some() {
            return Err(KanbanError::Validation(format!(
                "list {} already exists",
                self.column_id
            )));
        }
        let mut column = Column::new(doc.id(), title, doc.next_column_position());
        column.id = self.column_id;
        doc.columns.push(column);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Create list: '{}'", self.title)
    }
}

/// Delete a column and every card in it.
pub struct DeleteColumn {
    pub column_id: ColumnId,
}

impl Command for DeleteColumn {
    fn execute(&self, context: &mut CommandContext) -> KanbanResult<()> {
        context
            .document
            .remove_column(self.column_id)
            .map(|_| ())
            .ok_or_else(|| KanbanError::NotFound(format!("list {}", self.column_id)))
    }

    fn description(&self) -> String {
        format!("Delete list {}", self.column_id)
    }
}

/// Put the named columns first, in the given order, and renumber every column
/// `1..N`. Columns left out keep their relative order after the named ones.
pub struct ReorderColumns {
    pub ordered_ids: Vec<ColumnId>,
}

impl Command for ReorderColumns {
    fn execute(&self, context: &mut CommandContext) -> KanbanResult<()> {
        let doc = &mut context.document;
        let mut seen = HashSet::new();
        for id in &self.ordered_ids {
            if doc.column(*id).is_none() {
                return Err(KanbanError::InvalidContainer(format!(
                    "list {} is not on board {}",
                    id,
                    doc.id()
                )));
            }
            if !seen.insert(*id) {
                return Err(KanbanError::Validation(format!("list {} named twice", id)));
            }
        }

        let rest: Vec<ColumnId> = doc
            .ordered_columns()
            .into_iter()
            .map(|c| c.id)
            .filter(|id| !seen.contains(id))
            .collect();
        let now = Utc::now();
        for (slot, id) in self.ordered_ids.iter().chain(rest.iter()).enumerate() {
            if let Some(column) = doc.column_mut(*id) {
                column.position = (slot + 1) as f64;
                column.updated_at = now;
            }
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Reorder {} lists", self.ordered_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::card::Card;
    use crate::document::BoardDocument;
    use uuid::Uuid;

    fn document_with(titles: &[&str]) -> (BoardDocument, Vec<ColumnId>) {
        let mut doc = BoardDocument::new(Board::new("Board".to_string(), Uuid::new_v4()));
        let mut ids = Vec::new();
        for title in titles {
            let id = Uuid::new_v4();
            CreateColumn {
                column_id: id,
                title: title.to_string(),
            }
            .execute(&mut CommandContext::new(&mut doc))
            .unwrap();
            ids.push(id);
        }
        (doc, ids)
    }

    fn order(doc: &BoardDocument) -> Vec<ColumnId> {
        doc.ordered_columns().into_iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_create_appends_at_end() {
        let (doc, ids) = document_with(&["Todo", "Doing", "Done"]);
        assert_eq!(order(&doc), ids);
        assert_eq!(doc.column(ids[2]).unwrap().position, 3.0);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let (mut doc, _) = document_with(&[]);
        let err = CreateColumn {
            column_id: Uuid::new_v4(),
            title: "   ".to_string(),
        }
        .execute(&mut CommandContext::new(&mut doc))
        .unwrap_err();
        assert!(matches!(err, KanbanError::Validation(_)));
        assert!(doc.columns.is_empty());
    }

    #[test]
    fn test_delete_removes_held_cards() {
        let (mut doc, ids) = document_with(&["Todo", "Done"]);
        let card = Card::new(doc.id(), ids[0], "Ship".to_string(), 1.0);
        doc.push_card(card);

        DeleteColumn { column_id: ids[0] }
            .execute(&mut CommandContext::new(&mut doc))
            .unwrap();

        assert_eq!(order(&doc), vec![ids[1]]);
        assert!(doc.cards.is_empty());
    }

    #[test]
    fn test_delete_unknown_column() {
        let (mut doc, _) = document_with(&["Todo"]);
        let err = DeleteColumn {
            column_id: Uuid::new_v4(),
        }
        .execute(&mut CommandContext::new(&mut doc))
        .unwrap_err();
        assert!(matches!(err, KanbanError::NotFound(_)));
    }

    #[test]
    fn test_reorder_keeps_omitted_columns_after_named() {
        let (mut doc, ids) = document_with(&["A", "B", "C", "D"]);

        ReorderColumns {
            ordered_ids: vec![ids[2], ids[0]],
        }
        .execute(&mut CommandContext::new(&mut doc))
        .unwrap();

        assert_eq!(order(&doc), vec![ids[2], ids[0], ids[1], ids[3]]);
        let positions: Vec<f64> = doc.ordered_columns().iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_reorder_unknown_column_changes_nothing() {
        let (mut doc, ids) = document_with(&["A", "B"]);
        let before = doc.clone();

        let err = ReorderColumns {
            ordered_ids: vec![ids[1], Uuid::new_v4()],
        }
        .execute(&mut CommandContext::new(&mut doc))
        .unwrap_err();

        assert!(matches!(err, KanbanError::InvalidContainer(_)));
        assert_eq!(doc, before);
    }
}
