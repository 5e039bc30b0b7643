use crate::cli::{CardAction, CardCreateArgs, CardMoveArgs, CardUpdateArgs};
use crate::context::CliContext;
use crate::output;
use kanban_domain::{CardUpdate, FieldUpdate, MoveRequest, NewCard, Placement};

pub async fn handle(ctx: &CliContext, action: CardAction) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    match action {
        CardAction::Create(args) => {
            let (board_id, list_id) = (args.board_id, args.list_id);
            let card = ctx
                .ops
                .create_card(&actor, board_id, list_id, new_card(args))
                .await?;
            output::output_success(&card);
        }
        CardAction::Update(args) => {
            let (board_id, id) = (args.board_id, args.id);
            let card = ctx
                .ops
                .update_card(&actor, board_id, id, card_update(args))
                .await?;
            output::output_success(&card);
        }
        CardAction::Move(args) => {
            let board_id = args.board_id;
            let outcome = ctx.ops.move_card(&actor, board_id, move_request(args)).await?;
            output::output_success(&outcome);
        }
        CardAction::Reorder {
            board_id,
            list_id,
            id,
            index,
        } => {
            let outcome = ctx
                .ops
                .reorder_card(&actor, board_id, list_id, id, index)
                .await?;
            output::output_success(&outcome);
        }
        CardAction::Delete { board_id, id } => {
            ctx.ops.delete_card(&actor, board_id, id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}));
        }
    }
    Ok(())
}

fn new_card(args: CardCreateArgs) -> NewCard {
    NewCard {
        title: args.title,
        description: args.description,
        labels: args.labels.into_iter().collect(),
        assignees: args.assignees.into_iter().collect(),
        due_date: args.due,
    }
}

fn card_update(args: CardUpdateArgs) -> CardUpdate {
    let labels = if args.clear_labels {
        Some(Default::default())
    } else {
        args.labels.map(|labels| labels.into_iter().collect())
    };
    CardUpdate {
        title: args.title,
        description: FieldUpdate::from_parts(args.description, args.clear_description),
        labels,
        assignees: args.assignees.map(|ids| ids.into_iter().collect()),
        due_date: FieldUpdate::from_parts(args.due, args.clear_due),
    }
}

/// Without `--index`, the card goes between `--before` and `--after`, or to
/// the end of the list when neither is given.
fn move_request(args: CardMoveArgs) -> MoveRequest {
    let placement = match args.index {
        Some(index) => Placement::at(index),
        None => Placement::between(args.before, args.after),
    };
    MoveRequest {
        card_id: args.id,
        from_column_id: args.from,
        to_column_id: args.to,
        placement,
    }
}
