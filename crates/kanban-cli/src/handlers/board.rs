use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &CliContext, action: BoardAction) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    match action {
        BoardAction::Create {
            title,
            description,
            background,
        } => {
            let board = ctx
                .ops
                .create_board(&actor, title, description, background)
                .await?;
            output::output_success(&board);
        }
        BoardAction::List => {
            let boards = ctx.ops.boards(&actor).await?;
            output::output_list(boards);
        }
        BoardAction::Delete { id } => {
            ctx.ops.delete_board(&actor, id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}));
        }
        BoardAction::Lists { id } => {
            let lists = ctx.ops.board_lists(&actor, id).await?;
            output::output_list(lists);
        }
        BoardAction::Invite { id, user, role } => {
            let board = ctx.ops.invite_member(&actor, id, user, role.into()).await?;
            output::output_success(&board);
        }
        BoardAction::Activity { id, limit } => {
            let records = ctx.ops.activity(&actor, id, limit).await?;
            output::output_list(records);
        }
    }
    Ok(())
}
