use crate::cli::ListAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &CliContext, action: ListAction) -> anyhow::Result<()> {
    let actor = ctx.actor()?;
    match action {
        ListAction::Create { board_id, title } => {
            let list = ctx.ops.create_list(&actor, board_id, title).await?;
            output::output_success(&list);
        }
        ListAction::Delete { board_id, id } => {
            ctx.ops.delete_list(&actor, board_id, id).await?;
            output::output_success(serde_json::json!({"deleted": id.to_string()}));
        }
        ListAction::Reorder { board_id, ids } => {
            let lists = ctx.ops.reorder_lists(&actor, board_id, ids).await?;
            output::output_list(lists);
        }
    }
    Ok(())
}
