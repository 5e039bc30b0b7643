use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use kanban_domain::BoardRole;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "kanban")]
#[command(about = "Collaborative kanban boards from the command line", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to kanban data file (or set KANBAN_FILE env var)
    #[arg(long, global = true, value_name = "FILE", env = "KANBAN_FILE")]
    pub file: Option<PathBuf>,

    /// User id to act as (or set KANBAN_USER env var)
    #[arg(long = "as-user", global = true, value_name = "USER_ID", env = "KANBAN_USER")]
    pub as_user: Option<Uuid>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Board operations
    Board(BoardCommand),
    /// List (column) operations
    List(ListCommand),
    /// Card operations
    Card(CardCommand),
    /// Serve the HTTP API over the data file
    Serve(ServeArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Owner,
    Member,
}

impl From<RoleArg> for BoardRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Owner => BoardRole::Owner,
            RoleArg::Member => BoardRole::Member,
        }
    }
}

// Board commands
#[derive(Args)]
pub struct BoardCommand {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a new board owned by the acting user
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        background: Option<String>,
    },
    /// List boards the acting user belongs to
    List,
    /// Delete a board (owner only)
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Show a board's lists with their cards
    Lists {
        #[arg(long)]
        id: Uuid,
    },
    /// Invite a user to a board (owner only)
    Invite {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        user: Uuid,
        #[arg(long, value_enum, default_value = "member")]
        role: RoleArg,
    },
    /// Show recent activity, newest first
    Activity {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        limit: Option<usize>,
    },
}

// List commands
#[derive(Args)]
pub struct ListCommand {
    #[command(subcommand)]
    pub action: ListAction,
}

#[derive(Subcommand)]
pub enum ListAction {
    /// Append a new list to a board
    Create {
        #[arg(long)]
        board_id: Uuid,
        #[arg(long)]
        title: String,
    },
    /// Delete a list and the cards in it
    Delete {
        #[arg(long)]
        board_id: Uuid,
        #[arg(long)]
        id: Uuid,
    },
    /// Reorder lists (owner only). Unnamed lists keep their order after the named ones.
    Reorder {
        #[arg(long)]
        board_id: Uuid,
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<Uuid>,
    },
}

// Card commands
#[derive(Args)]
pub struct CardCommand {
    #[command(subcommand)]
    pub action: CardAction,
}

#[derive(Subcommand)]
pub enum CardAction {
    /// Create a card at the end of a list
    Create(CardCreateArgs),
    /// Update a card's payload
    Update(CardUpdateArgs),
    /// Move a card within or across lists
    Move(CardMoveArgs),
    /// Reorder a card within its list
    Reorder {
        #[arg(long)]
        board_id: Uuid,
        #[arg(long)]
        list_id: Uuid,
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        index: usize,
    },
    /// Delete a card
    Delete {
        #[arg(long)]
        board_id: Uuid,
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Args)]
pub struct CardCreateArgs {
    #[arg(long)]
    pub board_id: Uuid,
    #[arg(long)]
    pub list_id: Uuid,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long = "label")]
    pub labels: Vec<String>,
    #[arg(long = "assignee")]
    pub assignees: Vec<Uuid>,
    /// RFC 3339 timestamp
    #[arg(long)]
    pub due: Option<DateTime<Utc>>,
}

#[derive(Args)]
pub struct CardUpdateArgs {
    #[arg(long)]
    pub board_id: Uuid,
    #[arg(long)]
    pub id: Uuid,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,
    #[arg(long)]
    pub clear_description: bool,
    /// Replaces all labels
    #[arg(long = "label", conflicts_with = "clear_labels")]
    pub labels: Option<Vec<String>>,
    #[arg(long)]
    pub clear_labels: bool,
    /// Replaces all assignees
    #[arg(long = "assignee")]
    pub assignees: Option<Vec<Uuid>>,
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<DateTime<Utc>>,
    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Args)]
pub struct CardMoveArgs {
    #[arg(long)]
    pub board_id: Uuid,
    #[arg(long)]
    pub id: Uuid,
    /// List the card is in now
    #[arg(long)]
    pub from: Uuid,
    /// Destination list
    #[arg(long)]
    pub to: Uuid,
    /// 0-based destination index, clamped to the list length
    #[arg(long, conflicts_with_all = ["before", "after"])]
    pub index: Option<usize>,
    /// Card that should end up directly above
    #[arg(long)]
    pub before: Option<Uuid>,
    /// Card that should end up directly below
    #[arg(long)]
    pub after: Option<Uuid>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (defaults to the configured bind address)
    #[arg(long)]
    pub bind: Option<String>,
}
