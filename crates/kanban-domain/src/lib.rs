pub mod activity;
pub mod actor;
pub mod board;
pub mod card;
pub mod column;
pub mod commands;
pub mod container_index;
pub mod document;
pub mod field_update;
pub mod move_request;
pub mod position;
pub mod view;

pub use activity::{ActivityAction, ActivityId, ActivityRecord};
pub use actor::Actor;
pub use board::{Board, BoardId, BoardRole, Member, UserId, Visibility};
pub use card::{Card, CardId, CardUpdate, NewCard};
pub use column::{Column, ColumnId};
pub use container_index::{Container, ContainerIndex, Placed};
pub use document::{BoardDocument, ReconcileReport};
pub use field_update::FieldUpdate;
pub use move_request::{MoveRequest, Placement};
pub use position::{Neighbors, PositionAllocator};
pub use view::{CardView, ListView, MoveOutcome, Positioned, UserSummary};
