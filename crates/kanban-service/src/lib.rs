pub mod board_service;
pub mod config;
pub mod context;
pub mod locks;
pub mod move_coordinator;
pub mod operations;

#[cfg(test)]
mod test_support;

pub use board_service::BoardService;
pub use config::ServiceConfig;
pub use context::ServiceContext;
pub use locks::BoardLocks;
pub use move_coordinator::MoveCoordinator;
pub use operations::{KanbanOperations, KanbanService};
