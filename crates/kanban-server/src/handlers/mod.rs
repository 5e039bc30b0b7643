pub mod boards;
pub mod cards;
pub mod lists;
