pub mod drag;
pub mod http;
pub mod transport;

pub use drag::{DragSession, DragState, DropTarget, FailureClass, Resolution};
pub use http::HttpTransport;
pub use transport::{LocalTransport, MoveTransport};
