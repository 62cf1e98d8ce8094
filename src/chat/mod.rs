//! Chat turns — the message model, the view contract, and the controller
//! that runs one question through the backend.

pub mod message;
pub mod transcript;
pub mod turn;
pub mod view;

pub use message::{format_sources, ChatMessage, MessageId, Role};
pub use transcript::{Entry, Transcript};
pub use turn::{PendingTurn, TurnController};
pub use view::{ChatView, ViewUpdate};
