//! policychat — terminal chat client for a policy Q&A backend.
//!
//! One turn = health check, then query, rendered into a chat view.
//! The same turn controller drives the TUI, the REPL, and one-shot asks.

pub mod api;
pub mod chat;
pub mod config;
pub mod repl;
pub mod tui;
