//! Terminal chat UI — ratatui presentation layer.
//!
//! ## Architecture (TEA)
//!
//! Model (`ChatApp`) + Update (message handler) + View (render).
//! Turns run on spawned tasks and talk back through a channel; the app
//! applies their updates in order on the UI loop.

pub mod app;
pub mod autosize;
pub mod event;
pub mod input;
pub mod layout;
pub mod runner;
