//! Event handlers translating domain events into multiplexer commands.

pub mod clear;
pub mod enter;
pub mod title;

pub use clear::ClearHandler;
pub use enter::EnterHandler;
pub use title::TitleHandler;
