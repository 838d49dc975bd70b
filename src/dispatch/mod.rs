//! Topic-keyed event dispatch with isolated handler failures.

pub mod dispatcher;
pub mod handlers;

pub use dispatcher::{Dispatcher, EventDispatcher, EventHandler, NullDispatcher};
