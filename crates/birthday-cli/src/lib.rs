//! Birthday Book CLI
//!
//! The interactive manager, its command table and the read-eval loop.

mod command;
mod console;
mod manager;
pub mod repl;

pub use command::{Command, Flow, UnknownCommand};
pub use console::Console;
pub use manager::Manager;
