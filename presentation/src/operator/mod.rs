//! Human operator adapters

mod console;

pub use console::ConsoleOperator;
