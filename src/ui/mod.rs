pub mod console;

pub use console::{ConsoleIo, EventPrinter};
