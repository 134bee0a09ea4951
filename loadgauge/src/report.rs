mod console;
mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
