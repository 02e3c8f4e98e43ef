pub mod console;
pub mod file;

pub use console::*;
pub use file::*;
