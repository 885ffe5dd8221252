// CLI module
// Public interface for the interactive terminal screens

pub(crate) mod input;
pub(crate) mod render;
mod shell;

pub use shell::Shell;
