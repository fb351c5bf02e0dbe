pub mod commands;
pub mod assess;

pub use commands::{Cli, Commands};
