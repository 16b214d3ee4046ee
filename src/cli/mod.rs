pub mod cli;

pub use cli::{Cli, handle_cli};
