//! BoothKit Application
//!
//! Headless command-line front end over the editor core: generate preset
//! templates, lay them out, try snapping and export them as PNG.

mod cli;
mod commands;
mod error;

pub use cli::{Cli, Command};
pub use commands::run;
pub use error::{CliError, CliResult};
