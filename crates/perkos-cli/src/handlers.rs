//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod batch;
mod check;
mod completions;
mod list;
mod utils;

pub use batch::handle_batch;
pub use check::handle_check;
pub use completions::handle_completions;
pub use list::handle_list;
