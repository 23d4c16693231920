mod config_cmd;
mod grocery;
mod init;
mod random;
mod recipe;
mod transfer;

pub use config_cmd::ConfigCommand;
pub use grocery::GroceryCommand;
pub use init::InitCommand;
pub use random::RandomCommand;
pub use recipe::{AddCommand, DeleteCommand, ListCommand};
pub use transfer::{ExportCommand, ImportCommand, SnapshotCommand};

use clap::ValueEnum;

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
