pub mod commands;
pub mod registry;

pub use commands::{format_pong, CommandHandler};
pub use registry::{command_table, ArgValue, BotCommand, CommandSpec, OptionKind};
