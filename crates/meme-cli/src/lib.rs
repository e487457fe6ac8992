//! # meme-cli
//!
//! The bot's command grammar. The same parser serves chat messages (the
//! prefix plays the program name) and the `mb` helper binary, which reports
//! the requested configuration action through its exit code.

pub mod command;
pub mod exit;

pub use command::{
    build_command, parse_args, parse_chat_command, ChannelAction, Cli, Command, EXAMPLES,
};
pub use exit::HelperExit;
