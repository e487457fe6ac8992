//! Command grammar (clap derive)

use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};

/// Usage examples shown with `--example --help`
pub const EXAMPLES: &str = "\
Examples:

  mb --version
  mb -v

  mb --help
  mb -h

  mb init @AdminRole
  mb i @AdminRole

  mb cmd #bot-commands
  mb c #bot-commands
  mb cmd
  mb c

  mb meme #memes
  mb m --disable

  mb limit 3
  mb status

  mb post
  mb post --no-attribution";

const EXAMPLES_HINT: &str = "  Print examples using --example -h";

/// MemeBot - Automates and manages meme channels for guilds
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "mb", about = "MemeBot - Automates and manages meme channels for guilds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Print examples with the help output
    #[arg(short = 'e', long = "example", global = true)]
    pub example: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Initialize this guild; sets the cmd channel to the one this command is
    /// issued in, and the admin role to <ADMIN_ROLE>
    #[command(alias = "i")]
    Init { admin_role: String },

    /// Set the cmd channel to [CMD_CHANNEL], or get the current cmd channel
    #[command(alias = "c")]
    Cmd {
        cmd_channel: Option<String>,
        /// Disable the cmd channel check
        #[arg(short, long)]
        disable: bool,
    },

    /// Set the meme channel to [MEME_CHANNEL], or get the current meme channel
    #[command(alias = "m")]
    Meme {
        meme_channel: Option<String>,
        /// Disable meme posting
        #[arg(short, long)]
        disable: bool,
    },

    /// Post the attachment of your previous message (direct messages only)
    #[command(alias = "p")]
    Post {
        /// Don't credit you in the post
        #[arg(long)]
        no_attribution: bool,
    },

    /// Set the downvote limit to [LIMIT], or get the current limit
    #[command(alias = "l")]
    Limit {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,
    },

    /// Print this guild's settings
    #[command(alias = "s")]
    Status,
}

/// What a channel subcommand asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelAction {
    Show,
    Set(String),
    Disable,
}

impl ChannelAction {
    fn from_parts(channel: Option<&String>, disable: bool) -> Self {
        match (channel, disable) {
            (_, true) => Self::Disable,
            (Some(channel), false) => Self::Set(channel.clone()),
            (None, false) => Self::Show,
        }
    }
}

impl Command {
    /// Check if the command changes guild settings
    pub fn is_mutating(&self) -> bool {
        match self {
            Self::Init { .. } => true,
            Self::Cmd {
                cmd_channel,
                disable,
            } => cmd_channel.is_some() || *disable,
            Self::Meme {
                meme_channel,
                disable,
            } => meme_channel.is_some() || *disable,
            Self::Limit { limit } => limit.is_some(),
            Self::Post { .. } | Self::Status => false,
        }
    }

    /// Channel action of `cmd` or `meme`; `None` for other commands
    pub fn channel_action(&self) -> Option<ChannelAction> {
        match self {
            Self::Cmd {
                cmd_channel,
                disable,
            } => Some(ChannelAction::from_parts(cmd_channel.as_ref(), *disable)),
            Self::Meme {
                meme_channel,
                disable,
            } => Some(ChannelAction::from_parts(meme_channel.as_ref(), *disable)),
            _ => None,
        }
    }

    /// Subcommand name, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::Cmd { .. } => "cmd",
            Self::Meme { .. } => "meme",
            Self::Post { .. } => "post",
            Self::Limit { .. } => "limit",
            Self::Status => "status",
        }
    }
}

/// The clap command, with the examples block when `with_examples` is set
pub fn build_command(bin_name: &str, with_examples: bool) -> clap::Command {
    Cli::command()
        .name(bin_name.to_string())
        .bin_name(bin_name.to_string())
        .version(concat!("MemeBot version ", env!("CARGO_PKG_VERSION")))
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .help("Print version")
                .action(ArgAction::Version),
        )
        .after_help(if with_examples { EXAMPLES } else { EXAMPLES_HINT })
}

/// Parse an argument list whose first item is the program name
///
/// # Errors
/// Returns clap's error for usage errors and for help/version requests.
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let bin_name = args.first().map_or("mb", String::as_str).to_string();
    let with_examples = args
        .iter()
        .skip(1)
        .any(|a| a == "-e" || a == "--example");

    let matches = build_command(&bin_name, with_examples).try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}

/// Parse a chat message as a command
///
/// Returns `None` when the message does not start with `prefix` as its own word.
pub fn parse_chat_command(prefix: &str, text: &str) -> Option<Result<Cli, clap::Error>> {
    let mut tokens = text.split_whitespace().peekable();
    if tokens.peek() != Some(&prefix) {
        return None;
    }
    Some(parse_args(tokens))
}
