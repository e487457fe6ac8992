//! Exit-code protocol of the `mb` helper
//!
//! The parent process branches on these exact codes.

use std::fmt;

use crate::command::Command;

/// Helper process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum HelperExit {
    /// Guild initialization requested; the admin role ref is on stdout
    Init = 2001,
    /// Print the current cmd channel
    PrintCmd = 3001,
    /// Set the cmd channel; the channel ref is on stdout
    SetCmd = 3002,
    /// Disable the cmd channel; the channel ref is on stdout
    DisableCmd = 3003,
    /// Normal completion
    Done = 4242,
}

impl HelperExit {
    /// Map a parsed command to its exit code and stdout payload
    pub fn for_command(command: Option<&Command>) -> (Self, Option<String>) {
        match command {
            Some(Command::Init { admin_role }) => (Self::Init, Some(admin_role.clone())),
            Some(Command::Cmd {
                cmd_channel: None, ..
            }) => (Self::PrintCmd, None),
            Some(Command::Cmd {
                cmd_channel: Some(channel),
                disable: true,
            }) => (Self::DisableCmd, Some(channel.clone())),
            Some(Command::Cmd {
                cmd_channel: Some(channel),
                disable: false,
            }) => (Self::SetCmd, Some(channel.clone())),
            _ => (Self::Done, None),
        }
    }

    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::PrintCmd => "PrintCmd",
            Self::SetCmd => "SetCmd",
            Self::DisableCmd => "DisableCmd",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for HelperExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
