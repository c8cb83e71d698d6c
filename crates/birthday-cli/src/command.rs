//! The interactive command table.

use std::fmt;
use std::str::FromStr;

/// Commands recognized by the read-eval loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Update,
    List,
    Delete,
    Search,
    Save,
    Load,
    Stats,
    Echo,
    Help,
    Quit,
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Command {
    /// Every command, in the order `help` lists them.
    pub const ALL: [Command; 11] = [
        Command::Add,
        Command::Update,
        Command::List,
        Command::Delete,
        Command::Search,
        Command::Save,
        Command::Load,
        Command::Stats,
        Command::Echo,
        Command::Help,
        Command::Quit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Add => "add",
            Command::Update => "update",
            Command::List => "list",
            Command::Delete => "delete",
            Command::Search => "search",
            Command::Save => "save",
            Command::Load => "load",
            Command::Stats => "stats",
            Command::Echo => "echo",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }

    /// Argument shape shown by `help`.
    pub fn usage(self) -> &'static str {
        match self {
            Command::Add => "add firstName lastName month day year",
            Command::Update => "update entryNumber newFirstName newLastName newMonth newDay newYear",
            Command::List => "list",
            Command::Delete => "delete entryNumber",
            Command::Search => "search name",
            Command::Save => "save filename",
            Command::Load => "load filename",
            Command::Stats => "stats",
            Command::Echo => "echo on|off",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned for a first token that names no command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownCommand(token.to_string()))
    }
}
