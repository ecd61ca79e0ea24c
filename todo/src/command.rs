//! Line commands understood by the todo shell.

use crate::types::TodoId;
use std::str::FromStr;
use thiserror::Error;

/// A parsed shell command
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `add <title>`
    Add(String),
    /// `toggle <id>` (also `done`, `complete`)
    Toggle(TodoId),
    /// `remove <id>` (also `delete`, `rm`)
    Remove(TodoId),
    /// `list` (also `ls`)
    List,
    /// `clear`
    Clear,
    /// `help` (also `?`)
    Help,
    /// `exit` (also `quit`)
    Exit,
}

/// Why a line could not be parsed
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    /// Blank line
    #[error("Empty command")]
    Empty,

    /// First word is not a known command
    #[error("Unknown command: {0}")]
    Unknown(String),

    /// Command needs an argument that was not given
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    /// Argument is not a valid todo id
    #[error("Invalid id: {0}")]
    InvalidId(String),
}

impl Command {
    /// Usage text printed by `help`
    pub const USAGE: &'static str = "\
Commands:
  add <title>      add a task
  toggle <id>      mark a task done / not done
  remove <id>      delete a task
  list             show all tasks
  clear            delete every task
  help             show this message
  exit             leave the shell";

    /// Parses one input line
    ///
    /// Command words are case-insensitive. For `add`, everything after the
    /// first word is the title; a blank title is passed through so the store
    /// can reject it.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] describing why the line is not a command.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_ascii_lowercase().as_str() {
            "add" => Ok(Self::Add(rest.to_string())),
            "toggle" | "done" | "complete" => parse_id(rest).map(Self::Toggle),
            "remove" | "delete" | "rm" => parse_id(rest).map(Self::Remove),
            "list" | "ls" => Ok(Self::List),
            "clear" => Ok(Self::Clear),
            "help" | "?" => Ok(Self::Help),
            "exit" | "quit" => Ok(Self::Exit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_id(arg: &str) -> Result<TodoId, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument("id"));
    }
    // Accept the "#3" form the listing prints
    let digits = arg.strip_prefix('#').unwrap_or(arg);
    digits
        .parse::<u64>()
        .map(TodoId::new)
        .map_err(|_| CommandError::InvalidId(arg.to_string()))
}
