#![cfg(feature = "std")]

//! Line-oriented command shell over a [`HistoryBook`].
//!
//! Each input line is one command. Bad input is reported and the shell keeps
//! reading; only I/O failures end a session early.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use rand::Rng;

use crate::history::{HistoryBook, Outcome};

pub const HELP: &str = "\
Battleship history - help
=========================

Usage: <command> [arguments]

  start <player>                      open a new match and print its id
  shot <id> <row> <col> <hit|miss|sunk>
                                      record a shot for a match
  undo <id>                           take back the latest shot
  replay <id>                         list shots, newest first
  find <id>                           summarize a match
  list                                list every player and match
  forget <id>                         remove a match from the history
  help                                show this text
  quit                                leave
";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start { player: String },
    Shot { id: String, row: u8, col: u8, outcome: Outcome },
    Undo { id: String },
    Replay { id: String },
    Find { id: String },
    List,
    Forget { id: String },
    Help,
    Quit,
}

/// Reasons a line could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    UnexpectedArgument(String),
    InvalidCoordinate(String),
    InvalidOutcome(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "No command given"),
            CommandError::Unknown(cmd) => write!(f, "Unknown command '{}'", cmd),
            CommandError::MissingArgument { command, argument } => {
                write!(f, "'{}' requires <{}>", command, argument)
            }
            CommandError::UnexpectedArgument(arg) => write!(f, "Unexpected argument '{}'", arg),
            CommandError::InvalidCoordinate(s) => write!(f, "Invalid coordinate '{}'", s),
            CommandError::InvalidOutcome(s) => write!(f, "Invalid outcome '{}'", s),
        }
    }
}

impl std::error::Error for CommandError {}

fn required<'a, I>(
    args: &mut I,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError>
where
    I: Iterator<Item = &'a str>,
{
    args.next()
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn match_id<'a, I>(args: &mut I, command: &'static str) -> Result<String, CommandError>
where
    I: Iterator<Item = &'a str>,
{
    required(args, command, "id").map(|id| id.to_ascii_uppercase())
}

fn coordinate(s: &str) -> Result<u8, CommandError> {
    s.parse()
        .map_err(|_| CommandError::InvalidCoordinate(s.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut args = line.split_whitespace();
        let name = args.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let command = match name.as_str() {
            "start" => Command::Start {
                player: required(&mut args, "start", "player")?.to_string(),
            },
            "shot" => {
                let id = match_id(&mut args, "shot")?;
                let row = coordinate(required(&mut args, "shot", "row")?)?;
                let col = coordinate(required(&mut args, "shot", "col")?)?;
                let raw = required(&mut args, "shot", "outcome")?;
                let outcome = raw
                    .to_ascii_lowercase()
                    .parse()
                    .map_err(|_| CommandError::InvalidOutcome(raw.to_string()))?;
                Command::Shot {
                    id,
                    row,
                    col,
                    outcome,
                }
            }
            "undo" => Command::Undo {
                id: match_id(&mut args, "undo")?,
            },
            "replay" => Command::Replay {
                id: match_id(&mut args, "replay")?,
            },
            "find" => Command::Find {
                id: match_id(&mut args, "find")?,
            },
            "forget" => Command::Forget {
                id: match_id(&mut args, "forget")?,
            },
            "list" => Command::List,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name)),
        };
        match args.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }
}

/// Whether the shell should keep reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive session: a history book plus the RNG drawing match ids.
pub struct Console<R> {
    book: HistoryBook,
    rng: R,
    prompt: bool,
}

impl<R: Rng> Console<R> {
    pub fn new(rng: R) -> Self {
        Self {
            book: HistoryBook::new(),
            rng,
            prompt: false,
        }
    }

    /// Print a `> ` prompt before each line.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn book(&self) -> &HistoryBook {
        &self.book
    }

    /// Run one command. History errors are printed, not returned.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> anyhow::Result<Flow> {
        match command {
            Command::Start { player } => {
                match self.book.start_match(&player, &mut self.rng) {
                    Ok(id) => writeln!(out, "Match {} started for {}", id, player)?,
                    Err(e) => writeln!(out, "Error: {}", e)?,
                }
            }
            Command::Shot {
                id,
                row,
                col,
                outcome,
            } => match self.book.record_shot(&id, row, col, outcome) {
                Ok(shot) => writeln!(
                    out,
                    "Turn {}: ({}, {}) {}",
                    shot.turn, shot.row, shot.col, shot.outcome
                )?,
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            Command::Undo { id } => match self.book.undo_shot(&id) {
                Ok(Some(shot)) => writeln!(out, "Undid turn {} of match {}", shot.turn, id)?,
                Ok(None) => writeln!(out, "Nothing to undo in match {}", id)?,
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            Command::Replay { id } => match self.book.find(&id) {
                Some(record) => {
                    let moves = record.moves();
                    writeln!(
                        out,
                        "Replay of {} ({} shots, newest first)",
                        record.id(),
                        moves.len()
                    )?;
                    for shot in moves.replay() {
                        writeln!(
                            out,
                            "  turn {}: ({}, {}) {}",
                            shot.turn, shot.row, shot.col, shot.outcome
                        )?;
                    }
                }
                None => writeln!(out, "Error: No match with id {}", id)?,
            },
            Command::Find { id } => match self.book.find(&id) {
                Some(record) => writeln!(
                    out,
                    "Match {}: player {}, {} shots, {} strikes",
                    record.id(),
                    record.player(),
                    record.moves().len(),
                    record.moves().strikes()
                )?,
                None => writeln!(out, "Error: No match with id {}", id)?,
            },
            Command::List => {
                if self.book.is_empty() {
                    writeln!(out, "No matches on record")?;
                }
                for (player, count) in self.book.players() {
                    writeln!(out, "{}: {} match(es)", player, count)?;
                    for record in self.book.matches_for(player) {
                        writeln!(out, "  {} ({} shots)", record.id(), record.moves().len())?;
                    }
                }
            }
            Command::Forget { id } => match self.book.forget(&id) {
                Ok(record) => writeln!(
                    out,
                    "Forgot match {} ({} shots)",
                    record.id(),
                    record.moves().len()
                )?,
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            Command::Help => write!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands from `input` until it ends or `quit` is entered.
    pub fn run<I: BufRead, W: Write>(&mut self, input: I, out: &mut W) -> anyhow::Result<()> {
        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = match line {
                Ok(line) => line,
                // the bad line is already consumed; carry on with the next
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    writeln!(out, "Error: Input is not valid UTF-8")?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    log::debug!("console: {:?}", command);
                    if self.execute(command, out)? == Flow::Quit {
                        break;
                    }
                }
                Err(e) => {
                    writeln!(out, "Error: {}", e)?;
                    writeln!(out, "Type 'help' for the list of commands")?;
                }
            }
        }
        Ok(())
    }
}
