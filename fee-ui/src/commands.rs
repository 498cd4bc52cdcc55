//! Parsing of session command lines.

use std::path::PathBuf;

use fee_core::PropertyType;
use fee_core::calculations::common::parse_quantity;
use regex::Regex;
use thiserror::Error;

/// A double-quoted, single-quoted or bare word.
const TOKEN_PATTERN: &str = r#""([^"]*)"|'([^']*)'|(\S+)"#;

pub const HELP: &str = "\
Commands:
  type <land|house|unit|none>   choose the property type (selects its items)
  check <id> / uncheck <id>     include or drop an item
  qty <id> <n>                  set the quantity of an item
  add                           create a custom item
  desc <id> <text>              describe a custom item
  cost <id> <amount>            price a custom item
  list                          show every item
  summary                       show selected items and totals
  print [path]                  print the estimate, or save it to a file
  reset                         clear everything (asks first)
  tour / next / back / skip     guided tour
  log <level>                   change the log filter (e.g. debug)
  help                          show this help
  quit                          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetType(Option<PropertyType>),
    Check(String),
    Uncheck(String),
    Quantity { id: String, quantity: u32 },
    Add,
    Describe { id: String, text: String },
    Cost { id: String, text: String },
    List,
    Summary,
    Print(Option<PathBuf>),
    Reset,
    Tour,
    Next,
    Back,
    Skip,
    Log(String),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type `help` for a list)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown property type '{0}' (expected land, house, unit or none)")]
    PropertyType(String),
}

/// Splits command lines into words and turns them into [`Command`]s.
#[derive(Debug, Clone)]
pub struct CommandParser {
    token: Regex,
}

impl CommandParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            token: Regex::new(TOKEN_PATTERN)?,
        })
    }

    /// Splits a line into words. Quotes group words and are dropped.
    pub fn tokenize(
        &self,
        line: &str,
    ) -> Vec<String> {
        self.token
            .captures_iter(line)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Parses one line. Blank lines give `Ok(None)`.
    pub fn parse(
        &self,
        line: &str,
    ) -> Result<Option<Command>, CommandError> {
        let tokens = self.tokenize(line);
        let Some((name, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "type" => match args {
                [tag] if tag.eq_ignore_ascii_case("none") => Command::SetType(None),
                [tag] => Command::SetType(Some(
                    PropertyType::parse(tag).ok_or_else(|| CommandError::PropertyType(tag.clone()))?,
                )),
                _ => return Err(CommandError::Usage("type <land|house|unit|none>")),
            },
            "check" => Command::Check(single_id(args, "check <id>")?),
            "uncheck" => Command::Uncheck(single_id(args, "uncheck <id>")?),
            "qty" => match args {
                [id, quantity] => Command::Quantity {
                    id: id.clone(),
                    quantity: parse_quantity(quantity),
                },
                _ => return Err(CommandError::Usage("qty <id> <n>")),
            },
            "add" => no_args(args, Command::Add, "add")?,
            "desc" => {
                let (id, text) = id_and_text(args, "desc <id> <text>")?;
                Command::Describe { id, text }
            }
            "cost" => {
                let (id, text) = id_and_text(args, "cost <id> <amount>")?;
                Command::Cost { id, text }
            }
            "list" => no_args(args, Command::List, "list")?,
            "summary" => no_args(args, Command::Summary, "summary")?,
            "print" => match args {
                [] => Command::Print(None),
                [path] => Command::Print(Some(PathBuf::from(path))),
                _ => return Err(CommandError::Usage("print [path]")),
            },
            "reset" => no_args(args, Command::Reset, "reset")?,
            "tour" => no_args(args, Command::Tour, "tour")?,
            "next" => no_args(args, Command::Next, "next")?,
            "back" => no_args(args, Command::Back, "back")?,
            "skip" => no_args(args, Command::Skip, "skip")?,
            "log" => match args {
                [level] => Command::Log(level.clone()),
                _ => return Err(CommandError::Usage("log <level>")),
            },
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(name.clone())),
        };

        Ok(Some(command))
    }
}

fn no_args(
    args: &[String],
    command: Command,
    usage: &'static str,
) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::Usage(usage))
    }
}

fn single_id(
    args: &[String],
    usage: &'static str,
) -> Result<String, CommandError> {
    match args {
        [id] => Ok(id.clone()),
        _ => Err(CommandError::Usage(usage)),
    }
}

/// The first word is the id; the rest, rejoined with single spaces, is the
/// text. The text may be empty, which clears the field.
fn id_and_text(
    args: &[String],
    usage: &'static str,
) -> Result<(String, String), CommandError> {
    match args.split_first() {
        Some((id, rest)) => Ok((id.clone(), rest.join(" "))),
        None => Err(CommandError::Usage(usage)),
    }
}
