//! Line commands for the terminal front end.
//!
//! Parsing is pure; `main.rs` maps each `Command` onto an engine call.

use thiserror::Error;

use crate::tycoon::state::GeneratorId;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Click the money button `n` times.
    Click(u32),
    BuyClickUpgrade,
    BuyCritUpgrade,
    BuyGenerator(GeneratorId),
    Prestige,
    Save,
    Load,
    Export,
    Import(String),
    HardReset,
    Theme(String),
    AutoSave(bool),
    Status,
    Achievements,
    /// Advance the game clock by this many seconds without waiting.
    Wait(u32),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("invalid argument `{0}`")]
    InvalidArgument(String),
}

pub const HELP: &str = "\
commands:
  c [n]                 click n times (default 1)
  u click | u crit      buy a click or crit upgrade
  b <business>          buy lemonade|pizza|arcade|oil|bank|space
  p                     prestige (needs $1,000,000)
  s / load              save to / load from the save file
  export / import <s>   print or import a save string
  reset                 hard reset (deletes the save file)
  theme <name>          change theme
  autosave on|off       toggle autosave
  wait <secs>           fast-forward time
  status / ach          show economy / achievements
  q                     quit";

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let head = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
    let arg = words.next();

    match head.as_str() {
        "c" | "click" => match arg {
            None => Ok(Command::Click(1)),
            Some(n) => n
                .parse()
                .map(Command::Click)
                .map_err(|_| CommandError::InvalidArgument(n.into())),
        },
        "u" | "upgrade" => match arg {
            Some("click") => Ok(Command::BuyClickUpgrade),
            Some("crit") => Ok(Command::BuyCritUpgrade),
            Some(other) => Err(CommandError::InvalidArgument(other.into())),
            None => Err(CommandError::MissingArgument {
                command: "upgrade",
                expected: "`click` or `crit`",
            }),
        },
        "b" | "buy" => {
            let key = arg.ok_or(CommandError::MissingArgument {
                command: "buy",
                expected: "a business name",
            })?;
            GeneratorId::from_key(&key.to_ascii_lowercase())
                .map(Command::BuyGenerator)
                .ok_or_else(|| CommandError::InvalidArgument(key.into()))
        }
        "p" | "prestige" => Ok(Command::Prestige),
        "s" | "save" => Ok(Command::Save),
        "load" => Ok(Command::Load),
        "export" => Ok(Command::Export),
        "import" => arg
            .map(|blob| Command::Import(blob.to_string()))
            .ok_or(CommandError::MissingArgument {
                command: "import",
                expected: "a save string",
            }),
        "reset" => Ok(Command::HardReset),
        "theme" => arg
            .map(|name| Command::Theme(name.to_string()))
            .ok_or(CommandError::MissingArgument {
                command: "theme",
                expected: "a theme name",
            }),
        "autosave" => match arg {
            Some("on") => Ok(Command::AutoSave(true)),
            Some("off") => Ok(Command::AutoSave(false)),
            Some(other) => Err(CommandError::InvalidArgument(other.into())),
            None => Err(CommandError::MissingArgument {
                command: "autosave",
                expected: "`on` or `off`",
            }),
        },
        "wait" => {
            let secs = arg.ok_or(CommandError::MissingArgument {
                command: "wait",
                expected: "a number of seconds",
            })?;
            secs.parse()
                .map(Command::Wait)
                .map_err(|_| CommandError::InvalidArgument(secs.into()))
        }
        "status" | "st" => Ok(Command::Status),
        "ach" | "achievements" => Ok(Command::Achievements),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::Unknown(head)),
    }
}
