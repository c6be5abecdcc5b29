// filepath: src/command.rs
//! Control console commands
//!
//! One command per line, keyword first. Keywords are case-insensitive.

use std::str::FromStr;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  show | hide | center | quit
  scale <v> | scale-x <v> | scale-y <v>     scale in screen px per image px
  slider-x <1..20000> | slider-y <1..20000> scale * 100
  lock on|off                               lock aspect ratio
  click-through on|off | top on|off
  opacity <5..100>
  grid on|off | grid-alpha <0..255> | grid-width <1..5>
  holes on|off | hole <0..100>              hole size in % of a pixel
  offset <x> <y>                            sub-pixel offset, -2..2
  list | select <n> | next | prev | rescan
  status | help";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Show,
    Hide,
    Center,
    Quit,
    Scale(f64),
    ScaleX(f64),
    ScaleY(f64),
    SliderX(i32),
    SliderY(i32),
    LockAspect(bool),
    ClickThrough(bool),
    AlwaysOnTop(bool),
    /// Percent, 5..=100
    Opacity(i32),
    Grid(bool),
    GridAlpha(i32),
    GridWidth(i32),
    Holes(bool),
    HolePercent(f64),
    Offset(f64, f64),
    List,
    Select(usize),
    Next,
    Prev,
    Rescan,
    Status,
    Help,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    BadArgument {
        command: String,
        expected: &'static str,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let keyword = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = words.collect();

        let bad = |expected: &'static str| CommandError::BadArgument {
            command: keyword.clone(),
            expected,
        };
        let none = |cmd: Command| -> Result<Command, CommandError> {
            if args.is_empty() {
                Ok(cmd)
            } else {
                Err(bad("no arguments"))
            }
        };
        let one = || match args.as_slice() {
            [arg] => Ok(*arg),
            _ => Err(bad("one argument")),
        };
        let float = || -> Result<f64, CommandError> {
            one()?.parse::<f64>().map_err(|_| bad("a number"))
        };
        let int = || -> Result<i32, CommandError> {
            one()?.parse::<i32>().map_err(|_| bad("an integer"))
        };
        let switch = || -> Result<bool, CommandError> {
            parse_switch(one()?).ok_or_else(|| bad("on or off"))
        };

        match keyword.as_str() {
            "show" => none(Command::Show),
            "hide" => none(Command::Hide),
            "center" | "centre" => none(Command::Center),
            "quit" | "exit" => none(Command::Quit),
            "scale" => Ok(Command::Scale(float()?)),
            "scale-x" => Ok(Command::ScaleX(float()?)),
            "scale-y" => Ok(Command::ScaleY(float()?)),
            "slider-x" => Ok(Command::SliderX(int()?)),
            "slider-y" => Ok(Command::SliderY(int()?)),
            "lock" => Ok(Command::LockAspect(switch()?)),
            "click-through" => Ok(Command::ClickThrough(switch()?)),
            "top" => Ok(Command::AlwaysOnTop(switch()?)),
            "opacity" => Ok(Command::Opacity(int()?)),
            "grid" => Ok(Command::Grid(switch()?)),
            "grid-alpha" => Ok(Command::GridAlpha(int()?)),
            "grid-width" => Ok(Command::GridWidth(int()?)),
            "holes" => Ok(Command::Holes(switch()?)),
            "hole" => Ok(Command::HolePercent(float()?)),
            "offset" => match args.as_slice() {
                [x, y] => match (x.parse::<f64>(), y.parse::<f64>()) {
                    (Ok(x), Ok(y)) => Ok(Command::Offset(x, y)),
                    _ => Err(bad("two numbers")),
                },
                _ => Err(bad("two numbers")),
            },
            "list" => none(Command::List),
            "select" => one()?
                .parse::<usize>()
                .map(Command::Select)
                .map_err(|_| bad("an image number")),
            "next" => none(Command::Next),
            "prev" => none(Command::Prev),
            "rescan" => none(Command::Rescan),
            "status" => none(Command::Status),
            "help" | "?" => none(Command::Help),
            _ => Err(CommandError::Unknown(keyword.clone())),
        }
    }
}

fn parse_switch(word: &str) -> Option<bool> {
    match word.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        assert_eq!("scale 12.5".parse::<Command>(), Ok(Command::Scale(12.5)));
        assert_eq!("  Grid OFF ".parse::<Command>(), Ok(Command::Grid(false)));
        assert_eq!(
            "offset -0.5 1".parse::<Command>(),
            Ok(Command::Offset(-0.5, 1.0))
        );
        assert_eq!("select 3".parse::<Command>(), Ok(Command::Select(3)));
        assert_eq!(
            "slider-y 2500".parse::<Command>(),
            Ok(Command::SliderY(2500))
        );
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "zoom 3".parse::<Command>(),
            Err(CommandError::Unknown("zoom".to_string()))
        );
        assert!(matches!(
            "lock maybe".parse::<Command>(),
            Err(CommandError::BadArgument { expected: "on or off", .. })
        ));
        assert!(matches!(
            "show now".parse::<Command>(),
            Err(CommandError::BadArgument { .. })
        ));
        assert!(matches!(
            "offset 1".parse::<Command>(),
            Err(CommandError::BadArgument { .. })
        ));
    }
}
