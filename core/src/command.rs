use crate::{
    error::{SimError, SimResult},
    hex::Direction,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Everything the player actor can be told to do.
/// A line is `verb` or `verb SP argument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    /// Step one cell; a blocked step still spends the turn.
    Move { direction: Direction },
    /// Pass the turn.
    Wait,
    /// Pass the turn and resend the whole visible set.
    Look,
    /// Leave for a freshly generated floor.
    Descend,
}

impl PlayerCommand {
    /// Parse a verb and its optional argument.
    pub fn parse(verb: &str, arg: Option<&str>) -> SimResult<Self> {
        let malformed = |reason: String| SimError::MalformedCommand {
            line: match arg {
                Some(a) => format!("{verb} {a}"),
                None => verb.to_string(),
            },
            reason,
        };

        match (verb, arg) {
            ("move", Some(a)) => Direction::from_clock(a)
                .map(|direction| Self::Move { direction })
                .ok_or_else(|| malformed(format!("'{a}' is not a clock direction (1 3 5 7 9 11)"))),
            ("move", None) => Err(malformed("move needs a direction".into())),
            ("wait" | "rest", None) => Ok(Self::Wait),
            ("look", None) => Ok(Self::Look),
            ("descend", None) => Ok(Self::Descend),
            ("wait" | "rest" | "look" | "descend", Some(a)) => {
                Err(malformed(format!("{verb} takes no argument, got '{a}'")))
            }
            _ => Err(malformed(format!("unknown verb '{verb}'"))),
        }
    }
}

impl FromStr for PlayerCommand {
    type Err = SimError;

    fn from_str(line: &str) -> SimResult<Self> {
        let line = line.trim();
        match line.split_once(' ') {
            Some((verb, arg)) => Self::parse(verb, Some(arg.trim())),
            None => Self::parse(line, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_verbs() {
        assert_eq!(
            "move 3".parse::<PlayerCommand>().ok(),
            Some(PlayerCommand::Move { direction: Direction::Three })
        );
        assert_eq!("rest".parse::<PlayerCommand>().ok(), Some(PlayerCommand::Wait));
        assert_eq!("descend".parse::<PlayerCommand>().ok(), Some(PlayerCommand::Descend));
    }

    #[test]
    fn rejects_bad_lines() {
        for line in ["", "fly", "move", "move 2", "move north", "wait 5"] {
            assert!(
                matches!(line.parse::<PlayerCommand>(), Err(SimError::MalformedCommand { .. })),
                "'{line}' should be malformed"
            );
        }
    }
}
