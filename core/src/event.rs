//! Kernel output.
//!
//! Every line a session emits is one `GameEvent`. The text form is the
//! wire protocol and is fixed:
//!
//!   ok LINE               command accepted
//!   invalid LINE          command rejected; the turn passed as a wait
//!   invalid               an empty line, rejected the same way
//!   depth N               player arrived on floor N
//!   newtile KIND,X,Y      tile discovery, KIND is `floor` or `wall`
//!
//! Variants are added as the protocol grows, never removed or reordered.

use crate::hex::Pos;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Floor,
    Wall,
}

impl TileKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Wall => "wall",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Accepted { line: String },
    Rejected { line: String },
    Depth { depth: u32 },
    NewTile { kind: TileKind, pos: Pos },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted { line } => write!(f, "ok {line}"),
            Self::Rejected { line } if line.is_empty() => write!(f, "invalid"),
            Self::Rejected { line } => write!(f, "invalid {line}"),
            Self::Depth { depth } => write!(f, "depth {depth}"),
            Self::NewTile { kind, pos } => write!(f, "newtile {},{},{}", kind.name(), pos.x, pos.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_lines() {
        let ok = GameEvent::Accepted { line: "move 3".into() };
        let bad = GameEvent::Rejected { line: "jump".into() };
        let tile = GameEvent::NewTile { kind: TileKind::Wall, pos: Pos::new(4, -1) };
        assert_eq!(ok.to_string(), "ok move 3");
        assert_eq!(bad.to_string(), "invalid jump");
        assert_eq!(GameEvent::Depth { depth: 2 }.to_string(), "depth 2");
        assert_eq!(tile.to_string(), "newtile wall,4,-1");
    }

    #[test]
    fn empty_rejection_has_no_trailing_space() {
        let empty = GameEvent::Rejected { line: String::new() };
        assert_eq!(empty.to_string(), "invalid");
    }
}
