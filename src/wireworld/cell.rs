//! Cell states and their stable encodings

use crate::error::ParseStateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// State of a single WireWorld cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    #[default]
    Dead,
    Wire,
    Head,
    Tail,
}

impl CellState {
    pub const ALL: [CellState; 4] = [
        CellState::Dead,
        CellState::Wire,
        CellState::Head,
        CellState::Tail,
    ];

    /// Integer code written to `.wiremap` files.
    ///
    /// The mapping is fixed: Dead=0, Wire=1, Head=2, Tail=3.
    pub fn code(self) -> u8 {
        match self {
            CellState::Dead => 0,
            CellState::Wire => 1,
            CellState::Head => 2,
            CellState::Tail => 3,
        }
    }

    /// Inverse of [`CellState::code`]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(CellState::Dead),
            1 => Some(CellState::Wire),
            2 => Some(CellState::Head),
            3 => Some(CellState::Tail),
            _ => None,
        }
    }

    /// Single character used in text patterns and compact rendering
    pub fn glyph(self) -> char {
        match self {
            CellState::Dead => '.',
            CellState::Wire => '#',
            CellState::Head => 'H',
            CellState::Tail => 't',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' | ' ' => Some(CellState::Dead),
            '#' => Some(CellState::Wire),
            'H' => Some(CellState::Head),
            't' => Some(CellState::Tail),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CellState::Dead => "dead",
            CellState::Wire => "wire",
            CellState::Head => "head",
            CellState::Tail => "tail",
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        CellState::ALL
            .into_iter()
            .find(|state| state.name() == lowered)
            .ok_or_else(|| ParseStateError(s.to_string()))
    }
}
