use super::error::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Discrete = usize;
pub type Continous = f64;

/// Moves available in every cell. The discriminant is the column of the action in a policy row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Action::Up => '\u{2191}',
            Action::Down => '\u{2193}',
            Action::Left => '\u{2190}',
            Action::Right => '\u{2192}',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = GridWorldError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| GridWorldError::InvalidAction(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub next_state: Discrete,
    pub reward: Continous,
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    pub observation: Discrete,
    pub reward: Continous,
    pub terminated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeEvent {
    pub s: Discrete,
    pub r: Continous,
}
