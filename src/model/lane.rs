use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Side of the focal node a neighbor sits on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// Path segment of the REST links endpoint for this direction.
    pub fn link_segment(self) -> &'static str {
        match self {
            Direction::Input => "incoming",
            Direction::Output => "outgoing",
        }
    }
}

/// One of the four neighbor categories drawn beside the focal node.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Lane {
    InputData,
    InputProcess,
    OutputData,
    OutputProcess,
}

#[derive(Debug, Error)]
#[error("Unknown lane '{0}' (expected input-data, input-process, output-data or output-process)")]
pub struct UnknownLane(pub String);

impl Lane {
    pub const ALL: [Lane; 4] = [
        Lane::InputData,
        Lane::InputProcess,
        Lane::OutputData,
        Lane::OutputProcess,
    ];

    pub fn new(direction: Direction, process: bool) -> Self {
        match (direction, process) {
            (Direction::Input, false) => Lane::InputData,
            (Direction::Input, true) => Lane::InputProcess,
            (Direction::Output, false) => Lane::OutputData,
            (Direction::Output, true) => Lane::OutputProcess,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Lane::InputData | Lane::InputProcess => Direction::Input,
            Lane::OutputData | Lane::OutputProcess => Direction::Output,
        }
    }

    pub fn is_process(self) -> bool {
        matches!(self, Lane::InputProcess | Lane::OutputProcess)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lane::InputData => "input-data",
            Lane::InputProcess => "input-process",
            Lane::OutputData => "output-data",
            Lane::OutputProcess => "output-process",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lane {
    type Err = UnknownLane;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Lane::ALL
            .into_iter()
            .find(|lane| lane.as_str() == normalized)
            .ok_or_else(|| UnknownLane(s.to_string()))
    }
}
