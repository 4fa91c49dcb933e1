//! Two-axis motion commands and their wire string format.
//!
//! The server consumes commands of the form `"<horizontal>|<vertical>"`,
//! where each axis token is either `None` or `<label>#<signed integer>`.
//! This crate emits the signed-offset convention on both axes: the label is
//! always `distance` and the magnitude is `desired - current` in pixels.

use std::fmt;

use thiserror::Error;

/// Axis label for the signed-offset convention.
pub const DISTANCE_LABEL: &str = "distance";

/// The command sent when no target box is available: `"None|None"`.
pub const NEUTRAL_COMMAND: &str = "None|None";

/// Raised when a command string does not match the wire format.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed command {input:?}: {reason}")]
pub struct MalformedCommand {
    pub input: String,
    pub reason: &'static str,
}

/// One axis of a motion command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AxisResult {
    /// Within the dead-band, or no target: the server holds this axis.
    None,
    /// Corrective motion: a label plus a signed pixel magnitude.
    Move { label: String, magnitude: i32 },
}

impl AxisResult {
    /// Signed offset on the canonical `distance` convention.
    pub fn distance(magnitude: i32) -> Self {
        AxisResult::Move {
            label: DISTANCE_LABEL.to_string(),
            magnitude,
        }
    }

    pub fn magnitude(&self) -> Option<i32> {
        match self {
            AxisResult::None => None,
            AxisResult::Move { magnitude, .. } => Some(*magnitude),
        }
    }
}

impl fmt::Display for AxisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisResult::None => f.write_str("None"),
            AxisResult::Move { label, magnitude } => write!(f, "{}#{}", label, magnitude),
        }
    }
}

/// A full two-axis command, produced fresh for every received frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub horizontal: AxisResult,
    pub vertical: AxisResult,
}

impl Command {
    /// `"None|None"`: hold both axes.
    pub fn neutral() -> Self {
        Self {
            horizontal: AxisResult::None,
            vertical: AxisResult::None,
        }
    }

    /// Serialize to the wire string.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Parse a wire string back into a command.
    ///
    /// Fails on a missing or extra `|`, a missing `#`, or a magnitude that
    /// is not a base-10 integer.
    pub fn decode(input: &str) -> Result<Self, MalformedCommand> {
        let malformed = |reason: &'static str| MalformedCommand {
            input: input.to_string(),
            reason,
        };
        let mut axes = input.split('|');
        let horizontal = axes.next().ok_or_else(|| malformed("empty command"))?;
        let vertical = axes
            .next()
            .ok_or_else(|| malformed("missing axis separator"))?;
        if axes.next().is_some() {
            return Err(malformed("more than two axes"));
        }
        Ok(Self {
            horizontal: decode_axis(horizontal).map_err(malformed)?,
            vertical: decode_axis(vertical).map_err(malformed)?,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.horizontal, self.vertical)
    }
}

fn decode_axis(token: &str) -> Result<AxisResult, &'static str> {
    if token == "None" {
        return Ok(AxisResult::None);
    }
    let (label, magnitude) = token.split_once('#').ok_or("missing '#' in axis token")?;
    if label.is_empty() {
        return Err("empty axis label");
    }
    let magnitude: i32 = magnitude.parse().map_err(|_| "magnitude is not an integer")?;
    Ok(AxisResult::Move {
        label: label.to_string(),
        magnitude,
    })
}
