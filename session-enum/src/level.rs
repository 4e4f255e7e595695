use std::fmt;
use std::mem;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::record::{SessionInfo0, SessionInfo1, SessionInfo10, SessionInfo2, SessionInfo502};

/// Information level passed to `NetSessionEnum`. Selects both the native
/// record layout and the shape of the decoded output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u32")]
pub enum SessionLevel {
    /// Client name only.
    Level0,
    /// Client, user, open count, times and flags.
    Level1,
    /// Level 1 plus client type.
    Level2,
    /// Client, user and times. Needs no admin rights on the target.
    #[default]
    Level10,
    /// Level 2 plus transport name.
    Level502,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported session level `{0}` (expected one of 0, 1, 2, 10, 502)")]
pub struct LevelParseError(pub String);

impl SessionLevel {
    pub const ALL: [SessionLevel; 5] = [
        SessionLevel::Level0,
        SessionLevel::Level1,
        SessionLevel::Level2,
        SessionLevel::Level10,
        SessionLevel::Level502,
    ];

    /// Size in bytes of one native record at this level.
    pub fn record_size(self) -> usize {
        match self {
            SessionLevel::Level0 => mem::size_of::<SessionInfo0>(),
            SessionLevel::Level1 => mem::size_of::<SessionInfo1>(),
            SessionLevel::Level2 => mem::size_of::<SessionInfo2>(),
            SessionLevel::Level10 => mem::size_of::<SessionInfo10>(),
            SessionLevel::Level502 => mem::size_of::<SessionInfo502>(),
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            SessionLevel::Level0 => 0,
            SessionLevel::Level1 => 1,
            SessionLevel::Level2 => 2,
            SessionLevel::Level10 => 10,
            SessionLevel::Level502 => 502,
        }
    }
}

impl From<SessionLevel> for u32 {
    fn from(level: SessionLevel) -> Self {
        level.as_u32()
    }
}

impl TryFrom<u32> for SessionLevel {
    type Error = LevelParseError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SessionLevel::Level0),
            1 => Ok(SessionLevel::Level1),
            2 => Ok(SessionLevel::Level2),
            10 => Ok(SessionLevel::Level10),
            502 => Ok(SessionLevel::Level502),
            other => Err(LevelParseError(other.to_string())),
        }
    }
}

impl FromStr for SessionLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| LevelParseError(s.to_string()))?;
        SessionLevel::try_from(value)
    }
}

impl fmt::Display for SessionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}
