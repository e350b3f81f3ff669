use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest show number the player accepts.
pub const MAX_SHOW_NUMBER: u8 = 99;

/// Opaque show identifier as listed by the directory endpoint.
///
/// Identifiers travel verbatim; they are only parsed into a [`ShowNumber`]
/// when a validity check is needed for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowId(pub String);

impl ShowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn number(&self) -> Option<ShowNumber> {
        ShowNumber::parse(&self.0)
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShowId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ShowId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A show number known to be within `0..=99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShowNumber(u8);

impl ShowNumber {
    pub fn new(value: i64) -> Option<Self> {
        if (0..=i64::from(MAX_SHOW_NUMBER)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    /// Parses a decimal integer, tolerating surrounding whitespace and a sign.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i64>().ok().and_then(Self::new)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopValue {
    #[serde(rename = "0")]
    Off,
    #[serde(rename = "1")]
    On,
}

impl LoopValue {
    pub fn from_looping(looping: bool) -> Self {
        if looping {
            Self::On
        } else {
            Self::Off
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "0",
            Self::On => "1",
        }
    }
}

impl fmt::Display for LoopValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackAction {
    Start,
    Stop,
    Resume,
}

/// Decoded status of the remote show player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowStatus {
    /// Show as the player reported it; only present when it denotes a
    /// number in `0..=99`.
    pub show: Option<ShowId>,
    /// Verbatim status text; `None` when the payload carried no status.
    pub status: Option<String>,
    pub looping: bool,
}

/// Coarse playback state reflected from the last applied status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    #[default]
    Unknown,
    Stopped,
    Playing,
    Looping,
}

impl PlayerState {
    pub fn from_status(status: &ShowStatus) -> Self {
        if status.looping {
            return Self::Looping;
        }
        match status.status.as_deref().map(str::trim) {
            Some(text)
                if text.eq_ignore_ascii_case("playing") || text.eq_ignore_ascii_case("running") =>
            {
                Self::Playing
            }
            _ => Self::Stopped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub key: String,
    pub show: ShowId,
}

/// Selectable shows in the order the service listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowDirectory {
    entries: Vec<DirectoryEntry>,
}

impl ShowDirectory {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn shows(&self) -> impl Iterator<Item = &ShowId> {
        self.entries.iter().map(|entry| &entry.show)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
