use std::fmt;
use std::str::FromStr;

use super::MediaError;

/// Well-known bus name prefix shared by all MPRIS players.
pub const MPRIS_BUS_PREFIX: &str = "org.mpris.MediaPlayer2";

/// Unique identifier for a media player
///
/// Ordering is lexicographic on the bus name, which is the order the
/// registry keeps its players in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a PlayerId from a D-Bus bus name
    pub fn from_bus_name(bus_name: &str) -> Self {
        Self(bus_name.to_string())
    }

    /// Get the D-Bus bus name
    pub fn bus_name(&self) -> &str {
        &self.0
    }

    /// Short label with the MPRIS namespace stripped, e.g. `vlc` for
    /// `org.mpris.MediaPlayer2.vlc`.
    pub fn display_name(&self) -> &str {
        self.0
            .strip_prefix(MPRIS_BUS_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Loop mode for track or playlist repetition
///
/// Declaration order is the cycling order used by the repeat button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// No looping
    #[default]
    None = 0,

    /// Loop current track
    Track = 1,

    /// Loop entire playlist
    Playlist = 2,
}

impl LoopMode {
    /// Every loop mode in cycling order.
    pub const ALL: [LoopMode; 3] = [LoopMode::None, LoopMode::Track, LoopMode::Playlist];

    /// Next mode in cycling order, wrapping from `Playlist` to `None`.
    pub fn cycle(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    /// MPRIS `LoopStatus` string for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            LoopMode::None => "None",
            LoopMode::Track => "Track",
            LoopMode::Playlist => "Playlist",
        }
    }
}

impl FromStr for LoopMode {
    type Err = MediaError;

    fn from_str(status: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == status)
            .ok_or_else(|| MediaError::InvalidLoopMode(status.to_string()))
    }
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
