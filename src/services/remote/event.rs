use std::fmt;

/// A button press reported by the receiver.
///
/// The receiver prints one token per press; see [`ButtonEvent::token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEvent {
    /// Power button. Reserved, does nothing.
    Power,
    /// Stop playback
    Stop,
    /// Raise volume by one step
    VolumeUp,
    /// Lower volume by one step
    VolumeDown,
    /// Previous track
    TrackBack,
    /// Next track
    TrackForward,
    /// Toggle play/pause
    PauseResume,
    /// Select the previous player
    SelectionDown,
    /// Select the next player
    SelectionUp,
    /// Toggle shuffle ("EQ" on the remote)
    ShuffleToggle,
    /// Cycle the loop mode
    RepeatCycle,
}

impl ButtonEvent {
    /// Every button in the vocabulary.
    pub const ALL: [ButtonEvent; 11] = [
        ButtonEvent::Power,
        ButtonEvent::Stop,
        ButtonEvent::VolumeUp,
        ButtonEvent::VolumeDown,
        ButtonEvent::TrackBack,
        ButtonEvent::TrackForward,
        ButtonEvent::PauseResume,
        ButtonEvent::SelectionDown,
        ButtonEvent::SelectionUp,
        ButtonEvent::ShuffleToggle,
        ButtonEvent::RepeatCycle,
    ];

    /// Text the receiver prints for this button.
    pub fn token(self) -> &'static str {
        match self {
            ButtonEvent::Power => "POWER",
            ButtonEvent::Stop => "FUNC/STOP",
            ButtonEvent::VolumeUp => "VOL+",
            ButtonEvent::VolumeDown => "VOL-",
            ButtonEvent::TrackBack => "FAST BACK",
            ButtonEvent::TrackForward => "FAST FORWARD",
            ButtonEvent::PauseResume => "PAUSE",
            ButtonEvent::SelectionDown => "DOWN",
            ButtonEvent::SelectionUp => "UP",
            ButtonEvent::ShuffleToggle => "EQ",
            ButtonEvent::RepeatCycle => "ST/REPT",
        }
    }

    /// Looks up the button for a received token.
    ///
    /// Returns `None` for anything outside the vocabulary, such as the digit
    /// keys or the receiver's repeat code.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.token() == token)
    }
}

impl fmt::Display for ButtonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
