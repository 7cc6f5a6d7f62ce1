//! Test doubles shared by the integration tests.

#![allow(dead_code, missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use mpris_remote::services::{
    mpris::{
        LoopMode, MediaError, MediaPlayer, PlayerConnector, PlayerId, PlayerRegistry,
        SharedRegistry,
    },
    remote::RemoteError,
};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Next,
    Previous,
    Pause,
    Play,
    PlayPause,
    Stop,
    SetVolume(f64),
    SetShuffle(bool),
    SetLoopMode(LoopMode),
}

#[derive(Debug)]
struct State {
    volume: f64,
    shuffle: bool,
    loop_status: String,
}

/// Holds a pending play/pause call until released.
#[derive(Debug, Default)]
pub struct Gate {
    /// Signalled once the call is pending.
    pub started: Notify,
    /// Lets the pending call complete.
    pub release: Notify,
}

/// Player that records every command and serves reads from fixed state.
#[derive(Debug)]
pub struct RecordingPlayer {
    id: PlayerId,
    state: Mutex<State>,
    calls: Mutex<Vec<Call>>,
    failing: bool,
    gate: Option<Arc<Gate>>,
}

impl RecordingPlayer {
    pub fn new(bus_name: &str) -> Self {
        Self {
            id: PlayerId::from_bus_name(bus_name),
            state: Mutex::new(State {
                volume: 0.5,
                shuffle: false,
                loop_status: "None".to_string(),
            }),
            calls: Mutex::new(Vec::new()),
            failing: false,
            gate: None,
        }
    }

    /// Player whose commands all fail.
    pub fn failing(bus_name: &str) -> Self {
        Self {
            failing: true,
            ..Self::new(bus_name)
        }
    }

    /// Player whose play/pause waits on `gate` before completing.
    pub fn gated(self, gate: Arc<Gate>) -> Self {
        Self {
            gate: Some(gate),
            ..self
        }
    }

    pub fn with_volume(self, volume: f64) -> Self {
        self.state.lock().unwrap().volume = volume;
        self
    }

    pub fn with_shuffle(self, shuffle: bool) -> Self {
        self.state.lock().unwrap().shuffle = shuffle;
        self
    }

    pub fn with_loop_status(self, status: &str) -> Self {
        self.state.lock().unwrap().loop_status = status.to_string();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), MediaError> {
        if self.failing {
            return Err(MediaError::ControlFailed(format!("{call:?} failed")));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl MediaPlayer for RecordingPlayer {
    fn id(&self) -> Option<&PlayerId> {
        Some(&self.id)
    }

    fn display_name(&self) -> &str {
        self.id.display_name()
    }

    async fn next(&self) -> Result<(), MediaError> {
        self.record(Call::Next)
    }

    async fn previous(&self) -> Result<(), MediaError> {
        self.record(Call::Previous)
    }

    async fn pause(&self) -> Result<(), MediaError> {
        self.record(Call::Pause)
    }

    async fn play(&self) -> Result<(), MediaError> {
        self.record(Call::Play)
    }

    async fn play_pause(&self) -> Result<(), MediaError> {
        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        self.record(Call::PlayPause)
    }

    async fn stop(&self) -> Result<(), MediaError> {
        self.record(Call::Stop)
    }

    async fn volume(&self) -> Result<f64, MediaError> {
        Ok(self.state.lock().unwrap().volume)
    }

    async fn set_volume(&self, volume: f64) -> Result<(), MediaError> {
        self.record(Call::SetVolume(volume))
    }

    async fn shuffle(&self) -> Result<bool, MediaError> {
        Ok(self.state.lock().unwrap().shuffle)
    }

    async fn set_shuffle(&self, shuffle: bool) -> Result<(), MediaError> {
        self.record(Call::SetShuffle(shuffle))
    }

    async fn loop_mode(&self) -> Result<LoopMode, MediaError> {
        self.state.lock().unwrap().loop_status.parse()
    }

    async fn set_loop_mode(&self, mode: LoopMode) -> Result<(), MediaError> {
        self.record(Call::SetLoopMode(mode))
    }
}

/// Registry initialized with `players`, first in bus name order active.
pub fn registry_with(players: &[Arc<RecordingPlayer>]) -> SharedRegistry {
    let mut registry = PlayerRegistry::new();
    registry.initialize(
        players
            .iter()
            .map(|player| Arc::clone(player) as Arc<dyn MediaPlayer>)
            .collect(),
    );
    registry.shared()
}

/// Token stream over fixed lines.
pub fn tokens(
    lines: &[&str],
) -> futures::stream::Iter<std::vec::IntoIter<Result<String, RemoteError>>> {
    let items: Vec<Result<String, RemoteError>> =
        lines.iter().map(|line| Ok((*line).to_string())).collect();
    futures::stream::iter(items)
}

/// Connector serving a fixed list of bus names.
#[derive(Debug, Default)]
pub struct FakeConnector {
    names: Mutex<Vec<String>>,
    unreachable: Mutex<HashSet<String>>,
    connected: Mutex<Vec<String>>,
}

impl FakeConnector {
    pub fn with_names(names: &[&str]) -> Self {
        Self {
            names: Mutex::new(names.iter().map(|name| (*name).to_string()).collect()),
            ..Self::default()
        }
    }

    /// Makes connecting to `bus_name` fail.
    pub fn unreachable(self, bus_name: &str) -> Self {
        self.make_unreachable(bus_name);
        self
    }

    /// Makes later connects to `bus_name` fail.
    pub fn make_unreachable(&self, bus_name: &str) {
        self.unreachable
            .lock()
            .unwrap()
            .insert(bus_name.to_string());
    }

    /// Bus names a handle was created for, in call order.
    pub fn connected(&self) -> Vec<String> {
        self.connected.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlayerConnector for FakeConnector {
    async fn list_names(&self) -> Result<Vec<String>, MediaError> {
        Ok(self.names.lock().unwrap().clone())
    }

    async fn connect(&self, player_id: PlayerId) -> Result<Arc<dyn MediaPlayer>, MediaError> {
        let bus_name = player_id.bus_name().to_string();
        if self.unreachable.lock().unwrap().contains(&bus_name) {
            return Err(MediaError::InitializationFailed(format!(
                "{bus_name} did not answer"
            )));
        }

        self.connected.lock().unwrap().push(bus_name.clone());
        Ok(Arc::new(RecordingPlayer::new(&bus_name)))
    }
}
