use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::{ButtonEvent, RemoteError};
use crate::services::mpris::{MediaError, MediaPlayer, PlayerRegistry, SharedRegistry};

/// Maps button presses onto the registry and the active player.
#[derive(Clone)]
pub struct Dispatcher {
    registry: SharedRegistry,
    volume_step: f64,
}

impl Dispatcher {
    /// Creates a dispatcher driving `registry`.
    pub fn new(registry: SharedRegistry, volume_step: f64) -> Self {
        Self {
            registry,
            volume_step,
        }
    }

    /// Registry the dispatcher acts on.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Performs the action bound to `event`.
    ///
    /// Player commands target the player that was active when the event
    /// arrived, even if the selection changes while the call is pending.
    ///
    /// # Errors
    /// Returns the player's error when a remote call fails
    pub async fn dispatch(&self, event: ButtonEvent) -> Result<(), MediaError> {
        match self.resolve(event).await {
            Some(player) => self.command(player.as_ref(), event).await,
            None => Ok(()),
        }
    }

    /// Applies selection changes and captures the target of player commands.
    ///
    /// Returns the player a command must be sent to, `None` when the event
    /// is fully handled.
    async fn resolve(&self, event: ButtonEvent) -> Option<Arc<dyn MediaPlayer>> {
        match event {
            ButtonEvent::Power => {
                debug!("Power button has no action");
                None
            }
            ButtonEvent::SelectionDown => {
                self.change_selection(PlayerRegistry::select_previous).await;
                None
            }
            ButtonEvent::SelectionUp => {
                self.change_selection(PlayerRegistry::select_next).await;
                None
            }
            _ => Some(self.registry.read().await.current()),
        }
    }

    #[instrument(skip_all, fields(event = %event, player = player.display_name()))]
    async fn command(&self, player: &dyn MediaPlayer, event: ButtonEvent) -> Result<(), MediaError> {
        match event {
            ButtonEvent::Stop => player.stop().await,
            ButtonEvent::VolumeUp => {
                let volume = player.volume().await?;
                player.set_volume(volume + self.volume_step).await
            }
            ButtonEvent::VolumeDown => {
                let volume = player.volume().await?;
                player.set_volume(volume - self.volume_step).await
            }
            ButtonEvent::TrackBack => player.previous().await,
            ButtonEvent::TrackForward => player.next().await,
            ButtonEvent::PauseResume => player.play_pause().await,
            ButtonEvent::ShuffleToggle => {
                let shuffle = player.shuffle().await?;
                player.set_shuffle(!shuffle).await
            }
            ButtonEvent::RepeatCycle => {
                let mode = player.loop_mode().await?;
                player.set_loop_mode(mode.cycle()).await
            }
            ButtonEvent::Power | ButtonEvent::SelectionDown | ButtonEvent::SelectionUp => Ok(()),
        }
    }

    async fn change_selection<F>(&self, select: F)
    where
        F: FnOnce(&mut PlayerRegistry),
    {
        let current = {
            let mut registry = self.registry.write().await;
            select(&mut *registry);
            registry.current()
        };

        match current.id() {
            Some(id) => info!(player = %id, "Active player: {}", current.display_name()),
            None => info!("No active player"),
        }
    }

    /// Dispatches every token from `tokens` until the stream ends.
    ///
    /// Tokens outside the button vocabulary are skipped. Selection changes
    /// and the choice of target player happen in arrival order; the remote
    /// calls themselves run as independent tasks so a slow player never
    /// holds up the next press. Command failures are logged and dropped.
    /// Returns once the stream has ended and every started command has
    /// finished.
    ///
    /// # Errors
    /// Returns error if reading from the transport fails
    pub async fn run<S>(&self, tokens: S) -> Result<(), RemoteError>
    where
        S: Stream<Item = Result<String, RemoteError>> + Unpin,
    {
        let mut tokens = tokens;
        let mut commands = JoinSet::new();
        let mut result = Ok(());

        while let Some(token) = tokens.next().await {
            let token = match token {
                Ok(token) => token,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            };

            while commands.try_join_next().is_some() {}

            let Some(event) = ButtonEvent::from_token(&token) else {
                debug!(%token, "Ignoring unknown token");
                continue;
            };

            let Some(player) = self.resolve(event).await else {
                continue;
            };

            let dispatcher = self.clone();
            commands.spawn(async move {
                if let Err(e) = dispatcher.command(player.as_ref(), event).await {
                    warn!(%event, player = player.display_name(), "Command failed: {e}");
                }
            });
        }

        while commands.join_next().await.is_some() {}
        result
    }
}
