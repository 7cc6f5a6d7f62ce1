use async_trait::async_trait;
use tracing::{debug, instrument};
use zbus::{Connection, proxy::CacheProperties};

use super::{
    handle::MediaPlayer,
    introspection::{Capabilities, PLAYER_INTERFACE},
};
use crate::services::mpris::{LoopMode, MediaError, MediaPlayer2PlayerProxy, PlayerId};

/// Handle to one MPRIS player on the bus.
///
/// The proxy is built without a property cache so every getter is a
/// `Properties.Get` round trip.
#[derive(Debug)]
pub struct MprisPlayer {
    id: PlayerId,
    proxy: MediaPlayer2PlayerProxy<'static>,
    capabilities: Capabilities,
}

impl MprisPlayer {
    /// Creates a handle for the player owning `player_id`.
    ///
    /// Introspects the player first and falls back to the built-in
    /// description when the player lists no interfaces.
    ///
    /// # Errors
    /// Returns `MediaError::DbusError` if the proxy cannot be built
    #[instrument(skip(connection), fields(bus_name = %player_id))]
    pub async fn connect(connection: &Connection, player_id: PlayerId) -> Result<Self, MediaError> {
        let capabilities = Capabilities::discover(connection, &player_id).await;
        debug!(source = ?capabilities.source(), interfaces = ?capabilities.interfaces(), "Resolved player capabilities");

        let proxy = MediaPlayer2PlayerProxy::builder(connection)
            .destination(player_id.bus_name().to_string())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;

        Ok(Self {
            id: player_id,
            proxy,
            capabilities,
        })
    }

    fn player_proxy(&self) -> Result<&MediaPlayer2PlayerProxy<'static>, MediaError> {
        if self.capabilities.supports(PLAYER_INTERFACE) {
            Ok(&self.proxy)
        } else {
            Err(MediaError::UnsupportedInterface {
                player: self.id.clone(),
                interface: PLAYER_INTERFACE.to_string(),
            })
        }
    }
}

#[async_trait]
impl MediaPlayer for MprisPlayer {
    fn id(&self) -> Option<&PlayerId> {
        Some(&self.id)
    }

    fn display_name(&self) -> &str {
        self.id.display_name()
    }

    async fn next(&self) -> Result<(), MediaError> {
        self.player_proxy()?
            .next()
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Next failed: {e}")))
    }

    async fn previous(&self) -> Result<(), MediaError> {
        self.player_proxy()?
            .previous()
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Previous failed: {e}")))
    }

    async fn pause(&self) -> Result<(), MediaError> {
        self.player_proxy()?
            .pause()
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Pause failed: {e}")))
    }

    async fn play(&self) -> Result<(), MediaError> {
        self.player_proxy()?
            .play()
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Play failed: {e}")))
    }

    async fn play_pause(&self) -> Result<(), MediaError> {
        self.player_proxy()?
            .play_pause()
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Play/pause failed: {e}")))
    }

    async fn stop(&self) -> Result<(), MediaError> {
        self.player_proxy()?
            .stop()
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Stop failed: {e}")))
    }

    async fn volume(&self) -> Result<f64, MediaError> {
        Ok(self.player_proxy()?.volume().await?)
    }

    async fn set_volume(&self, volume: f64) -> Result<(), MediaError> {
        self.player_proxy()?
            .set_volume(volume)
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Set volume failed: {e}")))
    }

    async fn shuffle(&self) -> Result<bool, MediaError> {
        Ok(self.player_proxy()?.shuffle().await?)
    }

    async fn set_shuffle(&self, shuffle: bool) -> Result<(), MediaError> {
        self.player_proxy()?
            .set_shuffle(shuffle)
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Set shuffle failed: {e}")))
    }

    async fn loop_mode(&self) -> Result<LoopMode, MediaError> {
        let status = self.player_proxy()?.loop_status().await?;
        status.parse()
    }

    async fn set_loop_mode(&self, mode: LoopMode) -> Result<(), MediaError> {
        self.player_proxy()?
            .set_loop_status(mode.as_str())
            .await
            .map_err(|e| MediaError::ControlFailed(format!("Set loop mode failed: {e}")))
    }
}
