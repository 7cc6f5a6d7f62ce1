use std::sync::Arc;

use tracing::{info, instrument, warn};
use zbus::Connection;

use crate::{
    BridgeError, Result,
    config::Config,
    services::{
        mpris::{
            BusConnector, MediaError, MediaPlayer2Proxy, PlayerDiscovery, PlayerId,
            PlayerRegistry, SharedRegistry,
        },
        remote::{Dispatcher, SerialPort},
    },
};

/// One row of the player listing.
#[derive(Debug, Clone)]
pub struct PlayerListing {
    /// Bus name of the player
    pub id: PlayerId,
    /// Name the player reports for itself, if it answered
    pub identity: Option<String>,
    /// Whether the remote currently controls this player
    pub active: bool,
}

/// Connects the serial remote to the players on the session bus.
pub struct Bridge {
    connection: Connection,
    registry: SharedRegistry,
    discovery: PlayerDiscovery,
}

impl Bridge {
    /// Connects to the session bus and loads the players already running.
    ///
    /// # Errors
    /// Returns error if the bus is unreachable or its names cannot be listed
    #[instrument(skip(config))]
    pub async fn connect(config: &Config) -> Result<Self> {
        let connection = Connection::session().await.map_err(|e| {
            MediaError::InitializationFailed(format!("D-Bus connection failed: {e}"))
        })?;

        let registry = PlayerRegistry::new().shared();
        let discovery = PlayerDiscovery::new(
            Arc::new(BusConnector::new(connection.clone())),
            Arc::clone(&registry),
            config.media.ignored_players.clone(),
        );
        discovery.discover_existing_players().await?;

        Ok(Self {
            connection,
            registry,
            discovery,
        })
    }

    /// Lists the known players in selection order.
    pub async fn list_players(&self) -> Vec<PlayerListing> {
        let (ids, active) = {
            let registry = self.registry.read().await;
            (registry.ids(), registry.active_id())
        };

        let mut listing = Vec::with_capacity(ids.len());
        for id in ids {
            let identity = self.identity(&id).await;
            let active = active.as_ref() == Some(&id);
            listing.push(PlayerListing {
                id,
                identity,
                active,
            });
        }

        listing
    }

    async fn identity(&self, id: &PlayerId) -> Option<String> {
        let proxy = MediaPlayer2Proxy::builder(&self.connection)
            .destination(id.bus_name().to_string())
            .ok()?
            .build()
            .await
            .ok()?;

        match proxy.identity().await {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!(player = %id, "Failed to read identity: {e}");
                None
            }
        }
    }

    /// Opens the serial device and forwards button presses until the device
    /// closes or the process is interrupted.
    ///
    /// # Errors
    /// Returns error if no device is configured, the device cannot be opened,
    /// the bus subscription fails or reading the device fails
    pub async fn run(self, config: &Config) -> Result<()> {
        let device = config.device_path()?;
        let port = SerialPort::open(device, config.serial.baud_rate)?;

        let watcher = self.discovery.start_discovery(&self.connection).await?;
        let dispatcher = Dispatcher::new(Arc::clone(&self.registry), config.media.volume_step);

        {
            let registry = self.registry.read().await;
            let current = registry.current();
            info!(
                players = registry.len(),
                active = current.display_name(),
                device = %port.path().display(),
                "Forwarding remote to MPRIS players"
            );
        }

        let outcome = tokio::select! {
            result = dispatcher.run(port.into_tokens()) => {
                info!("Serial device closed");
                result.map_err(BridgeError::from)
            }
            signal = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                signal.map_err(BridgeError::from)
            }
        };

        watcher.abort();
        outcome
    }
}
