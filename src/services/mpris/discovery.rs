use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, future::join_all};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use zbus::{Connection, fdo};

use super::{MPRIS_BUS_PREFIX, MediaError, MediaPlayer, MprisPlayer, PlayerId, SharedRegistry};

/// What a `NameOwnerChanged` notification means for the player set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerChange {
    /// A player claimed the name.
    Appeared(PlayerId),
    /// The owning player went away.
    Vanished(PlayerId),
    /// The name moved to a different owner.
    Replaced(PlayerId),
}

/// Interprets one `NameOwnerChanged` notification.
///
/// Names outside the MPRIS namespace are ignored, as are notifications
/// where neither owner is set. Empty owner strings count as unset.
pub fn classify_owner_change(
    name: &str,
    old_owner: Option<&str>,
    new_owner: Option<&str>,
) -> Option<OwnerChange> {
    if !name.starts_with(MPRIS_BUS_PREFIX) {
        return None;
    }

    let player_id = PlayerId::from_bus_name(name);
    let old_owner = old_owner.filter(|owner| !owner.is_empty());
    let new_owner = new_owner.filter(|owner| !owner.is_empty());

    match (old_owner, new_owner) {
        (None, Some(_)) => Some(OwnerChange::Appeared(player_id)),
        (Some(_), None) => Some(OwnerChange::Vanished(player_id)),
        (Some(_), Some(_)) => Some(OwnerChange::Replaced(player_id)),
        (None, None) => None,
    }
}

/// Source of player handles.
///
/// Separates talking to the bus from the bookkeeping in [`PlayerDiscovery`].
#[async_trait]
pub trait PlayerConnector: Send + Sync {
    /// Every name currently owned on the bus.
    async fn list_names(&self) -> Result<Vec<String>, MediaError>;

    /// Creates a handle for the player owning `player_id`.
    async fn connect(&self, player_id: PlayerId) -> Result<Arc<dyn MediaPlayer>, MediaError>;
}

/// [`PlayerConnector`] for a live D-Bus session.
#[derive(Debug, Clone)]
pub struct BusConnector {
    connection: Connection,
}

impl BusConnector {
    /// Creates a connector on `connection`.
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl PlayerConnector for BusConnector {
    async fn list_names(&self) -> Result<Vec<String>, MediaError> {
        let dbus_proxy = fdo::DBusProxy::new(&self.connection)
            .await
            .map_err(|e| MediaError::InitializationFailed(format!("DBus proxy failed: {e}")))?;

        let names = dbus_proxy
            .list_names()
            .await
            .map_err(|e| MediaError::DbusError(e.into()))?;

        Ok(names.into_iter().map(|name| name.to_string()).collect())
    }

    async fn connect(&self, player_id: PlayerId) -> Result<Arc<dyn MediaPlayer>, MediaError> {
        let player = MprisPlayer::connect(&self.connection, player_id).await?;
        Ok(Arc::new(player))
    }
}

/// Keeps the registry in step with the players on the bus.
#[derive(Clone)]
pub struct PlayerDiscovery {
    connector: Arc<dyn PlayerConnector>,
    registry: SharedRegistry,
    ignored_players: Arc<Vec<String>>,
}

impl PlayerDiscovery {
    /// Create a new player discovery handler
    pub fn new(
        connector: Arc<dyn PlayerConnector>,
        registry: SharedRegistry,
        ignored_players: Vec<String>,
    ) -> Self {
        Self {
            connector,
            registry,
            ignored_players: Arc::new(ignored_players),
        }
    }

    /// Registry this discovery feeds.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Discover existing players on the bus and initialize the registry
    ///
    /// Players that fail to connect are skipped.
    ///
    /// # Errors
    /// Returns error if the bus names cannot be listed
    #[instrument(skip(self))]
    pub async fn discover_existing_players(&self) -> Result<(), MediaError> {
        info!("Discovering existing MPRIS players on D-Bus");
        let names = self.connector.list_names().await?;

        let candidates: Vec<PlayerId> = names
            .iter()
            .filter(|name| name.starts_with(MPRIS_BUS_PREFIX))
            .filter(|name| !self.should_ignore_player(name))
            .map(|name| PlayerId::from_bus_name(name))
            .collect();

        let connected = join_all(
            candidates
                .into_iter()
                .map(|player_id| self.connector.connect(player_id)),
        )
        .await;

        let mut handles = Vec::new();
        for result in connected {
            match result {
                Ok(handle) => handles.push(handle),
                Err(e) => warn!("Failed to add existing player: {e}"),
            }
        }

        let mut registry = self.registry.write().await;
        registry.initialize(handles);
        info!(
            players = registry.len(),
            active = ?registry.active_id(),
            "Finished discovering existing MPRIS players"
        );
        Ok(())
    }

    /// Applies one ownership change to the registry.
    ///
    /// A replaced player whose new owner cannot be reached is removed, so
    /// the handle bound to the old owner never outlives it.
    ///
    /// # Errors
    /// Returns error if a handle for an appeared or replaced player cannot
    /// be created
    #[instrument(skip(self))]
    pub async fn handle_owner_change(&self, change: OwnerChange) -> Result<(), MediaError> {
        match change {
            OwnerChange::Appeared(player_id) => self.handle_player_added(player_id).await,
            OwnerChange::Replaced(player_id) => {
                let result = self.handle_player_added(player_id.clone()).await;
                if result.is_err() {
                    self.handle_player_removed(&player_id).await;
                }
                result
            }
            OwnerChange::Vanished(player_id) => {
                self.handle_player_removed(&player_id).await;
                Ok(())
            }
        }
    }

    /// Handle a new player being added to the bus
    ///
    /// # Errors
    /// Returns error if player handle creation fails
    pub async fn handle_player_added(&self, player_id: PlayerId) -> Result<(), MediaError> {
        if self.should_ignore_player(player_id.bus_name()) {
            info!(bus_name = %player_id, "Ignoring player based on configuration");
            return Ok(());
        }

        let handle = self.connector.connect(player_id.clone()).await?;

        let mut registry = self.registry.write().await;
        registry.on_added(handle);
        info!(bus_name = %player_id, players = registry.len(), "MPRIS player added");
        Ok(())
    }

    /// Handle a player being removed from the bus
    pub async fn handle_player_removed(&self, player_id: &PlayerId) {
        let mut registry = self.registry.write().await;
        if registry.on_removed(player_id) {
            info!(
                bus_name = %player_id,
                active = ?registry.active_id(),
                "MPRIS player removed"
            );
        }
    }

    /// Check if a player should be ignored based on its bus name
    pub fn should_ignore_player(&self, bus_name: &str) -> bool {
        self.ignored_players
            .iter()
            .any(|pattern| bus_name.contains(pattern.as_str()))
    }

    /// Subscribes to `NameOwnerChanged` and applies changes in arrival order.
    ///
    /// # Errors
    /// Returns error if D-Bus proxy creation or signal subscription fails
    #[instrument(skip(self, connection))]
    pub async fn start_discovery(&self, connection: &Connection) -> Result<JoinHandle<()>, MediaError> {
        info!("Starting MPRIS player discovery monitoring");
        let dbus_proxy = fdo::DBusProxy::new(connection)
            .await
            .map_err(|e| MediaError::InitializationFailed(format!("DBus proxy failed: {e}")))?;

        let mut name_owner_changed = dbus_proxy.receive_name_owner_changed().await.map_err(|e| {
            MediaError::InitializationFailed(format!("Signal subscription failed: {e}"))
        })?;

        let discovery = self.clone();
        let task = tokio::spawn(async move {
            while let Some(signal) = name_owner_changed.next().await {
                let args = match signal.args() {
                    Ok(args) => args,
                    Err(e) => {
                        debug!("Skipping malformed NameOwnerChanged signal: {e}");
                        continue;
                    }
                };

                let old_owner = Option::as_ref(args.old_owner()).map(|owner| owner.as_str());
                let new_owner = Option::as_ref(args.new_owner()).map(|owner| owner.as_str());
                let Some(change) = classify_owner_change(args.name().as_str(), old_owner, new_owner)
                else {
                    continue;
                };

                debug!(?change, "Bus name ownership changed");
                if let Err(e) = discovery.handle_owner_change(change).await {
                    warn!("Failed to apply ownership change: {e}");
                }
            }
            debug!("NameOwnerChanged stream ended");
        });

        Ok(task)
    }
}
