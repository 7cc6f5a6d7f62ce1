use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use super::{EmptyPlayer, MediaPlayer, PlayerId};

/// Registry shared between the dispatcher and the discovery task.
pub type SharedRegistry = Arc<RwLock<PlayerRegistry>>;

/// Ordered set of known players and the active selection.
///
/// Players are kept sorted by bus name with no duplicate names. Adding or
/// removing any other player leaves the active player selected; removing the
/// active player selects its predecessor, or the new first player when it
/// was first.
#[derive(Debug)]
pub struct PlayerRegistry {
    players: Vec<Arc<dyn MediaPlayer>>,
    active: usize,
    empty: Arc<dyn MediaPlayer>,
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            players: Vec::new(),
            active: 0,
            empty: Arc::new(EmptyPlayer),
        }
    }

    /// Wraps the registry for sharing across tasks.
    pub fn shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Replaces the player set with `handles` and selects the first player.
    ///
    /// When two handles share a bus name the later one is kept. Handles
    /// without an identity are dropped.
    pub fn initialize(&mut self, handles: Vec<Arc<dyn MediaPlayer>>) {
        let mut players: Vec<Arc<dyn MediaPlayer>> = Vec::with_capacity(handles.len());
        for handle in handles {
            let Some(id) = handle.id() else {
                warn!("Ignoring player handle without identity");
                continue;
            };

            match players.iter().position(|p| p.id() == Some(id)) {
                Some(index) => players[index] = handle,
                None => players.push(handle),
            }
        }

        players.sort_by(|a, b| a.id().cmp(&b.id()));
        self.players = players;
        self.active = 0;
    }

    /// The active player, or the empty sentinel when there are no players.
    pub fn current(&self) -> Arc<dyn MediaPlayer> {
        self.players
            .get(self.active)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.empty))
    }

    /// Position of the active player, `None` when empty.
    pub fn active_index(&self) -> Option<usize> {
        (!self.players.is_empty()).then_some(self.active)
    }

    /// Identity of the active player, `None` when empty.
    pub fn active_id(&self) -> Option<PlayerId> {
        self.players.get(self.active).and_then(|p| p.id().cloned())
    }

    /// Players in bus name order.
    pub fn players(&self) -> &[Arc<dyn MediaPlayer>] {
        &self.players
    }

    /// Bus names in registry order.
    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().filter_map(|p| p.id().cloned()).collect()
    }

    /// Number of known players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no players are known
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Selects the next player, wrapping to the first.
    pub fn select_next(&mut self) {
        self.active = (self.active + 1) % self.cycle_len();
    }

    /// Selects the previous player, wrapping to the last.
    pub fn select_previous(&mut self) {
        let len = self.cycle_len();
        self.active = (self.active + len - 1) % len;
    }

    /// Inserts a newly discovered player.
    ///
    /// A handle for an already known bus name replaces the old handle in
    /// place. The active player stays selected; the first player added to
    /// an empty registry becomes active.
    pub fn on_added(&mut self, handle: Arc<dyn MediaPlayer>) {
        let Some(id) = handle.id().cloned() else {
            warn!("Ignoring player handle without identity");
            return;
        };
        let active_id = self.active_id();

        match self.position(&id) {
            Ok(index) => self.players[index] = handle,
            Err(index) => self.players.insert(index, handle),
        }

        self.active = active_id
            .and_then(|active| self.position(&active).ok())
            .unwrap_or(0);
    }

    /// Removes the player with `id`.
    ///
    /// Unknown names are ignored. Removing a player at or before the active
    /// one moves the selection back one step, staying on the first position
    /// when the first player is removed. Removing a later player keeps the
    /// active player selected.
    ///
    /// Returns whether a player was removed.
    pub fn on_removed(&mut self, id: &PlayerId) -> bool {
        let Ok(removed) = self.position(id) else {
            return false;
        };

        self.players.remove(removed);

        if removed <= self.active {
            self.active = self.active.saturating_sub(1);
        }

        true
    }

    fn position(&self, id: &PlayerId) -> Result<usize, usize> {
        self.players
            .binary_search_by(|player| player.id().cmp(&Some(id)))
    }

    fn cycle_len(&self) -> usize {
        self.players.len().max(1)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::services::mpris::{LoopMode, MediaError};

    #[derive(Debug)]
    struct NamedPlayer(PlayerId);

    #[async_trait]
    impl MediaPlayer for NamedPlayer {
        fn id(&self) -> Option<&PlayerId> {
            Some(&self.0)
        }

        fn display_name(&self) -> &str {
            self.0.display_name()
        }

        async fn next(&self) -> Result<(), MediaError> {
            Ok(())
        }

        async fn previous(&self) -> Result<(), MediaError> {
            Ok(())
        }

        async fn pause(&self) -> Result<(), MediaError> {
            Ok(())
        }

        async fn play(&self) -> Result<(), MediaError> {
            Ok(())
        }

        async fn play_pause(&self) -> Result<(), MediaError> {
            Ok(())
        }

        async fn stop(&self) -> Result<(), MediaError> {
            Ok(())
        }

        async fn volume(&self) -> Result<f64, MediaError> {
            Ok(1.0)
        }

        async fn set_volume(&self, _volume: f64) -> Result<(), MediaError> {
            Ok(())
        }

        async fn shuffle(&self) -> Result<bool, MediaError> {
            Ok(false)
        }

        async fn set_shuffle(&self, _shuffle: bool) -> Result<(), MediaError> {
            Ok(())
        }

        async fn loop_mode(&self) -> Result<LoopMode, MediaError> {
            Ok(LoopMode::None)
        }

        async fn set_loop_mode(&self, _mode: LoopMode) -> Result<(), MediaError> {
            Ok(())
        }
    }

    fn player(name: &str) -> Arc<dyn MediaPlayer> {
        Arc::new(NamedPlayer(PlayerId::from_bus_name(name)))
    }

    fn registry(names: &[&str]) -> PlayerRegistry {
        let mut registry = PlayerRegistry::new();
        registry.initialize(names.iter().map(|name| player(name)).collect());
        registry
    }

    fn names(registry: &PlayerRegistry) -> Vec<String> {
        registry
            .ids()
            .iter()
            .map(|id| id.bus_name().to_string())
            .collect()
    }

    fn active(registry: &PlayerRegistry) -> Option<String> {
        registry.active_id().map(|id| id.bus_name().to_string())
    }

    #[test]
    fn initialize_sorts_and_selects_first() {
        let registry = registry(&["C", "A", "B"]);

        assert_eq!(names(&registry), ["A", "B", "C"]);
        assert_eq!(registry.active_index(), Some(0));
        assert_eq!(active(&registry).as_deref(), Some("A"));
    }

    #[test]
    fn initialize_drops_duplicate_names() {
        let registry = registry(&["B", "A", "B"]);

        assert_eq!(names(&registry), ["A", "B"]);
    }

    #[test]
    fn empty_registry_returns_sentinel() {
        let mut registry = PlayerRegistry::new();

        assert!(registry.current().id().is_none());
        assert_eq!(registry.active_index(), None);

        registry.select_next();
        registry.select_previous();

        assert!(registry.current().id().is_none());
    }

    #[test]
    fn selection_wraps_around() {
        let mut registry = registry(&["A", "B", "C"]);

        registry.select_previous();
        assert_eq!(active(&registry).as_deref(), Some("C"));

        registry.select_next();
        assert_eq!(active(&registry).as_deref(), Some("A"));
    }

    #[test]
    fn next_then_previous_restores_selection() {
        let mut registry = registry(&["A", "B", "C", "D"]);

        for start in 0..registry.len() {
            while registry.active_index() != Some(start) {
                registry.select_next();
            }

            registry.select_next();
            registry.select_previous();
            assert_eq!(registry.active_index(), Some(start));

            registry.select_previous();
            registry.select_next();
            assert_eq!(registry.active_index(), Some(start));
        }
    }

    #[test]
    fn removing_first_active_player_keeps_first_position() {
        let mut registry = registry(&["A", "B", "C"]);

        assert!(registry.on_removed(&PlayerId::from_bus_name("A")));

        assert_eq!(names(&registry), ["B", "C"]);
        assert_eq!(registry.active_index(), Some(0));
        assert_eq!(active(&registry).as_deref(), Some("B"));
    }

    #[test]
    fn removing_earlier_player_keeps_active_player() {
        let mut registry = registry(&["A", "B", "C"]);
        registry.select_next();
        registry.select_next();

        registry.on_removed(&PlayerId::from_bus_name("A"));

        assert_eq!(active(&registry).as_deref(), Some("C"));
        assert_eq!(registry.active_index(), Some(1));
    }

    #[test]
    fn removing_later_player_keeps_active_player() {
        let mut registry = registry(&["A", "B", "C"]);
        registry.select_next();

        registry.on_removed(&PlayerId::from_bus_name("C"));

        assert_eq!(active(&registry).as_deref(), Some("B"));
    }

    #[test]
    fn removing_middle_active_player_selects_predecessor() {
        let mut registry = registry(&["A", "B", "C"]);
        registry.select_next();

        registry.on_removed(&PlayerId::from_bus_name("B"));

        assert_eq!(active(&registry).as_deref(), Some("A"));
        assert_eq!(registry.active_index(), Some(0));
    }

    #[test]
    fn removing_last_active_player_selects_predecessor() {
        let mut registry = registry(&["A", "B", "C"]);
        registry.select_previous();

        registry.on_removed(&PlayerId::from_bus_name("C"));

        assert_eq!(active(&registry).as_deref(), Some("B"));
        assert_eq!(registry.active_index(), Some(1));
    }

    #[test]
    fn removing_only_player_leaves_sentinel() {
        let mut registry = registry(&["A"]);

        registry.on_removed(&PlayerId::from_bus_name("A"));

        assert!(registry.is_empty());
        assert!(registry.current().id().is_none());
    }

    #[test]
    fn removing_unknown_player_is_noop() {
        let mut registry = registry(&["A", "B"]);
        registry.select_next();

        assert!(!registry.on_removed(&PlayerId::from_bus_name("Z")));

        assert_eq!(names(&registry), ["A", "B"]);
        assert_eq!(active(&registry).as_deref(), Some("B"));
    }

    #[test]
    fn adding_earlier_player_keeps_active_player() {
        let mut registry = registry(&["B", "C"]);
        registry.select_next();

        registry.on_added(player("A"));

        assert_eq!(names(&registry), ["A", "B", "C"]);
        assert_eq!(active(&registry).as_deref(), Some("C"));
        assert_eq!(registry.active_index(), Some(2));
    }

    #[test]
    fn first_added_player_becomes_active() {
        let mut registry = PlayerRegistry::new();

        registry.on_added(player("A"));

        assert_eq!(active(&registry).as_deref(), Some("A"));
    }

    #[test]
    fn re_adding_known_name_replaces_handle() {
        let mut registry = registry(&["A", "B"]);
        let fresh = player("B");

        registry.on_added(Arc::clone(&fresh));

        assert_eq!(registry.len(), 2);
        assert!(Arc::ptr_eq(&registry.players()[1], &fresh));
    }

    #[test]
    fn sentinel_is_never_registered() {
        let mut registry = PlayerRegistry::new();

        registry.on_added(Arc::new(EmptyPlayer));
        registry.initialize(vec![Arc::new(EmptyPlayer), player("A")]);

        assert_eq!(names(&registry), ["A"]);
    }

    #[test]
    fn mixed_mutations_keep_order_and_uniqueness() {
        let mut registry = PlayerRegistry::new();
        let script = [
            ("add", "m"),
            ("add", "c"),
            ("add", "x"),
            ("remove", "c"),
            ("add", "a"),
            ("add", "m"),
            ("remove", "q"),
            ("add", "d"),
            ("remove", "x"),
            ("add", "c"),
        ];

        for (op, name) in script {
            match op {
                "add" => registry.on_added(player(name)),
                _ => {
                    registry.on_removed(&PlayerId::from_bus_name(name));
                }
            }

            let ids = registry.ids();
            assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(registry.active_index().is_none_or(|index| index < registry.len()));
        }

        assert_eq!(names(&registry), ["a", "c", "d", "m"]);
    }
}
