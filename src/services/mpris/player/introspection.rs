use quick_xml::{Reader, events::Event};
use tracing::{debug, warn};
use zbus::{Connection, fdo::IntrospectableProxy};

use crate::services::mpris::{MediaError, PlayerId};

/// Object path every MPRIS player exports its interfaces on.
pub const MPRIS_OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";

/// Playback control interface name.
pub const PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";

/// Hand-written description of a standard MPRIS player.
///
/// Used for players whose own introspection data lists no interfaces. It may
/// not match what a non-standard player actually implements.
const FALLBACK_INTROSPECTION: &str = r#"<!DOCTYPE node PUBLIC "-//freedesktop//DTD D-BUS Object Introspection 1.0//EN"
 "http://www.freedesktop.org/standards/dbus/1.0/introspect.dtd">
<node>
  <interface name="org.freedesktop.DBus.Introspectable">
    <method name="Introspect">
      <arg name="data" direction="out" type="s"/>
    </method>
  </interface>
  <interface name="org.freedesktop.DBus.Properties">
    <method name="Get">
      <arg name="interface" direction="in" type="s"/>
      <arg name="property" direction="in" type="s"/>
      <arg name="value" direction="out" type="v"/>
    </method>
    <method name="Set">
      <arg name="interface_name" direction="in" type="s"/>
      <arg name="property_name" direction="in" type="s"/>
      <arg name="value" direction="in" type="v"/>
    </method>
    <method name="GetAll">
      <arg name="interface" direction="in" type="s"/>
      <arg name="properties" direction="out" type="a{sv}"/>
    </method>
  </interface>
  <interface name="org.mpris.MediaPlayer2">
    <method name="Raise"/>
    <method name="Quit"/>
    <property name="CanQuit" type="b" access="read"/>
    <property name="CanRaise" type="b" access="read"/>
    <property name="HasTrackList" type="b" access="read"/>
    <property name="Identity" type="s" access="read"/>
    <property name="DesktopEntry" type="s" access="read"/>
    <property name="SupportedUriSchemes" type="as" access="read"/>
    <property name="SupportedMimeTypes" type="as" access="read"/>
  </interface>
  <interface name="org.mpris.MediaPlayer2.Player">
    <method name="Next"/>
    <method name="Previous"/>
    <method name="Pause"/>
    <method name="PlayPause"/>
    <method name="Stop"/>
    <method name="Play"/>
    <property name="PlaybackStatus" type="s" access="read"/>
    <property name="LoopStatus" type="s" access="readwrite"/>
    <property name="Shuffle" type="b" access="readwrite"/>
    <property name="Volume" type="d" access="readwrite"/>
    <property name="CanGoNext" type="b" access="read"/>
    <property name="CanGoPrevious" type="b" access="read"/>
    <property name="CanPlay" type="b" access="read"/>
    <property name="CanPause" type="b" access="read"/>
    <property name="CanControl" type="b" access="read"/>
  </interface>
</node>
"#;

/// Where a capability description came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilitySource {
    /// The player described itself.
    Introspected,
    /// The player listed nothing; the built-in description is used.
    Fallback,
}

/// Interfaces a player is known to implement.
#[derive(Debug, Clone)]
pub struct Capabilities {
    interfaces: Vec<String>,
    source: CapabilitySource,
}

impl Capabilities {
    /// Picks the live description when it lists any interface, the built-in
    /// one otherwise.
    pub fn resolve(live: Vec<String>) -> Self {
        if live.is_empty() {
            return Self::fallback();
        }

        Self {
            interfaces: live,
            source: CapabilitySource::Introspected,
        }
    }

    /// The built-in description of a standard MPRIS player.
    pub fn fallback() -> Self {
        Self {
            interfaces: parse_interfaces(FALLBACK_INTROSPECTION).unwrap_or_default(),
            source: CapabilitySource::Fallback,
        }
    }

    /// Introspects a player's MPRIS object.
    ///
    /// A failed introspection call counts as an empty description.
    pub async fn discover(connection: &Connection, player_id: &PlayerId) -> Self {
        match introspect(connection, player_id).await {
            Ok(interfaces) => {
                if interfaces.is_empty() {
                    warn!(player = %player_id, "Player describes no interfaces, using built-in description");
                }
                Self::resolve(interfaces)
            }
            Err(e) => {
                warn!(player = %player_id, error = %e, "Introspection failed, using built-in description");
                Self::fallback()
            }
        }
    }

    /// Whether `interface` is part of the description.
    pub fn supports(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|name| name == interface)
    }

    /// Interface names in document order.
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Where the description came from.
    pub fn source(&self) -> CapabilitySource {
        self.source
    }
}

async fn introspect(connection: &Connection, player_id: &PlayerId) -> Result<Vec<String>, MediaError> {
    let proxy = IntrospectableProxy::builder(connection)
        .destination(player_id.bus_name().to_string())?
        .path(MPRIS_OBJECT_PATH)?
        .build()
        .await?;

    let xml = proxy
        .introspect()
        .await
        .map_err(|e| MediaError::DbusError(e.into()))?;
    debug!(player = %player_id, bytes = xml.len(), "Received introspection data");

    parse_interfaces(&xml)
}

/// Names of the `<interface>` elements in a D-Bus introspection document.
///
/// # Errors
/// Returns `MediaError::Introspection` on malformed XML
pub fn parse_interfaces(xml: &str) -> Result<Vec<String>, MediaError> {
    let mut reader = Reader::from_str(xml);
    let mut interfaces = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element) | Event::Empty(element))
                if element.name().as_ref() == b"interface" =>
            {
                let name = element
                    .try_get_attribute("name")
                    .map_err(|e| MediaError::Introspection(e.to_string()))?;
                if let Some(name) = name {
                    interfaces.push(String::from_utf8_lossy(&name.value).into_owned());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(MediaError::Introspection(e.to_string())),
            Ok(_) => {}
        }
    }

    Ok(interfaces)
}
