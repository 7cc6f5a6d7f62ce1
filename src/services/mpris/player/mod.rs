/// zbus-backed player handle
pub mod control;
/// Player handle trait and the empty sentinel
pub mod handle;
/// Capability descriptions from introspection
pub mod introspection;

pub use control::MprisPlayer;
pub use handle::{EmptyPlayer, MediaPlayer};
pub use introspection::{CapabilitySource, Capabilities};
