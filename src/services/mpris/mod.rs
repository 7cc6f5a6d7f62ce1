/// Player discovery and lifecycle tracking
pub mod discovery;
/// Media player error types
pub mod error;
/// Player handles and capability descriptions
pub mod player;
/// D-Bus proxy trait definitions
pub mod proxy;
/// Ordered player set and active selection
pub mod registry;
/// Player identity and loop mode types
pub mod types;

pub use discovery::*;
pub use error::*;
pub use player::*;
pub use proxy::*;
pub use registry::*;
pub use types::*;
