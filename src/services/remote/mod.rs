/// Action selection and execution for button presses
pub mod dispatch;
/// Remote error types
pub mod error;
/// Button vocabulary of the receiver
pub mod event;
/// Serial line transport
pub mod serial;

pub use dispatch::*;
pub use error::*;
pub use event::*;
pub use serial::*;
