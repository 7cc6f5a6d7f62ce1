//! mpris-remote - Drive desktop media players from an infrared remote.
//!
//! A microcontroller decodes remote button presses and writes them as text
//! lines to a serial port. This crate reads those lines, maps each button to
//! an action and forwards it over D-Bus to the MPRIS player that is currently
//! selected. Players come and go at runtime; the registry follows the bus'
//! `NameOwnerChanged` notifications so the selection is always current.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mpris_remote::{bridge::Bridge, config::Config};
//!
//! # async fn run() -> mpris_remote::Result<()> {
//! let config = Config::load(None)?;
//! let bridge = Bridge::connect(&config).await?;
//! bridge.run(&config).await?;
//! # Ok(())
//! # }
//! ```

/// Wiring between the serial remote and the MPRIS services.
pub mod bridge;

/// Configuration schema definitions and validation.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Services for system integration.
pub mod services;

/// Logging setup.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{BridgeError, Result};
