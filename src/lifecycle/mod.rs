//! Runtime orchestration and lifecycle management.
//!
//! - [`AdminSystem`] starts the object stores, registers them and mounts a
//!   controller per model on the admin router.
//! - [`setup_tracing`] initializes logging.

pub mod admin_system;
pub mod tracing;

pub use admin_system::*;
pub use tracing::*;
