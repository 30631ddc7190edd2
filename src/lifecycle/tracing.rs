//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber` formatter filtered
//! by `RUST_LOG`, falling back to [`DEFAULT_FILTER`] when it is unset or
//! unparsable. Module targets are hidden. Store events and controller spans
//! name the record type in a `resource` field instead.
//!
//! ## What Gets Traced
//!
//! - **Store Lifecycle**: start, shutdown and final size
//! - **Store Operations**: creates, updates and deletes at `info`, reads at `debug`
//! - **Controller Actions**: one span per action, with `format` and `id`
//! - **Requests**: method, path and status of every request the router handles
//!
//! ## Usage Examples
//!
//! ```bash
//! # Submitted attributes and store reads
//! RUST_LOG=debug cargo run
//!
//! # Only the framework
//! RUST_LOG=crud_framework=debug cargo run
//! ```
//!
//! With the default filter, creating a flange through the form logs:
//!
//! ```text
//! INFO Created resource="Flange" id=1 site=1 size=1
//! INFO create{resource=Flange format=html}: Created id=1
//! INFO Handled method=POST path=/admin/flanges status=302
//! ```
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` does not provide one.
pub const DEFAULT_FILTER: &str = "info";

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
