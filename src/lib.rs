//! # Admin CRUD
//!
//! A small administrative backend built on [`crud_framework`]: two models,
//! [`Flange`](model::Flange) and [`StrangeRabbit`](model::StrangeRabbit),
//! each served by the same generic controller in HTML, XML and ext_json.
//!
//! ## Module Tour
//!
//! ### 1. The Models ([`model`])
//! Plain data structures implementing [`Resource`](crud_framework::Resource),
//! with their create/update payloads and validation errors.
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! [`AdminSystem`](lifecycle::AdminSystem) spawns one store per model,
//! registers them, builds the controllers and mounts them under the configured
//! route prefix. [`shutdown`](lifecycle::AdminSystem::shutdown) stops them again.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run -- --host example.com
//! RUST_LOG=debug cargo run -- --config admin.toml
//! ```

pub mod lifecycle;
pub mod model;
