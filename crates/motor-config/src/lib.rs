//! Configuration types and loaders for Motor.
//!
//! The engine reads a single TOML document once at startup. Everything the
//! orchestrator and its modules see afterwards is a read-only view into that
//! document.

pub mod document;
pub mod node;

pub use document::{config_path, Config, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};
pub use node::ConfigNode;
