//! Core infrastructure for the Motor runtime.
//!
//! This crate provides the lifecycle skeleton shared by the entry point and
//! every module: the [`module::Module`] contract, the ordered
//! [`registry::ModuleRegistry`], the [`app::App`] orchestrator that drives
//! Awake, Start, per-frame updates and CleanUp, and the logging subsystem.

pub mod app;
pub mod args;
pub mod clock;
pub mod context;
pub mod error;
pub mod fps;
pub mod frame;
pub mod logging;
pub mod module;
pub mod registry;

pub use motor_config::{Config, ConfigNode};
