//! # Sunphase Library
//!
//! Internal library for the sunphase binary: decides whether it is day or
//! night at a configured location and runs an action when that changes.
//!
//! ## Architecture
//!
//! - **Entry Point**: `Sunphase` struct runs the watcher with resource setup
//! - **Core Logic**: `core` module contains the main loop and daily refresh
//! - **Geographic**: `geo` module for sunrise/sunset calculation and day boundaries
//! - **Phases**: `phase` module classifies minutes and detects transitions
//! - **Hooks**: `hooks` module with the actions run on a phase change
//! - **Configuration**: `config` module for TOML-based settings
//! - **Commands**: `commands` module for `times` and `simulate`
//! - **Infrastructure**: signal handling, time source abstraction, logging

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

// Public API modules
pub mod args;
pub mod commands;
pub mod config;
pub mod core;
pub mod geo;
pub mod hooks;
pub mod phase;
pub mod signals;
pub mod state;
pub mod time_source;

mod sunphase;

// Re-exports for embedding the tracker
pub use geo::{DayBoundary, Daylight, GeoConfig, PolarPolicy, SolarError, SolarEvent};
pub use hooks::{FnHook, Hooks, PhaseHook};
pub use phase::{DayPhaseTracker, Phase, TransitionEvent};
pub use sunphase::Sunphase;
