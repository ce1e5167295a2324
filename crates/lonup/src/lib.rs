//! lonup library - exposes modules for testing.

pub mod checksum;
pub mod config;
pub mod confirm;
pub mod errors;
pub mod fetch;
pub mod logging;
pub mod orchestrator;
pub mod outcome;
pub mod process_guard;
pub mod replace;
