//! Shared building blocks for the clock radio: channel list, preferences,
//! player line protocol, host access, configuration and paths.

pub mod channels;
pub mod config;
pub mod host;
pub mod platform;
pub mod prefs;
pub mod protocol;
