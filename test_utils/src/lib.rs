//! Utility helpers for tests.
//!
//! Fixtures build small obstacle-free levels and simulations; probes script
//! the contacts a frame reports; [`drive`] runs a simulation under constant
//! input.
pub mod fixtures;
pub mod probes;

pub use fixtures::{drive, drive_until, headless_app, open_level, simulation, walled_level};
pub use probes::{NoContacts, ScriptedProbe};
