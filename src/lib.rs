//! RaceDay - Race Program Planning and Timing Core
//!
//! Plans and conducts the race program of a skiing competition. Given an
//! event, its raceclasses and a competition format (Individual Sprint or
//! Interval Start), RaceDay generates a timed raceplan and a startlist,
//! and reconciles incoming time events into live race results.
//!
//! The HTTP surface, the document store backend and process bootstrap are
//! external collaborators; this crate exposes the domain model, the
//! outbound ports and the end-to-end use cases they call into.

// Core modules
pub mod commands;
pub mod integrations;
pub mod models;
pub mod planning;
pub mod services;
pub mod startlist;
pub mod storage;

// Re-export commonly used types
pub use models::race::Race;
pub use models::raceplan::Raceplan;
pub use models::startlist::{StartEntry, Startlist};
pub use models::time_event::TimeEvent;
pub use storage::sqlite::SqliteStore;
pub use storage::store::Store;
