//! Outbound ports to the event and user services.

pub mod events;
pub mod users;

pub use events::{EventsError, EventsPort, HttpEventsAdapter};
pub use users::{HttpUsersAdapter, UsersError, UsersPort};
