//! View state of the front ends.
//!
//! Each store is a plain value with a `reduce(self, action) -> Self`
//! transition. Stores start in the loading state until their first load.

pub mod auth;
pub mod drinks;
pub mod events;
pub mod groups;

pub use auth::{AuthAction, AuthState};
pub use drinks::{DrinkAction, DrinkEntry, DrinkState};
pub use events::{EventAction, EventState};
pub use groups::{CurrentGroup, GroupAction, GroupState};
