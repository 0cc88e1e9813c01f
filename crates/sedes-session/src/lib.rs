//! Per-user selection flow: location, ranking, facility choice, routes, and
//! the active travel mode.

pub mod controller;
pub mod error;
pub mod state;
pub mod view;

pub use controller::SessionController;
pub use error::SessionError;
pub use state::{RouteTicket, SessionState};
pub use view::{Notice, Phase, SessionView};
