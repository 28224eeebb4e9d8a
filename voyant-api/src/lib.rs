//! Client side of the Voyant travel storefront: session and token handling, the REST
//! facades, client routes with their role guards, and the [`Storefront`] that wires them.

pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod error;
pub mod flights;
pub mod http;
pub mod inventory;
pub mod navigation;
pub mod payments;
pub mod reviews;
pub mod routes;
pub mod session;
pub mod state;

pub use auth::{AuthApi, LoginOutcome};
pub use error::ApiError;
pub use http::{HttpClient, RequestOptions};
pub use navigation::{NavigationOutcome, Navigator};
pub use routes::{dashboard_for, guard, nav_links, GuardDecision, Route};
pub use session::{SessionSnapshot, SessionStore};
pub use state::Storefront;
