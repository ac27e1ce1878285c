pub mod controller;
pub mod router;
pub mod routing;

pub use router::init_navigation_router;
pub use routing::{route_dashboard, route_profile};
