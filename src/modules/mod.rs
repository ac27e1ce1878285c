pub mod auth;
pub mod navigation;
pub mod password_reset;
pub mod provisioning;
pub mod users;
