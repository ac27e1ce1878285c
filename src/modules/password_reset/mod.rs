//! OTP-based password reset.
//!
//! The flow is bound to a session cookie rather than a username: the
//! username is captured at the first step and carried by the session.
//! See [`workflow`] for the state machine.

pub mod controller;
pub mod cookie;
pub mod router;
pub mod service;
pub mod workflow;

pub use router::init_password_reset_router;
pub use workflow::ResetState;
