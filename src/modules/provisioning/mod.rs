//! Administrator-driven account creation for students, staff, drivers and
//! parents.
//!
//! Each kind gets a user with a generated username and password plus its
//! role profile, written in one transaction. The credentials are mailed
//! after commit; see [`notifications`].

pub mod controller;
pub mod drivers;
pub mod notifications;
pub mod parents;
pub mod router;
pub mod service;
pub mod staff;
pub mod students;
pub mod usernames;

pub use router::{
    init_drivers_router, init_parents_router, init_staff_router, init_students_router,
};
pub use service::ProvisioningService;
