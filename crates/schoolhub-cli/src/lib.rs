//! # SchoolHub CLI
//!
//! Administrative commands and database seeding for SchoolHub.
//!
//! - [`admin`]: create administrator accounts and reset passwords on behalf
//!   of users who cannot receive mail
//! - [`seeder`]: fake students, staff, drivers and parents for development
//!
//! ```ignore
//! use schoolhub_cli::seeder::{seed_all, SeedConfig};
//!
//! seed_all(&pool, SeedConfig::default()).await?;
//! ```

pub mod admin;
pub mod seeder;
