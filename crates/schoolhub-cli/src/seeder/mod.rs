//! Database seeding for development and demos.
//!
//! - [`people`] - account generation and batch insertion
//! - [`models`] - seed data structures and [`SeedConfig`]
//!
//! # Performance
//!
//! - Parallel data generation using Rayon
//! - Batch inserts with multi-value INSERT statements
//! - Single bcrypt hash reused for all users (cost 4 for speed)

pub mod models;
pub mod people;

pub use models::{SeedConfig, SeedKind};

use sqlx::PgPool;
use std::time::Instant;

/// Password shared by every seeded account.
pub const SEED_PASSWORD: &str = "password123";

/// Seeds every kind of account in `config`.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!(
        "   - Students: {}, Staff: {}, Drivers: {}, Parents: {}",
        config.students, config.staff, config.drivers, config.parents
    );

    let password_hash = hash_password()?;

    let mut total = 0;
    for (kind, count) in config.counts() {
        total += people::seed_people(db, kind, count, &password_hash).await?;
    }

    println!(
        "\n✅ Seeding complete! Created {} accounts in {:?}",
        total,
        start_time.elapsed()
    );
    println!("\n📝 Default password for all seeded users: {}", SEED_PASSWORD);

    Ok(())
}

/// Seeds a single kind of account.
pub async fn seed_kind(
    db: &PgPool,
    kind: SeedKind,
    count: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let password_hash = hash_password()?;
    people::seed_people(db, kind, count, &password_hash).await
}

/// Clears all seeded data from the database
pub async fn clear_all(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    people::clear_people(db).await
}

fn hash_password() -> Result<String, Box<dyn std::error::Error>> {
    Ok(bcrypt::hash(SEED_PASSWORD, 4)?)
}
