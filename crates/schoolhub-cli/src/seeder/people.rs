//! Generation and batch insertion of seeded accounts.
//!
//! Identifiers carry the generation index so a single run never collides
//! with itself. Running `seed` twice without `clear-seed` in between hits
//! the unique constraints and rolls the kind back.

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::address::en::{CityName, StreetName};
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use schoolhub_models::UserId;
use schoolhub_models::profiles::DEFAULT_VEHICLE_CAPACITY;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{AccountSeed, PersonSeed, ProfileSeed, SeedKind, VehicleSeed};

const DEPARTMENTS: &[&str] = &["Science", "Mathematics", "Languages", "Arts", "Sports"];
const DESIGNATIONS: &[&str] = &["Teacher", "Senior Teacher", "Head of Department"];
const VEHICLE_MODELS: &[&str] = &["Toyota Coaster", "Ford Transit", "Mercedes Sprinter"];

/// Generates `count` accounts of the given kind.
pub fn generate_people(kind: SeedKind, count: usize, password_hash: &str) -> Vec<PersonSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| generate_person(kind, idx, password_hash))
        .collect()
}

fn generate_person(kind: SeedKind, idx: usize, password_hash: &str) -> PersonSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let (username, profile) = match kind {
        SeedKind::Student => {
            let admission_number = format!("SEED{:05}", idx);
            let profile = ProfileSeed::Student {
                date_of_birth: seeded_date(2008, idx),
                address: format!(
                    "{} {}, {}",
                    idx + 1,
                    StreetName().fake::<String>(),
                    CityName().fake::<String>()
                ),
                admission_number: admission_number.clone(),
            };
            (admission_number.to_lowercase(), profile)
        }
        SeedKind::Staff => (
            format!("{}_s{:03}", ascii_prefix(&first_name, "staff"), idx),
            ProfileSeed::Staff {
                designation: DESIGNATIONS[idx % DESIGNATIONS.len()].to_string(),
                employee_id: format!("EMP-S{:05}", idx),
                department: DEPARTMENTS[idx % DEPARTMENTS.len()].to_string(),
                joining_date: seeded_date(2015, idx),
            },
        ),
        SeedKind::Driver => (
            format!("driver_seed{:04}", idx),
            ProfileSeed::Driver {
                license_number: format!("LIC-S{:06}", idx),
                phone_number: seeded_phone(idx),
                vehicle: VehicleSeed {
                    registration_number: format!("SEED-{:04}", idx),
                    model: VEHICLE_MODELS[idx % VEHICLE_MODELS.len()].to_string(),
                    capacity: DEFAULT_VEHICLE_CAPACITY,
                },
            },
        ),
        SeedKind::Parent => (
            format!("parent_seed{:04}", idx),
            ProfileSeed::Parent {
                phone_number: seeded_phone(idx),
            },
        ),
    };

    let email = format!(
        "{}.{}+{}{}@example.com",
        ascii_prefix(&first_name, "user"),
        ascii_prefix(&last_name, "user"),
        kind.label(),
        idx
    );

    PersonSeed {
        account: AccountSeed {
            username,
            first_name,
            last_name,
            email,
            password_hash: password_hash.to_string(),
            role: kind.role_tag(),
        },
        profile,
    }
}

fn ascii_prefix(name: &str, fallback: &str) -> String {
    let prefix: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if prefix.is_empty() {
        fallback.to_string()
    } else {
        prefix
    }
}

fn seeded_date(base_year: i32, idx: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(
        base_year + (idx % 8) as i32,
        (idx % 12) as u32 + 1,
        (idx % 28) as u32 + 1,
    )
    .unwrap_or_default()
}

fn seeded_phone(idx: usize) -> String {
    format!("080{:08}", idx)
}

/// Seeds one kind of account, users and profiles in a single transaction.
pub async fn seed_people(
    db: &PgPool,
    kind: SeedKind,
    count: usize,
    password_hash: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    if count == 0 {
        return Ok(0);
    }

    let start_time = Instant::now();
    println!("👥 Seeding {} {}...", count, kind.label());

    let people = generate_people(kind, count, password_hash);

    let mut tx = db.begin().await?;

    // 6 params per user
    const BATCH_SIZE: usize = 800;

    for chunk in people.chunks(BATCH_SIZE) {
        let user_ids = insert_users_chunk(&mut tx, chunk).await?;
        insert_profiles_chunk(&mut tx, kind, &user_ids, chunk).await?;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} {} in {:?}",
        people.len(),
        kind.label(),
        start_time.elapsed()
    );

    Ok(people.len())
}

fn values_clause(rows: usize, columns: usize) -> String {
    (0..rows)
        .map(|row| {
            let params: Vec<String> = (1..=columns)
                .map(|col| format!("${}", row * columns + col))
                .collect();
            format!("({})", params.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    people: &[PersonSeed],
) -> Result<Vec<UserId>, Box<dyn std::error::Error>> {
    if people.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO users (username, first_name, last_name, email, password, role) VALUES {} RETURNING id",
        values_clause(people.len(), 6)
    );

    let mut q = sqlx::query_scalar(&query);
    for person in people {
        let account = &person.account;
        q = q
            .bind(&account.username)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.role);
    }

    let ids: Vec<UserId> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

async fn insert_profiles_chunk(
    tx: &mut Transaction<'_, Postgres>,
    kind: SeedKind,
    user_ids: &[UserId],
    people: &[PersonSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    if people.is_empty() {
        return Ok(());
    }

    let (table, columns) = match kind {
        SeedKind::Student => ("students", "user_id, admission_number, date_of_birth, address"),
        SeedKind::Staff => (
            "staff",
            "user_id, designation, employee_id, department, joining_date",
        ),
        SeedKind::Driver => ("drivers", "user_id, license_number, phone_number"),
        SeedKind::Parent => ("parents", "user_id, phone_number"),
    };
    let column_count = columns.split(',').count();

    let query = format!(
        "INSERT INTO {} ({}) VALUES {} RETURNING id",
        table,
        columns,
        values_clause(people.len(), column_count)
    );

    let mut q = sqlx::query_scalar(&query);
    for (user_id, person) in user_ids.iter().zip(people) {
        q = q.bind(user_id);
        q = match &person.profile {
            ProfileSeed::Student {
                admission_number,
                date_of_birth,
                address,
            } => q.bind(admission_number).bind(date_of_birth).bind(address),
            ProfileSeed::Staff {
                designation,
                employee_id,
                department,
                joining_date,
            } => q
                .bind(designation)
                .bind(employee_id)
                .bind(department)
                .bind(joining_date),
            ProfileSeed::Driver {
                license_number,
                phone_number,
                ..
            } => q.bind(license_number).bind(phone_number),
            ProfileSeed::Parent { phone_number } => q.bind(phone_number),
        };
    }

    let profile_ids: Vec<uuid::Uuid> = q.fetch_all(&mut **tx).await?;

    if kind == SeedKind::Driver {
        insert_vehicles_chunk(tx, &profile_ids, people).await?;
    }

    Ok(())
}

async fn insert_vehicles_chunk(
    tx: &mut Transaction<'_, Postgres>,
    driver_ids: &[uuid::Uuid],
    people: &[PersonSeed],
) -> Result<(), Box<dyn std::error::Error>> {
    let vehicles: Vec<(&uuid::Uuid, &VehicleSeed)> = driver_ids
        .iter()
        .zip(people)
        .filter_map(|(driver_id, person)| match &person.profile {
            ProfileSeed::Driver { vehicle, .. } => Some((driver_id, vehicle)),
            _ => None,
        })
        .collect();

    if vehicles.is_empty() {
        return Ok(());
    }

    let query = format!(
        "INSERT INTO vehicles (driver_id, registration_number, model, capacity) VALUES {}",
        values_clause(vehicles.len(), 4)
    );

    let mut q = sqlx::query(&query);
    for (driver_id, vehicle) in vehicles {
        q = q
            .bind(driver_id)
            .bind(&vehicle.registration_number)
            .bind(&vehicle.model)
            .bind(vehicle.capacity);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}

/// Deletes seeded users and their vehicles. Profiles cascade; admins are kept.
pub async fn clear_people(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded accounts...");

    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM vehicles WHERE registration_number LIKE 'SEED-%'")
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM users WHERE email LIKE '%@example.com' AND role <> $1")
        .bind(schoolhub_models::users::UserRole::Admin.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} users in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}
