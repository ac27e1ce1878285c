use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use schoolhub_cli::admin::{self, NewAdmin};
use schoolhub_cli::seeder::{self, SeedConfig, SeedKind};

#[derive(Parser)]
#[command(name = "schoolhub-cli")]
#[command(about = "SchoolHub CLI - Administrative tools for SchoolHub", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// Login username
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address (used for password resets)
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Set a new password for a user who cannot use the email reset flow
    ResetPassword {
        /// Username of the account
        username: String,

        /// New password (a random one is generated and printed if omitted)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake students, staff, drivers and parents
    Seed {
        #[arg(long, default_value = "100")]
        students: usize,

        #[arg(long, default_value = "20")]
        staff: usize,

        /// Each driver is given a vehicle
        #[arg(long, default_value = "5")]
        drivers: usize,

        #[arg(long, default_value = "50")]
        parents: usize,
    },
    /// Seed only students
    SeedStudents {
        #[arg(short = 'n', long, default_value = "100")]
        count: usize,
    },
    /// Clear all seeded data (keeps admins)
    ClearSeed,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            username,
            first_name,
            last_name,
            email,
            password,
        } => handle_create_admin(&pool, username, first_name, last_name, email, password).await,
        Commands::ResetPassword { username, password } => {
            handle_reset_password(&pool, &username, password).await
        }
        Commands::Seed {
            students,
            staff,
            drivers,
            parents,
        } => {
            handle_seed(
                &pool,
                SeedConfig {
                    students,
                    staff,
                    drivers,
                    parents,
                },
            )
            .await
        }
        Commands::SeedStudents { count } => handle_seed_students(&pool, count).await,
        Commands::ClearSeed => handle_clear_seed(&pool).await,
    }
}

fn prompt(label: &str) -> String {
    Input::new()
        .with_prompt(label)
        .interact_text()
        .unwrap_or_else(|e| {
            eprintln!("❌ Failed to read {}: {}", label.to_lowercase(), e);
            std::process::exit(1);
        })
}

async fn handle_create_admin(
    pool: &sqlx::postgres::PgPool,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let username = username.unwrap_or_else(|| prompt("Username"));
    let first_name = first_name.unwrap_or_else(|| prompt("First name"));
    let last_name = last_name.unwrap_or_else(|| prompt("Last name"));

    let email = email.or_else(|| {
        let value: String = Input::new()
            .with_prompt("Email address (optional)")
            .allow_empty(true)
            .interact_text()
            .unwrap_or_default();
        Some(value).filter(|v| !v.trim().is_empty())
    });

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| {
                eprintln!("❌ Failed to read password: {}", e);
                std::process::exit(1);
            })
    });

    let new_admin = NewAdmin {
        username: &username,
        first_name: &first_name,
        last_name: &last_name,
        email: email.as_deref(),
        password: &password,
    };

    match admin::create_admin(pool, new_admin).await {
        Ok(_) => {
            println!("\n✅ Admin created successfully!");
            println!("   Username: {}", admin::normalize_username(&username));
            println!("   Name: {} {}", first_name, last_name);
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_reset_password(
    pool: &sqlx::postgres::PgPool,
    username: &str,
    password: Option<String>,
) {
    let generated = password.is_none();

    match admin::reset_password(pool, username, password).await {
        Ok(password) => {
            println!("\n✅ Password updated for {}", username);
            if generated {
                println!("   New password: {}", password);
            }
        }
        Err(e) => {
            eprintln!("\n❌ Error resetting password: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(pool: &sqlx::postgres::PgPool, config: SeedConfig) {
    if let Err(e) = seeder::seed_all(pool, config).await {
        eprintln!("❌ Error seeding database: {}", e);
        std::process::exit(1);
    }
}

async fn handle_seed_students(pool: &sqlx::postgres::PgPool, count: usize) {
    match seeder::seed_kind(pool, SeedKind::Student, count).await {
        Ok(n) => println!("\n✅ Seeded {} students", n),
        Err(e) => {
            eprintln!("❌ Error seeding students: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_clear_seed(pool: &sqlx::postgres::PgPool) {
    match seeder::clear_all(pool).await {
        Ok(n) => println!("\n✅ Cleared {} seeded accounts", n),
        Err(e) => {
            eprintln!("❌ Error clearing seeded data: {}", e);
            std::process::exit(1);
        }
    }
}
