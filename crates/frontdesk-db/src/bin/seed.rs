//! # Seed Data Loader
//!
//! Inserts the embedded reservation dataset into a SQLite database.
//!
//! ## Usage
//! ```bash
//! # Seed the configured database (frontdesk.toml / FRONTDESK_DATABASE_PATH)
//! cargo run -p frontdesk-db --bin seed
//!
//! # Specify database path
//! cargo run -p frontdesk-db --bin seed -- --db ./data/frontdesk.db
//!
//! # Use a specific config file
//! cargo run -p frontdesk-db --bin seed -- --config ./frontdesk.toml
//! ```
//!
//! An existing non-empty table is left alone.

use std::env;
use std::path::PathBuf;

use frontdesk_core::{Money, ReservationStatus};
use frontdesk_db::{Database, DbConfig, FrontDeskConfig, ReservationStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,frontdesk=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut db_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Front Desk Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>       Database file path (default: from config)");
                println!("  -c, --config <PATH>   Config file (default: platform config dir)");
                println!("  -h, --help            Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let config = FrontDeskConfig::load(config_path)?;
    let db_path = db_path
        .or_else(|| config.database_path())
        .ok_or("No database path: pass --db or set FRONTDESK_DATABASE_PATH")?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    println!("Front Desk Seed Data Loader");
    println!("===========================");
    println!("Database: {}", db_path.display());
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let store = db.reservations_with(config.billing_defaults());

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let inserted = store.seed_if_empty().await?;
    if inserted == 0 {
        println!("⚠ Database already has {} reservations", store.count().await?);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
    } else {
        info!(inserted, "Seed complete");
        println!("✓ Inserted {} reservations", inserted);
    }

    let reservations = store.get_all().await?;
    println!();
    println!("Reservations by status:");
    for status in ReservationStatus::ALL {
        let count = reservations.iter().filter(|r| r.status == status).count();
        println!("  {:<11} {}", status.as_str(), count);
    }

    let booked: Money = reservations
        .iter()
        .filter(|r| r.status != ReservationStatus::Cancelled)
        .map(|r| r.grand_total())
        .sum();
    println!();
    println!("Total booked (excluding cancelled): {}", booked);

    db.close().await;
    Ok(())
}
