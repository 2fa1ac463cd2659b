//! # Seed Data Generator
//!
//! Populates the directory tables with development data: a handful of
//! territory sales employees and a grid of dealers around Delhi NCR.
//!
//! ## Usage
//! ```bash
//! # Seed into the default ./fieldbeat.db
//! cargo run -p fieldbeat-db --bin seed
//!
//! # Specify database path
//! cargo run -p fieldbeat-db --bin seed -- --db ./data/fieldbeat.db
//! ```

use std::env;

use fieldbeat_core::FIELD_REP_ROLE;
use fieldbeat_db::{Database, DbConfig};

/// Field employees: (code, display name, role).
const EMPLOYEES: &[(&str, &str, &str)] = &[
    ("TSE-01", "Ravi Kumar", "TSE"),
    ("TSE-02", "Anita Desai", "TSE"),
    ("TSE-03", "Mohit Verma", "TSE"),
    ("MGR-01", "Sunil Mehta", "Manager"),
];

/// Dealers: (code, shop name, latitude, longitude).
const DEALERS: &[(&str, &str, f64, f64)] = &[
    ("DLR001", "Sharma Electricals", 28.6139, 77.2090),
    ("DLR002", "Gupta Traders", 28.7041, 77.1025),
    ("DLR003", "Verma Hardware", 28.5355, 77.3910),
    ("DLR004", "Singh Sanitary", 28.4595, 77.0266),
    ("DLR005", "Mehta Lighting", 28.6692, 77.4538),
    ("DLR006", "Agarwal Cables", 28.4089, 77.3178),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let db_path = args
        .iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
        .unwrap_or("./fieldbeat.db");

    println!("Seeding directory data into {db_path}");

    let db = Database::new(DbConfig::new(db_path)).await?;

    for (code, name, role) in EMPLOYEES {
        sqlx::query(
            "INSERT OR REPLACE INTO employees (code, name, role) VALUES (?1, ?2, ?3)",
        )
        .bind(code)
        .bind(name)
        .bind(role)
        .execute(db.pool())
        .await?;
    }

    for (code, name, lat, lng) in DEALERS {
        sqlx::query(
            "INSERT OR REPLACE INTO dealers (dealer_code, name, latitude, longitude) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(code)
        .bind(name)
        .bind(lat)
        .bind(lng)
        .execute(db.pool())
        .await?;
    }

    println!(
        "Seeded {} employees ({} with role {FIELD_REP_ROLE}) and {} dealers",
        EMPLOYEES.len(),
        EMPLOYEES.iter().filter(|e| e.2 == FIELD_REP_ROLE).count(),
        DEALERS.len()
    );

    db.close().await;
    Ok(())
}
