//! # Slot Provisioning
//!
//! Creates the slot layout of a fresh lot database.
//!
//! ## Usage
//! ```bash
//! # 20 car and 20 bike slots in ./parklot.db (default)
//! cargo run -p parklot-db --bin seed
//!
//! # Custom layout
//! cargo run -p parklot-db --bin seed -- --car 50 --bike 80
//!
//! # Specify database path
//! cargo run -p parklot-db --bin seed -- --db ./data/parklot.db
//! ```
//!
//! A database that already has slots is left untouched.

use std::env;

use parklot_core::VehicleType;
use parklot_db::{Database, DbConfig, ParkingLot};

const DEFAULT_SLOTS_PER_TYPE: i64 = 20;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./parklot.db");
    let mut car_slots = DEFAULT_SLOTS_PER_TYPE;
    let mut bike_slots = DEFAULT_SLOTS_PER_TYPE;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--car" => {
                if i + 1 < args.len() {
                    car_slots = args[i + 1].parse().unwrap_or(DEFAULT_SLOTS_PER_TYPE);
                    i += 1;
                }
            }
            "--bike" => {
                if i + 1 < args.len() {
                    bike_slots = args[i + 1].parse().unwrap_or(DEFAULT_SLOTS_PER_TYPE);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Parklot Slot Provisioning");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("      --car <N>      Number of car slots (default: 20)");
                println!("      --bike <N>     Number of bike slots (default: 20)");
                println!("  -d, --db <PATH>    Database file path (default: ./parklot.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🅿  Parklot Slot Provisioning");
    println!("============================");
    println!("Database: {}", db_path);
    println!("Layout:   {} car, {} bike", car_slots, bike_slots);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let lot = ParkingLot::new(db.clone());
    let created = lot
        .provision_if_empty(&[(VehicleType::Car, car_slots), (VehicleType::Bike, bike_slots)])
        .await?;

    if created {
        println!("✓ Slots created");
    } else {
        let existing = db.slots().count().await?;
        println!("⚠ Database already has {} slots", existing);
        println!("  Skipping provisioning.");
        println!("  Delete the database file to start over.");
    }

    println!();
    let status = lot.status().await?;
    for (vehicle_type, occupancy) in status.iter() {
        println!(
            "  {:<5} total {:>4}   available {:>4}",
            vehicle_type, occupancy.total, occupancy.available
        );
    }

    db.close().await;
    Ok(())
}
