//! # Seed Data Generator
//!
//! Populates a database with demo discounts, stock levels and thresholds.
//!
//! ## Usage
//! ```bash
//! # Seed 60 items (default)
//! cargo run -p kardex-db --bin seed
//!
//! # Seed a custom amount
//! cargo run -p kardex-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p kardex-db --bin seed -- --db ./data/kardex.db
//! ```
//!
//! ## Generated Data
//! For each item `{CATEGORY}-{NAME}-{INDEX}`, in every warehouse:
//! - A stock level between 0 and 180 units
//! - A threshold for two pairs out of three (the rest stay unconfigured,
//!   so the report shows the pending-config states)
//!
//! Plus discounts spread across the catalogue:
//! - Every 3rd item: a 5-25% item discount
//! - Every 5th item: a combinable fixed amount off its 6-pack presentation
//! - Every 7th item: a bulk discount from 12 units, with a higher priority
//! - Every 11th item: an expired discount (never eligible)

use chrono::{Duration, Utc};
use std::env;

use kardex_core::{DiscountCandidate, DiscountKind, DiscountTarget, StockThreshold};
use kardex_db::repository::generate_discount_id;
use kardex_db::{init_tracing, Database, DbConfig};

/// Item categories for realistic demo data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "BEV",
        &["Cola", "Orange Soda", "Mineral Water", "Apple Juice", "Iced Tea", "Energy Drink"],
    ),
    (
        "SNK",
        &["Potato Chips", "Corn Chips", "Peanuts", "Chocolate Bar", "Cookies", "Pretzels"],
    ),
    (
        "DRY",
        &["Whole Milk", "Yogurt", "Butter", "Cheddar", "Cream Cheese", "Eggs Dozen"],
    ),
    (
        "CLN",
        &["Dish Soap", "Bleach", "Laundry Powder", "Sponges", "Glass Cleaner", "Trash Bags"],
    ),
    (
        "GRO",
        &["White Rice", "Spaghetti", "Canned Beans", "Flour", "Sugar", "Cooking Oil"],
    ),
];

const WAREHOUSES: &[&str] = &["main", "north", "south"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut db_path = String::from("./kardex_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(60);
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
                println!("KardexPlus Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of items to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./kardex_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 KardexPlus Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!("Items:    {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.discounts().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} active discounts", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating stock and discounts...");

    let start = std::time::Instant::now();
    let mut pairs = 0;
    let mut discounts = 0;

    for seed in 0..count {
        let item_id = item_id(seed);

        for (wh_idx, warehouse) in WAREHOUSES.iter().enumerate() {
            let mix = seed * WAREHOUSES.len() + wh_idx;

            db.stock()
                .set_quantity(&item_id, warehouse, quantity_for(mix))
                .await?;

            if let Some(threshold) = threshold_for(&item_id, warehouse, mix) {
                db.stock().upsert_threshold(&threshold).await?;
            }

            pairs += 1;
        }

        for discount in discounts_for(&item_id, seed) {
            if let Err(e) = db.discounts().insert(&discount).await {
                eprintln!("Failed to insert discount {}: {}", discount.name, e);
                continue;
            }
            discounts += 1;
        }

        if (seed + 1) % 100 == 0 {
            println!("  Generated {} items...", seed + 1);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} stock pairs and {} discounts in {:?}", pairs, discounts, elapsed);

    // Quick sanity check through the report path
    let report = db.stock().stock_report(Some(WAREHOUSES[0])).await?;
    let alerts = report.iter().filter(|line| line.state.is_alert()).count();
    println!("  Warehouse '{}': {} items, {} alerts", WAREHOUSES[0], report.len(), alerts);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Item id: `{CATEGORY}-{NAME}-{INDEX}`, e.g. `BEV-COLA-000`.
fn item_id(seed: usize) -> String {
    let (category, names) = CATEGORIES[seed % CATEGORIES.len()];
    let name = names[(seed / CATEGORIES.len()) % names.len()];
    let short: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(4)
        .collect::<String>()
        .to_uppercase();

    format!("{}-{}-{:03}", category, short, seed)
}

fn quantity_for(mix: usize) -> i64 {
    // Every 13th pair is sold out
    if mix % 13 == 0 {
        return 0;
    }
    ((mix * 37) % 181) as i64
}

fn threshold_for(item_id: &str, warehouse: &str, mix: usize) -> Option<StockThreshold> {
    match mix % 3 {
        0 => None,
        1 => Some(
            StockThreshold::unconfigured(item_id, warehouse)
                .with_min_stock(20)
                .with_max_stock(150)
                .with_reorder_point(35),
        ),
        _ => Some(StockThreshold::unconfigured(item_id, warehouse).with_min_stock(10)),
    }
}

fn discounts_for(item_id: &str, seed: usize) -> Vec<DiscountCandidate> {
    let now = Utc::now();
    let mut out = Vec::new();

    let base = |name: String, target: DiscountTarget, kind: DiscountKind, value: i64| {
        DiscountCandidate {
            id: generate_discount_id(),
            name,
            target,
            kind,
            value,
            min_quantity: 1,
            priority: 0,
            combinable: false,
            valid_from: now - Duration::days(7),
            valid_to: Some(now + Duration::days(30)),
            active: true,
        }
    };

    if seed % 3 == 0 {
        let bps = 500 + ((seed * 250) % 2_001) as i64;
        out.push(base(
            format!("{} weekly promo", item_id),
            DiscountTarget::Item(item_id.to_string()),
            DiscountKind::Percentage,
            bps,
        ));
    }

    if seed % 5 == 0 {
        let mut d = base(
            format!("{} 6-pack deal", item_id),
            DiscountTarget::Presentation(format!("{}-6PK", item_id)),
            DiscountKind::FixedAmount,
            150,
        );
        d.combinable = true;
        out.push(d);
    }

    if seed % 7 == 0 {
        let mut d = base(
            format!("{} bulk", item_id),
            DiscountTarget::Item(item_id.to_string()),
            DiscountKind::Percentage,
            1_000,
        );
        d.min_quantity = 12;
        d.priority = 5;
        out.push(d);
    }

    if seed % 11 == 0 {
        let mut d = base(
            format!("{} last season", item_id),
            DiscountTarget::Item(item_id.to_string()),
            DiscountKind::Percentage,
            3_000,
        );
        d.valid_from = now - Duration::days(90);
        d.valid_to = Some(now - Duration::days(60));
        out.push(d);
    }

    out
}
