//! # Seed Data Generator
//!
//! Populates the data directory with a starter dataset for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default data directory (./data)
//! cargo run -p quotedesk-store --bin seed
//!
//! # Specify a data directory
//! cargo run -p quotedesk-store --bin seed -- --data-dir /tmp/quotedesk
//! ```
//!
//! ## Generated Data
//! - A small candy/snack catalog with real packing ratios
//! - Three pricing tiers (Standard is the default)
//! - Four U.S. shipping zones plus the flat state list
//!
//! Refuses to run over a non-empty catalog so it can never clobber real
//! reference data.

use std::env;

use chrono::Utc;

use quotedesk_core::types::{Product, ShippingZone, Tier};
use quotedesk_store::{Store, StoreConfig};

/// (key, name, category, unit price cents, units/case, boxes/case, units/box)
const PRODUCTS: &[(&str, &str, &str, i64, f64, f64, f64)] = &[
    ("choc-bar-50g", "Chocolate Bar 50g", "candy", 1000, 144.0, 12.0, 12.0),
    ("gummy-mix-200g", "Gummy Mix 200g", "candy", 250, 24.0, 6.0, 4.0),
    ("sour-strips-90g", "Sour Strips 90g", "candy", 325, 48.0, 8.0, 6.0),
    ("caramel-chews-150g", "Caramel Chews 150g", "candy", 275, 36.0, 6.0, 6.0),
    ("trail-mix-300g", "Trail Mix 300g", "snacks", 450, 20.0, 4.0, 5.0),
    ("honey-nuts-250g", "Honey Roasted Nuts 250g", "snacks", 525, 24.0, 4.0, 6.0),
    ("fruit-leather-40g", "Fruit Leather 40g", "snacks", 150, 96.0, 12.0, 8.0),
    ("mint-tin-30g", "Mint Tin 30g", "candy", 199, 72.0, 9.0, 8.0),
];

/// (id, name, threshold in cases, discount bps, is_default)
const TIERS: &[(&str, &str, f64, u32, bool)] = &[
    ("standard", "Standard", 0.0, 0, true),
    ("wholesale", "Wholesale", 10.0, 500, false),
    ("distributor", "Distributor", 25.0, 1000, false),
];

/// (id, name, rate bps, fixed cost cents, states)
const ZONES: &[(&str, &str, u32, Option<i64>, &[&str])] = &[
    ("west", "West Coast", 100, None, &["CA", "OR", "WA", "NV", "AZ"]),
    ("mountain", "Mountain", 150, Some(2500), &["CO", "UT", "ID", "MT", "WY", "NM"]),
    ("central", "Central", 125, None, &["TX", "OK", "KS", "MO", "IA", "MN", "IL", "WI"]),
    ("east", "East Coast", 175, Some(3000), &["NY", "NJ", "PA", "MA", "CT", "MD", "VA", "FL", "GA", "NC"]),
];

const ALL_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut data_dir = String::from("./data");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--data-dir" | "-d" => {
                if i + 1 < args.len() {
                    data_dir = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("QuoteDesk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --data-dir <PATH>  Data directory (default: ./data)");
                println!("  -h, --help             Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 QuoteDesk Seed Data Generator");
    println!("================================");
    println!("Data directory: {}", data_dir);
    println!();

    let store = Store::open(StoreConfig::new(&data_dir)).await?;
    println!("✓ Store opened");

    // Check existing catalog - never clobber real reference data
    let existing = store.catalog().load().await?;
    if !existing.is_empty() {
        println!("⚠ Catalog already has {} products", existing.len());
        println!("  Skipping seed to avoid overwriting reference data.");
        println!("  Delete the JSON documents to regenerate.");
        return Ok(());
    }

    let now = Utc::now();
    for (key, name, category, price_cents, upc, dbpc, updb) in PRODUCTS {
        store
            .catalog()
            .upsert(Product {
                key: key.to_string(),
                name: name.to_string(),
                category: category.to_string(),
                price_cents: *price_cents,
                units_per_case: *upc,
                display_boxes_per_case: *dbpc,
                units_per_display_box: *updb,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("✓ Seeded {} products", PRODUCTS.len());

    for (id, name, threshold, discount_bps, is_default) in TIERS {
        store
            .pricing()
            .upsert(Tier {
                id: id.to_string(),
                name: name.to_string(),
                threshold: *threshold,
                discount_bps: *discount_bps,
                is_default: *is_default,
            })
            .await?;
    }
    println!("✓ Seeded {} tiers", TIERS.len());

    for (id, name, rate_bps, fixed_cost_cents, states) in ZONES {
        store
            .shipping()
            .upsert_zone(ShippingZone {
                id: id.to_string(),
                name: name.to_string(),
                rate_bps: *rate_bps,
                fixed_cost_cents: *fixed_cost_cents,
                states: states.iter().map(|s| s.to_string()).collect(),
            })
            .await?;
    }
    store
        .shipping()
        .set_states(ALL_STATES.iter().map(|s| s.to_string()).collect())
        .await?;
    println!("✓ Seeded {} shipping zones", ZONES.len());

    // Sanity: everything we just wrote must normalize
    let reference = store.load_reference_data().await?;
    println!();
    println!(
        "Seed complete: {} products, {} tiers, {} zones",
        reference.products.len(),
        reference.tiers.len(),
        reference.zones.len()
    );

    Ok(())
}
