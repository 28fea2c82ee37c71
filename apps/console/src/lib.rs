//! # QuoteDesk Console Library
//!
//! Core library for the QuoteDesk console host. This is the orchestration
//! layer that wires the pure engine to the document store and exposes the
//! command API a presentation front end drives.
//!
//! ## Module Organization
//! ```text
//! quotedesk_console/
//! ├── lib.rs          ◄─── You are here (startup sequence)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── store.rs    ◄─── Document store wrapper
//! │   ├── engine.rs   ◄─── Engine + session state management
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── quote.rs    ◄─── Line-item mutation commands
//! │   └── admin.rs    ◄─── Reference-data CRUD commands
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use quotedesk_core::quote::QuoteEngine;
use quotedesk_store::{Store, StoreConfig};

use error::ApiError;
use state::{ConfigState, EngineState, StoreState};

/// Runs the console host.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • Defaults + QUOTEDESK_* environment overrides                      │
/// │                                                                         │
/// │  3. Determine Data Directory ─────────────────────────────────────────► │
/// │     • QUOTEDESK_DATA_DIR override, else platform default                │
/// │     • Linux: ~/.local/share/quotedesk                                   │
/// │                                                                         │
/// │  4. Open Store & Load Reference Data ─────────────────────────────────► │
/// │     • Missing documents read as empty                                   │
/// │     • INVALID reference data is fatal here (clear error at startup      │
/// │       beats silently quoting from bad tables)                           │
/// │                                                                         │
/// │  5. Restore Session Snapshot ─────────────────────────────────────────► │
/// │     • Missing/corrupt snapshot → fresh quote                            │
/// │                                                                         │
/// │  6. Report the restored quote and hand over to the front end            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), ApiError> {
    init_tracing();

    info!("Starting QuoteDesk console host");

    let config = ConfigState::from_env();
    let data_dir = resolve_data_dir(&config)?;
    info!(data_dir = %data_dir.display(), "data directory determined");

    let store = Store::open(StoreConfig::new(&data_dir)).await?;
    let reference = store.load_reference_data().await?;
    info!(
        products = reference.products.len(),
        tiers = reference.tiers.len(),
        zones = reference.zones.len(),
        "reference data loaded"
    );

    let engine_state = EngineState::new(QuoteEngine::new(reference));
    let store_state = StoreState::new(store);

    // Session continuity: pick up where the operator left off.
    match store_state.inner().session().load().await? {
        Some(snapshot) => {
            info!(
                lines = snapshot.line_items.len(),
                saved_at = %snapshot.saved_at,
                "restoring session snapshot"
            );
            engine_state.restore(snapshot);
        }
        None => info!("no session snapshot, starting a fresh quote"),
    }

    let quote = commands::quote::get_quote(&engine_state);
    for warning in &quote.warnings {
        warn!(?warning, "quote degradation");
    }

    println!("{} - QuoteDesk", config.company_name);
    println!("================================");
    println!("Lines:      {}", quote.totals.line_count);
    println!("Volume:     {:.2} cases", quote.totals.total_volume_cases);
    if let Some(tier) = &quote.tier {
        println!("Tier:       {}", tier.name);
    }
    println!(
        "Subtotal:   {}",
        config.format_currency(quote.totals.subtotal_cents)
    );
    println!(
        "Shipping:   {}",
        config.format_currency(quote.totals.shipping_cents)
    );
    println!(
        "Card fee:   {}",
        config.format_currency(quote.totals.credit_card_fee_cents)
    );
    println!(
        "Total:      {}",
        config.format_currency(quote.totals.total_cents)
    );

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=quotedesk_core=trace` - Trace the engine only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quotedesk=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Determines the data directory based on configuration and platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.quotedesk.desk`
/// - **Windows**: `%APPDATA%\quotedesk\desk\data`
/// - **Linux**: `~/.local/share/quotedesk`
///
/// ## Development Override
/// Set `QUOTEDESK_DATA_DIR` to use a custom path.
fn resolve_data_dir(config: &ConfigState) -> Result<PathBuf, ApiError> {
    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "quotedesk", "desk")
        .ok_or_else(|| ApiError::internal("Could not determine app data directory"))?;

    Ok(proj_dirs.data_dir().to_path_buf())
}
