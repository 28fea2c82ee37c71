//! # QuoteDesk Console Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        QuoteDesk Console                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 Presentation Front End (external)                │  │
//! │  │  • Line-item grid        • Totals panel                          │  │
//! │  │  • Zone/override picker  • Admin screens                         │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │ command calls                         │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Runs the startup sequence                        │  │
//! │  │  lib.rs ─────► Logging, config, store, session restore          │  │
//! │  │  commands/ ──► add_line, update_line, upsert_product, ...       │  │
//! │  │  state/ ─────► StoreState, EngineState, ConfigState             │  │
//! │  │                                                                  │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                       JSON Document Store                        │  │
//! │  │  products.json / tiers.json / shipping.json / session.json      │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#[tokio::main]
async fn main() {
    // The actual setup is in lib.rs for better testability
    if let Err(e) = quotedesk_console::run().await {
        eprintln!("quotedesk: {}", e);
        std::process::exit(1);
    }
}
