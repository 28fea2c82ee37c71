//! # State Module
//!
//! Manages application state for the console host.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct containing everything,
//! we use separate state types. This approach:
//!
//! 1. **Better Separation of Concerns**: Each state type has a single responsibility
//! 2. **Easier Testing**: Can construct/inject individual states
//! 3. **Clearer Command Signatures**: Commands declare exactly what state they need
//! 4. **Reduced Contention**: Independent states don't block each other
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │          ┌──────────────────┬──────────────────┐                        │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  StoreState  │  │ EngineState  │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Store       │  │  Arc<Mutex<  │  │  company_name    │              │
//! │  │  (JSON       │  │    engine +  │  │  currency        │              │
//! │  │   documents) │  │    is_admin  │  │  data_dir        │              │
//! │  │              │  │  >>          │  │                  │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: atomic document replaces, no shared mutability          │
//! │  • EngineState: protected by Arc<Mutex<T>> for exclusive access        │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod engine;
mod store;

pub use config::ConfigState;
pub use engine::EngineState;
pub use store::StoreState;
