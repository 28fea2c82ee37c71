//! # Engine State
//!
//! Owns the quote-engine instance for the whole session.
//!
//! ## No Global Singleton
//! The engine is constructed once at startup and INJECTED into the command
//! layer through this state type - there is no process-wide `static`
//! anywhere. Whoever owns the event handlers owns an `EngineState`.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>` because:
//! 1. Multiple commands may access/modify the quote
//! 2. Only one command should modify it at a time
//! 3. Commands can run concurrently on the async runtime
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Engine State Operations                              │
//! │                                                                         │
//! │  Frontend Action          Command                 Engine Change         │
//! │  ───────────────          ─────────────           ─────────────────     │
//! │                                                                         │
//! │  Click "Add Product" ────► add_line() ──────────► lines.push(line)      │
//! │                                                                         │
//! │  Edit quantity cell ─────► update_line() ───────► derive quantities     │
//! │                                                                         │
//! │  Click Remove ───────────► remove_line() ───────► lines.retain(..)      │
//! │                                                                         │
//! │  Pick shipping zone ─────► set_shipping_zone() ─► zone = Some(id)       │
//! │                                                                         │
//! │  View totals ────────────► get_quote() ─────────► (read only)           │
//! │                                                                         │
//! │  NOTE: All write operations acquire the Mutex lock exclusively,         │
//! │        and every mutation is followed by a session snapshot write.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use quotedesk_core::quote::QuoteEngine;
use quotedesk_core::Money;
use quotedesk_store::SessionSnapshot;

/// The mutable per-session state: the engine plus presentation flags that
/// ride along in the session snapshot.
#[derive(Debug)]
struct Session {
    engine: QuoteEngine,
    is_admin: bool,
}

/// Shared handle to the session's quote engine.
#[derive(Debug, Clone)]
pub struct EngineState {
    session: Arc<Mutex<Session>>,
}

impl EngineState {
    /// Creates a new engine state around a freshly constructed engine.
    pub fn new(engine: QuoteEngine) -> Self {
        EngineState {
            session: Arc::new(Mutex::new(Session {
                engine,
                is_admin: false,
            })),
        }
    }

    /// Executes a function with read access to the engine.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let quote = engine_state.with_engine(|e| e.quote());
    /// ```
    pub fn with_engine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&QuoteEngine) -> R,
    {
        let session = self.session.lock().expect("engine mutex poisoned");
        f(&session.engine)
    }

    /// Executes a function with write access to the engine.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let quote = engine_state.with_engine_mut(|e| e.remove_line(&id));
    /// ```
    pub fn with_engine_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut QuoteEngine) -> R,
    {
        let mut session = self.session.lock().expect("engine mutex poisoned");
        f(&mut session.engine)
    }

    /// Whether this session has unlocked the admin screens (inert to the
    /// engine; persisted in the snapshot for the presentation layer).
    pub fn is_admin(&self) -> bool {
        self.session.lock().expect("engine mutex poisoned").is_admin
    }

    /// Sets the admin flag.
    pub fn set_admin(&self, is_admin: bool) {
        self.session.lock().expect("engine mutex poisoned").is_admin = is_admin;
    }

    /// Builds the session snapshot to persist after a mutation.
    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().expect("engine mutex poisoned");
        SessionSnapshot {
            line_items: session.engine.lines().to_vec(),
            current_shipping_zone: session.engine.shipping_zone().map(str::to_string),
            shipping_override_cents: session.engine.shipping_override().map(|m| m.cents()),
            is_admin: session.is_admin,
            ..SessionSnapshot::default()
        }
    }

    /// Restores engine state from a persisted snapshot (startup only).
    pub fn restore(&self, snapshot: SessionSnapshot) {
        let mut session = self.session.lock().expect("engine mutex poisoned");
        session.engine.restore(
            snapshot.line_items,
            snapshot.current_shipping_zone,
            snapshot.shipping_override_cents.map(Money::from_cents),
        );
        session.is_admin = snapshot.is_admin;
    }
}
