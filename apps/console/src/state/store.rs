//! # Store State
//!
//! Wraps the document `Store` for use in commands.
//!
//! ## Thread Safety
//! The `Store` from `quotedesk-store` is a cheap path handle; repositories
//! are created per operation and file writes are atomic replaces. Multiple
//! commands can use it concurrently without explicit locking - the engine
//! mutex already serializes the mutations that matter.

use quotedesk_store::Store;

/// Wrapper around `Store` for state injection.
///
/// ## Why a Wrapper?
/// Commands declare exactly which state they need; this wrapper makes the
/// intent explicit and keeps the command signatures uniform with
/// [`super::EngineState`] and [`super::ConfigState`].
#[derive(Debug, Clone)]
pub struct StoreState {
    store: Store,
}

impl StoreState {
    /// Creates a new StoreState wrapping the opened store.
    pub fn new(store: Store) -> Self {
        StoreState { store }
    }

    /// Returns a reference to the inner Store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let products = store_state.inner().catalog().load().await?;
    /// ```
    pub fn inner(&self) -> &Store {
        &self.store
    }
}
