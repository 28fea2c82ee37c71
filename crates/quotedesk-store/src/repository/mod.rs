//! # Repository Implementations
//!
//! One repository per document:
//!
//! - [`catalog`] - product catalog (`products.json`)
//! - [`pricing`] - pricing tiers (`tiers.json`)
//! - [`shipping`] - shipping zones (`shipping.json`)
//! - [`session`] - session snapshot cache (`session.json`)
//!
//! Repositories are cheap handles (a path clone); ask the [`crate::Store`]
//! for a fresh one whenever needed.

pub mod catalog;
pub mod pricing;
pub mod session;
pub mod shipping;
