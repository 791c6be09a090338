//! Pure community-site logic for LootWiki.
//!
//! This crate contains the domain rules that are independent of any
//! database or runtime. Functions take plain data and return results,
//! making them unit-testable and portable across SpacetimeDB (WASM),
//! native CLI tools, and any future host.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`classes`] | Character classes, allocation points, derived-stat names, per-class scaling table |
//! | [`constants`] | Baseline stats, level growth, default limits |
//! | [`content`] | Title / body / display-name validation for builds and guides |
//! | [`error`] | Shared error taxonomy ([`LogicError`]) |
//! | [`planner`] | Level and per-stat caps applied by the build planner |
//! | [`stats`] | Stat projection: class + level + allocation → derived stats |
//! | [`votes`] | Up/down vote state machine, counters, tallying |

pub mod classes;
pub mod constants;
pub mod content;
pub mod error;
pub mod planner;
pub mod stats;
pub mod votes;

pub use error::LogicError;
