//! LootWiki Server - SpacetimeDB Module
//!
//! Community build planner and guide site running as a SpacetimeDB module.
//! Reducers validate requests and persist rows; vote transitions and stat
//! projection come from `lootwiki-logic`. Each reducer runs as one
//! transaction, so a vote row and its target's counters always change
//! together.

mod builds;
mod guides;
mod reducers;
mod tables;
mod voting;

pub use builds::*;
pub use guides::*;
pub use reducers::*;
pub use tables::*;
pub use voting::*;
