//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching backend payloads
//! - `convert.rs` — `TryFrom`/`From` conversions with validation
//! - `state.rs` — State containers with update methods (for live data)
//! - `client.rs` — Sub-client with HTTP methods

pub mod quote;
pub mod watchlist;
