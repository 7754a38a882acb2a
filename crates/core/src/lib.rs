//! Delivery Date Pro Core - Shared types and rules engine.
//!
//! This crate provides the types and the availability/validation rules used
//! across all Delivery Date Pro components:
//! - `app` - App proxy endpoints, webhooks, and admin API
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. Callers fetch a per-request snapshot of
//! settings, blackout dates, and booked counts, then hand everything to the
//! rules engine together with the current instant. The same rule evaluators
//! back both the range scan and the single-date check, so the two paths
//! cannot drift apart.
//!
//! # Modules
//!
//! - [`types`] - Calendar dates, shop settings, overrides, blackouts, results
//! - [`rules`] - Timezone-aware clock, blackout matching, the availability
//!   engine, and the checkout-time date validator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod rules;
pub mod types;

pub use rules::*;
pub use types::*;
