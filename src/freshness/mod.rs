//! Freshness reconciliation between Nexus and Cloudsmith
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Nexus    │────▶│   Checker   │◀────│ Cloudsmith  │
//! │ (fixtures)  │     │ (per pkg)   │     │ (API/mock)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │  Resolver   │
//!                     │(pick a date)│
//!                     └─────────────┘
//! ```
//!
//! - [`types`]: package formats and identifiers
//! - [`timestamp`]: `YYYYMMDDHHMMSS` timestamps and display formatting
//! - [`resolver`]: the date selection policy
//! - [`checker`]: drives both sources for every package group

pub mod checker;
pub mod resolver;
pub mod timestamp;
pub mod types;
