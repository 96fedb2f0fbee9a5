//! Package date sources
//!
//! - [`traits`]: `NexusSource` and `CloudsmithSource` abstractions
//! - [`readers`]: fixture-backed and HTTP implementations
//! - [`filter`]: tag exclusion applied to Cloudsmith package groups
//! - [`error`]: error type shared by all readers

pub mod error;
pub mod filter;
pub mod readers;
pub mod traits;
