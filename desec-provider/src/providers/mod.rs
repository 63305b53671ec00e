//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

mod desec;

pub use desec::{DesecProvider, DesecProviderBuilder};
