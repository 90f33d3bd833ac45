//! Provider domain
//!
//! A provider is one configured completion backend. Providers are looked up
//! by identifier in a [`registry::ProviderRegistry`], which a run treats as
//! read-only for its whole lifetime.

pub mod entities;
pub mod presets;
pub mod registry;
