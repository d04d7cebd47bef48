//! buildvariant core library
//!
//! Resolves Android product flavors and build types into fully populated
//! build descriptors, reading release signing credentials from an optional
//! `key.properties` file.

pub mod config;
pub mod error;
pub mod models;
pub mod properties;
pub mod resolver;
pub mod signing;

pub use config::{ProjectConfig, SigningPolicy, ToolchainValues};
pub use error::{Result, VariantError};
pub use resolver::{Resolver, resolve_all, resolve_build_type, resolve_descriptor, resolve_flavor};
pub use signing::load_credentials;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
