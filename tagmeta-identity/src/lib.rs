//! # Tagmeta Identity
//!
//! Best-effort identity tag resolution for addresses.
//!
//! An address is looked up in the on-chain registry (`getMultipleReverse`),
//! the matching identifier is mapped to a handle by the name resolution API,
//! and the handle is wrapped into an identity [`Tag`](tagmeta_core::Tag).
//!
//! ## Example
//!
//! ```rust,ignore
//! use tagmeta_identity::{IdentityConfig, IdentityResolver};
//!
//! let resolver = IdentityResolver::with_config(IdentityConfig::default())?;
//! if let Some(tag) = resolver.resolve("0xAbC...").await {
//!     println!("{}", tag.format().identity_handle().unwrap_or_default());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod names;
mod registry;
mod resolver;

pub use names::{NamesClient, NamesConfig};
pub use registry::{RegistryClient, RegistryConfig};
pub use resolver::{find_identifier, IdentityConfig, IdentityResolver, Resolution};
