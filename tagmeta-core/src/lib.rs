//! # Tagmeta Core
//!
//! Core types, errors, and traits for address metadata enrichment.
//!
//! This crate provides the building blocks used by the other tagmeta crates:
//!
//! - **Types**: tags, formatted tags, address records and service payloads
//! - **Format**: parsing of the opaque per-tag meta payload
//! - **Errors**: a single error enum with context
//! - **Constants**: registry contract, endpoints and identity tag attributes
//! - **Traits**: the collaborator seams (registry, name lookup, metadata service)
//!
//! ## Example
//!
//! ```rust
//! use tagmeta_core::{format_meta, Tag};
//!
//! let tag = Tag::new("whale", "Whale", "generic", 1, Some(r##"{"bgColor":"#000"}"##.into()));
//! let meta = format_meta(tag.meta.as_deref());
//! assert_eq!(meta.bg_color.as_deref(), Some("#000"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod format;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, TagmetaError};
pub use format::format_meta;
pub use traits::*;
pub use types::*;
