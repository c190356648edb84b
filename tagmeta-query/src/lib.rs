//! # Tagmeta Query
//!
//! Fetches address metadata from the metadata service and enriches it with
//! identity tags resolved in the background.
//!
//! A submitted address list starts a new *generation*. The primary fetch and
//! the identity fan-out run concurrently; whenever either completes, the
//! merged [`ResultMap`](tagmeta_core::ResultMap) is re-derived and published
//! on a watch channel. Completions belonging to a superseded generation are
//! discarded.
//!
//! ## Example
//!
//! ```rust,ignore
//! use tagmeta_query::{AppConfig, MetadataQuery};
//!
//! let query = MetadataQuery::from_config(AppConfig::from_env())?;
//! let generation = query.submit(vec!["0xAbC...".into()]);
//! let snapshot = query.wait_settled(generation).await;
//! if let Some(data) = snapshot.data {
//!     for (address, record) in data {
//!         println!("{address}: {} tags", record.tags.len());
//!     }
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod merge;
mod query;
mod service;
mod state;

pub use config::{AppConfig, MetadataServiceConfig, QueryConfig};
pub use merge::merge_metadata;
pub use query::{MetadataQuery, QuerySnapshot, QueryStatus};
pub use service::HttpMetadataService;
pub use state::{ResolutionPhase, ResolutionState};
