//! Domain types for tagmeta.
//!
//! - [`Tag`]: a tag as delivered by the metadata service, meta still serialized
//! - [`FormattedTag`]: a tag whose meta payload has been parsed
//! - [`AddressRecord`] / [`ResultMap`]: the enriched per-address output
//! - [`MetadataRequest`] / [`MetadataResponse`]: primary service payloads
//! - [`ReverseRecord`]: one entry of the registry reverse lookup

mod metadata;
mod record;
mod tag;

pub use metadata::*;
pub use record::*;
pub use tag::*;
