//! Constants for tagmeta.
//!
//! Registry contract, service endpoints, query limits and the fixed display
//! attributes of the synthesized identity tag.

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY CONTRACT
// ═══════════════════════════════════════════════════════════════════════════════

/// Address of the IDriss registry resolver contract on Polygon.
pub const REGISTRY_RESOLVER_ADDRESS: &str = "0xa179BF6f32483A82d4BD726068EfD93E29f3c930";

/// Default Polygon JSON-RPC endpoint used for registry reads.
pub const DEFAULT_REGISTRY_RPC_URL: &str = "https://polygon.llamarpc.com";

// ═══════════════════════════════════════════════════════════════════════════════
// NAME RESOLUTION API
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the off-chain name resolution API.
pub const DEFAULT_NAMES_API_URL: &str = "https://www.idriss.xyz/v1";

/// Path of the identifier-to-handle lookup endpoint.
pub const NAMES_LOOKUP_PATH: &str = "getTwitterNames";

/// Query parameter carrying the identifier.
pub const NAMES_LOOKUP_PARAM: &str = "ids";

// ═══════════════════════════════════════════════════════════════════════════════
// METADATA SERVICE
// ═══════════════════════════════════════════════════════════════════════════════

/// Logical resource name of the primary metadata query.
pub const METADATA_RESOURCE: &str = "address_metadata_info";

/// Path of the metadata resource on the metadata service.
pub const METADATA_PATH: &str = "/api/v1/metadata";

/// Default base URL of the metadata service.
pub const DEFAULT_METADATA_API_URL: &str = "https://metadata.services.blockscout.com";

/// Maximum number of tags requested per address.
pub const TAGS_LIMIT: u32 = 20;

/// Default chain the metadata is requested for.
pub const DEFAULT_CHAIN_ID: &str = "1";

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTITY TAG
// ═══════════════════════════════════════════════════════════════════════════════

/// Slug of the synthesized identity tag.
pub const IDENTITY_TAG_SLUG: &str = "identity-handle";

/// Display name of the identity tag.
pub const IDENTITY_TAG_NAME: &str = "IDriss";

/// Tag type of the identity tag.
pub const IDENTITY_TAG_TYPE: &str = "protocol";

/// Ordinal of the identity tag.
pub const IDENTITY_TAG_ORDINAL: i64 = 0;

/// Brand background color.
pub const IDENTITY_TAG_BG_COLOR: &str = "#11dd74";

/// Text color drawn over the brand color.
pub const IDENTITY_TAG_TEXT_COLOR: &str = "#FFFFFF";

/// Tooltip shown on the identity tag.
pub const IDENTITY_TAG_TOOLTIP: &str = "This address is linked to an IDriss";

/// Brand mark rendered inside the tag.
pub const IDENTITY_TAG_ICON: &str = "data:image/svg+xml;base64,PHN2ZyB2ZXJzaW9uPSIxLjIiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyIgdmlld0JveD0iMCAwIDEwMDAgOTM0IiB3aWR0aD0iMTUwIiBoZWlnaHQ9IjE0MCI+Cgk8dGl0bGU+SURyaXNzX0JyYW5kbWFya19XaGl0ZS1zdmc8L3RpdGxlPgoJPHN0eWxlPgoJCS5zMCB7IGZpbGw6ICNmZmZmZmYgfSAKCQkuczEgeyBmaWxsOiAjMTFkZDc0IH0gCgk8L3N0eWxlPgoJPHBhdGggaWQ9IlNoYXBlIDUiIGNsYXNzPSJzMCIgZD0ibTgzOC44IDgwOS44Yy00My40IDc1LTEyMy41IDEyMS4zLTIxMC4yIDEyMS4zaC0yNTcuM2MtODYuNyAwLTE2Ni44LTQ2LjMtMjEwLjItMTIxLjNsLTEyOC43LTIyMi45Yy00My4yLTc1LjEtNDMuMi0xNjcuNiAwLTI0Mi43bDEyOC43LTIyMi45YzQzLjQtNzUgMTIzLjUtMTIxLjMgMjEwLjItMTIxLjNoMjU3LjNjODYuNyAwIDE2Ni44IDQ2LjMgMjEwLjIgMTIxLjNsMTI4LjcgMjIyLjljNDMuNCA3NS4xIDQzLjQgMTY3LjYgMCAyNDIuN3oiLz4KCTxwYXRoIGlkPSJJRCAiIGZpbGwtcnVsZT0iZXZlbm9kZCIgY2xhc3M9InMxIiBkPSJtMjM5LjMgMjY5LjZoMTEwLjZ2MzkxaC0xMTAuNnptMTg5LjQgMGgxODQuOWMxMjkuNiAwIDIxOC40IDc1LjUgMjE4LjQgMTk1LjYgMCAxMjAuMS04OC44IDE5NS41LTIxOC40IDE5NS41aC0xODQuOXptMTgwLjQgMzAyLjhjNjYuNSAwIDExMS4yLTM5LjcgMTExLjItMTA3LjMgMC02Ny42LTQ0LjctMTA3LjMtMTExLjItMTA3LjNoLTY5Ljh2MjE0LjZ6Ii8+Cjwvc3ZnPg==";

// ═══════════════════════════════════════════════════════════════════════════════
// CONCURRENCY
// ═══════════════════════════════════════════════════════════════════════════════

/// Default number of identity resolutions in flight per batch.
pub const DEFAULT_IDENTITY_CONCURRENCY: usize = 8;

/// Default HTTP timeout for all outbound requests.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
