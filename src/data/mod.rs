/// Data layer: wire types, fetching, and the pieces the views need to show
/// asynchronously loaded content safely.
///
/// Architecture:
/// ```text
///   gallery endpoint          thumbnail URLs
///        │                         │
///        ▼                         ▼
///   ┌──────────┐            ┌────────────┐
///   │  loader   │  GET+JSON  │   cache     │  dedup in-flight, LRU
///   └──────────┘            └────────────┘
///        │                         │
///        ▼                         ▼
///   ┌──────────────┐        ┌────────────┐
///   │GalleryListing │        │   slots     │  versioned, drops stale results
///   └──────────────┘        └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  order    │  listing → display indices
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod model;
pub mod order;
pub mod slots;
