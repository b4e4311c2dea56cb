/// Data layer: core types, loading, normalization and statistics.
///
/// Architecture:
/// ```text
///   CSV bytes (dialog / drag-and-drop)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + infer column types → Table
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  'day' → timestamp, stable sort, nulls last
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  stats    │  correlation · seeded sample · histogram
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod normalize;
pub mod stats;
