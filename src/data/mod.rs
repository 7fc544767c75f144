/// Data layer: core types, loading, filtering and snapshot extraction.
///
/// Architecture:
/// ```text
///   data.csv (long)            raw_data.csv (wide)
///        │                            │
///        ▼                            ▼
///   ┌──────────┐                ┌──────────┐
///   │  loader   │  → Vec<TrendRecord>   │  loader   │  → SnapshotTable
///   └──────────┘                └──────────┘
///        │                            │
///        ▼                            ▼
///   ┌──────────┐                ┌──────────┐
///   │  filter   │  topics/min/dates    │ snapshot  │  week key + threshold
///   └──────────┘                └──────────┘
///        │                            │
///        ▼                            ▼
///   line chart series            pie chart slices
/// ```
///
/// `generator` fabricates long-format data for demos and tests; nothing else
/// in the pipeline depends on it.

pub mod error;
pub mod filter;
pub mod generator;
pub mod loader;
pub mod model;
pub mod snapshot;
