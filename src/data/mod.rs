/// Data layer: core types, loading, filtering and displacement.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse sources → Vec<Sample> (failed source → empty)
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ RecordStore  │  Vec<Sample>, selector vocabularies
///   └─────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  group / marker / genre → Vec<&Sample>
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ displacement  │  instantaneous per (genre, block) | cumulative per genre
///   └──────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  mean over runs, shared time domain
///   └───────────┘
/// ```

pub mod aggregate;
pub mod displacement;
pub mod filter;
pub mod loader;
pub mod model;
