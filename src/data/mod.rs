/// Data layer: core types, loading, column choice and splitting.
///
/// Architecture:
/// ```text
///  uploaded bytes + filename
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  sniff format → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  heuristic → column name
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  split    │  seeded shuffles → train / validation / test
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod select;
pub mod split;
