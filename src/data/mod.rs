/// Data layer: log loading, field coercion and series selection.
///
/// Architecture:
/// ```text
///  durations.csv / mem_cpu.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read file → RawDataset (untyped rows)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  coerce rows → Vec<Record>, drop bad rows
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  select   │  filter / order → DurationSeries, ResourceSeries
///   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod select;
