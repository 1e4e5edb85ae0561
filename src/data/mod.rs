/// Data layer: tables, loading, axis assignment and plot resolution.
///
/// Architecture:
/// ```text
///  .txt / .dat  (header row + whitespace-delimited numbers)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ SeriesAssignment │  shared X column + Y series (left/right)
///   └──────────────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ PlotRequest  │  scaled / log-mapped points, labels, bounds
///   └─────────────┘
/// ```

pub mod assignment;
pub mod loader;
pub mod model;
pub mod request;
