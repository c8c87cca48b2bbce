/// Data layer: run records, point filtering, import and export.
///
/// Architecture:
/// ```text
///   SimulationRun ──► RunRecord ──► writer ──► .json / .csv / .parquet / .png
///                        ▲
///   .json / .csv / .parquet ──► loader
///                        │
///                        ▼
///                  ┌──────────┐
///                  │  filter   │  machine / LED selection → visible indices
///                  └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod writer;
