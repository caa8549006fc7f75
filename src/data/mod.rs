//! Data layer: core types, loading, filtering and the derived views.
//!
//! Architecture:
//! ```text
//!  .parquet / .json / .csv        (or the built-in sample)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → PenguinDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────────┐
//!   │ PenguinDataset │  Vec<Penguin>, immutable, shared via Arc
//!   └────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  species selection → row indices
//!   └──────────┘
//!        │
//!        ├──► histogram   (bucket one attribute)
//!        ├──► sort        (data grid order)
//!        └──► writer      (export the filtered rows)
//! ```

pub mod filter;
pub mod histogram;
pub mod loader;
pub mod model;
pub mod sample;
pub mod sort;
pub mod writer;
