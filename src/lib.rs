//! Palmer Penguins explorer: an egui dashboard over one immutable dataset,
//! with a species filter feeding a scatterplot, two histograms and two
//! tables through a small pull-based reactive graph.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod reactive;
pub mod state;
pub mod ui;
pub mod views;
