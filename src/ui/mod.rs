//! egui rendering. Each function draws one part of the window from
//! [`crate::state::AppState`] and reports input changes back through its setters.

pub mod panels;
pub mod plot;
pub mod table;
