//! egui rendering: side/top panels and the plots of the central panel.

pub mod panels;
pub mod plot;
