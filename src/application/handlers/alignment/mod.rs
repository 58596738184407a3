//! Alignment handlers.

mod calculate_alignment;

pub use calculate_alignment::AlignmentEngine;
