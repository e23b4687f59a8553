//! Domain models for the pillbox system.

mod medicine;

pub use medicine::*;
