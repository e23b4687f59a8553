//! Prompt building and reply parsing for the generative-AI collaborators.
//!
//! The model itself lives outside this crate. Callers send the prompts built
//! here to whatever endpoint they use and hand the raw reply text back to
//! the parsers. Label reading also has a deterministic fallback that works
//! on OCR text alone.

pub mod analysis;
pub mod extraction;
pub mod label;
pub mod prompts;

pub use analysis::*;
pub use extraction::*;
pub use label::*;
pub use prompts::*;
