//! Pipeline module - loading, extraction and correlation steps

pub mod correlation;
pub mod extract;
pub mod loader;

pub use correlation::*;
pub use extract::*;
pub use loader::*;
