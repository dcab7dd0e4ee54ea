//! Report module - presenting correlation results

pub mod export;
pub mod scatter;
pub mod summary;

pub use export::*;
pub use scatter::*;
pub use summary::*;
