//! Request handlers.

pub mod crops;
pub mod health;
pub mod predict;

pub use crops::*;
pub use health::*;
pub use predict::*;
