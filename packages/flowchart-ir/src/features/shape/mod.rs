//! Shape feature
//!
//! Tags every CFG block with one diagram shape. Basic blocks that mix I/O
//! and plain statements are split so each resulting node has a single shape.

pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::classify;
