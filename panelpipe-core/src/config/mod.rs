//! Configuration types
//!
//! Board-agnostic settings for the frame path. Rotation and scale are
//! fixed once the first frame has been sent.

pub mod types;

pub use types::*;
