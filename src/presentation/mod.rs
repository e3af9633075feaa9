//! Cosmetic presentation helpers, independent of recognition

pub mod animation;

pub use animation::{AnimationTicker, FrameCycle};
