//! 生成管道：按顺序在模型之间回退
//!
//! Generation pipeline: ordered fallback across model identifiers.

pub mod fallback;

pub use fallback::{AttemptFailure, FallbackController, FallbackState, FallbackSuccess};
