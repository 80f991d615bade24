//! Data models for undertone
//!
//! Core data structures shared by the estimator, applicator, and the worker
//! protocol.

mod filter;
mod pixel_buffer;

pub use filter::{ChannelCoefficients, FilterDescriptor};
pub use pixel_buffer::{PixelBuffer, BYTES_PER_PIXEL};
