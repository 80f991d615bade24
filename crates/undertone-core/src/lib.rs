//! Undertone Core Library
//!
//! Core functionality for automatic underwater color correction: histogram
//! based filter estimation, linear per-channel filter application, and the
//! worker/dispatcher machinery that sequences the two across an async
//! boundary.

pub mod applicator;
pub mod config;
pub mod decoders;
pub mod dispatcher;
pub mod estimator;
pub mod exporters;
pub mod models;
pub mod protocol;
pub mod worker;

// Re-export commonly used types
pub use config::EstimatorConfig;
pub use dispatcher::{PipelineDispatcher, PipelineState};
pub use models::{ChannelCoefficients, FilterDescriptor, PixelBuffer};
pub use protocol::{WorkOutcome, WorkRequest, WorkResult};
